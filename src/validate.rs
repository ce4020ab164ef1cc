//! Precondition checks that run before every sync.
//!
//! The battery is ordered and the first failing check wins: a missing
//! directory is reported as missing even when its permissions would also
//! fail, because each later check only makes sense once the earlier ones
//! hold.

use std::path::{Path, PathBuf};

use crate::probe::PathProbe;
use crate::types::{PathPair, SyncOptions};

/// Which confirmation a destructive run is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorWarning {
	/// The source is empty, so mirroring would delete everything in the
	/// target
	EmptySource,

	/// Files in the target that are absent from the source will be deleted
	DeletesInTarget,
}

/// Why validation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationFailure {
	/// One or both paths do not resolve to an existing directory
	Missing { source: bool, target: bool },

	/// One or both paths are neither readable nor traversable
	PermissionDenied { source: bool, target: bool },

	/// The pair falls outside the directories this tool is allowed to touch
	PolicyViolation,

	/// Not an error: the run may proceed once the user confirms deletions
	ConfirmationRequired(MirrorWarning),
}

impl ValidationFailure {
	/// Text keys for the host to resolve, title and message.
	pub fn text_keys(&self) -> (&'static str, &'static str) {
		match self {
			ValidationFailure::Missing { .. } => ("dialog_missing_t", "dialog_missing_m"),
			ValidationFailure::PermissionDenied { .. } => {
				("dialog_permissions_t", "dialog_permissions_m")
			}
			ValidationFailure::PolicyViolation => {
				("dialog_pathNotInHome_t", "dialog_pathNotInHome_m")
			}
			ValidationFailure::ConfirmationRequired(MirrorWarning::EmptySource) => {
				("dialog_emptySource_t", "dialog_emptySource_m")
			}
			ValidationFailure::ConfirmationRequired(MirrorWarning::DeletesInTarget) => {
				("dialog_mirrorWarning_t", "dialog_mirrorWarning_m")
			}
		}
	}
}

/// Outcome of one validation pass. Produced fresh every time, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationVerdict {
	Pass,
	Fail(ValidationFailure),
}

impl ValidationVerdict {
	pub fn passed(&self) -> bool {
		matches!(self, ValidationVerdict::Pass)
	}
}

/// Where syncs are allowed to operate.
///
/// One side must live under `home` and the other under `home` or one of the
/// `volume_roots`. This is a product restriction rather than a filesystem
/// requirement, so it can be switched off entirely.
#[derive(Debug, Clone)]
pub struct PathPolicy {
	pub enforce: bool,
	pub home: PathBuf,
	pub volume_roots: Vec<PathBuf>,
}

impl PathPolicy {
	/// Policy that allows any pair.
	pub fn permissive() -> Self {
		PathPolicy { enforce: false, home: PathBuf::new(), volume_roots: Vec::new() }
	}

	fn under_home(&self, path: &Path) -> bool {
		path.starts_with(&self.home)
	}

	fn under_volume(&self, path: &Path) -> bool {
		self.volume_roots.iter().any(|root| path.starts_with(root))
	}

	fn allows(&self, pair: &PathPair) -> bool {
		if !self.enforce {
			return true;
		}

		let src_home = self.under_home(&pair.source);
		let tar_home = self.under_home(&pair.target);

		(src_home && tar_home)
			|| (src_home && self.under_volume(&pair.target))
			|| (self.under_volume(&pair.source) && tar_home)
	}
}

/// Runs the ordered battery against a candidate pair.
pub struct PathValidator<'a> {
	probe: &'a dyn PathProbe,
	policy: &'a PathPolicy,
}

impl<'a> PathValidator<'a> {
	pub fn new(probe: &'a dyn PathProbe, policy: &'a PathPolicy) -> Self {
		PathValidator { probe, policy }
	}

	/// Validate a pair for the given options.
	///
	/// `deletions_confirmed` skips the destructive-confirmation gate; it is
	/// only ever passed as true after the user has explicitly agreed.
	pub fn validate(
		&self,
		pair: &PathPair,
		options: &SyncOptions,
		deletions_confirmed: bool,
	) -> ValidationVerdict {
		let src_missing = !self.probe.is_directory(&pair.source);
		let tar_missing = !self.probe.is_directory(&pair.target);
		if src_missing || tar_missing {
			return ValidationVerdict::Fail(ValidationFailure::Missing {
				source: src_missing,
				target: tar_missing,
			});
		}

		// read-or-traverse is enough to list contents; stricter checks would
		// reject pairs rsync can actually handle
		let src_denied = !self.listable(&pair.source);
		let tar_denied = !self.listable(&pair.target);
		if src_denied || tar_denied {
			return ValidationVerdict::Fail(ValidationFailure::PermissionDenied {
				source: src_denied,
				target: tar_denied,
			});
		}

		if !self.policy.allows(pair) {
			return ValidationVerdict::Fail(ValidationFailure::PolicyViolation);
		}

		if options.mirror && !deletions_confirmed {
			let warning = if self.probe.has_entries(&pair.source) {
				MirrorWarning::DeletesInTarget
			} else {
				MirrorWarning::EmptySource
			};
			return ValidationVerdict::Fail(ValidationFailure::ConfirmationRequired(warning));
		}

		ValidationVerdict::Pass
	}

	fn listable(&self, path: &Path) -> bool {
		self.probe.is_readable(path) || self.probe.is_executable(path)
	}
}


// vim: ts=4
