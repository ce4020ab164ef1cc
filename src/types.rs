//! Shared types for sync sessions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// User-chosen transfer options.
///
/// A session takes a copy of these when it is armed; the copy stays fixed
/// for the whole run even if the caller keeps mutating its own instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SyncOptions {
	/// Report what would change without touching the filesystem
	pub dry_run: bool,

	/// Make the target an exact copy of the source, deleting extra files
	/// (when false, the run is update-only with forced overwrite)
	pub mirror: bool,

	/// Exclude trash and indexing directories from the transfer
	pub exclude_system_paths: bool,
}

/// One toggle of [`SyncOptions`], for host surfaces that flip options
/// individually.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOption {
	DryRun,
	Mirror,
	ExcludeSystemPaths,
}

impl SyncOptions {
	pub fn set(&mut self, option: SyncOption, value: bool) {
		match option {
			SyncOption::DryRun => self.dry_run = value,
			SyncOption::Mirror => self.mirror = value,
			SyncOption::ExcludeSystemPaths => self.exclude_system_paths = value,
		}
	}
}

/// The two directories of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPair {
	pub source: PathBuf,
	pub target: PathBuf,
}

impl PathPair {
	pub fn new(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
		PathPair { source: source.into(), target: target.into() }
	}
}

/// Lifecycle state of a sync session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionStatus {
	/// No run in progress; a new run may be armed or started
	Idle,

	/// Precondition checks are being evaluated
	Validating,

	/// A destructive run needs an explicit go-ahead before it may start
	AwaitingConfirmation,

	/// The external process is in flight
	Running,

	/// The process finished and a result is available
	Completed,

	/// The run was cancelled and all result state was discarded
	Cancelled,
}

impl fmt::Display for SessionStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			SessionStatus::Idle => "idle",
			SessionStatus::Validating => "validating",
			SessionStatus::AwaitingConfirmation => "awaiting-confirmation",
			SessionStatus::Running => "running",
			SessionStatus::Completed => "completed",
			SessionStatus::Cancelled => "cancelled",
		};
		write!(f, "{}", name)
	}
}

// vim: ts=4
