//! Builds the rsync command line from the chosen options.
//!
//! The flags are assembled in a fixed order so that two runs with the same
//! options always produce the same command string. Paths are appended last,
//! each wrapped by [`escape_cli`], and never reach a shell unquoted.

use crate::types::{PathPair, SyncOptions};

/// Quote an arbitrary string for use as a single shell word.
///
/// Embedded single quotes become `'\''` and the whole string is wrapped in
/// single quotes, which neutralizes every other shell metacharacter.
pub fn escape_cli(arg: &str) -> String {
	format!("'{}'", arg.replace('\'', "'\\''"))
}

/// A complete command line except for the two path arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
	template: String,
}

impl CommandTemplate {
	/// The flags-only portion, without any paths.
	pub fn as_str(&self) -> &str {
		&self.template
	}

	/// Append the quoted source and target to produce the full command line.
	///
	/// Both paths get a trailing slash so rsync transfers the directory's
	/// contents into the target rather than nesting the directory itself.
	pub fn render(&self, pair: &PathPair) -> String {
		let src = with_trailing_slash(&pair.source.to_string_lossy());
		let tar = with_trailing_slash(&pair.target.to_string_lossy());
		format!("{} {} {}", self.template, escape_cli(&src), escape_cli(&tar))
	}
}

fn with_trailing_slash(path: &str) -> String {
	if path.ends_with('/') {
		path.to_string()
	} else {
		format!("{}/", path)
	}
}

/// Assembles command templates for a fixed rsync binary and exclusion set.
#[derive(Debug, Clone)]
pub struct CommandBuilder {
	binary: String,
	exclude_patterns: Vec<String>,
}

impl CommandBuilder {
	pub fn new(binary: impl Into<String>, exclude_patterns: Vec<String>) -> Self {
		CommandBuilder { binary: binary.into(), exclude_patterns }
	}

	/// Build the flags-only template for one set of options.
	///
	/// The base invocation preserves permissions, times, ACLs and extended
	/// attributes, stays on one filesystem, and always requests the
	/// statistics block so the summary stays parseable even on a dry run.
	pub fn build(&self, options: &SyncOptions) -> CommandTemplate {
		let mut command = format!("{} -avAXx --stats", self.binary);

		if options.dry_run {
			command.push_str(" -n");
		}

		if options.mirror {
			command.push_str(" --delete --delete-during --delete-excluded");
		} else {
			command.push_str(" -u --force");
		}

		if options.exclude_system_paths {
			for pattern in &self.exclude_patterns {
				command.push_str(" --exclude=");
				command.push_str(pattern);
			}
		}

		CommandTemplate { template: command }
	}
}


// vim: ts=4
