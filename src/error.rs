//! Error types for sync orchestration

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::types::SessionStatus;

/// Errors from session operations.
///
/// Validation failures are not errors and never appear here; they come back
/// as data in the start outcome so the caller can render them per side.
#[derive(Debug)]
pub enum SessionError {
	/// Operation not allowed in the session's current state
	InvalidState { op: &'static str, status: SessionStatus },

	/// start() was called before any paths were armed
	NotArmed,

	/// The armed paths were empty or not absolute
	InvalidPaths { message: String },

	/// The external process could not be started at all
	Launch(LaunchError),
}

impl fmt::Display for SessionError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SessionError::InvalidState { op, status } => {
				write!(f, "Cannot {} while session is {}", op, status)
			}
			SessionError::NotArmed => write!(f, "No source/target pair has been armed"),
			SessionError::InvalidPaths { message } => {
				write!(f, "Invalid path pair: {}", message)
			}
			SessionError::Launch(e) => write!(f, "Launch failed: {}", e),
		}
	}
}

impl Error for SessionError {}

impl From<LaunchError> for SessionError {
	fn from(e: LaunchError) -> Self {
		SessionError::Launch(e)
	}
}

/// The external process never started, so no exit code exists.
#[derive(Debug)]
pub enum LaunchError {
	/// Subprocess spawn failed
	SpawnFailed { cmd: String, source: io::Error },

	/// A stdio pipe of the spawned process was unavailable
	StdioUnavailable { what: String },
}

impl fmt::Display for LaunchError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			LaunchError::SpawnFailed { cmd, source } => {
				write!(f, "Failed to spawn '{}': {}", cmd, source)
			}
			LaunchError::StdioUnavailable { what } => {
				write!(f, "Stdio unavailable: {}", what)
			}
		}
	}
}

impl Error for LaunchError {}

/// Preference store errors
#[derive(Debug)]
pub enum PrefsError {
	/// Failed to load the store file
	LoadFailed { source: Box<dyn Error + Send + Sync> },

	/// Failed to save the store file
	SaveFailed { source: Box<dyn Error + Send + Sync> },

	/// The store file exists but could not be parsed
	Corrupted { message: String },
}

impl fmt::Display for PrefsError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			PrefsError::LoadFailed { source } => write!(f, "Failed to load preferences: {}", source),
			PrefsError::SaveFailed { source } => write!(f, "Failed to save preferences: {}", source),
			PrefsError::Corrupted { message } => write!(f, "Preferences corrupted: {}", message),
		}
	}
}

impl Error for PrefsError {}

/// Configuration errors
#[derive(Debug)]
pub enum ConfigError {
	/// I/O error reading a config file
	Io { path: PathBuf, source: io::Error },

	/// Config file could not be parsed
	Parse { path: PathBuf, message: String },
}

impl fmt::Display for ConfigError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ConfigError::Io { path, source } => {
				write!(f, "Cannot read config {}: {}", path.display(), source)
			}
			ConfigError::Parse { path, message } => {
				write!(f, "Cannot parse config {}: {}", path.display(), message)
			}
		}
	}
}

impl Error for ConfigError {}

// vim: ts=4
