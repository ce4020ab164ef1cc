//! # syncpilot - rsync Front-End Orchestration
//!
//! syncpilot drives one-shot rsync runs between a source and a target
//! directory: it assembles the command line, checks preconditions (with a
//! confirmation gate before destructive mirrors), launches rsync without
//! blocking, supports cancellation mid-flight, classifies the exit code and
//! parses the statistics output into a structured summary.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use syncpilot::session::SyncSession;
//! use syncpilot::types::{PathPair, SyncOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = SyncSession::builder().build();
//!     session.arm(PathPair::new("/Users/me/docs", "/Volumes/Backup/docs"),
//!                 SyncOptions::default())?;
//!     session.start()?;
//!     // completion arrives through the session callbacks
//!     Ok(())
//! }
//! ```
//!
//! The process runner, filesystem probes, diagnostics channel and event
//! callbacks are all traits, so hosts and tests can swap in their own.

pub mod callbacks;
pub mod classify;
pub mod command;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod messages;
pub mod prefs;
pub mod probe;
pub mod process;
pub mod report;
pub mod session;
pub mod summary;
pub mod types;
pub mod validate;

// Re-export commonly used types and functions
pub use classify::{ExitOutcome, OutcomeCategory};
pub use error::{ConfigError, LaunchError, PrefsError, SessionError};
pub use session::{RunResult, SessionBuilder, StartOutcome, SyncSession};
pub use summary::TransferSummary;
pub use types::{PathPair, SessionStatus, SyncOption, SyncOptions};
pub use validate::{MirrorWarning, PathPolicy, ValidationFailure, ValidationVerdict};

// vim: ts=4
