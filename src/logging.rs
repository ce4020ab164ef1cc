//! Logging prelude module for convenient access to tracing macros.
//!
//! # Usage
//!
//! ```ignore
//! use crate::logging::*;
//!
//! info!("starting sync");
//! warn!("unexpected exit code");
//! ```

pub use tracing::{debug, error, info, warn};

/// Initialize the tracing subscriber with environment filter support.
///
/// Logs at INFO and above by default; control the level with `RUST_LOG`:
///
/// ```bash
/// RUST_LOG=debug syncpilot sync ~/docs /Volumes/Backup/docs
/// RUST_LOG=syncpilot::session=trace syncpilot sync ...
/// ```
pub fn init_tracing() {
	tracing_subscriber::fmt()
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
		)
		.with_writer(std::io::stderr)
		.init();
}
