//! Diagnostic side channel for exit codes that should not occur.
//!
//! Classification keeps working regardless of what this does with the
//! report; it must never block or fail the user-visible result.

use crate::classify::ExitOutcome;
use crate::logging::warn;

/// Context captured when a run ends with an anomalous exit code.
#[derive(Debug, Clone)]
pub struct DiagnosticReport {
	pub outcome: ExitOutcome,

	/// The full command line that produced the code
	pub command: String,

	/// Captured stderr of the run
	pub stderr: String,

	/// Whether a transfer summary could still be parsed from the output
	pub summary_parsed: bool,
}

/// Capability to route anomaly reports somewhere useful.
pub trait DiagnosticReporter: Send + Sync {
	fn report(&self, report: &DiagnosticReport);
}

/// Default reporter: a structured warning in the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl DiagnosticReporter for LogReporter {
	fn report(&self, report: &DiagnosticReport) {
		warn!(
			exit_code = report.outcome.code,
			category = ?report.outcome.category,
			summary_parsed = report.summary_parsed,
			command = %report.command,
			stderr = %report.stderr,
			"unexpected exit code"
		);
	}
}

/// Reporter that swallows everything.
pub struct NoReporter;

impl DiagnosticReporter for NoReporter {
	fn report(&self, _report: &DiagnosticReport) {}
}

// vim: ts=4
