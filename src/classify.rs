//! Maps rsync exit codes to outcome categories.
//!
//! The table covers every code rsync is known to return for the fixed flag
//! set this tool uses. Codes tied to flags that are never passed (delete
//! limits, timeouts, daemon mode) are still present so an occurrence is
//! classified instead of crashing, and flagged for diagnostics.

use serde::{Deserialize, Serialize};

/// Coarse result of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutcomeCategory {
	/// Everything transferred
	Success,

	/// The run finished but some files may not have made it
	Partial,

	/// The run failed outright
	Fatal,

	/// A code outside the known table
	Unexpected,
}

/// Classification of one exit code, with the text keys the host resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExitOutcome {
	/// The process exit code, passed through verbatim
	pub code: i32,
	pub category: OutcomeCategory,
	pub title_key: &'static str,
	pub message_key: &'static str,
}

const EXIT_TABLE: &[(i32, OutcomeCategory, &str, &str)] = &[
	(0, OutcomeCategory::Success, "exit_00_t", "exit_00_m"),
	// usage / protocol / selection / startup errors: upstream validation
	// should make these unreachable
	(1, OutcomeCategory::Fatal, "exit_01_t", "exit_01_m"),
	(2, OutcomeCategory::Fatal, "exit_02_t", "exit_02_m"),
	(3, OutcomeCategory::Fatal, "exit_03_t", "exit_03_m"),
	(4, OutcomeCategory::Fatal, "exit_04_t", "exit_04_m"),
	(5, OutcomeCategory::Fatal, "exit_05_t", "exit_05_m"),
	(6, OutcomeCategory::Fatal, "exit_06_t", "exit_06_m"),
	(10, OutcomeCategory::Partial, "exit_10_t", "exit_10_m"),
	(11, OutcomeCategory::Partial, "exit_11_t", "exit_11_m"),
	// stream corruption and diagnostics errors are unrecoverable
	(12, OutcomeCategory::Fatal, "exit_12_t", "exit_12_m"),
	(13, OutcomeCategory::Fatal, "exit_13_t", "exit_13_m"),
	(14, OutcomeCategory::Partial, "exit_14_t", "exit_14_m"),
	(20, OutcomeCategory::Partial, "exit_20_t", "exit_20_m"),
	(21, OutcomeCategory::Partial, "exit_21_t", "exit_21_m"),
	(22, OutcomeCategory::Partial, "exit_22_t", "exit_22_m"),
	// the one non-zero code that happens in normal operation
	(23, OutcomeCategory::Partial, "exit_23_t", "exit_23_m"),
	(24, OutcomeCategory::Partial, "exit_24_t", "exit_24_m"),
	(25, OutcomeCategory::Partial, "exit_25_t", "exit_25_m"),
	(30, OutcomeCategory::Partial, "exit_30_t", "exit_30_m"),
	(35, OutcomeCategory::Partial, "exit_35_t", "exit_35_m"),
];

/// Classify an exit code. Never fails; unknown codes map to
/// [`OutcomeCategory::Unexpected`] with generic text keys.
pub fn classify(code: i32) -> ExitOutcome {
	for &(c, category, title_key, message_key) in EXIT_TABLE {
		if c == code {
			return ExitOutcome { code, category, title_key, message_key };
		}
	}
	ExitOutcome {
		code,
		category: OutcomeCategory::Unexpected,
		title_key: "exit_unknown_t",
		message_key: "exit_unknown_m",
	}
}

/// Whether a code warrants a diagnostic report.
///
/// 0 is a clean finish and 23 is the expected partial-transfer code; every
/// other code should be impossible under the fixed invocation and gets
/// reported for later investigation.
pub fn is_anomalous(code: i32) -> bool {
	!matches!(code, 0 | 23)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_success() {
		let outcome = classify(0);
		assert_eq!(outcome.category, OutcomeCategory::Success);
		assert_eq!(outcome.code, 0);
		assert_eq!(outcome.title_key, "exit_00_t");
		assert!(!is_anomalous(0));
	}

	#[test]
	fn test_partial_transfer_is_expected() {
		let outcome = classify(23);
		assert_eq!(outcome.category, OutcomeCategory::Partial);
		assert!(!is_anomalous(23));
	}

	#[test]
	fn test_usage_error_is_fatal_and_reported() {
		let outcome = classify(1);
		assert_eq!(outcome.category, OutcomeCategory::Fatal);
		assert!(is_anomalous(1));
	}

	#[test]
	fn test_stream_and_diagnostics_errors_are_fatal() {
		assert_eq!(classify(12).category, OutcomeCategory::Fatal);
		assert_eq!(classify(13).category, OutcomeCategory::Fatal);
	}

	#[test]
	fn test_io_and_signal_codes_are_partial() {
		for code in [10, 11, 14, 20, 21, 22, 24, 25, 30, 35] {
			assert_eq!(classify(code).category, OutcomeCategory::Partial, "code {}", code);
			assert!(is_anomalous(code), "code {}", code);
		}
	}

	#[test]
	fn test_unknown_code() {
		let outcome = classify(999);
		assert_eq!(outcome.category, OutcomeCategory::Unexpected);
		assert_eq!(outcome.code, 999);
		assert_eq!(outcome.title_key, "exit_unknown_t");
		assert!(is_anomalous(999));
	}

	#[test]
	fn test_negative_code_is_unexpected() {
		// a killed process surfaces as a negative pseudo-code
		assert_eq!(classify(-1).category, OutcomeCategory::Unexpected);
	}
}

// vim: ts=4
