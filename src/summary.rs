//! Parses the statistics block rsync prints with `--stats`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Structured counts extracted from a finished run's output.
///
/// Either every field parsed or no summary is produced at all; callers never
/// see a half-filled summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferSummary {
	/// Lines rsync printed for deletions in the target
	pub files_deleted: u64,

	/// "Number of files transferred"
	pub files_transferred: u64,

	/// "Total transferred file size" in bytes
	pub bytes_transferred: u64,

	/// "Number of files", minus the transfer root itself
	pub total_files: u64,

	/// "Total file size" in bytes
	pub total_bytes: u64,
}

fn stat_patterns() -> &'static [Regex; 4] {
	static PATTERNS: OnceLock<[Regex; 4]> = OnceLock::new();
	PATTERNS.get_or_init(|| {
		[
			Regex::new(r"(?m)^Number of files transferred: ([0-9]+)$").unwrap(),
			Regex::new(r"(?m)^Total transferred file size: ([0-9]+) bytes$").unwrap(),
			Regex::new(r"(?m)^Number of files: ([0-9]+)$").unwrap(),
			Regex::new(r"(?m)^Total file size: ([0-9]+) bytes$").unwrap(),
		]
	})
}

fn capture_u64(raw: &str, re: &Regex) -> Option<u64> {
	re.captures(raw)?.get(1)?.as_str().parse().ok()
}

/// Extract a [`TransferSummary`] from raw rsync output.
///
/// Returns `None` when any of the markers is absent or non-numeric, which
/// covers truncated output, a different rsync stats format, or a run that
/// died before printing statistics.
pub fn parse(raw: &str) -> Option<TransferSummary> {
	let deleted = raw.lines().filter(|line| line.starts_with("deleting ")).count() as u64;

	let [files, bytes, files_total, bytes_total] = stat_patterns();
	let files_transferred = capture_u64(raw, files)?;
	let bytes_transferred = capture_u64(raw, bytes)?;
	let mut total_files = capture_u64(raw, files_total)?;
	let total_bytes = capture_u64(raw, bytes_total)?;

	// rsync counts the transfer root as one of the files
	if total_files > 0 {
		total_files -= 1;
	}

	Some(TransferSummary {
		files_deleted: deleted,
		files_transferred,
		bytes_transferred,
		total_files,
		total_bytes,
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	fn stats_block(transferred: u64, bytes: u64, total: u64, total_bytes: u64) -> String {
		format!(
			"Number of files: {}\n\
			 Number of files transferred: {}\n\
			 Total file size: {} bytes\n\
			 Total transferred file size: {} bytes\n\
			 Literal data: 0 bytes\n\
			 Matched data: 0 bytes\n\
			 File list size: 220\n\
			 sent 338 bytes  received 44 bytes  764.00 bytes/sec\n\
			 total size is {}  speedup is 1.00\n",
			total, transferred, total_bytes, bytes, total_bytes
		)
	}

	#[test]
	fn test_parse_full_block() {
		let mut raw = String::from("building file list ... done\n./\nphotos/a.jpg\n");
		raw.push_str("deleting old/b.txt\ndeleting old/c.txt\ndeleting old/\n");
		raw.push_str(&stats_block(2, 4096, 7, 1048576));

		let summary = parse(&raw).unwrap();
		assert_eq!(summary.files_deleted, 3);
		assert_eq!(summary.files_transferred, 2);
		assert_eq!(summary.bytes_transferred, 4096);
		assert_eq!(summary.total_files, 6); // root directory removed from the count
		assert_eq!(summary.total_bytes, 1048576);
	}

	#[test]
	fn test_parse_no_deletions() {
		let summary = parse(&stats_block(1, 10, 2, 10)).unwrap();
		assert_eq!(summary.files_deleted, 0);
		assert_eq!(summary.total_files, 1);
	}

	#[test]
	fn test_zero_total_is_not_decremented() {
		let summary = parse(&stats_block(0, 0, 0, 0)).unwrap();
		assert_eq!(summary.total_files, 0);
	}

	#[test]
	fn test_missing_marker_yields_none() {
		let mut raw = stats_block(1, 10, 2, 10);
		raw = raw.replace("Number of files transferred: 1\n", "");
		assert!(parse(&raw).is_none());
	}

	#[test]
	fn test_non_numeric_marker_yields_none() {
		let raw = stats_block(1, 10, 2, 10)
			.replace("Total file size: 10 bytes", "Total file size: lots bytes");
		assert!(parse(&raw).is_none());
	}

	#[test]
	fn test_marker_must_own_the_whole_line() {
		// an indented or suffixed marker line does not count
		let raw = stats_block(1, 10, 2, 10).replace(
			"Total transferred file size: 10 bytes",
			"  Total transferred file size: 10 bytes (approx)",
		);
		assert!(parse(&raw).is_none());
	}

	#[test]
	fn test_empty_output_yields_none() {
		assert!(parse("").is_none());
	}

	#[test]
	fn test_deleting_must_start_the_line() {
		let mut raw = String::from("not deleting a/b\n");
		raw.push_str(&stats_block(0, 0, 1, 0));
		assert_eq!(parse(&raw).unwrap().files_deleted, 0);
	}
}

// vim: ts=4
