//! Human-readable number and byte formatting for result rendering.

/// Format an integer with thousands separators: 4867365 -> "4,867,365".
pub fn format_num(num: u64) -> String {
	let digits = num.to_string();
	let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);

	for (i, c) in digits.chars().enumerate() {
		if i != 0 && (digits.len() - i) % 3 == 0 {
			formatted.push(',');
		}
		formatted.push(c);
	}

	formatted
}

/// Render a byte count against binary unit boundaries with one decimal,
/// e.g. 1536 -> "1.5 KB". Counts below 1 KB are spelled out in bytes.
pub fn factor_bytes(num: u64) -> String {
	const UNITS: &[(u64, &str)] = &[
		(1 << 50, "PB"),
		(1 << 40, "TB"),
		(1 << 30, "GB"),
		(1 << 20, "MB"),
		(1 << 10, "KB"),
	];

	for &(factor, unit) in UNITS {
		if num >= factor {
			return format!("{:.1} {}", num as f64 / factor as f64, unit);
		}
	}

	format!("{} {}", format_num(num), if num == 1 { "byte" } else { "bytes" })
}

/// "1 file" / "5 files" with separators on the count.
pub fn count_files(num: u64) -> String {
	format!("{} {}", format_num(num), if num == 1 { "file" } else { "files" })
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_format_num_groups() {
		assert_eq!(format_num(0), "0");
		assert_eq!(format_num(999), "999");
		assert_eq!(format_num(1000), "1,000");
		assert_eq!(format_num(4867365), "4,867,365");
		assert_eq!(format_num(1048576), "1,048,576");
	}

	#[test]
	fn test_factor_bytes_units() {
		assert_eq!(factor_bytes(0), "0 bytes");
		assert_eq!(factor_bytes(1), "1 byte");
		assert_eq!(factor_bytes(1023), "1,023 bytes");
		assert_eq!(factor_bytes(1024), "1.0 KB");
		assert_eq!(factor_bytes(1536), "1.5 KB");
		assert_eq!(factor_bytes(1048576), "1.0 MB");
		assert_eq!(factor_bytes(1073741824), "1.0 GB");
		assert_eq!(factor_bytes(1099511627776), "1.0 TB");
		assert_eq!(factor_bytes(1125899906842624), "1.0 PB");
	}

	#[test]
	fn test_count_files_plural() {
		assert_eq!(count_files(1), "1 file");
		assert_eq!(count_files(2048), "2,048 files");
	}
}

// vim: ts=4
