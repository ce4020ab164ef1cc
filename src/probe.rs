//! Filesystem probe capability used by the precondition checks.
//!
//! Probes are read-only and synchronous; the validation battery runs them
//! sequentially because each step assumes the previous one passed.

use std::fs;
use std::path::Path;

/// Read-only checks against a candidate path.
///
/// Abstracted as a trait so the validation battery can be exercised against
/// scripted filesystems in tests.
pub trait PathProbe: Send + Sync {
	/// The path exists and is a directory
	fn is_directory(&self, path: &Path) -> bool;

	/// The current user may read the path
	fn is_readable(&self, path: &Path) -> bool;

	/// The current user may traverse/execute the path
	fn is_executable(&self, path: &Path) -> bool;

	/// The directory contains at least one entry
	fn has_entries(&self, path: &Path) -> bool;
}

/// Probe backed by the real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsProbe;

impl PathProbe for FsProbe {
	fn is_directory(&self, path: &Path) -> bool {
		fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
	}

	fn is_readable(&self, path: &Path) -> bool {
		access_ok(path, libc::R_OK)
	}

	fn is_executable(&self, path: &Path) -> bool {
		access_ok(path, libc::X_OK)
	}

	fn has_entries(&self, path: &Path) -> bool {
		match fs::read_dir(path) {
			Ok(mut entries) => entries.next().is_some(),
			Err(_) => false,
		}
	}
}

/// access(2) answers for the real uid, which matches what the spawned rsync
/// process will be able to do.
fn access_ok(path: &Path, mode: libc::c_int) -> bool {
	use std::ffi::CString;
	use std::os::unix::ffi::OsStrExt;

	let cpath = match CString::new(path.as_os_str().as_bytes()) {
		Ok(c) => c,
		Err(_) => return false,
	};

	unsafe { libc::access(cpath.as_ptr(), mode) == 0 }
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::TempDir;

	#[test]
	fn test_directory_probe() {
		let dir = TempDir::new().unwrap();
		let probe = FsProbe;

		assert!(probe.is_directory(dir.path()));
		assert!(!probe.is_directory(&dir.path().join("missing")));

		let file = dir.path().join("plain.txt");
		std::fs::write(&file, "x").unwrap();
		assert!(!probe.is_directory(&file));
	}

	#[test]
	fn test_has_entries() {
		let dir = TempDir::new().unwrap();
		let probe = FsProbe;

		assert!(!probe.has_entries(dir.path()));
		std::fs::write(dir.path().join("a"), "x").unwrap();
		assert!(probe.has_entries(dir.path()));
	}

	#[test]
	fn test_readable_and_executable() {
		let dir = TempDir::new().unwrap();
		let probe = FsProbe;

		assert!(probe.is_readable(dir.path()));
		assert!(probe.is_executable(dir.path()));
		assert!(!probe.is_readable(&dir.path().join("missing")));
	}
}

// vim: ts=4
