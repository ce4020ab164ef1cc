//! Resolves the opaque text keys emitted by the core into English strings.
//!
//! The core modules only ever hand out keys; all user-facing prose lives
//! here so a different surface can swap in its own catalog.

/// Resolve a text key. Unknown keys come back unchanged so a missing entry
/// is visible instead of silently blank.
pub fn resolve(key: &str) -> &str {
	match key {
		"exit_00_t" => "Success",
		"exit_00_m" => "The synchronization completed without error.",

		"exit_01_t" => "Syntax or usage error",
		"exit_01_m" => "The sync command was malformed. This points at a bug in the command assembly rather than at your folders.",

		"exit_02_t" => "Protocol incompatibility",
		"exit_02_m" => "The rsync client and server sides could not agree on a protocol.",

		"exit_03_t" => "Error selecting input/output files",
		"exit_03_m" => "One of the folders could not be opened for the transfer. Check that both still exist and are accessible.",

		"exit_04_t" => "Requested action not supported",
		"exit_04_m" => "The installed rsync does not support an option this tool relies on.",

		"exit_05_t" => "Error starting client-server protocol",
		"exit_05_m" => "The transfer could not be set up between the rsync processes.",

		"exit_06_t" => "Daemon unable to append to log-file",
		"exit_06_m" => "The rsync daemon could not write its log file.",

		"exit_10_t" => "Error in socket I/O",
		"exit_10_m" => "A network-level read or write failed during the transfer.",

		"exit_11_t" => "Error in file I/O",
		"exit_11_m" => "A file read or write failed during the transfer. The target disk may be full.",

		"exit_12_t" => "Error in rsync protocol data stream",
		"exit_12_m" => "The data stream between the rsync processes was corrupted. This can happen when the target runs out of space or is not writable.",

		"exit_13_t" => "Errors with program diagnostics",
		"exit_13_m" => "rsync could not report its own diagnostics, usually a permissions problem on one of the folders.",

		"exit_14_t" => "Error in IPC code",
		"exit_14_m" => "The rsync processes could not communicate with each other.",

		"exit_20_t" => "Transfer interrupted",
		"exit_20_m" => "The transfer was interrupted by a signal from outside this tool.",

		"exit_21_t" => "Error waiting for child process",
		"exit_21_m" => "A helper process finished in a way rsync did not expect.",

		"exit_22_t" => "Error allocating memory",
		"exit_22_m" => "rsync ran out of memory while preparing the transfer.",

		"exit_23_t" => "Partial transfer",
		"exit_23_m" => "Some files could not be transferred, often due to per-file permissions or filesystem differences. Everything else was synchronized.",

		"exit_24_t" => "Partial transfer, files vanished",
		"exit_24_m" => "Some source files disappeared while they were being transferred.",

		"exit_25_t" => "Deletions stopped at limit",
		"exit_25_m" => "The deletion limit stopped further deletions in the target.",

		"exit_30_t" => "Timeout in data send/receive",
		"exit_30_m" => "The transfer stalled past the I/O timeout.",

		"exit_35_t" => "Timeout waiting for connection",
		"exit_35_m" => "No connection could be established before the timeout.",

		"exit_unknown_t" => "Unknown result",
		"exit_unknown_m" => "The sync finished with a code this tool does not recognize. The cause has not been determined yet; the details were recorded for investigation.",

		// result summary when the output could not be parsed
		"exit_unknown" => "No summary available for this run.",

		"dialog_missing_t" => "Folder not found",
		"dialog_missing_m" => "A selected folder no longer exists or is not a directory. Pick it again before syncing.",

		"dialog_permissions_t" => "Insufficient permissions",
		"dialog_permissions_m" => "You need at least read or browse permission on both folders. Adjust the folder permissions and try again.",

		"dialog_pathNotInHome_t" => "Folders outside allowed locations",
		"dialog_pathNotInHome_m" => "At least one folder must be inside your home folder, and the other inside your home folder or on an external volume.",

		"dialog_emptySource_t" => "Source is empty",
		"dialog_emptySource_m" => "The source folder appears to be empty. Mirroring will delete EVERYTHING in the target folder. Proceed only if that is what you want.",

		"dialog_mirrorWarning_t" => "Files will be deleted",
		"dialog_mirrorWarning_m" => "Mirroring deletes any file in the target folder that is not present in the source folder.",

		other => other,
	}
}


// vim: ts=4
