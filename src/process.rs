//! Asynchronous external process execution.
//!
//! The session never blocks on the process: a launch returns immediately
//! with a cancellable handle and the completion is delivered later through a
//! callback. Only launch failures surface here; once the process is running,
//! whatever it exits with is a [`ProcessResult`] for the classifier.

use std::process::Stdio;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tokio::sync::Notify;

use crate::error::LaunchError;

/// Captured output of a finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessResult {
	/// Exit code, or -1 when the process was killed by a signal
	pub exit_code: i32,
	pub stdout: String,
	pub stderr: String,
}

/// Invoked exactly once when the process exits on its own.
/// A cancelled process never completes.
pub type CompletionFn = Box<dyn FnOnce(ProcessResult) + Send + 'static>;

/// Handle to one in-flight process.
pub trait ProcessHandle: Send {
	/// Request termination. Safe to call more than once.
	fn cancel(&mut self);
}

/// Capability to launch a shell command without blocking the caller.
pub trait ProcessRunner: Send + Sync {
	/// Start `command_line` and return immediately. `on_complete` fires from
	/// a background task once the process exits, unless the handle is
	/// cancelled first. Implementations must not invoke `on_complete` from
	/// inside this call.
	fn run_async(
		&self,
		command_line: &str,
		on_complete: CompletionFn,
	) -> Result<Box<dyn ProcessHandle>, LaunchError>;
}

/// Runs commands through `/bin/sh -c` on the tokio runtime.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellRunner;

struct ShellHandle {
	cancel: Arc<Notify>,
	cancelled: bool,
}

impl ProcessHandle for ShellHandle {
	fn cancel(&mut self) {
		if !self.cancelled {
			self.cancelled = true;
			self.cancel.notify_one();
		}
	}
}

impl ProcessRunner for ShellRunner {
	fn run_async(
		&self,
		command_line: &str,
		on_complete: CompletionFn,
	) -> Result<Box<dyn ProcessHandle>, LaunchError> {
		let mut child = tokio::process::Command::new("/bin/sh")
			.arg("-c")
			.arg(command_line)
			.stdin(Stdio::null())
			.stdout(Stdio::piped())
			.stderr(Stdio::piped())
			.spawn()
			.map_err(|e| LaunchError::SpawnFailed { cmd: command_line.to_string(), source: e })?;

		let stdout = child
			.stdout
			.take()
			.ok_or_else(|| LaunchError::StdioUnavailable { what: "stdout".to_string() })?;
		let stderr = child
			.stderr
			.take()
			.ok_or_else(|| LaunchError::StdioUnavailable { what: "stderr".to_string() })?;

		let cancel = Arc::new(Notify::new());
		let cancel_rx = cancel.clone();

		tokio::spawn(async move {
			// drain both pipes concurrently with the wait, otherwise a
			// chatty process fills a pipe buffer and deadlocks
			let stdout_task = tokio::spawn(read_all(stdout));
			let stderr_task = tokio::spawn(read_all(stderr));

			let status = tokio::select! {
				status = child.wait() => status,
				_ = cancel_rx.notified() => {
					let _ = child.start_kill();
					let _ = child.wait().await;
					return;
				}
			};

			let stdout = stdout_task.await.unwrap_or_default();
			let stderr = stderr_task.await.unwrap_or_default();

			let exit_code = match status {
				Ok(s) => s.code().unwrap_or(-1),
				Err(_) => -1,
			};

			on_complete(ProcessResult { exit_code, stdout, stderr });
		});

		Ok(Box::new(ShellHandle { cancel, cancelled: false }))
	}
}

async fn read_all(mut pipe: impl tokio::io::AsyncRead + Unpin) -> String {
	let mut buf = Vec::new();
	let _ = pipe.read_to_end(&mut buf).await;
	String::from_utf8_lossy(&buf).into_owned()
}


// vim: ts=4
