//! Session lifecycle tests - state guards, validation wiring, launch failures
//!
//! The session runs against scripted process and filesystem doubles so the
//! state machine can be driven without touching rsync or the real disk.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use syncpilot::error::{LaunchError, SessionError};
use syncpilot::probe::PathProbe;
use syncpilot::process::{CompletionFn, ProcessHandle, ProcessResult, ProcessRunner};
use syncpilot::session::{StartOutcome, SyncSession};
use syncpilot::types::{PathPair, SessionStatus, SyncOption, SyncOptions};
use syncpilot::validate::{PathPolicy, ValidationFailure};

/// Probe where every listed directory exists and is fully accessible.
struct OpenProbe {
	dirs: HashSet<PathBuf>,
}

impl OpenProbe {
	fn with(paths: &[&str]) -> Self {
		OpenProbe { dirs: paths.iter().map(|p| PathBuf::from(*p)).collect() }
	}
}

impl PathProbe for OpenProbe {
	fn is_directory(&self, path: &Path) -> bool {
		self.dirs.contains(path)
	}
	fn is_readable(&self, path: &Path) -> bool {
		self.dirs.contains(path)
	}
	fn is_executable(&self, path: &Path) -> bool {
		self.dirs.contains(path)
	}
	fn has_entries(&self, _path: &Path) -> bool {
		true
	}
}

/// Runner that records the command line and completes with a fixed result.
#[derive(Clone)]
struct ScriptedRunner {
	result: ProcessResult,
	last_command: Arc<Mutex<Option<String>>>,
	cancel_requested: Arc<AtomicBool>,
}

impl ScriptedRunner {
	fn exiting_with(exit_code: i32, stdout: &str) -> Self {
		ScriptedRunner {
			result: ProcessResult {
				exit_code,
				stdout: stdout.to_string(),
				stderr: String::new(),
			},
			last_command: Arc::new(Mutex::new(None)),
			cancel_requested: Arc::new(AtomicBool::new(false)),
		}
	}
}

struct ScriptedHandle {
	cancel_requested: Arc<AtomicBool>,
}

impl ProcessHandle for ScriptedHandle {
	fn cancel(&mut self) {
		self.cancel_requested.store(true, Ordering::SeqCst);
	}
}

impl ProcessRunner for ScriptedRunner {
	fn run_async(
		&self,
		command_line: &str,
		on_complete: CompletionFn,
	) -> Result<Box<dyn ProcessHandle>, LaunchError> {
		*self.last_command.lock().unwrap() = Some(command_line.to_string());
		let result = self.result.clone();
		tokio::spawn(async move {
			on_complete(result);
		});
		Ok(Box::new(ScriptedHandle { cancel_requested: self.cancel_requested.clone() }))
	}
}

/// Runner whose launches always fail.
struct BrokenRunner;

impl ProcessRunner for BrokenRunner {
	fn run_async(
		&self,
		command_line: &str,
		_on_complete: CompletionFn,
	) -> Result<Box<dyn ProcessHandle>, LaunchError> {
		Err(LaunchError::SpawnFailed {
			cmd: command_line.to_string(),
			source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such binary"),
		})
	}
}

async fn wait_for(session: &SyncSession, status: SessionStatus) {
	for _ in 0..400 {
		if session.status() == status {
			return;
		}
		tokio::time::sleep(Duration::from_millis(5)).await;
	}
	panic!("timed out waiting for status {:?}", status);
}

fn armed_session(runner: Arc<dyn ProcessRunner>, options: SyncOptions) -> SyncSession {
	let session = SyncSession::builder()
		.policy(PathPolicy::permissive())
		.probe(Arc::new(OpenProbe::with(&["/data/src", "/data/tar"])))
		.runner(runner)
		.build();
	session.arm(PathPair::new("/data/src", "/data/tar"), options).unwrap();
	session
}

#[tokio::test]
async fn test_successful_run_reaches_completed_with_result() {
	let runner = ScriptedRunner::exiting_with(0, "");
	let session = armed_session(Arc::new(runner), SyncOptions::default());

	assert_eq!(session.start().unwrap(), StartOutcome::Started);
	wait_for(&session, SessionStatus::Completed).await;

	let result = session.result().expect("result must be available after completion");
	assert_eq!(result.outcome.code, 0);
	assert!(result.finished_at >= result.started_at);
}

#[tokio::test]
async fn test_command_line_carries_options_and_quoted_paths() {
	let runner = ScriptedRunner::exiting_with(0, "");
	let last_command = runner.last_command.clone();

	let session = SyncSession::builder()
		.policy(PathPolicy::permissive())
		.probe(Arc::new(OpenProbe::with(&["/data/It's here", "/data/tar"])))
		.runner(Arc::new(runner))
		.build();
	let options = SyncOptions { mirror: true, exclude_system_paths: true, ..Default::default() };
	session.arm(PathPair::new("/data/It's here", "/data/tar"), options).unwrap();

	// a mirror start passes through the confirmation gate first
	let outcome = match session.start().unwrap() {
		StartOutcome::AwaitingConfirmation(_) => session.confirm_destructive().unwrap(),
		other => other,
	};
	assert_eq!(outcome, StartOutcome::Started);
	wait_for(&session, SessionStatus::Completed).await;

	let command = last_command.lock().unwrap().clone().unwrap();
	assert!(command.contains("--delete --delete-during --delete-excluded"));
	assert!(command.contains("--exclude=.Trash"));
	assert!(!command.contains(" -u "));
	assert!(command.contains("'/data/It'\\''s here/'"));
	assert!(command.ends_with("'/data/tar/'"));
}

#[tokio::test]
async fn test_missing_source_rejects_and_returns_to_idle() {
	let runner = ScriptedRunner::exiting_with(0, "");
	let launched = runner.last_command.clone();

	let session = SyncSession::builder()
		.policy(PathPolicy::permissive())
		.probe(Arc::new(OpenProbe::with(&["/data/tar"])))
		.runner(Arc::new(runner))
		.build();
	session.arm(PathPair::new("/data/src", "/data/tar"), SyncOptions::default()).unwrap();

	let outcome = session.start().unwrap();
	assert_eq!(
		outcome,
		StartOutcome::Rejected(ValidationFailure::Missing { source: true, target: false })
	);
	assert_eq!(session.status(), SessionStatus::Idle);
	assert!(launched.lock().unwrap().is_none(), "no process may be launched on rejection");
}

#[tokio::test]
async fn test_policy_violation_rejects_before_launch() {
	let runner = ScriptedRunner::exiting_with(0, "");
	let session = SyncSession::builder()
		.policy(PathPolicy {
			enforce: true,
			home: PathBuf::from("/Users/me"),
			volume_roots: vec![PathBuf::from("/Volumes")],
		})
		.probe(Arc::new(OpenProbe::with(&["/data/src", "/data/tar"])))
		.runner(Arc::new(runner))
		.build();
	session.arm(PathPair::new("/data/src", "/data/tar"), SyncOptions::default()).unwrap();

	assert_eq!(
		session.start().unwrap(),
		StartOutcome::Rejected(ValidationFailure::PolicyViolation)
	);
	assert_eq!(session.status(), SessionStatus::Idle);
}

#[tokio::test]
async fn test_launch_failure_is_an_error_and_returns_to_idle() {
	let session = armed_session(Arc::new(BrokenRunner), SyncOptions::default());

	let err = session.start().unwrap_err();
	assert!(matches!(err, SessionError::Launch(LaunchError::SpawnFailed { .. })));
	assert_eq!(session.status(), SessionStatus::Idle);
	assert!(session.result().is_none());
}

#[tokio::test]
async fn test_mutations_rejected_while_running() {
	// a runner that never completes keeps the session in Running
	struct StuckRunner;
	impl ProcessRunner for StuckRunner {
		fn run_async(
			&self,
			_command_line: &str,
			_on_complete: CompletionFn,
		) -> Result<Box<dyn ProcessHandle>, LaunchError> {
			struct Inert;
			impl ProcessHandle for Inert {
				fn cancel(&mut self) {}
			}
			Ok(Box::new(Inert))
		}
	}

	let session = armed_session(Arc::new(StuckRunner), SyncOptions::default());
	assert_eq!(session.start().unwrap(), StartOutcome::Started);
	assert_eq!(session.status(), SessionStatus::Running);

	let rearm = session.arm(PathPair::new("/data/other", "/data/tar"), SyncOptions::default());
	assert!(matches!(rearm, Err(SessionError::InvalidState { .. })));

	let restart = session.start();
	assert!(matches!(restart, Err(SessionError::InvalidState { .. })));

	let toggle = session.set_option(SyncOption::Mirror, true);
	assert!(matches!(toggle, Err(SessionError::InvalidState { .. })));
}

#[tokio::test]
async fn test_session_is_reusable_after_completion() {
	let runner = ScriptedRunner::exiting_with(0, "");
	let session = armed_session(Arc::new(runner.clone()), SyncOptions::default());

	assert_eq!(session.start().unwrap(), StartOutcome::Started);
	wait_for(&session, SessionStatus::Completed).await;

	// arming again clears the old result and readies a new run
	session.arm(PathPair::new("/data/src", "/data/tar"), SyncOptions::default()).unwrap();
	assert_eq!(session.status(), SessionStatus::Idle);
	assert!(session.result().is_none());

	assert_eq!(session.start().unwrap(), StartOutcome::Started);
	wait_for(&session, SessionStatus::Completed).await;
	assert!(session.result().is_some());
}
