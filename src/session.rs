//! The sync session state machine.
//!
//! One session lives as long as its hosting widget or CLI invocation and is
//! reused across runs. It walks Idle -> Validating -> Running -> Completed
//! (with a detour through AwaitingConfirmation for destructive runs and an
//! exit through Cancelled), owns the one in-flight process handle, and turns
//! the raw process result into a classified outcome plus parsed summary the
//! moment the run finishes.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::callbacks::{NoCallbacks, SessionCallbacks};
use crate::classify::{self, ExitOutcome};
use crate::command::CommandBuilder;
use crate::config::Config;
use crate::error::SessionError;
use crate::probe::{FsProbe, PathProbe};
use crate::process::{CompletionFn, ProcessHandle, ProcessResult, ProcessRunner, ShellRunner};
use crate::report::{DiagnosticReport, DiagnosticReporter, LogReporter};
use crate::summary::{self, TransferSummary};
use crate::types::{PathPair, SessionStatus, SyncOption, SyncOptions};
use crate::validate::{
	MirrorWarning, PathPolicy, PathValidator, ValidationFailure, ValidationVerdict,
};

/// Everything a finished run produced, computed eagerly at completion.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
	pub outcome: ExitOutcome,

	/// Absent when the statistics block could not be parsed; the host must
	/// then render a generic unknown result instead of guessing numbers
	pub summary: Option<TransferSummary>,

	pub stdout: String,
	pub stderr: String,
	pub started_at: DateTime<Utc>,
	pub finished_at: DateTime<Utc>,
}

/// What came out of a start attempt.
///
/// Validation failures are ordinary outcomes, not errors: the caller shows
/// them and the session is already back to idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
	/// The process is running
	Started,

	/// A precondition failed; the session returned to idle
	Rejected(ValidationFailure),

	/// The run is paused until the user confirms or declines deletions
	AwaitingConfirmation(MirrorWarning),
}

struct SessionInner {
	status: SessionStatus,
	options: SyncOptions,
	paths: Option<PathPair>,
	command_line: Option<String>,
	handle: Option<Box<dyn ProcessHandle>>,
	started_at: Option<DateTime<Utc>>,
	finished_at: Option<DateTime<Utc>>,
	result: Option<RunResult>,
	pending: Option<MirrorWarning>,
	// bumped on every launch and cancel so a completion callback from an
	// abandoned run can be told apart from the current one
	run_seq: u64,
}

impl SessionInner {
	fn clear_run_state(&mut self) {
		self.command_line = None;
		self.started_at = None;
		self.finished_at = None;
		self.result = None;
		self.pending = None;
	}
}

/// Orchestrates one sync run at a time against injected capabilities.
pub struct SyncSession {
	inner: Arc<Mutex<SessionInner>>,
	builder: CommandBuilder,
	policy: PathPolicy,
	runner: Arc<dyn ProcessRunner>,
	probe: Arc<dyn PathProbe>,
	reporter: Arc<dyn DiagnosticReporter>,
	callbacks: Arc<dyn SessionCallbacks>,
}

/// Builder for a [`SyncSession`] with real capabilities by default.
pub struct SessionBuilder {
	builder: CommandBuilder,
	policy: PathPolicy,
	runner: Arc<dyn ProcessRunner>,
	probe: Arc<dyn PathProbe>,
	reporter: Arc<dyn DiagnosticReporter>,
	callbacks: Arc<dyn SessionCallbacks>,
}

impl SessionBuilder {
	pub fn new() -> Self {
		let config = Config::default();
		SessionBuilder {
			builder: config.command_builder(),
			policy: config.path_policy(),
			runner: Arc::new(ShellRunner),
			probe: Arc::new(FsProbe),
			reporter: Arc::new(LogReporter),
			callbacks: Arc::new(NoCallbacks),
		}
	}

	/// Take command builder and path policy from a loaded configuration.
	pub fn with_config(mut self, config: &Config) -> Self {
		self.builder = config.command_builder();
		self.policy = config.path_policy();
		self
	}

	pub fn command_builder(mut self, builder: CommandBuilder) -> Self {
		self.builder = builder;
		self
	}

	pub fn policy(mut self, policy: PathPolicy) -> Self {
		self.policy = policy;
		self
	}

	pub fn runner(mut self, runner: Arc<dyn ProcessRunner>) -> Self {
		self.runner = runner;
		self
	}

	pub fn probe(mut self, probe: Arc<dyn PathProbe>) -> Self {
		self.probe = probe;
		self
	}

	pub fn reporter(mut self, reporter: Arc<dyn DiagnosticReporter>) -> Self {
		self.reporter = reporter;
		self
	}

	pub fn callbacks(mut self, callbacks: Box<dyn SessionCallbacks>) -> Self {
		self.callbacks = Arc::from(callbacks);
		self
	}

	pub fn build(self) -> SyncSession {
		SyncSession {
			inner: Arc::new(Mutex::new(SessionInner {
				status: SessionStatus::Idle,
				options: SyncOptions::default(),
				paths: None,
				command_line: None,
				handle: None,
				started_at: None,
				finished_at: None,
				result: None,
				pending: None,
				run_seq: 0,
			})),
			builder: self.builder,
			policy: self.policy,
			runner: self.runner,
			probe: self.probe,
			reporter: self.reporter,
			callbacks: self.callbacks,
		}
	}
}

impl Default for SessionBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl SyncSession {
	pub fn builder() -> SessionBuilder {
		SessionBuilder::new()
	}

	/// Store a source/target pair and an options snapshot for the next run.
	///
	/// Allowed whenever no run is in flight; arming after a finished or
	/// cancelled run clears the previous result and returns the session to
	/// idle. The paths must be non-empty and absolute.
	pub fn arm(&self, pair: PathPair, options: SyncOptions) -> Result<(), SessionError> {
		let mut inner = self.lock();
		match inner.status {
			SessionStatus::Validating
			| SessionStatus::AwaitingConfirmation
			| SessionStatus::Running => {
				return Err(SessionError::InvalidState { op: "arm", status: inner.status })
			}
			_ => {}
		}

		if pair.source.as_os_str().is_empty() || pair.target.as_os_str().is_empty() {
			return Err(SessionError::InvalidPaths {
				message: "source and target must be non-empty".to_string(),
			});
		}
		if !pair.source.is_absolute() || !pair.target.is_absolute() {
			return Err(SessionError::InvalidPaths {
				message: "source and target must be absolute".to_string(),
			});
		}

		let changed = inner.status != SessionStatus::Idle;
		inner.paths = Some(pair);
		inner.options = options;
		inner.clear_run_state();
		inner.status = SessionStatus::Idle;
		drop(inner);

		if changed {
			self.callbacks.on_status_change(SessionStatus::Idle);
		}
		Ok(())
	}

	/// Flip one option toggle for the next run.
	///
	/// Options are frozen while a run is validating, awaiting confirmation
	/// or running; changing them mid-flight is rejected.
	pub fn set_option(&self, option: SyncOption, value: bool) -> Result<(), SessionError> {
		let mut inner = self.lock();
		match inner.status {
			SessionStatus::Validating
			| SessionStatus::AwaitingConfirmation
			| SessionStatus::Running => {
				Err(SessionError::InvalidState { op: "change options", status: inner.status })
			}
			_ => {
				inner.options.set(option, value);
				Ok(())
			}
		}
	}

	/// Run the precondition battery and, if it passes, launch the process.
	///
	/// Returns immediately in every case; when the outcome is
	/// [`StartOutcome::Started`] the completion arrives later through the
	/// callbacks and [`result`](Self::result). Calling start while a run is
	/// already in flight is a caller bug and is rejected, never queued.
	pub fn start(&self) -> Result<StartOutcome, SessionError> {
		{
			let mut inner = self.lock();
			if inner.status != SessionStatus::Idle {
				return Err(SessionError::InvalidState { op: "start", status: inner.status });
			}
			if inner.paths.is_none() {
				return Err(SessionError::NotArmed);
			}
			inner.status = SessionStatus::Validating;
		}
		self.callbacks.on_status_change(SessionStatus::Validating);
		self.run_validated(false)
	}

	/// Proceed with a destructive run the user has approved.
	pub fn confirm_destructive(&self) -> Result<StartOutcome, SessionError> {
		{
			let mut inner = self.lock();
			if inner.status != SessionStatus::AwaitingConfirmation {
				return Err(SessionError::InvalidState {
					op: "confirm deletions",
					status: inner.status,
				});
			}
			inner.pending = None;
			inner.status = SessionStatus::Validating;
		}
		self.callbacks.on_status_change(SessionStatus::Validating);
		self.run_validated(true)
	}

	/// Abort a destructive run at the confirmation gate.
	pub fn decline_destructive(&self) -> Result<(), SessionError> {
		{
			let mut inner = self.lock();
			if inner.status != SessionStatus::AwaitingConfirmation {
				return Err(SessionError::InvalidState {
					op: "decline deletions",
					status: inner.status,
				});
			}
			inner.pending = None;
			inner.status = SessionStatus::Idle;
		}
		self.callbacks.on_status_change(SessionStatus::Idle);
		Ok(())
	}

	/// Request termination of the running process and discard all result
	/// state, as if the run had never happened.
	///
	/// Cancelling twice, or when nothing is running, is a no-op. A late
	/// completion from the killed process is ignored; a cancelled session
	/// never reports Completed.
	pub fn cancel(&self) {
		let handle = {
			let mut inner = self.lock();
			if inner.status != SessionStatus::Running {
				return;
			}
			inner.run_seq += 1;
			inner.status = SessionStatus::Cancelled;
			inner.clear_run_state();
			inner.handle.take()
		};

		if let Some(mut h) = handle {
			h.cancel();
		}

		self.callbacks.on_status_change(SessionStatus::Cancelled);
		self.callbacks.on_cancelled();
	}

	/// Drop the stored result of a finished or cancelled run and return to
	/// idle, keeping the armed paths and options.
	pub fn clear_results(&self) -> Result<(), SessionError> {
		{
			let mut inner = self.lock();
			match inner.status {
				SessionStatus::Idle => return Ok(()),
				SessionStatus::Completed | SessionStatus::Cancelled => {
					inner.clear_run_state();
					inner.status = SessionStatus::Idle;
				}
				_ => {
					return Err(SessionError::InvalidState {
						op: "clear results",
						status: inner.status,
					})
				}
			}
		}
		self.callbacks.on_status_change(SessionStatus::Idle);
		Ok(())
	}

	pub fn status(&self) -> SessionStatus {
		self.lock().status
	}

	/// The result of the last completed run, if any.
	pub fn result(&self) -> Option<RunResult> {
		self.lock().result.clone()
	}

	/// The confirmation the session is currently waiting on, if any.
	pub fn pending_confirmation(&self) -> Option<MirrorWarning> {
		self.lock().pending
	}

	/// The full command line of the current or last run.
	pub fn command_line(&self) -> Option<String> {
		self.lock().command_line.clone()
	}

	/// The options snapshot taken at arm time.
	pub fn options(&self) -> SyncOptions {
		self.lock().options
	}

	/// When the current or last run was launched.
	pub fn started_at(&self) -> Option<DateTime<Utc>> {
		self.lock().started_at
	}

	/// When the last run finished.
	pub fn finished_at(&self) -> Option<DateTime<Utc>> {
		self.lock().finished_at
	}

	fn run_validated(&self, deletions_confirmed: bool) -> Result<StartOutcome, SessionError> {
		let (pair, options) = {
			let inner = self.lock();
			match inner.paths.clone() {
				Some(p) => (p, inner.options),
				None => return Err(SessionError::NotArmed),
			}
		};

		let validator = PathValidator::new(self.probe.as_ref(), &self.policy);
		let verdict = validator.validate(&pair, &options, deletions_confirmed);

		match verdict {
			ValidationVerdict::Fail(ValidationFailure::ConfirmationRequired(warning)) => {
				{
					let mut inner = self.lock();
					inner.status = SessionStatus::AwaitingConfirmation;
					inner.pending = Some(warning);
				}
				self.callbacks.on_status_change(SessionStatus::AwaitingConfirmation);
				self.callbacks.on_confirmation_required(warning);
				Ok(StartOutcome::AwaitingConfirmation(warning))
			}
			ValidationVerdict::Fail(failure) => {
				// hard failures go back to idle and are never retried here
				{
					let mut inner = self.lock();
					inner.status = SessionStatus::Idle;
				}
				self.callbacks.on_status_change(SessionStatus::Idle);
				self.callbacks.on_validation_failed(&failure);
				Ok(StartOutcome::Rejected(failure))
			}
			ValidationVerdict::Pass => self.launch(&pair, &options),
		}
	}

	fn launch(&self, pair: &PathPair, options: &SyncOptions) -> Result<StartOutcome, SessionError> {
		let command_line = self.builder.build(options).render(pair);

		// the lock is held across the launch so the completion callback,
		// which also takes it, cannot observe the session before it has
		// moved to Running
		let mut inner = self.lock();
		inner.run_seq += 1;
		let seq = inner.run_seq;

		let inner_arc = self.inner.clone();
		let reporter = self.reporter.clone();
		let callbacks = self.callbacks.clone();
		let command = command_line.clone();
		let on_complete: CompletionFn = Box::new(move |result: ProcessResult| {
			complete_run(&inner_arc, reporter.as_ref(), callbacks.as_ref(), seq, &command, result);
		});

		match self.runner.run_async(&command_line, on_complete) {
			Ok(handle) => {
				inner.clear_run_state();
				inner.status = SessionStatus::Running;
				inner.handle = Some(handle);
				inner.command_line = Some(command_line);
				inner.started_at = Some(Utc::now());
				drop(inner);
				self.callbacks.on_status_change(SessionStatus::Running);
				Ok(StartOutcome::Started)
			}
			Err(e) => {
				// no process, no exit code: this is its own failure class
				inner.status = SessionStatus::Idle;
				drop(inner);
				self.callbacks.on_status_change(SessionStatus::Idle);
				Err(SessionError::Launch(e))
			}
		}
	}

	fn lock(&self) -> MutexGuard<'_, SessionInner> {
		lock_inner(&self.inner)
	}
}

fn lock_inner(mutex: &Mutex<SessionInner>) -> MutexGuard<'_, SessionInner> {
	mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn complete_run(
	inner_arc: &Arc<Mutex<SessionInner>>,
	reporter: &dyn DiagnosticReporter,
	callbacks: &dyn SessionCallbacks,
	seq: u64,
	command: &str,
	result: ProcessResult,
) {
	let run = {
		let mut inner = lock_inner(inner_arc);
		// a cancel or restart may have happened while the process was
		// winding down; that run's completion is dead on arrival
		if inner.status != SessionStatus::Running || inner.run_seq != seq {
			return;
		}

		let finished_at = Utc::now();
		let outcome = classify::classify(result.exit_code);
		let summary = summary::parse(&result.stdout);

		if classify::is_anomalous(result.exit_code) {
			reporter.report(&DiagnosticReport {
				outcome,
				command: command.to_string(),
				stderr: result.stderr.clone(),
				summary_parsed: summary.is_some(),
			});
		}

		let run = RunResult {
			outcome,
			summary,
			stdout: result.stdout,
			stderr: result.stderr,
			started_at: inner.started_at.unwrap_or(finished_at),
			finished_at,
		};

		inner.finished_at = Some(finished_at);
		inner.result = Some(run.clone());
		inner.status = SessionStatus::Completed;
		inner.handle = None;
		run
	};

	callbacks.on_status_change(SessionStatus::Completed);
	callbacks.on_completed(&run);
}


// vim: ts=4
