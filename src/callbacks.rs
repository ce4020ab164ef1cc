//! Callback traits for session events.
//!
//! The session publishes its state changes and results through these hooks
//! instead of letting the host read session fields directly; a UI subscribes
//! once and renders whatever arrives.

use crate::session::RunResult;
use crate::types::SessionStatus;
use crate::validate::{MirrorWarning, ValidationFailure};

// Type aliases to reduce complexity
type StatusFn = dyn Fn(SessionStatus) + Send + Sync;
type ValidationFn = dyn Fn(&ValidationFailure) + Send + Sync;
type ConfirmFn = dyn Fn(MirrorWarning) + Send + Sync;
type CompletedFn = dyn Fn(&RunResult) + Send + Sync;
type CancelledFn = dyn Fn() + Send + Sync;

/// Combined callback handler for all session events.
pub trait SessionCallbacks: Send + Sync {
	/// Called on every lifecycle transition
	fn on_status_change(&self, _status: SessionStatus) {}

	/// Called when a precondition check fails (the session is back to idle)
	fn on_validation_failed(&self, _failure: &ValidationFailure) {}

	/// Called when a destructive run pauses for a user decision
	fn on_confirmation_required(&self, _warning: MirrorWarning) {}

	/// Called once per finished run, after the result has been computed
	fn on_completed(&self, _result: &RunResult) {}

	/// Called when a running sync is cancelled
	fn on_cancelled(&self) {}
}

/// Default callback implementation that does nothing.
pub struct NoCallbacks;

impl SessionCallbacks for NoCallbacks {}

/// Builder for callbacks using function closures.
pub struct CallbackBuilder {
	status: Option<Box<StatusFn>>,
	validation: Option<Box<ValidationFn>>,
	confirm: Option<Box<ConfirmFn>>,
	completed: Option<Box<CompletedFn>>,
	cancelled: Option<Box<CancelledFn>>,
}

impl CallbackBuilder {
	pub fn new() -> Self {
		CallbackBuilder {
			status: None,
			validation: None,
			confirm: None,
			completed: None,
			cancelled: None,
		}
	}

	/// Set status-change callback
	pub fn on_status_change<F>(mut self, callback: F) -> Self
	where
		F: Fn(SessionStatus) + Send + Sync + 'static,
	{
		self.status = Some(Box::new(callback));
		self
	}

	/// Set validation-failure callback
	pub fn on_validation_failed<F>(mut self, callback: F) -> Self
	where
		F: Fn(&ValidationFailure) + Send + Sync + 'static,
	{
		self.validation = Some(Box::new(callback));
		self
	}

	/// Set confirmation-required callback
	pub fn on_confirmation_required<F>(mut self, callback: F) -> Self
	where
		F: Fn(MirrorWarning) + Send + Sync + 'static,
	{
		self.confirm = Some(Box::new(callback));
		self
	}

	/// Set completion callback
	pub fn on_completed<F>(mut self, callback: F) -> Self
	where
		F: Fn(&RunResult) + Send + Sync + 'static,
	{
		self.completed = Some(Box::new(callback));
		self
	}

	/// Set cancellation callback
	pub fn on_cancelled<F>(mut self, callback: F) -> Self
	where
		F: Fn() + Send + Sync + 'static,
	{
		self.cancelled = Some(Box::new(callback));
		self
	}

	/// Build the callbacks handler
	pub fn build(self) -> Box<dyn SessionCallbacks> {
		Box::new(CompositeCallbacks {
			status: self.status,
			validation: self.validation,
			confirm: self.confirm,
			completed: self.completed,
			cancelled: self.cancelled,
		})
	}
}

impl Default for CallbackBuilder {
	fn default() -> Self {
		Self::new()
	}
}

/// Internal composite callbacks implementation
struct CompositeCallbacks {
	status: Option<Box<StatusFn>>,
	validation: Option<Box<ValidationFn>>,
	confirm: Option<Box<ConfirmFn>>,
	completed: Option<Box<CompletedFn>>,
	cancelled: Option<Box<CancelledFn>>,
}

impl SessionCallbacks for CompositeCallbacks {
	fn on_status_change(&self, status: SessionStatus) {
		if let Some(ref callback) = self.status {
			callback(status);
		}
	}

	fn on_validation_failed(&self, failure: &ValidationFailure) {
		if let Some(ref callback) = self.validation {
			callback(failure);
		}
	}

	fn on_confirmation_required(&self, warning: MirrorWarning) {
		if let Some(ref callback) = self.confirm {
			callback(warning);
		}
	}

	fn on_completed(&self, result: &RunResult) {
		if let Some(ref callback) = self.completed {
			callback(result);
		}
	}

	fn on_cancelled(&self) {
		if let Some(ref callback) = self.cancelled {
			callback();
		}
	}
}
