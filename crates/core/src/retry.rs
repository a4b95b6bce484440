//! Bounded retry for flaky UI actions.
//!
//! [`execute`] runs a re-runnable async action until it succeeds or the
//! [`RetryPolicy`] runs out of attempts, sleeping a fixed delay between
//! attempts. Each failure is reported to a [`DiagnosticSink`]; exhaustion
//! surfaces as [`Error::ActionExhausted`] carrying the label, the attempt count
//! and the last underlying error.
//!
//! ```ignore
//! use std::time::Duration;
//! use tubewright::retry::{self, RetryPolicy};
//!
//! let policy = RetryPolicy::new(3, Duration::from_secs(1));
//! retry::execute("Click home button", &policy, || async {
//!     browser.click(&home_button, timeout).await
//! })
//! .await?;
//! ```

use std::fmt;
use std::future::Future;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::millis;
use crate::error::{Error, Result};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

/// How many times to run an action and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RetryPolicy {
	/// Total invocations allowed, including the first. Must be at least 1.
	pub max_attempts: u32,
	/// Pause between a failed attempt and the next one.
	#[serde(rename = "delayMs", with = "millis")]
	pub delay: Duration,
}

impl RetryPolicy {
	pub const fn new(max_attempts: u32, delay: Duration) -> Self {
		Self { max_attempts, delay }
	}

	/// Fails with [`Error::Configuration`] if no attempt would ever run.
	pub fn validate(&self) -> Result<()> {
		if self.max_attempts == 0 {
			return Err(Error::Configuration("max_attempts must be at least 1".into()));
		}
		Ok(())
	}
}

impl Default for RetryPolicy {
	fn default() -> Self {
		Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_DELAY)
	}
}

/// Where a retry sequence currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
	/// Running attempt number `attempt` (1-based).
	Attempting { attempt: u32 },
	/// `failed` attempts have failed and another one is allowed after the delay.
	Waiting { failed: u32 },
	/// Attempt number `attempts` succeeded.
	Succeeded { attempts: u32 },
	/// All `attempts` failed.
	Exhausted { attempts: u32 },
}

/// Attempt counter and state transitions for one retry sequence.
///
/// Kept apart from the async loop so the counting rules can be checked
/// without any timing involved.
#[derive(Debug, Clone)]
pub struct Attempts {
	max_attempts: u32,
	state: RetryState,
}

impl Attempts {
	pub fn new(policy: &RetryPolicy) -> Result<Self> {
		policy.validate()?;
		Ok(Self {
			max_attempts: policy.max_attempts,
			state: RetryState::Attempting { attempt: 1 },
		})
	}

	pub fn state(&self) -> RetryState {
		self.state
	}

	pub fn max_attempts(&self) -> u32 {
		self.max_attempts
	}

	/// The 1-based number of the attempt currently running.
	pub fn current(&self) -> u32 {
		match self.state {
			RetryState::Attempting { attempt } => attempt,
			RetryState::Waiting { failed } => failed,
			RetryState::Succeeded { attempts } | RetryState::Exhausted { attempts } => attempts,
		}
	}

	pub fn record_success(&mut self) -> RetryState {
		if let RetryState::Attempting { attempt } = self.state {
			self.state = RetryState::Succeeded { attempts: attempt };
		}
		self.state
	}

	pub fn record_failure(&mut self) -> RetryState {
		if let RetryState::Attempting { attempt } = self.state {
			self.state = if attempt >= self.max_attempts {
				RetryState::Exhausted { attempts: attempt }
			} else {
				RetryState::Waiting { failed: attempt }
			};
		}
		self.state
	}

	/// Moves from [`RetryState::Waiting`] to the next attempt.
	pub fn resume(&mut self) -> RetryState {
		if let RetryState::Waiting { failed } = self.state {
			self.state = RetryState::Attempting { attempt: failed + 1 };
		}
		self.state
	}

	pub fn is_finished(&self) -> bool {
		matches!(self.state, RetryState::Succeeded { .. } | RetryState::Exhausted { .. })
	}
}

/// Result of a single invocation of the action.
#[derive(Debug)]
pub enum AttemptOutcome<T> {
	Success(T),
	Failure { attempt: u32, error: anyhow::Error },
}

/// A failed attempt, as reported to a [`DiagnosticSink`].
///
/// Displays as `{label} failed (attempt {n}/{max}): {error}`.
#[derive(Debug, Clone, Copy)]
pub struct AttemptFailure<'a> {
	pub label: &'a str,
	pub attempt: u32,
	pub max_attempts: u32,
	pub error: &'a anyhow::Error,
}

impl fmt::Display for AttemptFailure<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} failed (attempt {}/{}): {}", self.label, self.attempt, self.max_attempts, self.error)
	}
}

/// Receives every failed attempt. Reporting is informational and cannot fail.
pub trait DiagnosticSink: Send + Sync {
	fn attempt_failed(&self, failure: &AttemptFailure<'_>);
}

/// Default sink: one `warn` event per failed attempt.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
	fn attempt_failed(&self, failure: &AttemptFailure<'_>) {
		warn!(
			target: "tubewright",
			label = failure.label,
			attempt = failure.attempt,
			max_attempts = failure.max_attempts,
			"{failure}"
		);
	}
}

/// Sink that keeps the rendered lines, for asserting on diagnostics in tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
	lines: Mutex<Vec<String>>,
}

impl RecordingSink {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn lines(&self) -> Vec<String> {
		self.lines.lock().clone()
	}
}

impl DiagnosticSink for RecordingSink {
	fn attempt_failed(&self, failure: &AttemptFailure<'_>) {
		self.lines.lock().push(failure.to_string());
	}
}

/// Runs `action` under `policy`, logging failures through [`TracingSink`].
pub async fn execute<T, E, F, Fut>(label: &str, policy: &RetryPolicy, action: F) -> Result<T>
where
	F: FnMut() -> Fut,
	Fut: Future<Output = std::result::Result<T, E>>,
	E: Into<anyhow::Error>,
{
	execute_with_sink(label, policy, &TracingSink, action).await
}

/// Runs `action` under `policy`, reporting each failed attempt to `sink`.
///
/// Returns the action's value on the first success. No delay follows a
/// success or the final failure.
pub async fn execute_with_sink<T, E, F, Fut, S>(label: &str, policy: &RetryPolicy, sink: &S, mut action: F) -> Result<T>
where
	F: FnMut() -> Fut,
	Fut: Future<Output = std::result::Result<T, E>>,
	E: Into<anyhow::Error>,
	S: DiagnosticSink + ?Sized,
{
	let mut attempts = Attempts::new(policy)?;

	loop {
		let attempt = attempts.current();
		let outcome = match action().await {
			Ok(value) => AttemptOutcome::Success(value),
			Err(err) => AttemptOutcome::Failure { attempt, error: err.into() },
		};

		match outcome {
			AttemptOutcome::Success(value) => {
				attempts.record_success();
				if attempt > 1 {
					debug!(target: "tubewright", label, attempt, "succeeded after retry");
				}
				return Ok(value);
			}
			AttemptOutcome::Failure { attempt, error } => {
				sink.attempt_failed(&AttemptFailure {
					label,
					attempt,
					max_attempts: attempts.max_attempts(),
					error: &error,
				});

				if let RetryState::Exhausted { attempts: made } = attempts.record_failure() {
					return Err(Error::ActionExhausted {
						label: label.to_string(),
						attempts: made,
						source: error,
					});
				}

				tokio::time::sleep(policy.delay).await;
				attempts.resume();
			}
		}
	}
}
