//! Session bootstrap: turn an anonymous browser context into a signed-in one.
//!
//! Each attempt installs the stored cookies and localStorage entries, reloads
//! the page and then polls a [`PostCondition`] for a bounded time. An attempt
//! only counts as successful when the post-condition holds; an attempt that
//! raised nothing but never reached the signed-in state is a failure. Attempts
//! are bounded by `max_retries + 1` with a fixed backoff in between.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use async_trait::async_trait;
use tracing::{info, warn};
use tubewright_protocol::SessionCredentials;

use crate::browser::SessionContext;
use crate::error::{Error, Result};
use crate::locator::Locator;
use crate::retry::{Attempts, RetryPolicy, RetryState};

pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(2000);
pub const DEFAULT_VERIFY_TIMEOUT: Duration = Duration::from_millis(5000);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A check that the session reached the intended state.
#[async_trait]
pub trait PostCondition: Send + Sync {
	/// Short description used in failure messages.
	fn describe(&self) -> String;

	/// Evaluates the condition once, without waiting.
	async fn holds(&self, ctx: &mut dyn SessionContext) -> anyhow::Result<bool>;
}

/// Signed-in check: the account menu is visible and the sign-in button is not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedIn {
	pub account_menu: Locator,
	pub sign_in: Locator,
}

impl Default for SignedIn {
	fn default() -> Self {
		Self {
			account_menu: Locator::label("Account menu"),
			sign_in: Locator::label("Sign in"),
		}
	}
}

#[async_trait]
impl PostCondition for SignedIn {
	fn describe(&self) -> String {
		format!("{} visible and {} hidden", self.account_menu, self.sign_in)
	}

	async fn holds(&self, ctx: &mut dyn SessionContext) -> anyhow::Result<bool> {
		if ctx.is_visible(&self.sign_in).await? {
			return Ok(false);
		}
		ctx.is_visible(&self.account_menu).await
	}
}

/// Tuning for [`bootstrap_with`].
#[derive(Clone)]
pub struct BootstrapOptions {
	pub max_retries: u32,
	pub backoff: Duration,
	pub verify_timeout: Duration,
	pub poll_interval: Duration,
	pub post_condition: Arc<dyn PostCondition>,
}

impl BootstrapOptions {
	pub fn new() -> Self {
		Self::default()
	}

	/// Retries after the first attempt; `0` means a single attempt.
	pub fn max_retries(mut self, max_retries: u32) -> Self {
		self.max_retries = max_retries;
		self
	}

	pub fn backoff(mut self, backoff: Duration) -> Self {
		self.backoff = backoff;
		self
	}

	/// How long each attempt may wait for the post-condition.
	pub fn verify_timeout(mut self, timeout: Duration) -> Self {
		self.verify_timeout = timeout;
		self
	}

	pub fn poll_interval(mut self, interval: Duration) -> Self {
		self.poll_interval = interval;
		self
	}

	pub fn post_condition(mut self, condition: impl PostCondition + 'static) -> Self {
		self.post_condition = Arc::new(condition);
		self
	}

	fn policy(&self) -> RetryPolicy {
		RetryPolicy::new(self.max_retries.saturating_add(1), self.backoff)
	}
}

impl Default for BootstrapOptions {
	fn default() -> Self {
		Self {
			max_retries: DEFAULT_MAX_RETRIES,
			backoff: DEFAULT_BACKOFF,
			verify_timeout: DEFAULT_VERIFY_TIMEOUT,
			poll_interval: DEFAULT_POLL_INTERVAL,
			post_condition: Arc::new(SignedIn::default()),
		}
	}
}

impl fmt::Debug for BootstrapOptions {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("BootstrapOptions")
			.field("max_retries", &self.max_retries)
			.field("backoff", &self.backoff)
			.field("verify_timeout", &self.verify_timeout)
			.field("poll_interval", &self.poll_interval)
			.field("post_condition", &self.post_condition.describe())
			.finish()
	}
}

/// Signs `ctx` in with `credentials`, verifying with [`SignedIn`].
pub async fn bootstrap<C: SessionContext>(ctx: &mut C, credentials: &SessionCredentials, max_retries: u32) -> Result<()> {
	bootstrap_with(ctx, credentials, &BootstrapOptions::default().max_retries(max_retries)).await
}

/// Signs `ctx` in with `credentials` using explicit options.
///
/// Returns [`Error::BootstrapExhausted`] when no attempt reached the
/// post-condition, and [`Error::Configuration`] for a zero poll interval.
pub async fn bootstrap_with<C: SessionContext>(ctx: &mut C, credentials: &SessionCredentials, options: &BootstrapOptions) -> Result<()> {
	if options.poll_interval.is_zero() {
		return Err(Error::Configuration("poll_interval must be greater than zero".into()));
	}

	let policy = options.policy();
	let mut attempts = Attempts::new(&policy)?;

	if credentials.is_empty() {
		warn!(target: "tubewright", "no stored credentials found, session will likely stay signed out");
	}

	loop {
		let attempt = attempts.current();
		match run_attempt(ctx, credentials, options).await {
			Ok(()) => {
				attempts.record_success();
				info!(target: "tubewright", attempt, "Authentication successful");
				return Ok(());
			}
			Err(error) => {
				warn!(target: "tubewright", attempt, "Authentication attempt {attempt} failed: {error:#}");

				if let RetryState::Exhausted { attempts: made } = attempts.record_failure() {
					return Err(Error::BootstrapExhausted { attempts: made, source: error });
				}

				tokio::time::sleep(options.backoff).await;
				attempts.resume();
			}
		}
	}
}

async fn run_attempt<C: SessionContext>(ctx: &mut C, credentials: &SessionCredentials, options: &BootstrapOptions) -> anyhow::Result<()> {
	info!(
		target: "tubewright",
		cookies = credentials.cookies.len(),
		storage_entries = credentials.storage.len(),
		"Loading cookies and local storage..."
	);
	ctx.add_cookies(&credentials.cookies).await.context("installing cookies")?;
	ctx.add_storage_entries(&credentials.storage)
		.await
		.context("installing storage entries")?;

	info!(target: "tubewright", "Reloading page to ensure storage is recognized...");
	ctx.reload().await.context("reloading page")?;

	verify(ctx, options).await
}

async fn verify(ctx: &mut dyn SessionContext, options: &BootstrapOptions) -> anyhow::Result<()> {
	let condition = &options.post_condition;
	let poll = async {
		loop {
			if condition.holds(&mut *ctx).await? {
				return anyhow::Ok(());
			}
			tokio::time::sleep(options.poll_interval).await;
		}
	};

	match tokio::time::timeout(options.verify_timeout, poll).await {
		Ok(result) => result.with_context(|| format!("checking {}", condition.describe())),
		Err(_) => bail!(
			"{} not satisfied within {}ms",
			condition.describe(),
			options.verify_timeout.as_millis()
		),
	}
}

#[cfg(test)]
mod tests {
	use tokio::time::Instant;
	use tubewright_protocol::{Cookie, StorageEntries};

	use super::*;

	/// Browser context that signs in once `reloads` reaches `signed_in_after`.
	#[derive(Default)]
	struct FakeContext {
		cookie_installs: u32,
		storage_installs: u32,
		reloads: u32,
		visibility_checks: u32,
		signed_in_after: Option<u32>,
		failing_reloads: u32,
		hang_on_check: bool,
		sign_in_always_visible: bool,
		installed_cookies: Vec<Cookie>,
	}

	impl FakeContext {
		fn signed_in_after(reloads: u32) -> Self {
			Self {
				signed_in_after: Some(reloads),
				..Default::default()
			}
		}

		fn signed_in(&self) -> bool {
			self.signed_in_after.is_some_and(|n| self.reloads >= n)
		}
	}

	#[async_trait]
	impl SessionContext for FakeContext {
		async fn add_cookies(&mut self, cookies: &[Cookie]) -> anyhow::Result<()> {
			self.cookie_installs += 1;
			self.installed_cookies.extend_from_slice(cookies);
			Ok(())
		}

		async fn add_storage_entries(&mut self, _entries: &StorageEntries) -> anyhow::Result<()> {
			self.storage_installs += 1;
			Ok(())
		}

		async fn reload(&mut self) -> anyhow::Result<()> {
			if self.failing_reloads > 0 {
				self.failing_reloads -= 1;
				bail!("net::ERR_ABORTED");
			}
			self.reloads += 1;
			Ok(())
		}

		async fn is_visible(&mut self, locator: &Locator) -> anyhow::Result<bool> {
			self.visibility_checks += 1;
			if self.hang_on_check {
				std::future::pending::<()>().await;
			}
			let signed_in = self.signed_in();
			Ok(match locator {
				Locator::Label { text, .. } if text == "Account menu" => signed_in,
				Locator::Label { text, .. } if text == "Sign in" => !signed_in || self.sign_in_always_visible,
				_ => false,
			})
		}
	}

	fn credentials() -> SessionCredentials {
		let mut storage = StorageEntries::new();
		storage.insert("yt-player-quality".into(), "{\"data\":\"hd1080\"}".into());
		SessionCredentials::new(vec![Cookie::new("SID", "abc", ".youtube.com")], storage)
	}

	#[tokio::test(start_paused = true)]
	async fn first_attempt_success_installs_and_reloads_once() {
		let mut ctx = FakeContext::signed_in_after(1);
		let start = Instant::now();

		bootstrap(&mut ctx, &credentials(), 2).await.unwrap();

		assert_eq!(ctx.cookie_installs, 1);
		assert_eq!(ctx.storage_installs, 1);
		assert_eq!(ctx.reloads, 1);
		assert_eq!(ctx.installed_cookies[0].name, "SID");
		assert!(start.elapsed() < DEFAULT_POLL_INTERVAL);
	}

	#[tokio::test(start_paused = true)]
	async fn second_reload_settles_the_session() {
		let mut ctx = FakeContext::signed_in_after(2);

		bootstrap(&mut ctx, &credentials(), 2).await.unwrap();

		assert_eq!(ctx.reloads, 2);
		assert_eq!(ctx.cookie_installs, 2);
		assert_eq!(ctx.storage_installs, 2);
	}

	#[tokio::test(start_paused = true)]
	async fn never_signed_in_exhausts_after_max_retries_plus_one() {
		for max_retries in 0..=3u32 {
			let mut ctx = FakeContext::default();
			let start = Instant::now();

			let err = bootstrap(&mut ctx, &credentials(), max_retries).await.unwrap_err();

			assert!(err.is_bootstrap_exhausted());
			assert!(!err.is_action_exhausted());
			assert_eq!(err.attempts(), Some(max_retries + 1));
			assert_eq!(ctx.reloads, max_retries + 1);
			assert_eq!(ctx.cookie_installs, max_retries + 1);

			// each attempt waits out the verify timeout, backoff only between attempts
			let expected = DEFAULT_VERIFY_TIMEOUT * (max_retries + 1) + DEFAULT_BACKOFF * max_retries;
			let elapsed = start.elapsed();
			assert!(elapsed >= expected, "elapsed {elapsed:?} < {expected:?}");
			assert!(elapsed < expected + Duration::from_millis(500), "elapsed {elapsed:?} > {expected:?}");
		}
	}

	#[tokio::test(start_paused = true)]
	async fn no_attempts_after_exhaustion() {
		let mut ctx = FakeContext::default();
		let _ = bootstrap(&mut ctx, &credentials(), 1).await;
		let reloads = ctx.reloads;

		tokio::time::sleep(Duration::from_secs(60)).await;
		assert_eq!(ctx.reloads, reloads);
	}

	#[tokio::test(start_paused = true)]
	async fn reload_errors_are_retried() {
		let mut ctx = FakeContext {
			failing_reloads: 1,
			..FakeContext::signed_in_after(1)
		};

		bootstrap(&mut ctx, &credentials(), 2).await.unwrap();

		assert_eq!(ctx.cookie_installs, 2);
		assert_eq!(ctx.reloads, 1);
	}

	#[tokio::test(start_paused = true)]
	async fn hanging_check_is_bounded_by_verify_timeout() {
		let mut ctx = FakeContext {
			hang_on_check: true,
			..FakeContext::signed_in_after(1)
		};
		let options = BootstrapOptions::new()
			.max_retries(0)
			.verify_timeout(Duration::from_millis(750));

		let err = bootstrap_with(&mut ctx, &credentials(), &options).await.unwrap_err();

		assert!(err.is_bootstrap_exhausted());
		assert!(err.to_string().contains("not satisfied within 750ms"), "{err}");
		assert_eq!(ctx.visibility_checks, 1);
	}

	#[tokio::test(start_paused = true)]
	async fn custom_post_condition_is_used() {
		struct ReloadedTwice;

		#[async_trait]
		impl PostCondition for ReloadedTwice {
			fn describe(&self) -> String {
				"page reloaded twice".into()
			}

			async fn holds(&self, _ctx: &mut dyn SessionContext) -> anyhow::Result<bool> {
				Ok(false)
			}
		}

		let mut ctx = FakeContext::signed_in_after(1);
		let options = BootstrapOptions::new()
			.max_retries(1)
			.backoff(Duration::from_millis(10))
			.post_condition(ReloadedTwice);

		let err = bootstrap_with(&mut ctx, &credentials(), &options).await.unwrap_err();
		assert!(err.to_string().contains("page reloaded twice"), "{err}");
		assert_eq!(ctx.reloads, 2);
	}

	#[tokio::test]
	async fn zero_poll_interval_is_rejected_before_touching_the_context() {
		let mut ctx = FakeContext::signed_in_after(1);
		let options = BootstrapOptions::new().poll_interval(Duration::ZERO);

		let err = bootstrap_with(&mut ctx, &credentials(), &options).await.unwrap_err();

		assert!(matches!(err, Error::Configuration(_)));
		assert_eq!(ctx.cookie_installs, 0);
	}

	#[tokio::test(start_paused = true)]
	async fn empty_credentials_still_attempt_the_bootstrap() {
		let mut ctx = FakeContext::signed_in_after(1);
		bootstrap(&mut ctx, &SessionCredentials::default(), 0).await.unwrap();
		assert_eq!(ctx.reloads, 1);
	}

	#[tokio::test(start_paused = true)]
	async fn account_menu_alone_is_not_signed_in() {
		let mut ctx = FakeContext {
			sign_in_always_visible: true,
			..FakeContext::signed_in_after(1)
		};

		let err = bootstrap(&mut ctx, &credentials(), 1).await.unwrap_err();

		assert!(err.is_bootstrap_exhausted());
		assert_eq!(err.attempts(), Some(2));
		assert!(ctx.signed_in(), "account menu should have been visible");
		assert!(err.to_string().contains("not satisfied within 5000ms"), "{err}");
	}

	#[tokio::test]
	async fn signed_in_requires_menu_and_no_sign_in_button() {
		let condition = SignedIn::default();

		let mut both = FakeContext {
			sign_in_always_visible: true,
			..FakeContext::signed_in_after(0)
		};
		assert!(!condition.holds(&mut both).await.unwrap());

		let mut menu_only = FakeContext::signed_in_after(0);
		assert!(condition.holds(&mut menu_only).await.unwrap());

		let mut signed_out = FakeContext::default();
		assert!(!condition.holds(&mut signed_out).await.unwrap());
	}

	#[test]
	fn signed_in_describes_both_locators() {
		assert_eq!(
			SignedIn::default().describe(),
			r#"internal:label="Account menu"i visible and internal:label="Sign in"i hidden"#
		);
	}
}
