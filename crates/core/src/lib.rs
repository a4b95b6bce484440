//! Resilience primitives for browser UI tests against a live site.
//!
//! * [`retry`]: bounded, fixed-delay retry of re-runnable async actions with a
//!   diagnostic line per failed attempt.
//! * [`bootstrap`]: install stored cookies and localStorage into a browser
//!   context, reload, and verify the session is signed in.
//! * [`credentials`]: pick and load the stored credentials (environment
//!   payloads on CI, local files otherwise).
//! * [`pages`]: page flows built on [`retry::execute`].
//!
//! The browser itself stays behind the [`Browser`] and [`SessionContext`]
//! traits.

pub mod bootstrap;
pub mod browser;
pub mod config;
pub mod credentials;
pub mod error;
pub mod locator;
pub mod pages;
pub mod retry;
pub mod test_data;

pub use bootstrap::{BootstrapOptions, PostCondition, SignedIn, bootstrap, bootstrap_with};
pub use browser::{Browser, ElementState, LoadState, SessionContext};
pub use config::SuiteConfig;
pub use credentials::CredentialSource;
pub use error::{Error, Result};
pub use locator::Locator;
pub use pages::home::HomePage;
pub use pages::shorts::ShortsPage;
pub use pages::{GuideItem, SitePage};
pub use retry::{DiagnosticSink, RetryPolicy, execute, execute_with_sink};
pub use test_data::load_test_data;
pub use tubewright_protocol::{Cookie, CredentialSummary, SameSite, SessionCredentials, StorageEntries};
