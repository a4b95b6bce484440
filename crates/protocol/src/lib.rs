//! Wire types for stored browser session credentials.
//!
//! These are the serde shapes of the files and environment payloads that carry
//! an authenticated session: a Playwright-format cookie array and a flat
//! localStorage object. They hold no behavior beyond (de)serialization and a
//! few summaries used for diagnostics.

pub mod cookie;
pub mod session;

pub use cookie::*;
pub use session::*;
