//! Retry and backoff policy.
//!
//! Error classification (timeouts, throttling, connection and storage failures)
//! and the bounded retry loop shared by the image fetcher. The policy is a plain
//! value so the backoff strategy can change without touching the fetcher.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use error::FetchError;
pub use policy::{Backoff, ErrorKind, RetryDecision, RetryPolicy};
pub use run::{run_with_retry, Attempted};
