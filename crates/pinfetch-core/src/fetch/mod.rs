//! Image fetcher: one streaming HTTP GET per attempt, retried under a
//! [`RetryPolicy`].
//!
//! Nothing escapes past [`Fetch::fetch`]: transport, status and write errors
//! all become a retry or a terminal [`FetchOutcome::Failed`].

mod attempt;

use crate::retry::{run_with_retry, RetryPolicy};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Terminal result of fetching one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Body written to this path.
    Saved(PathBuf),
    /// Every allowed attempt failed.
    Failed {
        url: String,
        attempts: u32,
        last_error: String,
    },
}

/// Something that can download a URL to a file. The batch orchestrator is
/// generic over this so it can be exercised without a network.
pub trait Fetch {
    fn fetch(&self, url: &str, destination: &Path) -> FetchOutcome;
}

/// Curl transfer options applied to every attempt.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub connect_timeout: Duration,
    /// A transfer that makes no progress for this long is aborted.
    pub read_timeout: Duration,
    /// Proxy URL handed to curl as-is (e.g. `http://host:3128`, `socks5h://host`).
    pub proxy: Option<String>,
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(10),
            proxy: None,
            user_agent: concat!("pinfetch/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// HTTP fetcher backed by libcurl.
#[derive(Debug, Clone, Default)]
pub struct Fetcher {
    options: FetchOptions,
    policy: RetryPolicy,
}

impl Fetcher {
    pub fn new(options: FetchOptions, policy: RetryPolicy) -> Self {
        Self { options, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn options(&self) -> &FetchOptions {
        &self.options
    }
}

impl Fetch for Fetcher {
    fn fetch(&self, url: &str, destination: &Path) -> FetchOutcome {
        let max_attempts = self.policy.max_attempts;
        let attempted = run_with_retry(&self.policy, |attempt| {
            let res = attempt::download_to(url, destination, &self.options);
            if let Err(e) = &res {
                tracing::warn!(url, attempt, max_attempts, error = %e, "download attempt failed");
            }
            res
        });

        match attempted.result {
            Ok(bytes) => {
                tracing::debug!(
                    url,
                    path = %destination.display(),
                    bytes,
                    attempts = attempted.attempts,
                    "saved"
                );
                FetchOutcome::Saved(destination.to_path_buf())
            }
            Err(e) => FetchOutcome::Failed {
                url: url.to_string(),
                attempts: attempted.attempts,
                last_error: e.to_string(),
            },
        }
    }
}
