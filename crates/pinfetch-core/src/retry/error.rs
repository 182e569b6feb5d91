//! Per-attempt fetch error, kept typed so it can be classified before retrying.

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, DNS, ...).
    #[error("{0}")]
    Transport(#[from] curl::Error),
    /// The response status was not 2xx.
    #[error("HTTP {0}")]
    Http(u32),
    /// Creating or writing the destination file failed.
    #[error("storage: {0}")]
    Storage(#[from] io::Error),
}
