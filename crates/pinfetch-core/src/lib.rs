pub mod config;
pub mod logging;

pub mod batch;
pub mod fetch;
pub mod filename;
pub mod identifier;
pub mod retry;
pub mod search;
pub mod store;

pub use batch::{run_batch, run_batch_with, BatchError, BatchReport, DownloadRequest, ItemOutcome};
pub use fetch::{Fetch, FetchOptions, FetchOutcome, Fetcher};
pub use filename::{destination_name, sanitize};
pub use identifier::ContentId;
pub use retry::RetryPolicy;
pub use store::{DedupStore, StoreError};
