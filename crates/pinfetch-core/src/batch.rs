//! Batch orchestrator: dedup check, fetch, record, one outcome per request.
//!
//! Requests are processed strictly in input order, one at a time. Each success is
//! recorded in the dedup store (and flushed to disk) before the next request is
//! looked at, so a duplicate URL later in the same batch is skipped.

use crate::fetch::{Fetch, FetchOutcome};
use crate::filename::destination_name;
use crate::identifier::ContentId;
use crate::store::DedupStore;
use std::error::Error as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// One image to download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub source_url: String,
    pub desired_filename: String,
}

impl DownloadRequest {
    pub fn new(source_url: impl Into<String>, desired_filename: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            desired_filename: desired_filename.into(),
        }
    }
}

/// Per-request result of a batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// Identifier already in the store; nothing fetched.
    Skipped { url: String },
    Downloaded { url: String, path: PathBuf },
    /// Not recorded in the store, so the URL is eligible again next run.
    DownloadFailed {
        url: String,
        attempts: u32,
        error: String,
    },
    /// Saved to disk, but the dedup store could not be updated. The URL stays
    /// eligible next run.
    NotRecorded {
        url: String,
        path: PathBuf,
        error: String,
    },
}

impl ItemOutcome {
    pub fn url(&self) -> &str {
        match self {
            ItemOutcome::Skipped { url }
            | ItemOutcome::Downloaded { url, .. }
            | ItemOutcome::DownloadFailed { url, .. }
            | ItemOutcome::NotRecorded { url, .. } => url,
        }
    }
}

/// Outcomes of a batch, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub outcomes: Vec<ItemOutcome>,
}

impl BatchReport {
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Skipped { .. }))
    }

    pub fn downloaded(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Downloaded { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::DownloadFailed { .. }))
    }

    pub fn not_recorded(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::NotRecorded { .. }))
    }

    fn count(&self, pred: impl Fn(&ItemOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|&o| pred(o)).count()
    }
}

/// Errors that end a batch early.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("failed to create output directory {}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Runs `requests` against `store`, saving into `output_dir`.
pub fn run_batch<F: Fetch>(
    requests: &[DownloadRequest],
    store: &mut DedupStore,
    output_dir: &Path,
    fetcher: &F,
) -> Result<BatchReport, BatchError> {
    run_batch_with(requests, store, output_dir, fetcher, |_| {})
}

/// Like [`run_batch`], calling `observe` with each outcome as soon as it is known.
pub fn run_batch_with<F, O>(
    requests: &[DownloadRequest],
    store: &mut DedupStore,
    output_dir: &Path,
    fetcher: &F,
    mut observe: O,
) -> Result<BatchReport, BatchError>
where
    F: Fetch,
    O: FnMut(&ItemOutcome),
{
    fs::create_dir_all(output_dir).map_err(|source| BatchError::OutputDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut report = BatchReport {
        outcomes: Vec::with_capacity(requests.len()),
    };
    for request in requests {
        let outcome = run_one(request, store, output_dir, fetcher);
        observe(&outcome);
        report.outcomes.push(outcome);
    }

    tracing::info!(
        total = requests.len(),
        downloaded = report.downloaded(),
        skipped = report.skipped(),
        failed = report.failed(),
        not_recorded = report.not_recorded(),
        "batch finished"
    );
    Ok(report)
}

fn run_one<F: Fetch>(
    request: &DownloadRequest,
    store: &mut DedupStore,
    output_dir: &Path,
    fetcher: &F,
) -> ItemOutcome {
    let url = request.source_url.as_str();
    let id = ContentId::for_url(url);

    if store.contains(&id) {
        tracing::info!(url, "skip: already downloaded previously");
        return ItemOutcome::Skipped {
            url: url.to_string(),
        };
    }

    let destination = output_dir.join(destination_name(&request.desired_filename, &id));
    match fetcher.fetch(url, &destination) {
        FetchOutcome::Saved(path) => match store.record(id) {
            Ok(_) => {
                tracing::info!(url, path = %path.display(), "saved");
                ItemOutcome::Downloaded {
                    url: url.to_string(),
                    path,
                }
            }
            Err(e) => {
                let error = match e.source() {
                    Some(source) => format!("{}: {}", e, source),
                    None => e.to_string(),
                };
                tracing::error!(url, path = %path.display(), error = %error, "saved but not recorded");
                ItemOutcome::NotRecorded {
                    url: url.to_string(),
                    path,
                    error,
                }
            }
        },
        FetchOutcome::Failed {
            url,
            attempts,
            last_error,
        } => {
            tracing::error!(url = %url, attempts, error = %last_error, "giving up");
            ItemOutcome::DownloadFailed {
                url,
                attempts,
                error: last_error,
            }
        }
    }
}
