//! Shared batch runner: open the store, fetch, print one line per outcome.

use anyhow::{Context, Result};
use pinfetch_core::batch::{run_batch_with, BatchReport, DownloadRequest, ItemOutcome};
use pinfetch_core::config::PinfetchConfig;
use pinfetch_core::fetch::Fetcher;
use pinfetch_core::store::DedupStore;

pub(super) fn run_requests(cfg: &PinfetchConfig, requests: &[DownloadRequest]) -> Result<BatchReport> {
    let store_path = cfg.resolved_store_path()?;
    let mut store = DedupStore::load(&store_path)
        .with_context(|| format!("refusing to run with dedup store {}", store_path.display()))?;
    tracing::debug!(path = %store_path.display(), known = store.len(), "dedup store ready");

    let fetcher = Fetcher::new(cfg.fetch_options(), cfg.retry_policy());
    let max_attempts = fetcher.policy().max_attempts;

    let report = run_batch_with(requests, &mut store, &cfg.output_dir, &fetcher, |outcome| {
        match outcome {
            ItemOutcome::Skipped { url } => {
                println!("[SKIP] Already downloaded previously: {}", url)
            }
            ItemOutcome::Downloaded { path, .. } => println!("[OK] Saved: {}", path.display()),
            ItemOutcome::DownloadFailed {
                url,
                attempts,
                error,
            } => println!(
                "[FAIL] Could not download after {}/{} attempts: {} ({})",
                attempts, max_attempts, url, error
            ),
            ItemOutcome::NotRecorded { path, error, .. } => println!(
                "[FAIL] Saved {} but could not record it: {}",
                path.display(),
                error
            ),
        }
    })?;

    println!(
        "\n{} downloaded, {} skipped, {} failed ({} total)",
        report.downloaded(),
        report.skipped(),
        report.failed() + report.not_recorded(),
        report.outcomes.len()
    );
    Ok(report)
}
