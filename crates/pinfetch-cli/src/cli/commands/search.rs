//! `pinfetch search` – search and download the results.

use anyhow::{Context, Result};
use pinfetch_core::config::PinfetchConfig;
use pinfetch_core::search::pinterest::PinterestClient;
use pinfetch_core::search::ResultColumns;

use super::batch::run_requests;

pub fn run_search(cfg: &PinfetchConfig, term: &str) -> Result<()> {
    tracing::debug!(workers = cfg.workers, "worker hint ignored; downloads are sequential");

    let client = PinterestClient::new(cfg.fetch_options());
    let pins = client
        .search(term, cfg.images_to_download)
        .with_context(|| format!("search for {:?}", term))?;
    if pins.is_empty() {
        println!("Nothing to download for {:?}.", term);
        return Ok(());
    }
    println!("Found {} image(s) for {:?}.", pins.len(), term);

    let requests = ResultColumns::from_pins(&pins).into_requests()?;
    run_requests(cfg, &requests)?;
    Ok(())
}
