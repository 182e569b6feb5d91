//! `pinfetch import` – download images listed in a saved results file.

use anyhow::Result;
use pinfetch_core::config::PinfetchConfig;
use pinfetch_core::search::{parse_pins_file, ResultColumns};
use std::path::Path;

use super::batch::run_requests;

pub fn run_import(cfg: &PinfetchConfig, path: &Path, count: Option<usize>) -> Result<()> {
    let mut pins = parse_pins_file(path)?;
    if let Some(n) = count {
        pins.truncate(n);
    }
    if pins.is_empty() {
        println!("No results with an image URL in {}.", path.display());
        return Ok(());
    }

    let requests = ResultColumns::from_pins(&pins).into_requests()?;
    run_requests(cfg, &requests)?;
    Ok(())
}
