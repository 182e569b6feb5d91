//! CLI for pinfetch.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use pinfetch_core::config::{self, PinfetchConfig};
use std::path::PathBuf;

use commands::{run_completions, run_id, run_import, run_search};

/// Top-level CLI for pinfetch.
#[derive(Debug, Parser)]
#[command(name = "pinfetch")]
#[command(about = "Download search-result images once, skipping anything fetched before", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Options shared by every command that runs a batch.
#[derive(Debug, Clone, Default, Args)]
pub struct BatchArgs {
    /// Directory to save images into (overrides config).
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Dedup store file (overrides config).
    #[arg(long, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Proxy URL for all HTTP requests, e.g. http://host:3128 (overrides config).
    #[arg(long, value_name = "URL")]
    pub proxy: Option<String>,
}

impl BatchArgs {
    /// Fold command-line overrides into the loaded config.
    pub fn apply(&self, cfg: &mut PinfetchConfig) {
        if let Some(dir) = &self.output_dir {
            cfg.output_dir = dir.clone();
        }
        if let Some(store) = &self.store {
            cfg.store_path = Some(store.clone());
        }
        if let Some(proxy) = &self.proxy {
            cfg.proxy = Some(proxy.clone());
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Search for a term and download the result images.
    Search {
        /// Search term.
        term: String,

        /// Number of results to request (overrides config).
        #[arg(short = 'n', long, value_name = "N")]
        count: Option<usize>,

        /// Parallelism hint. Accepted but unused: downloads run one at a time.
        #[arg(long, value_name = "N")]
        workers: Option<usize>,

        #[command(flatten)]
        batch: BatchArgs,
    },

    /// Download images from a saved JSON array of search results.
    Import {
        /// Path to the results file.
        path: PathBuf,

        /// Only take the first N results.
        #[arg(short = 'n', long, value_name = "N")]
        count: Option<usize>,

        #[command(flatten)]
        batch: BatchArgs,
    },

    /// Print the content identifier (dedup key) of a URL.
    Id {
        /// Image URL.
        url: String,
    },

    /// Print shell completions.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Search {
                term,
                count,
                workers,
                batch,
            } => {
                let mut cfg = load_config()?;
                batch.apply(&mut cfg);
                if let Some(n) = count {
                    cfg.images_to_download = n;
                }
                if let Some(w) = workers {
                    cfg.workers = w;
                }
                run_search(&cfg, &term)?;
            }
            CliCommand::Import { path, count, batch } => {
                let mut cfg = load_config()?;
                batch.apply(&mut cfg);
                run_import(&cfg, &path, count)?;
            }
            CliCommand::Id { url } => run_id(&url),
            CliCommand::Completions { shell } => run_completions(shell),
        }

        Ok(())
    }
}

fn load_config() -> Result<PinfetchConfig> {
    let cfg = config::load_or_init()?;
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}

#[cfg(test)]
mod tests;
