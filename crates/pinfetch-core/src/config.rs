use crate::fetch::FetchOptions;
use crate::retry::{Backoff, RetryPolicy};
use crate::store::STORE_FILE_NAME;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Backoff schedule name in config.toml.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackoffKind {
    #[default]
    Fixed,
    Exponential,
}

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts per image (including the first).
    pub max_attempts: u32,
    /// Delay in seconds between attempts (base delay for exponential backoff).
    pub delay_secs: f64,
    pub backoff: BackoffKind,
    /// Cap for exponential backoff, in seconds.
    pub max_delay_secs: u64,
    /// Retry 4xx responses too. On by default; a 404 rarely heals, but this
    /// matches the long-standing behavior of retrying every failure.
    pub retry_client_errors: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_secs: 2.0,
            backoff: BackoffKind::Fixed,
            max_delay_secs: 30,
            retry_client_errors: true,
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(cfg: &RetryConfig) -> Self {
        let default = RetryPolicy::default();
        let delay = Duration::try_from_secs_f64(cfg.delay_secs).unwrap_or(default.delay);
        let backoff = match cfg.backoff {
            BackoffKind::Fixed => Backoff::Fixed,
            BackoffKind::Exponential => Backoff::Exponential {
                max_delay: Duration::from_secs(cfg.max_delay_secs),
            },
        };
        RetryPolicy {
            max_attempts: cfg.max_attempts.max(1),
            delay,
            backoff,
            retry_client_errors: cfg.retry_client_errors,
        }
    }
}

/// Global configuration loaded from `~/.config/pinfetch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PinfetchConfig {
    /// Directory images are saved into (relative paths resolve against the cwd).
    pub output_dir: PathBuf,
    /// Dedup store file. Defaults to `~/.local/state/pinfetch/downloaded.json`.
    #[serde(default)]
    pub store_path: Option<PathBuf>,
    /// How many search results to request.
    pub images_to_download: usize,
    /// Parallelism hint. Accepted for compatibility; downloads run sequentially.
    pub workers: usize,
    /// Connect and read-stall timeout in seconds.
    pub timeout_secs: u64,
    /// Proxy URL passed to curl for both search and image requests.
    #[serde(default)]
    pub proxy: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl Default for PinfetchConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            store_path: None,
            images_to_download: 100,
            workers: 10,
            timeout_secs: 10,
            proxy: None,
            user_agent: None,
            retry: None,
        }
    }
}

impl PinfetchConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
            .as_ref()
            .map(RetryPolicy::from)
            .unwrap_or_default()
    }

    pub fn fetch_options(&self) -> FetchOptions {
        let timeout = Duration::from_secs(self.timeout_secs.max(1));
        let mut opts = FetchOptions {
            connect_timeout: timeout,
            read_timeout: timeout,
            proxy: self.proxy.clone().filter(|p| !p.trim().is_empty()),
            ..FetchOptions::default()
        };
        if let Some(ua) = &self.user_agent {
            opts.user_agent = ua.clone();
        }
        opts
    }

    /// Configured store path, or the default under the XDG state directory.
    pub fn resolved_store_path(&self) -> Result<PathBuf> {
        match &self.store_path {
            Some(p) => Ok(p.clone()),
            None => default_store_path(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("pinfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// `~/.local/state/pinfetch/downloaded.json`
pub fn default_store_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("pinfetch")?;
    Ok(xdg_dirs.place_state_file(STORE_FILE_NAME)?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<PinfetchConfig> {
    load_or_init_at(&config_path()?)
}

/// Like [`load_or_init`] for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<PinfetchConfig> {
    if !path.exists() {
        let default_cfg = PinfetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("write {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: PinfetchConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
