use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Browser-like user agent sent with the search page and image requests.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_14_5) \
AppleWebKit/605.1.15 (KHTML, like Gecko) Version/12.1.1 Safari/605.1.15";

/// Image search endpoint; the query is appended as `?q=...&source=lnms&tbm=isch`.
pub const DEFAULT_SEARCH_URL: &str = "https://www.google.co.in/search";

/// Global configuration loaded from `~/.config/imgdl/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImgdlConfig {
    /// Number of queries processed concurrently.
    pub query_workers: usize,
    /// Number of image fetches run concurrently within one query.
    pub fetch_workers: usize,
    /// Cap on image fetches in flight across all queries of a run.
    pub max_in_flight: usize,
    /// Seconds allowed to establish a connection to an image host.
    pub connect_timeout_secs: u64,
    /// Seconds an image transfer may stall without receiving data.
    pub read_timeout_secs: u64,
    /// Overall timeout in seconds for the search results request.
    pub search_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_search_url")]
    pub search_url: String,
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_search_url() -> String {
    DEFAULT_SEARCH_URL.to_string()
}

impl Default for ImgdlConfig {
    fn default() -> Self {
        Self {
            query_workers: 5,
            fetch_workers: 5,
            max_in_flight: 25,
            connect_timeout_secs: 20,
            read_timeout_secs: 40,
            search_timeout_secs: 10,
            user_agent: default_user_agent(),
            search_url: default_search_url(),
        }
    }
}

impl ImgdlConfig {
    /// Worker widths clamped to at least 1: `(query_workers, fetch_workers, max_in_flight)`.
    pub fn widths(&self) -> (usize, usize, usize) {
        (
            self.query_workers.max(1),
            self.fetch_workers.max(1),
            self.max_in_flight.max(1),
        )
    }

    /// HTTP settings threaded through the extractor and fetcher.
    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings {
            user_agent: self.user_agent.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            read_timeout: Duration::from_secs(self.read_timeout_secs),
            request_timeout: Duration::from_secs(self.search_timeout_secs),
        }
    }
}

/// Per-request HTTP settings. Passed explicitly to every component that talks
/// to the network; there is no process-wide client state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    pub user_agent: String,
    /// Connect timeout for image requests.
    pub connect_timeout: Duration,
    /// Maximum stall between received bytes for image requests.
    pub read_timeout: Duration,
    /// Whole-request timeout for the search results page.
    pub request_timeout: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        ImgdlConfig::default().http_settings()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("imgdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ImgdlConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ImgdlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg: ImgdlConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
