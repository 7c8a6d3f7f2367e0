use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::constants;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub api: ApiConfig,

    pub cache: CacheConfig,

    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,

    /// Event bus buffer size (default: 100)
    pub event_bus_buffer_size: usize,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            event_bus_buffer_size: 100,
            worker_threads: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base address of the remote recipe service.
    pub base_url: String,

    pub request_timeout_seconds: u64,

    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: constants::DEFAULT_API_BASE.to_string(),
            request_timeout_seconds: 30,
            user_agent: constants::USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// How long a loaded query stays fresh before a read schedules a refetch.
    pub freshness_seconds: u64,

    /// Default page size for recipe listings.
    pub page_size: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            freshness_seconds: constants::cache::DEFAULT_FRESHNESS_SECONDS,
            page_size: constants::paging::DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SessionConfig {
    /// Where the session record is persisted. Empty means the default
    /// location under the platform config directory.
    pub path: String,
}

impl SessionConfig {
    #[must_use]
    pub fn resolved_path(&self) -> PathBuf {
        if self.path.is_empty() {
            Config::data_dir().join(constants::SESSION_FILE)
        } else {
            PathBuf::from(&self.path)
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("forkful.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("forkful").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".forkful").join("config.toml"));
        }

        paths
    }

    fn data_dir() -> PathBuf {
        dirs::config_dir().map_or_else(|| PathBuf::from("."), |dir| dir.join("forkful"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.is_empty() {
            anyhow::bail!("API base URL cannot be empty");
        }

        url::Url::parse(&self.api.base_url).context("API base URL is not a valid URL")?;

        if self.cache.page_size == 0 || self.cache.page_size > constants::paging::MAX_PAGE_SIZE {
            anyhow::bail!(
                "Page size must be between 1 and {}",
                constants::paging::MAX_PAGE_SIZE
            );
        }

        Ok(())
    }
}
