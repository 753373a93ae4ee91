//! Application configuration.
//!
//! Configuration can be loaded from:
//! - Default values
//! - Config file (~/.config/launchdeck/config.toml)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the upstream REST API
    pub api_base_url: String,

    /// Path to the local SQLite cache
    pub db_path: PathBuf,

    /// HTTP request timeout in seconds
    pub http_timeout_secs: u64,

    /// User-Agent header sent with API requests
    pub user_agent: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));

        Self {
            api_base_url: "https://api.spacexdata.com/v4".to_string(),
            db_path: data_dir.join("launchdeck/cache.db"),
            http_timeout_secs: 30,
            user_agent: format!("launchdeck/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl AppConfig {
    /// Load configuration from file, falling back to defaults
    pub fn load() -> Self {
        let config_path = Self::config_path();

        if config_path.exists() {
            if let Ok(content) = std::fs::read_to_string(&config_path) {
                if let Ok(config) = toml::from_str(&content) {
                    log::info!("Loaded config from {}", config_path.display());
                    return config;
                }
                log::warn!("Ignoring malformed config at {}", config_path.display());
            }
        }

        Self::default()
    }

    /// Save configuration to file
    pub fn save(&self) -> std::io::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

        std::fs::write(config_path, content)
    }

    /// Path to the config file
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("launchdeck/config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// HTTP request timeout
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.api_base_url.starts_with("https://"));
        assert_eq!(config.http_timeout_secs, 30);
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let config = AppConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let back: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.api_base_url, config.api_base_url);
        assert_eq!(back.db_path, config.db_path);
    }
}
