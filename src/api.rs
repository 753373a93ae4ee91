//! Remote source - HTTP access to the upstream REST API.
//!
//! The repository only needs one operation per entity type: fetch the full
//! current collection. That seam is a trait so tests can script responses
//! without a network.

use async_trait::async_trait;

use crate::config::AppConfig;
use crate::entities::CacheEntity;
use crate::error::{Error, Result};

/// Source of the full upstream collection for one entity type.
#[async_trait]
pub trait RemoteSource<E: CacheEntity>: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<E::Dto>>;
}

/// Live HTTP source against the upstream API.
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout())
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl<E: CacheEntity> RemoteSource<E> for HttpSource {
    async fn fetch_all(&self) -> Result<Vec<E::Dto>> {
        let url = format!("{}/{}", self.base_url, E::ENDPOINT);
        log::debug!("GET {url}");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
            });
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let config = AppConfig {
            api_base_url: "https://api.spacexdata.com/v4/".to_string(),
            ..AppConfig::default()
        };
        let source = HttpSource::new(&config).unwrap();
        assert_eq!(source.base_url(), "https://api.spacexdata.com/v4");
    }

    #[test]
    fn test_client_builds_with_default_config() {
        assert!(HttpSource::new(&AppConfig::default()).is_ok());
    }
}
