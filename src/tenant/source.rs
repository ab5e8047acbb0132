//! Tenant config retrieval over HTTP

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::StatusCode;
use tracing::debug;

use super::TenantConfig;
use crate::errors::ConvoError;
use crate::errors::FetchError;

/// Source of per-tenant configuration documents
#[async_trait]
pub trait TenantConfigSource: Send + Sync {
    async fn fetch(&self, client_id: &str) -> Result<TenantConfig, FetchError>;
}

/// Fetches `<base_url>/<client_id>.json` on every call; nothing is cached.
#[derive(Debug, Clone)]
pub struct HttpConfigSource {
    base_url: String,
    client: Client,
}

impl HttpConfigSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> crate::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConvoError::HttpError(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url_for(&self, client_id: &str) -> String {
        format!("{}/{}.json", self.base_url, client_id)
    }
}

#[async_trait]
impl TenantConfigSource for HttpConfigSource {
    async fn fetch(&self, client_id: &str) -> Result<TenantConfig, FetchError> {
        let url = self.url_for(client_id);
        debug!("Fetching tenant config: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(FetchError::NotFound(client_id.to_string())),
            status if !status.is_success() => {
                return Err(FetchError::Status {
                    status: status.as_u16(),
                    url,
                })
            }
            _ => {}
        }

        response
            .json::<TenantConfig>()
            .await
            .map_err(|e| FetchError::Malformed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for() {
        let source =
            HttpConfigSource::new("https://cfg.example.com/configs/", Duration::from_secs(5))
                .unwrap();
        assert_eq!(
            source.url_for("acme"),
            "https://cfg.example.com/configs/acme.json"
        );
    }
}
