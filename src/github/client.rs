use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::cache::{CacheKey, Fetcher};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::github::endpoint::{Endpoint, GITHUB_PATH};
use crate::github::envelope::decode_envelope;

/// Client for the site's `/api/github` metrics routes.
pub struct MetricsClient {
    client: Client,
    base_url: String,
}

impl MetricsClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_str(&format!("ghpulse/{}", env!("CARGO_PKG_VERSION")))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.api_base, config.request_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GETs a path relative to the base URL and returns the raw JSON body.
    pub async fn get_json(&self, path: &str) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                message: format!("GET {} failed: {}", path, body.trim()),
            });
        }

        Ok(response.json().await?)
    }

    /// Fetches one endpoint and unwraps its `{"data": ...}` envelope.
    pub async fn get<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<Option<T>> {
        let body = self.get_json(&endpoint.path()).await?;
        decode_envelope(&body)
    }

    pub async fn clear_cache(&self) -> Result<()> {
        let url = format!("{}{}", self.base_url, GITHUB_PATH);
        tracing::info!("Requesting server-side cache clear");

        let response = self
            .client
            .post(&url)
            .json(&json!({ "action": "clear-cache" }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                message: format!("clear-cache failed: {}", body.trim()),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl Fetcher for MetricsClient {
    async fn fetch(&self, key: &CacheKey) -> Result<Value> {
        self.get_json(key.as_str()).await
    }

    async fn clear_remote(&self) -> Result<()> {
        self.clear_cache().await
    }

    fn name(&self) -> &str {
        &self.base_url
    }
}
