//! reqwest-backed `NomineeApi`

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

use crate::config::UpstreamConfig;
use crate::models::{Category, CategoryKey, CategoryNomineesResponse};

use super::decode::{decode_category_list, decode_category_nominees, ListDecode};
use super::{FetchError, NomineeApi, CATEGORIES_PATH, CATEGORY_NOMINEES_PATH};

/// HTTP client for the upstream nominee API
#[derive(Debug, Clone)]
pub struct HttpNomineeApi {
    client: reqwest::Client,
    base_url: String,
    list_timeout: Duration,
    detail_timeout: Option<Duration>,
}

impl HttpNomineeApi {
    /// Create a client from upstream configuration
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            list_timeout: config.list_timeout(),
            detail_timeout: config.detail_timeout(),
        })
    }

    /// Override the listing timeout
    pub fn with_list_timeout(mut self, timeout: Duration) -> Self {
        self.list_timeout = timeout;
        self
    }

    /// Override the per-category timeout
    pub fn with_detail_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.detail_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET a URL and return the body of a 2xx response
    async fn get_body(&self, url: &str, timeout: Option<Duration>) -> Result<Vec<u8>, FetchError> {
        let mut request = self.client.get(url);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| map_transport_error(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| map_transport_error(e, timeout))?;

        Ok(body.to_vec())
    }
}

fn map_transport_error(e: reqwest::Error, timeout: Option<Duration>) -> FetchError {
    match timeout {
        Some(limit) if e.is_timeout() => FetchError::Timeout(limit),
        _ => FetchError::Network(e.to_string()),
    }
}

#[async_trait]
impl NomineeApi for HttpNomineeApi {
    async fn list_categories(&self) -> Result<Vec<Category>, FetchError> {
        let url = self.url(CATEGORIES_PATH);
        tracing::debug!(%url, timeout = ?self.list_timeout, "Fetching categories");

        let body = self.get_body(&url, Some(self.list_timeout)).await?;

        let decoded = decode_category_list(&body);
        if let ListDecode::Fallback { reason } = &decoded {
            tracing::warn!(%url, %reason, "Category listing had unexpected shape, using empty list");
        }
        Ok(decoded.into_categories())
    }

    async fn category_nominees(
        &self,
        id: &CategoryKey,
    ) -> Result<CategoryNomineesResponse, FetchError> {
        let url = self.url(&format!("{}/{}", CATEGORY_NOMINEES_PATH, id.path_segment()));
        tracing::debug!(%url, category = %id, "Fetching category nominees");

        let body = self.get_body(&url, self.detail_timeout).await?;
        decode_category_nominees(&body)
    }
}
