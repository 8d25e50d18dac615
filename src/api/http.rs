//! HTTP transport for the Jolpica-F1 API
//!
//! Plain unauthenticated GETs: `{base_url}{endpoint}?limit={n}&offset={m}`.

use crate::config::ClientConfig;
use crate::error::FetchError;
use crate::resource::Endpoint;
use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::Value;
use std::future::Future;
use tracing::{debug, trace, warn};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Source of raw page documents.
///
/// The paginator only needs "give me this window of this endpoint"; keeping
/// that behind a trait lets tests script responses without a server.
pub trait Transport: Send + Sync {
    fn get_page(
        &self,
        endpoint: &Endpoint,
        limit: u32,
        offset: u64,
    ) -> impl Future<Output = Result<Value, FetchError>> + Send;
}

/// reqwest-backed transport with a per-request timeout
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http_client: Client,
    base_url: url::Url,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = config.base_url()?;
        debug!(
            "Creating HTTP transport for {}, timeout: {:?}",
            base_url,
            config.request_timeout()
        );
        let http_client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    pub fn base_url(&self) -> &url::Url {
        &self.base_url
    }

    /// Full URL of an endpoint, without the pagination query. The result
    /// must stay under the base URL.
    pub fn url_for(&self, endpoint: &Endpoint) -> Result<url::Url, FetchError> {
        let url = self
            .base_url
            .join(endpoint.as_str())
            .map_err(|e| FetchError::Url(format!("{}: {}", endpoint, e)))?;
        if !url.as_str().starts_with(self.base_url.as_str()) {
            return Err(FetchError::Url(format!(
                "{} resolves outside {}",
                endpoint, self.base_url
            )));
        }
        Ok(url)
    }
}

impl Transport for HttpTransport {
    async fn get_page(
        &self,
        endpoint: &Endpoint,
        limit: u32,
        offset: u64,
    ) -> Result<Value, FetchError> {
        let url = self.url_for(endpoint)?;
        debug!("GET {} limit={} offset={}", url, limit, offset);

        let response = self
            .http_client
            .get(url.clone())
            .query(&[("limit", limit.to_string()), ("offset", offset.to_string())])
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        debug!("Response status: {}", status);
        trace!("Response body (first 2000 chars): {}", truncate(&text, 2000));

        if !status.is_success() {
            warn!(
                "Request to {} failed: status={}, body={}",
                url,
                status,
                truncate(&text, 500)
            );
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: truncate(&text, 500).to_string(),
            });
        }

        serde_json::from_str(&text).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

/// Cut `text` to at most `max` bytes without splitting a character
fn truncate(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
