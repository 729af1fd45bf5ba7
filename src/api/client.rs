//! HTTP implementation of [`MetadataApi`] backed by `reqwest`.

use super::wire::{decode_detail, decode_search};
use super::MetadataApi;
use crate::domain::error::{MarqueeError, Result};
use crate::domain::{ApiError, ItemDetail, SearchResultItem};
use crate::Config;
use reqwest::{StatusCode, Url};

/// Client for an OMDb-compatible metadata service.
///
/// Issues exactly one GET per call with no retries. The API key travels as a
/// query parameter and is never logged.
#[derive(Clone)]
pub struct OmdbClient {
    http: reqwest::Client,
    base: Url,
    api_key: String,
}

impl OmdbClient {
    /// Builds a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base endpoint is not a valid URL or the HTTP
    /// client cannot be constructed.
    pub fn new(config: &Config) -> Result<Self> {
        let base = Url::parse(&config.api_base)
            .map_err(|e| MarqueeError::Config(format!("invalid api_base {:?}: {e}", config.api_base)))?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MarqueeError::Http(e.to_string()))?;

        tracing::debug!(base = %base, timeout = ?config.request_timeout, "metadata client ready");

        Ok(Self {
            http,
            base,
            api_key: config.api_key.clone(),
        })
    }

    async fn get(&self, param: (&str, &str)) -> std::result::Result<(StatusCode, String), ApiError> {
        let response = self
            .http
            .get(self.base.clone())
            .query(&[param, ("apikey", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(format!("failed to read body: {}", e.without_url())))?;

        tracing::debug!(status = %status, body_len = body.len(), "metadata response received");
        Ok((status, body))
    }
}

impl MetadataApi for OmdbClient {
    #[tracing::instrument(level = "debug", name = "omdb_search", skip(self))]
    async fn search(&self, term: &str) -> std::result::Result<Vec<SearchResultItem>, ApiError> {
        let (status, body) = self.get(("s", term)).await?;
        decode_search(status, &body)
    }

    #[tracing::instrument(level = "debug", name = "omdb_fetch_detail", skip(self))]
    async fn fetch_detail(&self, id: &str) -> std::result::Result<ItemDetail, ApiError> {
        let (status, body) = self.get(("i", id)).await?;
        decode_detail(status, &body)
    }
}

impl std::fmt::Debug for OmdbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OmdbClient")
            .field("base", &self.base.as_str())
            .finish_non_exhaustive()
    }
}
