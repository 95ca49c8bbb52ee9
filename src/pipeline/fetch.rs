//! Fetch stage: pull one raw markdown document from the source.
//!
//! The [`MarkdownSource`] trait is the seam between the pipeline and the
//! network. [`HttpSource`] is the production implementation; tests inject
//! their own through [`crate::config::GenerationConfigBuilder::source`].

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

#[cfg(test)]
use mockall::automock;

/// Why a fetch produced no usable bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Network, HTTP status, timeout or cancellation failure.
    #[error("{0}")]
    Transport(String),
    /// The request succeeded but the body was empty.
    #[error("response body is empty")]
    NoData,
}

/// Somewhere raw markdown can be fetched from.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MarkdownSource: Send + Sync {
    /// Fetch the document at `url`. An empty body must surface as
    /// [`FetchError::NoData`], never as an empty `Ok`.
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError>;
}

/// [`MarkdownSource`] over a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(timeout_secs: u64) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("lorem-press/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// Wrap an already configured client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MarkdownSource for HttpSource {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Transport(format!("timed out: {e}"))
                } else {
                    FetchError::Transport(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(FetchError::Transport(format!("HTTP {}", response.status())));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(format!("reading body: {e}")))?;
        if bytes.is_empty() {
            return Err(FetchError::NoData);
        }

        debug!("Fetched {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }
}
