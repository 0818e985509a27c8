//! Image byte source collaborator.
//!
//! The engine itself only sees raw bytes; resolving a locator (for this
//! service, a URL) into bytes is the caller layer's job, expressed through
//! [`ImageSource`] so tests can serve fixed bytes without a network.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Errors from fetching image bytes for a locator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("fetch from {url} failed: {reason}")]
    Transport { url: String, reason: String },
    #[error("fetch from {url} returned status {status}")]
    Status { url: String, status: u16 },
}

/// Supplies raw image bytes for a locator.
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn fetch(&self, locator: &str) -> Result<Bytes, FetchError>;
}

/// HTTP source backed by reqwest. One client, connection pooling included.
#[cfg(feature = "server")]
pub struct HttpImageSource {
    client: reqwest::Client,
}

#[cfg(feature = "server")]
impl HttpImageSource {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[cfg(feature = "server")]
impl Default for HttpImageSource {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "server")]
#[async_trait]
impl ImageSource for HttpImageSource {
    async fn fetch(&self, locator: &str) -> Result<Bytes, FetchError> {
        let response = self
            .client
            .get(locator)
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                url: locator.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: locator.to_string(),
                status: status.as_u16(),
            });
        }

        response.bytes().await.map_err(|e| FetchError::Transport {
            url: locator.to_string(),
            reason: e.to_string(),
        })
    }
}
