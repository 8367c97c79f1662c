use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use crate::error::{CoreError, Result};

/// Fetches raw bytes from an absolute URL.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BinaryFetcher: Send + Sync {
    async fn fetch_binary(&self, url: &str) -> Result<Vec<u8>>;
}

#[derive(Debug, Clone)]
pub struct HttpBinaryFetcher {
    client: reqwest::Client,
}

impl HttpBinaryFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BinaryFetcher for HttpBinaryFetcher {
    async fn fetch_binary(&self, url: &str) -> Result<Vec<u8>> {
        debug!(url, "Fetching image");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CoreError::Transient(format!("Image request failed for {url}: {e}")))?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND => {
                return Err(CoreError::NotFound(format!("Image {url}")));
            }
            status => {
                return Err(CoreError::Transient(format!(
                    "Image request for {url} returned {status}"
                )));
            }
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CoreError::Transient(format!("Image body read failed for {url}: {e}")))?;
        Ok(bytes.to_vec())
    }
}
