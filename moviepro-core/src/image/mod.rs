//! Image resolution and encoding.
//!
//! Catalog images are addressed as `<image base>/<size>/<relative path>`
//! and downloaded into [`ImageContent`]; local uploads and files are
//! wrapped the same way so the persistence layer only sees bytes plus a
//! media type.

pub mod fetcher;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use moviepro_model::{ImageContent, ImageUpload};

use crate::error::{CoreError, Result};

pub use fetcher::{BinaryFetcher, HttpBinaryFetcher};

#[cfg(test)]
pub use fetcher::MockBinaryFetcher;

const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// `image/<extension>` for a relative image path, or `None` when the path
/// is empty or has no extension.
pub fn image_media_type(path: &str) -> Option<String> {
    let path = path.trim();
    if path.is_empty() {
        return None;
    }
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(|ext| format!("image/{}", ext.to_ascii_lowercase()))
}

/// Absolute catalog URL for a relative image path.
pub fn build_image_url(image_base: &str, size: &str, path: &str) -> String {
    format!(
        "{}/{}/{}",
        image_base.trim_end_matches('/'),
        size.trim_matches('/'),
        path.trim_start_matches('/')
    )
}

#[derive(Clone)]
pub struct ImageService {
    fetcher: Arc<dyn BinaryFetcher>,
}

impl fmt::Debug for ImageService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageService").finish_non_exhaustive()
    }
}

impl ImageService {
    pub fn new(fetcher: Arc<dyn BinaryFetcher>) -> Self {
        Self { fetcher }
    }

    /// Downloads the bytes behind `url`. Failures propagate unchanged.
    pub async fn encode_url(&self, url: &str) -> Result<Vec<u8>> {
        self.fetcher.fetch_binary(url).await
    }

    /// Resolves and downloads a catalog image. An empty relative path yields
    /// no content.
    pub async fn fetch_catalog_image(
        &self,
        image_base: &str,
        size: &str,
        path: Option<&str>,
    ) -> Result<Option<ImageContent>> {
        let Some(path) = path.map(str::trim).filter(|p| !p.is_empty()) else {
            return Ok(None);
        };

        let bytes = self
            .encode_url(&build_image_url(image_base, size, path))
            .await?;
        let media_type =
            image_media_type(path).unwrap_or_else(|| FALLBACK_MEDIA_TYPE.to_string());
        Ok(Some(ImageContent { bytes, media_type }))
    }

    /// Wraps an upload as submitted. Empty uploads count as absent.
    pub fn encode_upload(&self, upload: Option<&ImageUpload>) -> Option<ImageContent> {
        let upload = upload.filter(|u| !u.bytes.is_empty())?;
        let media_type = Some(upload.content_type.trim())
            .filter(|ct| !ct.is_empty())
            .map(str::to_string)
            .or_else(|| image_media_type(&upload.file_name))
            .unwrap_or_else(|| FALLBACK_MEDIA_TYPE.to_string());

        Some(ImageContent {
            bytes: upload.bytes.clone(),
            media_type,
        })
    }

    pub async fn encode_file(&self, path: Option<&Path>) -> Result<Option<ImageContent>> {
        let Some(path) = path else {
            return Ok(None);
        };

        let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                CoreError::NotFound(format!("Image file {}", path.display()))
            }
            _ => CoreError::Internal(format!(
                "Failed to read image file {}: {e}",
                path.display()
            )),
        })?;

        let media_type = path
            .to_str()
            .and_then(image_media_type)
            .unwrap_or_else(|| FALLBACK_MEDIA_TYPE.to_string());
        Ok(Some(ImageContent { bytes, media_type }))
    }
}
