use async_trait::async_trait;

use moviepro_model::{MovieCategory, TmdbId};

use super::payloads::{RawActorDetail, RawMovieDetail, RawMovieSummary};
use crate::error::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Not found")]
    NotFound,

    #[error("Rate limited")]
    RateLimited,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    ParseError(String),
}

impl From<ProviderError> for CoreError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotFound => CoreError::NotFound("catalog entry".to_string()),
            ProviderError::RateLimited => CoreError::Transient(err.to_string()),
            ProviderError::NetworkError(inner) => {
                if inner.is_decode() {
                    CoreError::Validation(format!("Malformed catalog response: {inner}"))
                } else {
                    CoreError::Transient(format!("Catalog request failed: {inner}"))
                }
            }
            ProviderError::ParseError(msg) => {
                CoreError::Validation(format!("Malformed catalog response: {msg}"))
            }
            ProviderError::InvalidApiKey => CoreError::Internal(err.to_string()),
            ProviderError::ApiError(msg) => CoreError::Transient(msg),
        }
    }
}

/// Read-only access to the remote movie catalog.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Full record for one movie including credits, videos and release
    /// dates.
    async fn movie_detail(&self, tmdb_id: TmdbId) -> Result<RawMovieDetail, ProviderError>;

    async fn actor_detail(&self, person_id: TmdbId) -> Result<RawActorDetail, ProviderError>;

    /// Up to `count` summaries from one of the catalog's curated lists.
    async fn search_by_category(
        &self,
        category: MovieCategory,
        count: usize,
    ) -> Result<Vec<RawMovieSummary>, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_errors_map_onto_core_kinds() {
        assert!(matches!(
            CoreError::from(ProviderError::NotFound),
            CoreError::NotFound(_)
        ));
        assert!(CoreError::from(ProviderError::RateLimited).is_retryable());
        assert!(CoreError::from(ProviderError::ApiError("boom".into())).is_retryable());
        assert!(matches!(
            CoreError::from(ProviderError::ParseError("eof".into())),
            CoreError::Validation(_)
        ));
        assert!(!CoreError::from(ProviderError::InvalidApiKey).is_retryable());
    }
}
