use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use moviepro_config::{HttpConfig, TmdbConfig};
use moviepro_model::{MovieCategory, TmdbId};

use super::build_http_client;
use super::payloads::{RawActorDetail, RawMovieDetail, RawMovieSummary, RawPage};
use super::traits::{CatalogProvider, ProviderError};

/// Upper bound on pages walked for a single category listing.
const MAX_CATEGORY_PAGES: u32 = 10;

#[derive(Debug, Clone, Serialize)]
struct DetailQuery<'a> {
    api_key: &'a str,
    language: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    append_to_response: Option<&'a str>,
}

#[derive(Debug, Clone, Serialize)]
struct PageQuery<'a> {
    api_key: &'a str,
    language: &'a str,
    page: u32,
}

/// TMDB v3 client over a plain reqwest connection pool.
pub struct TmdbProvider {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    language: String,
    append_to_response: String,
}

impl fmt::Debug for TmdbProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TmdbProvider")
            .field("base_url", &self.base_url)
            .field("language", &self.language)
            .finish()
    }
}

impl TmdbProvider {
    /// Fails with [`ProviderError::InvalidApiKey`] when no key is configured.
    pub fn new(tmdb: &TmdbConfig, http: &HttpConfig) -> Result<Self, ProviderError> {
        let api_key = tmdb
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ProviderError::InvalidApiKey)?;

        Ok(Self::with_client(build_http_client(http)?, api_key, tmdb))
    }

    pub fn with_client(http: reqwest::Client, api_key: String, tmdb: &TmdbConfig) -> Self {
        Self {
            http,
            api_key,
            base_url: tmdb.base_url.trim_end_matches('/').to_string(),
            language: tmdb.language.clone(),
            append_to_response: tmdb.append_to_response.clone(),
        }
    }

    async fn get_tmdb_json<Q, T>(&self, url: &str, query: &Q) -> Result<T, ProviderError>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.http.get(url).query(query).send().await?;

        let status = response.status();
        if status.is_success() {
            let body = response.bytes().await?;
            return serde_json::from_slice::<T>(&body)
                .map_err(|e| ProviderError::ParseError(e.to_string()));
        }

        #[derive(Debug, Deserialize)]
        struct TmdbErrorBody {
            #[serde(default)]
            status_message: Option<String>,
        }

        let message = response
            .json::<TmdbErrorBody>()
            .await
            .ok()
            .and_then(|body| body.status_message)
            .unwrap_or_else(|| format!("TMDB request failed with status {}", status));

        match status.as_u16() {
            401 => Err(ProviderError::InvalidApiKey),
            404 => Err(ProviderError::NotFound),
            429 => Err(ProviderError::RateLimited),
            _ => Err(ProviderError::ApiError(message)),
        }
    }
}

#[async_trait]
impl CatalogProvider for TmdbProvider {
    async fn movie_detail(&self, tmdb_id: TmdbId) -> Result<RawMovieDetail, ProviderError> {
        let query = DetailQuery {
            api_key: &self.api_key,
            language: &self.language,
            append_to_response: Some(self.append_to_response.as_str())
                .filter(|value| !value.is_empty()),
        };

        debug!(tmdb_id, "Fetching movie detail");
        self.get_tmdb_json(&format!("{}/movie/{tmdb_id}", self.base_url), &query)
            .await
    }

    async fn actor_detail(&self, person_id: TmdbId) -> Result<RawActorDetail, ProviderError> {
        let query = DetailQuery {
            api_key: &self.api_key,
            language: &self.language,
            append_to_response: None,
        };

        debug!(person_id, "Fetching person detail");
        self.get_tmdb_json(&format!("{}/person/{person_id}", self.base_url), &query)
            .await
    }

    async fn search_by_category(
        &self,
        category: MovieCategory,
        count: usize,
    ) -> Result<Vec<RawMovieSummary>, ProviderError> {
        let url = format!("{}/movie/{}", self.base_url, category.as_path());
        let mut movies = Vec::new();
        let mut page = 1;

        while movies.len() < count {
            let query = PageQuery {
                api_key: &self.api_key,
                language: &self.language,
                page,
            };
            let response: RawPage<RawMovieSummary> = self.get_tmdb_json(&url, &query).await?;
            let exhausted = response.results.is_empty() || page >= response.total_pages;
            movies.extend(response.results);

            if exhausted {
                break;
            }
            if page >= MAX_CATEGORY_PAGES {
                warn!(
                    category = category.as_path(),
                    count, "Category listing truncated at page limit"
                );
                break;
            }
            page += 1;
        }

        movies.truncate(count);
        Ok(movies)
    }
}
