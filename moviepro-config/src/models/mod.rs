pub mod sources;

use std::time::Duration;

use crate::constants::*;

/// Effective configuration handed to every MoviePro component.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub tmdb: TmdbConfig,
    pub library: LibraryConfig,
    pub database: DatabaseConfig,
    pub http: HttpConfig,
}

/// Upstream catalog endpoints and query options.
#[derive(Clone)]
pub struct TmdbConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    /// Prefix for image paths, e.g. `https://image.tmdb.org/t/p`.
    pub image_base: String,
    /// Prefix the trailer key is appended to.
    pub youtube_base: String,
    pub language: String,
    pub append_to_response: String,
}

impl std::fmt::Debug for TmdbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("image_base", &self.image_base)
            .field("youtube_base", &self.youtube_base)
            .field("language", &self.language)
            .field("append_to_response", &self.append_to_response)
            .finish()
    }
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_TMDB_BASE_URL.to_string(),
            image_base: DEFAULT_TMDB_IMAGE_BASE.to_string(),
            youtube_base: DEFAULT_YOUTUBE_BASE.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            append_to_response: DEFAULT_APPEND_TO_RESPONSE.to_string(),
        }
    }
}

/// Library presentation defaults applied while mapping imports.
#[derive(Debug, Clone)]
pub struct LibraryConfig {
    pub poster_size: String,
    pub backdrop_size: String,
    /// Used for cast and crew members without a profile picture.
    pub default_cast_image: String,
    pub default_collection: DefaultCollectionConfig,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            poster_size: DEFAULT_POSTER_SIZE.to_string(),
            backdrop_size: DEFAULT_BACKDROP_SIZE.to_string(),
            default_cast_image: DEFAULT_CAST_IMAGE.to_string(),
            default_collection: DefaultCollectionConfig::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DefaultCollectionConfig {
    pub name: String,
    pub description: String,
}

impl Default for DefaultCollectionConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_COLLECTION_NAME.to_string(),
            description: DEFAULT_COLLECTION_DESCRIPTION.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}
