use serde::{Deserialize, Serialize};

use crate::util::parse_number;

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    #[serde(default)]
    pub tmdb: FileTmdbConfig,
    #[serde(default)]
    pub library: FileLibraryConfig,
    #[serde(default)]
    pub database: FileDatabaseConfig,
    #[serde(default)]
    pub http: FileHttpConfig,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileTmdbConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_base: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube_base: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub append_to_response: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileLibraryConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backdrop_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_cast_image: Option<String>,
    #[serde(default)]
    pub default_collection: FileDefaultCollectionConfig,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileDefaultCollectionConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileDatabaseConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<u32>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileHttpConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

/// Environment-derived configuration values.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<String>,
    pub tmdb_api_key: Option<String>,
    pub tmdb_base_url: Option<String>,
    pub tmdb_image_base: Option<String>,
    pub tmdb_youtube_base: Option<String>,
    pub tmdb_language: Option<String>,
    pub poster_size: Option<String>,
    pub backdrop_size: Option<String>,
    pub default_cast_image: Option<String>,
    pub default_collection_name: Option<String>,
    pub default_collection_description: Option<String>,
    pub database_url: Option<String>,
    pub database_max_connections: Option<u32>,
    pub http_timeout_secs: Option<u64>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the environment view from an arbitrary lookup, which keeps
    /// tests independent of the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            config_path: var(crate::constants::CONFIG_PATH_VAR),
            tmdb_api_key: var("TMDB_API_KEY"),
            tmdb_base_url: var("TMDB_BASE_URL"),
            tmdb_image_base: var("TMDB_IMAGE_BASE"),
            tmdb_youtube_base: var("TMDB_YOUTUBE_BASE"),
            tmdb_language: var("TMDB_LANGUAGE"),
            poster_size: var("DEFAULT_POSTER_SIZE"),
            backdrop_size: var("DEFAULT_BACKDROP_SIZE"),
            default_cast_image: var("DEFAULT_CAST_IMAGE"),
            default_collection_name: var("DEFAULT_COLLECTION_NAME"),
            default_collection_description: var("DEFAULT_COLLECTION_DESCRIPTION"),
            database_url: var("DATABASE_URL"),
            database_max_connections: var("DATABASE_MAX_CONNECTIONS")
                .and_then(|raw| parse_number(&raw)),
            http_timeout_secs: var("HTTP_TIMEOUT_SECS").and_then(|raw| parse_number(&raw)),
        }
    }
}
