pub mod error;

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info};
use url::Url;

use crate::constants::DEFAULT_CONFIG_FILE;
use crate::models::sources::{EnvConfig, FileConfig};
use crate::models::{Config, DatabaseConfig, DefaultCollectionConfig, HttpConfig, LibraryConfig, TmdbConfig};
use crate::util::trim_trailing_slash;

use error::ConfigLoadError;

/// Result of a successful load: the effective config and the file it came
/// from, if any.
#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub source_file: Option<PathBuf>,
}

/// Layers built-in defaults, an optional TOML file, `.env` and the process
/// environment, in increasing order of precedence.
#[derive(Debug, Default, Clone)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    env_file: Option<PathBuf>,
    skip_dotenv: bool,
    env: Option<EnvConfig>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit TOML file; it must exist.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn with_env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = Some(path.into());
        self
    }

    pub fn without_dotenv(mut self) -> Self {
        self.skip_dotenv = true;
        self
    }

    /// Replace the process environment with a prepared view.
    pub fn with_env(mut self, env: EnvConfig) -> Self {
        self.env = Some(env);
        self
    }

    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        if !self.skip_dotenv {
            self.load_dotenv()?;
        }

        let env = self.env.clone().unwrap_or_else(EnvConfig::gather);

        let (file, source_file) = self.read_file(&env)?;
        let config = merge(file, &env);
        validate(&config)?;

        match &source_file {
            Some(path) => info!("Loaded configuration from {}", path.display()),
            None => info!("No config file found; using defaults and environment"),
        }

        Ok(ConfigLoad {
            config,
            source_file,
        })
    }

    fn load_dotenv(&self) -> Result<(), ConfigLoadError> {
        let result = match &self.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| ()),
            None => dotenvy::dotenv().map(|_| ()),
        };

        match result {
            Ok(()) => Ok(()),
            Err(err) if err.not_found() => {
                debug!("No .env file present");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    fn read_file(
        &self,
        env: &EnvConfig,
    ) -> Result<(FileConfig, Option<PathBuf>), ConfigLoadError> {
        let explicit = self
            .config_path
            .clone()
            .or_else(|| env.config_path.as_ref().map(PathBuf::from));

        let path = match explicit {
            Some(path) => path,
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.exists() {
                    return Ok((FileConfig::default(), None));
                }
                fallback
            }
        };

        let file = parse_file(&path)?;
        Ok((file, Some(path)))
    }
}

fn parse_file(path: &Path) -> Result<FileConfig, ConfigLoadError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigLoadError::FileIo {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| ConfigLoadError::FileParse {
        path: path.to_path_buf(),
        source,
    })
}

fn merge(file: FileConfig, env: &EnvConfig) -> Config {
    let defaults = Config::default();

    let tmdb = TmdbConfig {
        api_key: env.tmdb_api_key.clone().or(file.tmdb.api_key),
        base_url: trim_trailing_slash(
            &env.tmdb_base_url
                .clone()
                .or(file.tmdb.base_url)
                .unwrap_or(defaults.tmdb.base_url),
        ),
        image_base: trim_trailing_slash(
            &env.tmdb_image_base
                .clone()
                .or(file.tmdb.image_base)
                .unwrap_or(defaults.tmdb.image_base),
        ),
        youtube_base: env
            .tmdb_youtube_base
            .clone()
            .or(file.tmdb.youtube_base)
            .unwrap_or(defaults.tmdb.youtube_base),
        language: env
            .tmdb_language
            .clone()
            .or(file.tmdb.language)
            .unwrap_or(defaults.tmdb.language),
        append_to_response: file
            .tmdb
            .append_to_response
            .unwrap_or(defaults.tmdb.append_to_response),
    };

    let library = LibraryConfig {
        poster_size: env
            .poster_size
            .clone()
            .or(file.library.poster_size)
            .unwrap_or(defaults.library.poster_size),
        backdrop_size: env
            .backdrop_size
            .clone()
            .or(file.library.backdrop_size)
            .unwrap_or(defaults.library.backdrop_size),
        default_cast_image: env
            .default_cast_image
            .clone()
            .or(file.library.default_cast_image)
            .unwrap_or(defaults.library.default_cast_image),
        default_collection: DefaultCollectionConfig {
            name: env
                .default_collection_name
                .clone()
                .or(file.library.default_collection.name)
                .unwrap_or(defaults.library.default_collection.name),
            description: env
                .default_collection_description
                .clone()
                .or(file.library.default_collection.description)
                .unwrap_or(defaults.library.default_collection.description),
        },
    };

    let database = DatabaseConfig {
        url: env.database_url.clone().or(file.database.url),
        max_connections: env
            .database_max_connections
            .or(file.database.max_connections)
            .unwrap_or(defaults.database.max_connections),
    };

    let http = HttpConfig {
        timeout: env
            .http_timeout_secs
            .or(file.http.timeout_secs)
            .map(Duration::from_secs)
            .unwrap_or(defaults.http.timeout),
        user_agent: file.http.user_agent.unwrap_or(defaults.http.user_agent),
    };

    Config {
        tmdb,
        library,
        database,
        http,
    }
}

fn validate(config: &Config) -> Result<(), ConfigLoadError> {
    for (field, value) in [
        ("tmdb.base_url", &config.tmdb.base_url),
        ("tmdb.image_base", &config.tmdb.image_base),
        ("tmdb.youtube_base", &config.tmdb.youtube_base),
    ] {
        Url::parse(value).map_err(|source| ConfigLoadError::InvalidUrl { field, source })?;
    }

    if let Some(url) = &config.database.url {
        Url::parse(url).map_err(|source| ConfigLoadError::InvalidUrl {
            field: "database.url",
            source,
        })?;
    }

    for (field, value) in [
        ("library.poster_size", &config.library.poster_size),
        ("library.backdrop_size", &config.library.backdrop_size),
        (
            "library.default_collection.name",
            &config.library.default_collection.name,
        ),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigLoadError::Blank { field });
        }
    }

    if config.database.max_connections == 0 {
        return Err(ConfigLoadError::Zero {
            field: "database.max_connections",
        });
    }
    if config.http.timeout.is_zero() {
        return Err(ConfigLoadError::Zero {
            field: "http.timeout_secs",
        });
    }

    Ok(())
}
