use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file {path}")]
    FileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}")]
    FileParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid URL for `{field}`")]
    InvalidUrl {
        field: &'static str,
        #[source]
        source: url::ParseError,
    },
    #[error("`{field}` must not be blank")]
    Blank { field: &'static str },
    #[error("`{field}` must be greater than zero")]
    Zero { field: &'static str },
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}
