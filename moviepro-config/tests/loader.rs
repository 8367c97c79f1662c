use std::collections::HashMap;
use std::fs;
use std::time::Duration;

use moviepro_config::{ConfigLoadError, ConfigLoader, EnvConfig};
use tempfile::tempdir;

fn env_from(pairs: &[(&str, &str)]) -> EnvConfig {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    EnvConfig::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn defaults_apply_without_file_or_env() {
    // The package directory the test runs in has no moviepro.toml.
    let load = ConfigLoader::new()
        .without_dotenv()
        .with_env(EnvConfig::default())
        .load()
        .expect("defaults load");
    assert!(load.source_file.is_none());

    let config = load.config;
    assert_eq!(config.library.default_collection.name, "All");
    assert_eq!(config.tmdb.image_base, "https://image.tmdb.org/t/p");
    assert_eq!(config.tmdb.youtube_base, "https://www.youtube.com/watch?v=");
    assert!(config.tmdb.api_key.is_none());
    assert_eq!(config.http.timeout, Duration::from_secs(15));
}

#[test]
fn file_values_override_defaults_and_env_overrides_file() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("moviepro.toml");
    fs::write(
        &path,
        r#"
[tmdb]
api_key = "from-file"
image_base = "https://images.example.test/t/p/"

[library]
poster_size = "w342"

[library.default_collection]
name = "Everything"

[database]
url = "postgres://movies@localhost/movies"
max_connections = 4

[http]
timeout_secs = 5
"#,
    )
    .expect("write config");

    let load = ConfigLoader::new()
        .without_dotenv()
        .with_config_path(&path)
        .with_env(env_from(&[
            ("TMDB_API_KEY", "from-env"),
            ("DEFAULT_BACKDROP_SIZE", "w1280"),
        ]))
        .load()
        .expect("load config");

    assert_eq!(load.source_file.as_deref(), Some(path.as_path()));
    let config = load.config;
    assert_eq!(config.tmdb.api_key.as_deref(), Some("from-env"));
    assert_eq!(config.tmdb.image_base, "https://images.example.test/t/p");
    assert_eq!(config.library.poster_size, "w342");
    assert_eq!(config.library.backdrop_size, "w1280");
    assert_eq!(config.library.default_collection.name, "Everything");
    assert_eq!(config.database.max_connections, 4);
    assert_eq!(config.http.timeout, Duration::from_secs(5));
}

#[test]
fn blank_env_values_are_ignored() {
    let load = ConfigLoader::new()
        .without_dotenv()
        .with_env(env_from(&[("DEFAULT_COLLECTION_NAME", "   ")]))
        .load()
        .expect("load");
    assert_eq!(load.config.library.default_collection.name, "All");
}

#[test]
fn invalid_urls_are_rejected() {
    let err = ConfigLoader::new()
        .without_dotenv()
        .with_env(env_from(&[("TMDB_BASE_URL", "not a url")]))
        .load()
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigLoadError::InvalidUrl {
            field: "tmdb.base_url",
            ..
        }
    ));
}

#[test]
fn missing_explicit_file_is_an_error() {
    let dir = tempdir().expect("tempdir");
    let err = ConfigLoader::new()
        .without_dotenv()
        .with_config_path(dir.path().join("nope.toml"))
        .with_env(EnvConfig::default())
        .load()
        .unwrap_err();
    assert!(matches!(err, ConfigLoadError::FileIo { .. }));
}

#[test]
fn malformed_file_is_reported_with_its_path() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[tmdb\napi_key = ").expect("write");

    let err = ConfigLoader::new()
        .without_dotenv()
        .with_config_path(&path)
        .with_env(EnvConfig::default())
        .load()
        .unwrap_err();
    match err {
        ConfigLoadError::FileParse { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn zero_timeout_is_rejected() {
    let err = ConfigLoader::new()
        .without_dotenv()
        .with_env(env_from(&[("HTTP_TIMEOUT_SECS", "0")]))
        .load()
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigLoadError::Zero {
            field: "http.timeout_secs"
        }
    ));
}
