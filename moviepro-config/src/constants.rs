pub const DEFAULT_CONFIG_FILE: &str = "moviepro.toml";
pub const CONFIG_PATH_VAR: &str = "MOVIEPRO_CONFIG";

pub const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p";
pub const DEFAULT_YOUTUBE_BASE: &str = "https://www.youtube.com/watch?v=";
pub const DEFAULT_LANGUAGE: &str = "en-US";
pub const DEFAULT_APPEND_TO_RESPONSE: &str = "videos,credits,images,release_dates";

pub const DEFAULT_POSTER_SIZE: &str = "w500";
pub const DEFAULT_BACKDROP_SIZE: &str = "original";
pub const DEFAULT_CAST_IMAGE: &str = "/images/default-cast.png";

pub const DEFAULT_COLLECTION_NAME: &str = "All";
pub const DEFAULT_COLLECTION_DESCRIPTION: &str =
    "All imported movies will automatically be assigned to the 'All' collection.";

pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_USER_AGENT: &str = concat!("moviepro/", env!("CARGO_PKG_VERSION"));
