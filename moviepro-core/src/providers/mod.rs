pub mod payloads;
pub mod tmdb;
pub mod traits;

pub use payloads::{
    RawActorDetail, RawCast, RawCountryReleases, RawCredits, RawCrew, RawMovieDetail,
    RawMovieSummary, RawReleaseDate, RawReleaseDates, RawVideo, RawVideos,
};
pub use tmdb::TmdbProvider;
pub use traits::{CatalogProvider, ProviderError};

#[cfg(test)]
pub use traits::MockCatalogProvider;

use moviepro_config::HttpConfig;

/// HTTP client shared by the catalog provider and the image fetcher.
pub fn build_http_client(http: &HttpConfig) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(http.timeout)
        .user_agent(http.user_agent.clone())
        .build()
}
