use tracing::warn;

use moviepro_model::MovieRating;

use crate::providers::{RawReleaseDates, RawVideo};

const RATING_COUNTRY: &str = "US";

/// US certification for a movie, `NR` when absent or unrecognised.
pub fn resolve_rating(tmdb_id: u64, release_dates: &RawReleaseDates) -> MovieRating {
    let Some(certification) = release_dates
        .results
        .iter()
        .find(|country| country.iso_3166_1 == RATING_COUNTRY)
        .and_then(|country| {
            country
                .release_dates
                .iter()
                .map(|entry| entry.certification.trim())
                .find(|cert| !cert.is_empty())
        })
    else {
        return MovieRating::NR;
    };

    let normalized = certification.replace('-', "");
    normalized.parse().unwrap_or_else(|_| {
        warn!(tmdb_id, certification, "Unrecognised certification, using NR");
        MovieRating::NR
    })
}

/// Link to the first usable trailer, if any.
pub fn resolve_trailer(youtube_base: &str, videos: &[RawVideo]) -> Option<String> {
    videos
        .iter()
        .find(|video| {
            video.kind.trim().eq_ignore_ascii_case("trailer") && !video.key.trim().is_empty()
        })
        .map(|video| format!("{youtube_base}{}", video.key.trim()))
}
