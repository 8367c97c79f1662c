//! Raw catalog payloads, deserialized as served by TMDB v3.
//!
//! Nothing here is trusted: dates stay strings until the mapper parses
//! them, and every list defaults to empty when the field is absent.

use serde::{Deserialize, Serialize};

use moviepro_model::TmdbId;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawMovieDetail {
    pub id: TmdbId,
    pub title: String,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub vote_average: f32,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub credits: RawCredits,
    #[serde(default)]
    pub videos: RawVideos,
    #[serde(default)]
    pub release_dates: RawReleaseDates,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCredits {
    #[serde(default)]
    pub cast: Vec<RawCast>,
    #[serde(default)]
    pub crew: Vec<RawCrew>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCast {
    /// Person id.
    pub id: TmdbId,
    /// Credit slot id; one person can hold several.
    pub cast_id: u64,
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub known_for_department: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub popularity: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCrew {
    pub id: TmdbId,
    pub name: String,
    #[serde(default)]
    pub job: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub popularity: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawVideos {
    #[serde(default)]
    pub results: Vec<RawVideo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawVideo {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub site: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawReleaseDates {
    #[serde(default)]
    pub results: Vec<RawCountryReleases>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCountryReleases {
    pub iso_3166_1: String,
    #[serde(default)]
    pub release_dates: Vec<RawReleaseDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawReleaseDate {
    #[serde(default)]
    pub certification: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: u8,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawActorDetail {
    pub id: TmdbId,
    pub name: String,
    #[serde(default)]
    pub biography: Option<String>,
    #[serde(default)]
    pub birthday: Option<String>,
    #[serde(default)]
    pub deathday: Option<String>,
    #[serde(default)]
    pub place_of_birth: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub known_for_department: Option<String>,
    #[serde(default)]
    pub also_known_as: Vec<String>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub gender: u8,
}

/// Entry of a curated list such as `now_playing`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawMovieSummary {
    pub id: TmdbId,
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: f32,
    #[serde(default)]
    pub popularity: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPage<T> {
    pub page: u32,
    pub results: Vec<T>,
    pub total_pages: u32,
    pub total_results: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movie_detail_tolerates_missing_sections() {
        let raw: RawMovieDetail =
            serde_json::from_str(r#"{"id": 603, "title": "The Matrix"}"#).expect("parse");
        assert_eq!(raw.id, 603);
        assert!(raw.credits.cast.is_empty());
        assert!(raw.videos.results.is_empty());
        assert!(raw.release_dates.results.is_empty());
        assert!(raw.release_date.is_none());
    }

    #[test]
    fn video_and_release_type_fields_are_renamed() {
        let raw: RawMovieDetail = serde_json::from_str(
            r#"{
                "id": 1,
                "title": "x",
                "videos": {"results": [{"key": "abc", "site": "YouTube", "type": "Trailer", "name": "t"}]},
                "release_dates": {"results": [{"iso_3166_1": "US", "release_dates": [{"certification": "R", "type": 3}]}]}
            }"#,
        )
        .expect("parse");
        assert_eq!(raw.videos.results[0].kind, "Trailer");
        assert_eq!(raw.release_dates.results[0].release_dates[0].kind, 3);
    }
}
