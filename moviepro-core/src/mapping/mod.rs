//! Conversion of raw catalog payloads into domain records.

pub mod credits;
pub mod dates;
pub mod resolvers;

use thiserror::Error;
use tracing::debug;

use moviepro_config::Config;
use moviepro_model::{ActorDetail, Movie, MovieID, NOT_AVAILABLE};

use crate::error::CoreError;
use crate::image::ImageService;
use crate::providers::{RawActorDetail, RawMovieDetail};

use credits::{cast_image_url, select_cast, select_crew};
use dates::{display_date, parse_catalog_date};
use resolvers::{resolve_rating, resolve_trailer};

#[derive(Debug, Error)]
pub enum MappingError {
    #[error("invalid release date {value:?}")]
    InvalidReleaseDate { value: String },

    #[error("invalid birthday {value:?}")]
    InvalidBirthday { value: String },

    #[error("failed to fetch {kind} image")]
    Image {
        kind: &'static str,
        #[source]
        source: CoreError,
    },
}

impl From<MappingError> for CoreError {
    fn from(err: MappingError) -> Self {
        match err {
            MappingError::Image { source, .. } => source,
            other => CoreError::Validation(other.to_string()),
        }
    }
}

/// Image and link settings the mapper needs from [`Config`].
#[derive(Debug, Clone)]
pub struct MappingSettings {
    pub image_base: String,
    pub youtube_base: String,
    pub poster_size: String,
    pub backdrop_size: String,
    pub default_cast_image: String,
}

impl MappingSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            image_base: config.tmdb.image_base.clone(),
            youtube_base: config.tmdb.youtube_base.clone(),
            poster_size: config.library.poster_size.clone(),
            backdrop_size: config.library.backdrop_size.clone(),
            default_cast_image: config.library.default_cast_image.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MovieMapper {
    settings: MappingSettings,
    images: ImageService,
}

impl MovieMapper {
    pub fn new(settings: MappingSettings, images: ImageService) -> Self {
        Self { settings, images }
    }

    pub fn settings(&self) -> &MappingSettings {
        &self.settings
    }

    /// Builds a new, not yet persisted movie from a catalog record.
    ///
    /// Rating, trailer and images fall back softly; an unparseable release
    /// date or a failed image download aborts the whole mapping.
    pub async fn map_movie_detail(&self, raw: &RawMovieDetail) -> Result<Movie, MappingError> {
        let raw_date = raw.release_date.clone().unwrap_or_default();
        let release_date = parse_catalog_date(&raw_date)
            .ok_or(MappingError::InvalidReleaseDate { value: raw_date })?;

        let poster = self.images.fetch_catalog_image(
            &self.settings.image_base,
            &self.settings.poster_size,
            raw.poster_path.as_deref(),
        );
        let backdrop = self.images.fetch_catalog_image(
            &self.settings.image_base,
            &self.settings.backdrop_size,
            raw.backdrop_path.as_deref(),
        );
        let (poster, backdrop) = tokio::join!(poster, backdrop);
        let poster = poster.map_err(|source| MappingError::Image {
            kind: "poster",
            source,
        })?;
        let backdrop = backdrop.map_err(|source| MappingError::Image {
            kind: "backdrop",
            source,
        })?;

        let cast = select_cast(&self.settings, &raw.credits.cast);
        let crew = select_crew(&self.settings, &raw.credits.crew);
        debug!(
            tmdb_id = raw.id,
            cast = cast.len(),
            crew = crew.len(),
            "Mapped catalog movie"
        );

        Ok(Movie {
            id: MovieID::new(),
            tmdb_id: Some(raw.id),
            title: raw.title.clone(),
            tagline: raw.tagline.clone().unwrap_or_default(),
            overview: raw.overview.clone().unwrap_or_default(),
            runtime: raw.runtime,
            release_date,
            vote_average: raw.vote_average,
            rating: resolve_rating(raw.id, &raw.release_dates),
            trailer_url: resolve_trailer(&self.settings.youtube_base, &raw.videos.results),
            poster,
            backdrop,
            cast,
            crew,
        })
    }

    pub fn map_actor_detail(&self, raw: &RawActorDetail) -> Result<ActorDetail, MappingError> {
        let birthday = match raw.birthday.as_deref().map(str::trim) {
            None | Some("") => NOT_AVAILABLE.to_string(),
            Some(value) => parse_catalog_date(value)
                .map(display_date)
                .ok_or_else(|| MappingError::InvalidBirthday {
                    value: value.to_string(),
                })?,
        };

        Ok(ActorDetail {
            id: raw.id,
            name: raw.name.clone(),
            biography: or_not_available(raw.biography.as_deref()),
            birthday,
            deathday: raw
                .deathday
                .as_deref()
                .and_then(parse_catalog_date)
                .map(display_date),
            place_of_birth: or_not_available(raw.place_of_birth.as_deref()),
            profile_url: cast_image_url(&self.settings, raw.profile_path.as_deref()),
            known_for_department: raw.known_for_department.clone(),
            also_known_as: raw.also_known_as.clone(),
            popularity: raw.popularity,
            imdb_id: raw.imdb_id.clone().filter(|id| !id.is_empty()),
            homepage: raw.homepage.clone().filter(|url| !url.is_empty()),
            gender: raw.gender,
        })
    }
}

fn or_not_available(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use mockall::predicate::eq;

    use moviepro_model::MovieRating;

    use super::*;
    use crate::image::MockBinaryFetcher;

    const MATRIX: &str = r#"{
        "id": 603,
        "title": "The Matrix",
        "tagline": "Welcome to the Real World.",
        "overview": "Set in the 22nd century...",
        "runtime": 136,
        "vote_average": 8.2,
        "release_date": "1999-03-30",
        "poster_path": "/poster.jpg",
        "backdrop_path": "",
        "credits": {
            "cast": [
                {"id": 6384, "cast_id": 34, "name": "Keanu Reeves", "character": "Neo", "known_for_department": "Acting", "profile_path": "/keanu.jpg", "popularity": 40.1},
                {"id": 2975, "cast_id": 35, "name": "Laurence Fishburne", "character": "Morpheus", "known_for_department": "Acting", "profile_path": null, "popularity": 21.3}
            ],
            "crew": [
                {"id": 9339, "name": "Lilly Wachowski", "job": "Director", "department": "Directing", "popularity": 3.1}
            ]
        },
        "videos": {"results": [
            {"key": "m8e-FF8MsqU", "site": "YouTube", "type": "Trailer", "name": "Trailer 1"}
        ]},
        "release_dates": {"results": [
            {"iso_3166_1": "DE", "release_dates": [{"certification": "16"}]},
            {"iso_3166_1": "US", "release_dates": [{"certification": ""}, {"certification": "R"}]}
        ]}
    }"#;

    fn settings() -> MappingSettings {
        MappingSettings::from_config(&Config::default())
    }

    fn mapper(fetcher: MockBinaryFetcher) -> MovieMapper {
        MovieMapper::new(settings(), ImageService::new(Arc::new(fetcher)))
    }

    fn matrix() -> RawMovieDetail {
        serde_json::from_str(MATRIX).expect("fixture")
    }

    #[tokio::test]
    async fn maps_full_catalog_record() {
        let mut fetcher = MockBinaryFetcher::new();
        fetcher
            .expect_fetch_binary()
            .with(eq("https://image.tmdb.org/t/p/w500/poster.jpg"))
            .times(1)
            .returning(|_| Ok(vec![0xFF, 0xD8]));

        let movie = mapper(fetcher)
            .map_movie_detail(&matrix())
            .await
            .expect("mapped");

        assert_eq!(movie.tmdb_id, Some(603));
        assert_eq!(movie.title, "The Matrix");
        assert_eq!(movie.runtime, Some(136));
        assert_eq!(
            movie.release_date,
            NaiveDate::from_ymd_opt(1999, 3, 30).unwrap()
        );
        assert_eq!(movie.rating, MovieRating::R);
        assert_eq!(
            movie.trailer_url.as_deref(),
            Some("https://www.youtube.com/watch?v=m8e-FF8MsqU")
        );

        let poster = movie.poster.expect("poster");
        assert_eq!(poster.media_type, "image/jpg");
        assert!(movie.backdrop.is_none());

        assert_eq!(movie.cast.len(), 2);
        assert_eq!(movie.cast[0].name, "Keanu Reeves");
        assert_eq!(
            movie.cast[0].image_url,
            "https://image.tmdb.org/t/p/w500/keanu.jpg"
        );
        assert_eq!(movie.cast[1].image_url, "/images/default-cast.png");
        assert_eq!(movie.crew[0].job, "Director");
    }

    #[tokio::test]
    async fn bad_release_date_aborts_mapping() {
        let mut fetcher = MockBinaryFetcher::new();
        fetcher.expect_fetch_binary().never();

        let mut raw = matrix();
        raw.release_date = Some("March 1999".into());
        let err = mapper(fetcher).map_movie_detail(&raw).await.unwrap_err();
        assert!(matches!(err, MappingError::InvalidReleaseDate { ref value } if value == "March 1999"));
        assert!(matches!(CoreError::from(err), CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn missing_release_date_aborts_mapping() {
        let mut raw = matrix();
        raw.release_date = None;
        let err = mapper(MockBinaryFetcher::new())
            .map_movie_detail(&raw)
            .await
            .unwrap_err();
        assert!(matches!(err, MappingError::InvalidReleaseDate { .. }));
    }

    #[tokio::test]
    async fn image_failure_keeps_its_error_kind() {
        let mut fetcher = MockBinaryFetcher::new();
        fetcher
            .expect_fetch_binary()
            .returning(|_| Err(CoreError::NotFound("image".into())));

        let err = mapper(fetcher).map_movie_detail(&matrix()).await.unwrap_err();
        assert!(matches!(err, MappingError::Image { kind: "poster", .. }));
        assert!(matches!(CoreError::from(err), CoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn no_image_paths_means_no_downloads() {
        let mut fetcher = MockBinaryFetcher::new();
        fetcher.expect_fetch_binary().never();

        let mut raw = matrix();
        raw.poster_path = None;
        let movie = mapper(fetcher).map_movie_detail(&raw).await.expect("mapped");
        assert!(movie.poster.is_none());
        assert!(movie.backdrop.is_none());
    }

    fn actor(birthday: Option<&str>) -> RawActorDetail {
        RawActorDetail {
            id: 6384,
            name: "Keanu Reeves".into(),
            biography: Some(String::new()),
            birthday: birthday.map(str::to_string),
            place_of_birth: None,
            profile_path: Some("/keanu.jpg".into()),
            also_known_as: vec!["Киану Ривз".into()],
            popularity: 40.1,
            gender: 2,
            ..RawActorDetail::default()
        }
    }

    #[test]
    fn actor_fields_fall_back_to_not_available() {
        let detail = mapper(MockBinaryFetcher::new())
            .map_actor_detail(&actor(Some("1964-09-02")))
            .expect("mapped");

        assert_eq!(detail.birthday, "Sep 02, 1964");
        assert_eq!(detail.biography, NOT_AVAILABLE);
        assert_eq!(detail.place_of_birth, NOT_AVAILABLE);
        assert_eq!(detail.profile_url, "https://image.tmdb.org/t/p/w500/keanu.jpg");
        assert_eq!(detail.also_known_as.len(), 1);

        let unknown = mapper(MockBinaryFetcher::new())
            .map_actor_detail(&actor(None))
            .expect("mapped");
        assert_eq!(unknown.birthday, NOT_AVAILABLE);
    }

    #[test]
    fn unparseable_birthday_is_an_error() {
        let err = mapper(MockBinaryFetcher::new())
            .map_actor_detail(&actor(Some("sometime in 1964")))
            .unwrap_err();
        assert!(matches!(err, MappingError::InvalidBirthday { .. }));
    }
}
