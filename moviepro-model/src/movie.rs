use chrono::NaiveDate;
use url::Url;

use crate::error::{ModelError, Result};
use crate::ids::{MovieID, TmdbId};
use crate::rating::MovieRating;

/// Maximum number of cast and crew credits kept per movie.
pub const MAX_CREDITS: usize = 20;

const MAX_TITLE_LEN: usize = 200;

/// Binary image payload together with the media type it was served as.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageContent {
    pub bytes: Vec<u8>,
    pub media_type: String,
}

impl std::fmt::Debug for ImageContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageContent")
            .field("len", &self.bytes.len())
            .field("media_type", &self.media_type)
            .finish()
    }
}

/// A locally persisted movie.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Movie {
    pub id: MovieID,
    /// `None` for movies entered by hand rather than imported.
    pub tmdb_id: Option<TmdbId>,
    pub title: String,
    pub tagline: String,
    pub overview: String,
    pub runtime: Option<u32>,
    pub release_date: NaiveDate,
    pub vote_average: f32,
    pub rating: MovieRating,
    pub trailer_url: Option<String>,
    pub poster: Option<ImageContent>,
    pub backdrop: Option<ImageContent>,
    pub cast: Vec<MovieCast>,
    pub crew: Vec<MovieCrew>,
}

impl Movie {
    pub fn listing(&self) -> MovieListing {
        MovieListing {
            id: self.id,
            tmdb_id: self.tmdb_id,
            title: self.title.clone(),
            release_date: self.release_date,
            rating: self.rating,
            vote_average: self.vote_average,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovieCast {
    /// Upstream person id.
    pub cast_id: TmdbId,
    pub name: String,
    pub character: String,
    pub department: String,
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovieCrew {
    /// Upstream person id.
    pub crew_id: TmdbId,
    pub name: String,
    pub job: String,
    pub department: String,
    pub image_url: String,
}

/// Lightweight projection used for library and collection listings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovieListing {
    pub id: MovieID,
    pub tmdb_id: Option<TmdbId>,
    pub title: String,
    pub release_date: NaiveDate,
    pub rating: MovieRating,
    pub vote_average: f32,
}

/// An image submitted by a user, as received from the upload layer.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Input for creating a movie by hand.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NewMovieInput {
    pub tmdb_id: Option<TmdbId>,
    pub title: String,
    pub tagline: String,
    pub overview: String,
    pub runtime: Option<u32>,
    pub release_date: NaiveDate,
    pub vote_average: f32,
    pub rating: MovieRating,
    pub trailer_url: Option<String>,
    pub poster: Option<ImageUpload>,
    pub backdrop: Option<ImageUpload>,
}

impl NewMovieInput {
    pub fn validate(&self) -> Result<()> {
        validate_title(&self.title)?;
        validate_vote_average(self.vote_average)?;
        validate_trailer(self.trailer_url.as_deref())
    }
}

/// Input for editing an existing movie.
///
/// Uploads replace the stored image only when present; `None` keeps the
/// current image.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovieUpdate {
    pub tmdb_id: Option<TmdbId>,
    pub title: String,
    pub tagline: String,
    pub overview: String,
    pub runtime: Option<u32>,
    pub release_date: NaiveDate,
    pub vote_average: f32,
    pub rating: MovieRating,
    pub trailer_url: Option<String>,
    pub poster: Option<ImageUpload>,
    pub backdrop: Option<ImageUpload>,
}

impl MovieUpdate {
    pub fn validate(&self) -> Result<()> {
        validate_title(&self.title)?;
        validate_vote_average(self.vote_average)?;
        validate_trailer(self.trailer_url.as_deref())
    }
}

fn validate_title(title: &str) -> Result<()> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ModelError::invalid_field("title", "must not be blank"));
    }
    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Err(ModelError::invalid_field(
            "title",
            format!("must be at most {MAX_TITLE_LEN} characters"),
        ));
    }
    Ok(())
}

fn validate_vote_average(vote_average: f32) -> Result<()> {
    if !(0.0..=10.0).contains(&vote_average) {
        return Err(ModelError::invalid_field(
            "vote_average",
            "must be between 0 and 10",
        ));
    }
    Ok(())
}

fn validate_trailer(trailer_url: Option<&str>) -> Result<()> {
    let Some(raw) = trailer_url else {
        return Ok(());
    };
    match Url::parse(raw.trim()) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => Ok(()),
        _ => Err(ModelError::invalid_field(
            "trailer_url",
            "must be an http(s) URL",
        )),
    }
}
