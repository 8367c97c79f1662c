use std::fmt;
use std::sync::Arc;

use tracing::info;

use moviepro_model::{CollectionID, Movie, MovieID, MovieListing, MovieUpdate, NewMovieInput};

use crate::database::MovieRepository;
use crate::error::{CoreError, Result};
use crate::image::ImageService;

/// Hand-maintained movie records: creation with uploads, edits, removal
/// and the local library views.
#[derive(Clone)]
pub struct LibraryService {
    movies: Arc<dyn MovieRepository>,
    images: ImageService,
}

impl fmt::Debug for LibraryService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LibraryService").finish_non_exhaustive()
    }
}

impl LibraryService {
    pub fn new(movies: Arc<dyn MovieRepository>, images: ImageService) -> Self {
        Self { movies, images }
    }

    /// Creates a movie and appends it to `collection_id` atomically.
    pub async fn create_movie(
        &self,
        input: NewMovieInput,
        collection_id: CollectionID,
    ) -> Result<MovieID> {
        input.validate()?;
        if let Some(tmdb_id) = input.tmdb_id
            && let Some(existing) = self.movies.find_by_tmdb_id(tmdb_id).await?
        {
            return Err(CoreError::Conflict(format!(
                "TMDB movie {tmdb_id} is already in the library as {existing}"
            )));
        }

        let movie = Movie {
            id: MovieID::new(),
            tmdb_id: input.tmdb_id,
            title: input.title.trim().to_string(),
            tagline: input.tagline,
            overview: input.overview,
            runtime: input.runtime,
            release_date: input.release_date,
            vote_average: input.vote_average,
            rating: input.rating,
            trailer_url: input.trailer_url,
            poster: self.images.encode_upload(input.poster.as_ref()),
            backdrop: self.images.encode_upload(input.backdrop.as_ref()),
            cast: Vec::new(),
            crew: Vec::new(),
        };

        self.movies
            .insert_movie_with_membership(&movie, collection_id)
            .await?;
        info!(movie_id = %movie.id, title = %movie.title, "Created movie");
        Ok(movie.id)
    }

    /// Replaces the editable fields. Images are only replaced when a new
    /// upload is supplied.
    pub async fn update_movie(&self, id: MovieID, update: MovieUpdate) -> Result<Movie> {
        update.validate()?;
        let current = self.movie_details(id).await?;

        let poster = self
            .images
            .encode_upload(update.poster.as_ref())
            .or(current.poster);
        let backdrop = self
            .images
            .encode_upload(update.backdrop.as_ref())
            .or(current.backdrop);

        let movie = Movie {
            id,
            tmdb_id: update.tmdb_id,
            title: update.title.trim().to_string(),
            tagline: update.tagline,
            overview: update.overview,
            runtime: update.runtime,
            release_date: update.release_date,
            vote_average: update.vote_average,
            rating: update.rating,
            trailer_url: update.trailer_url,
            poster,
            backdrop,
            cast: current.cast,
            crew: current.crew,
        };

        self.movies.update(&movie).await?;
        info!(movie_id = %id, "Updated movie");
        Ok(movie)
    }

    /// Removes the movie with its credits and collection memberships.
    pub async fn delete_movie(&self, id: MovieID) -> Result<()> {
        if !self.movies.delete(id).await? {
            return Err(CoreError::NotFound(format!("Movie {id}")));
        }
        info!(movie_id = %id, "Deleted movie");
        Ok(())
    }

    pub async fn movie_details(&self, id: MovieID) -> Result<Movie> {
        self.movies
            .get(id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Movie {id}")))
    }

    pub async fn library(&self) -> Result<Vec<MovieListing>> {
        self.movies.list().await
    }
}
