use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use moviepro_model::{Movie, MovieID, TmdbId};

use crate::collections::CollectionService;
use crate::database::MovieRepository;
use crate::error::{CoreError, Result};
use crate::mapping::MovieMapper;
use crate::providers::CatalogProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    /// The movie was already in the library.
    Existing(MovieID),
    Imported(MovieID),
}

impl ImportOutcome {
    pub fn movie_id(&self) -> MovieID {
        match self {
            ImportOutcome::Existing(id) | ImportOutcome::Imported(id) => *id,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, ImportOutcome::Imported(_))
    }
}

/// Fetches, maps and persists catalog movies.
#[derive(Clone)]
pub struct ImportService {
    catalog: Arc<dyn CatalogProvider>,
    mapper: MovieMapper,
    movies: Arc<dyn MovieRepository>,
    collections: CollectionService,
    deadline: Duration,
}

impl fmt::Debug for ImportService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportService")
            .field("deadline", &self.deadline)
            .finish_non_exhaustive()
    }
}

impl ImportService {
    /// `deadline` bounds the fetch and mapping phase of a single import.
    pub fn new(
        catalog: Arc<dyn CatalogProvider>,
        mapper: MovieMapper,
        movies: Arc<dyn MovieRepository>,
        collections: CollectionService,
        deadline: Duration,
    ) -> Self {
        Self {
            catalog,
            mapper,
            movies,
            collections,
            deadline,
        }
    }

    /// Imports the catalog movie `tmdb_id` into the default collection.
    ///
    /// Repeated and concurrent imports of the same id resolve to the single
    /// stored movie. Cancellation or the deadline abort before anything is
    /// written.
    pub async fn import_movie(
        &self,
        tmdb_id: TmdbId,
        cancel: &CancellationToken,
    ) -> Result<ImportOutcome> {
        if let Some(id) = self.movies.find_by_tmdb_id(tmdb_id).await? {
            debug!(tmdb_id, movie_id = %id, "Movie already imported");
            return Ok(ImportOutcome::Existing(id));
        }

        let movie = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!(tmdb_id, "Import cancelled");
                return Err(CoreError::Cancelled(format!("Import of TMDB movie {tmdb_id}")));
            }
            result = tokio::time::timeout(self.deadline, self.fetch_and_map(tmdb_id)) => match result {
                Ok(movie) => movie?,
                Err(_) => {
                    warn!(tmdb_id, deadline = ?self.deadline, "Import timed out");
                    return Err(CoreError::Cancelled(format!(
                        "Import of TMDB movie {tmdb_id} exceeded {:?}",
                        self.deadline
                    )));
                }
            },
        };

        if cancel.is_cancelled() {
            return Err(CoreError::Cancelled(format!("Import of TMDB movie {tmdb_id}")));
        }

        let default = self.collections.ensure_default_collection().await?;
        match self
            .movies
            .insert_movie_with_membership(&movie, default.id)
            .await
        {
            Ok(()) => {
                info!(
                    tmdb_id,
                    movie_id = %movie.id,
                    title = %movie.title,
                    cast = movie.cast.len(),
                    crew = movie.crew.len(),
                    "Imported movie"
                );
                Ok(ImportOutcome::Imported(movie.id))
            }
            Err(CoreError::Conflict(reason)) => {
                // Another import of the same id committed first.
                match self.movies.find_by_tmdb_id(tmdb_id).await? {
                    Some(id) => {
                        debug!(tmdb_id, movie_id = %id, "Concurrent import won; reusing it");
                        Ok(ImportOutcome::Existing(id))
                    }
                    None => Err(CoreError::Conflict(reason)),
                }
            }
            Err(err) => Err(err),
        }
    }

    async fn fetch_and_map(&self, tmdb_id: TmdbId) -> Result<Movie> {
        let raw = self
            .catalog
            .movie_detail(tmdb_id)
            .await
            .map_err(|e| CoreError::from(e).context(format!("TMDB movie {tmdb_id}")))?;

        self.mapper.map_movie_detail(&raw).await.map_err(|err| {
            error!(tmdb_id, error = %err, "Failed to map catalog movie");
            CoreError::from(err)
        })
    }
}
