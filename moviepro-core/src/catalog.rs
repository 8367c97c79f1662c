use std::fmt;
use std::sync::Arc;

use tracing::error;

use moviepro_model::{ActorDetail, Movie, MovieCategory, TmdbId};

use crate::error::{CoreError, Result};
use crate::mapping::MovieMapper;
use crate::providers::{CatalogProvider, RawMovieSummary};

/// Read-only views of the remote catalog; nothing here is persisted.
#[derive(Clone)]
pub struct CatalogService {
    catalog: Arc<dyn CatalogProvider>,
    mapper: MovieMapper,
}

impl fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogService").finish_non_exhaustive()
    }
}

impl CatalogService {
    pub fn new(catalog: Arc<dyn CatalogProvider>, mapper: MovieMapper) -> Self {
        Self { catalog, mapper }
    }

    /// Preview of a catalog movie, mapped exactly as an import would.
    pub async fn remote_movie_details(&self, tmdb_id: TmdbId) -> Result<Movie> {
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

    pub async fn actor_details(&self, person_id: TmdbId) -> Result<ActorDetail> {
        let raw = self
            .catalog
            .actor_detail(person_id)
            .await
            .map_err(|e| CoreError::from(e).context(format!("TMDB person {person_id}")))?;

        self.mapper.map_actor_detail(&raw).map_err(|err| {
            error!(person_id, error = %err, "Failed to map catalog person");
            CoreError::from(err)
        })
    }

    pub async fn browse(
        &self,
        category: MovieCategory,
        count: usize,
    ) -> Result<Vec<RawMovieSummary>> {
        let mut movies = self
            .catalog
            .search_by_category(category, count)
            .await
            .map_err(|e| CoreError::from(e).context(format!("TMDB {} list", category.as_path())))?;
        movies.truncate(count);
        Ok(movies)
    }
}
