use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use moviepro_config::Config;
use moviepro_core::database::{CollectionRepository, MovieRepository, PostgresDatabase};
use moviepro_core::providers::build_http_client;
use moviepro_core::{
    CatalogProvider, CatalogService, CollectionService, HttpBinaryFetcher, ImageService,
    ImportService, LibraryService, MappingSettings, MovieMapper, TmdbProvider,
};
use moviepro_model::ImageUpload;

/// Catalog-side collaborators. Needs an API key but no database.
pub struct Remote {
    pub catalog: Arc<dyn CatalogProvider>,
    pub mapper: MovieMapper,
}

impl Remote {
    pub fn connect(config: &Config) -> Result<Self> {
        let images = image_service(config)?;
        let catalog: Arc<dyn CatalogProvider> =
            Arc::new(TmdbProvider::new(&config.tmdb, &config.http).context(
                "TMDB client unavailable (set TMDB_API_KEY or tmdb.api_key)",
            )?);
        let mapper = MovieMapper::new(MappingSettings::from_config(config), images);

        Ok(Self { catalog, mapper })
    }

    pub fn catalog_service(&self) -> CatalogService {
        CatalogService::new(self.catalog.clone(), self.mapper.clone())
    }
}

/// Library-side collaborators backed by Postgres.
pub struct Local {
    pub movies: Arc<dyn MovieRepository>,
    pub collections: CollectionService,
}

impl Local {
    pub async fn connect(config: &Config) -> Result<Self> {
        let database = PostgresDatabase::connect(&config.database).await?;
        database.migrate().await?;

        let movies: Arc<dyn MovieRepository> = Arc::new(database.movies());
        let collection_repo: Arc<dyn CollectionRepository> = Arc::new(database.collections());
        let collections = CollectionService::new(
            collection_repo,
            movies.clone(),
            config.library.default_collection.clone(),
        );
        info!(?database, "Connected to library database");

        Ok(Self {
            movies,
            collections,
        })
    }

    pub fn library_service(&self, images: ImageService) -> LibraryService {
        LibraryService::new(self.movies.clone(), images)
    }
}

/// Import pipeline; the per-movie deadline is twice the HTTP timeout so a
/// detail request and both image downloads fit.
pub fn import_service(config: &Config, remote: &Remote, local: &Local) -> ImportService {
    ImportService::new(
        remote.catalog.clone(),
        remote.mapper.clone(),
        local.movies.clone(),
        local.collections.clone(),
        import_deadline(config.http.timeout),
    )
}

fn import_deadline(http_timeout: Duration) -> Duration {
    http_timeout.saturating_mul(2)
}

pub fn image_service(config: &Config) -> Result<ImageService> {
    let client = build_http_client(&config.http).context("failed to build HTTP client")?;
    Ok(ImageService::new(Arc::new(HttpBinaryFetcher::new(client))))
}

/// Reads an image file into the upload form accepted by the library service.
pub async fn read_upload(images: &ImageService, path: Option<&Path>) -> Result<Option<ImageUpload>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let content = images
        .encode_file(Some(path))
        .await?
        .with_context(|| format!("no image read from {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(Some(ImageUpload {
        file_name,
        content_type: content.media_type,
        bytes: content.bytes,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_deadline_doubles_the_http_timeout() {
        assert_eq!(import_deadline(Duration::from_secs(15)), Duration::from_secs(30));
    }

    #[test]
    fn import_deadline_saturates_for_huge_timeouts() {
        let huge = Duration::from_secs(u64::MAX);
        assert_eq!(import_deadline(huge), Duration::MAX);
    }
}
