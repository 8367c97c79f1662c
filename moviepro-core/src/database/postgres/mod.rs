pub mod collections;
pub mod movies;

use std::fmt;
use std::time::Duration;

use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgConnection, PgPool, Postgres, Row};
use tracing::info;
use uuid::Uuid;

use moviepro_config::DatabaseConfig;
use moviepro_model::{CollectionID, MovieCollection, MovieID, TmdbId};

use crate::error::{CoreError, Result};

pub use collections::PostgresCollectionRepository;
pub use movies::PostgresMovieRepository;

/// Connection pool plus the repositories built on top of it.
#[derive(Clone)]
pub struct PostgresDatabase {
    pool: PgPool,
    max_connections: u32,
    movies: PostgresMovieRepository,
    collections: PostgresCollectionRepository,
}

impl fmt::Debug for PostgresDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresDatabase")
            .field("pool_size", &self.pool.size())
            .field("idle_connections", &self.pool.num_idle())
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl PostgresDatabase {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let url = config.url.as_deref().ok_or_else(|| {
            CoreError::Validation("database.url is not configured (set DATABASE_URL)".into())
        })?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .connect(url)
            .await
            .map_err(|e| CoreError::from(e).context("Database connection failed"))?;

        info!(
            "Database pool initialized with max_connections={}",
            config.max_connections
        );

        Ok(Self::from_pool(pool, config.max_connections))
    }

    pub fn from_pool(pool: PgPool, max_connections: u32) -> Self {
        Self {
            movies: PostgresMovieRepository::new(pool.clone()),
            collections: PostgresCollectionRepository::new(pool.clone()),
            pool,
            max_connections,
        }
    }

    /// Applies embedded migrations.
    pub async fn migrate(&self) -> Result<()> {
        crate::MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|e| CoreError::Internal(format!("Migration failed: {e}")))?;
        info!("Database migrations applied");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn movies(&self) -> PostgresMovieRepository {
        self.movies.clone()
    }

    pub fn collections(&self) -> PostgresCollectionRepository {
        self.collections.clone()
    }
}

pub(crate) fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T>
where
    T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
{
    row.try_get(name)
        .map_err(|e| CoreError::Internal(format!("Failed to read {name}: {e}")))
}

pub(crate) fn tmdb_to_db(id: TmdbId) -> Result<i64> {
    i64::try_from(id).map_err(|_| CoreError::Validation(format!("TMDB id {id} is out of range")))
}

pub(crate) fn tmdb_from_db(id: i64) -> Result<TmdbId> {
    TmdbId::try_from(id).map_err(|_| CoreError::Internal(format!("Stored TMDB id {id} is negative")))
}

/// Takes the collection row lock for the rest of the transaction.
pub(crate) async fn lock_collection(conn: &mut PgConnection, id: CollectionID) -> Result<()> {
    let locked = sqlx::query("SELECT id FROM collections WHERE id = $1 FOR UPDATE")
        .bind(id.to_uuid())
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| CoreError::from(e).context("Failed to lock collection"))?;

    match locked {
        Some(_) => Ok(()),
        None => Err(CoreError::NotFound(format!("Collection {id}"))),
    }
}

/// Appends after the current last member; a no-op for existing members.
pub(crate) async fn append_member(
    conn: &mut PgConnection,
    collection_id: CollectionID,
    movie_id: MovieID,
) -> Result<MovieCollection> {
    sqlx::query(
        r#"
        INSERT INTO movie_collections (collection_id, movie_id, sort_order)
        SELECT $1::uuid, $2::uuid, COALESCE(MAX(sort_order), 0) + 1
        FROM movie_collections
        WHERE collection_id = $1::uuid
        ON CONFLICT (collection_id, movie_id) DO NOTHING
        "#,
    )
    .bind(collection_id.to_uuid())
    .bind(movie_id.to_uuid())
    .execute(&mut *conn)
    .await
    .map_err(|e| CoreError::from(e).context("Failed to append collection member"))?;

    let order: i32 = sqlx::query_scalar(
        "SELECT sort_order FROM movie_collections WHERE collection_id = $1 AND movie_id = $2",
    )
    .bind(collection_id.to_uuid())
    .bind(movie_id.to_uuid())
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| CoreError::from(e).context("Failed to read collection member"))?;

    Ok(MovieCollection {
        collection_id,
        movie_id,
        order,
    })
}

pub(crate) fn movie_id(row: &PgRow, name: &str) -> Result<MovieID> {
    column::<Uuid>(row, name).map(MovieID)
}

pub(crate) fn collection_id(row: &PgRow, name: &str) -> Result<CollectionID> {
    column::<Uuid>(row, name).map(CollectionID)
}
