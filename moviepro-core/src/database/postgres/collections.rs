use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use moviepro_model::{Collection, CollectionID, MovieCollection, MovieID, MovieListing};

use super::movies::map_listing;
use super::{append_member, collection_id, column, lock_collection, movie_id};
use crate::database::ports::CollectionRepository;
use crate::error::{CoreError, Result};

#[derive(Debug, Clone)]
pub struct PostgresCollectionRepository {
    pool: PgPool,
}

impl PostgresCollectionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn map_row(row: &PgRow) -> Result<Collection> {
        Ok(Collection {
            id: collection_id(row, "id")?,
            name: column(row, "name")?,
            description: column(row, "description")?,
        })
    }
}

#[async_trait]
impl CollectionRepository for PostgresCollectionRepository {
    async fn create(&self, collection: &Collection) -> Result<()> {
        sqlx::query("INSERT INTO collections (id, name, description) VALUES ($1, $2, $3)")
            .bind(collection.id.to_uuid())
            .bind(&collection.name)
            .bind(&collection.description)
            .execute(self.pool())
            .await
            .map_err(|e| {
                CoreError::from(e).context(format!("Failed to create collection {}", collection.name))
            })?;
        Ok(())
    }

    async fn get(&self, id: CollectionID) -> Result<Option<Collection>> {
        let row = sqlx::query("SELECT id, name, description FROM collections WHERE id = $1")
            .bind(id.to_uuid())
            .fetch_optional(self.pool())
            .await
            .map_err(|e| CoreError::from(e).context("Failed to load collection"))?;
        row.as_ref().map(Self::map_row).transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Collection>> {
        let row = sqlx::query(
            "SELECT id, name, description FROM collections WHERE LOWER(name) = LOWER($1)",
        )
        .bind(name)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| CoreError::from(e).context("Failed to look up collection by name"))?;
        row.as_ref().map(Self::map_row).transpose()
    }

    async fn list(&self) -> Result<Vec<Collection>> {
        let rows = sqlx::query(
            "SELECT id, name, description FROM collections ORDER BY LOWER(name), id",
        )
        .fetch_all(self.pool())
        .await
        .map_err(|e| CoreError::from(e).context("Failed to list collections"))?;
        rows.iter().map(Self::map_row).collect()
    }

    async fn update(&self, collection: &Collection) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE collections
            SET name = $2, description = $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(collection.id.to_uuid())
        .bind(&collection.name)
        .bind(&collection.description)
        .execute(self.pool())
        .await
        .map_err(|e| {
            CoreError::from(e).context(format!("Failed to update collection {}", collection.id))
        })?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(format!("Collection {}", collection.id)));
        }
        Ok(())
    }

    async fn delete(&self, id: CollectionID) -> Result<bool> {
        let result = sqlx::query("DELETE FROM collections WHERE id = $1")
            .bind(id.to_uuid())
            .execute(self.pool())
            .await
            .map_err(|e| CoreError::from(e).context(format!("Failed to delete collection {id}")))?;
        Ok(result.rows_affected() > 0)
    }

    async fn members(&self, id: CollectionID) -> Result<Vec<MovieCollection>> {
        let rows = sqlx::query(
            r#"
            SELECT movie_id, sort_order
            FROM movie_collections
            WHERE collection_id = $1
            ORDER BY sort_order, movie_id
            "#,
        )
        .bind(id.to_uuid())
        .fetch_all(self.pool())
        .await
        .map_err(|e| CoreError::from(e).context("Failed to load collection members"))?;

        rows.iter()
            .map(|row| -> Result<MovieCollection> {
                Ok(MovieCollection {
                    collection_id: id,
                    movie_id: movie_id(row, "movie_id")?,
                    order: column(row, "sort_order")?,
                })
            })
            .collect()
    }

    async fn member_listings(&self, id: CollectionID) -> Result<Vec<MovieListing>> {
        let rows = sqlx::query(
            r#"
            SELECT m.id, m.tmdb_id, m.title, m.release_date, m.rating, m.vote_average
            FROM movie_collections mc
            JOIN movies m ON m.id = mc.movie_id
            WHERE mc.collection_id = $1
            ORDER BY mc.sort_order, m.id
            "#,
        )
        .bind(id.to_uuid())
        .fetch_all(self.pool())
        .await
        .map_err(|e| CoreError::from(e).context("Failed to load collection movies"))?;

        rows.iter().map(map_listing).collect()
    }

    async fn append_member(
        &self,
        collection_id: CollectionID,
        movie_id: MovieID,
    ) -> Result<MovieCollection> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| CoreError::from(e).context("Failed to begin transaction"))?;

        lock_collection(&mut *tx, collection_id).await?;
        let membership = append_member(&mut *tx, collection_id, movie_id).await?;

        tx.commit()
            .await
            .map_err(|e| CoreError::from(e).context("Failed to commit collection append"))?;
        Ok(membership)
    }

    async fn replace_members(
        &self,
        collection_id: CollectionID,
        movie_ids: &[MovieID],
    ) -> Result<Vec<MovieCollection>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| CoreError::from(e).context("Failed to begin transaction"))?;

        lock_collection(&mut *tx, collection_id).await?;

        sqlx::query("DELETE FROM movie_collections WHERE collection_id = $1")
            .bind(collection_id.to_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| CoreError::from(e).context("Failed to clear collection members"))?;

        let ids: Vec<Uuid> = movie_ids.iter().map(MovieID::to_uuid).collect();
        sqlx::query(
            r#"
            INSERT INTO movie_collections (collection_id, movie_id, sort_order)
            SELECT $1::uuid, member.movie_id, member.position::INTEGER
            FROM UNNEST($2::uuid[]) WITH ORDINALITY AS member(movie_id, position)
            "#,
        )
        .bind(collection_id.to_uuid())
        .bind(&ids)
        .execute(&mut *tx)
        .await
        .map_err(|e| CoreError::from(e).context("Failed to insert collection members"))?;

        tx.commit()
            .await
            .map_err(|e| CoreError::from(e).context("Failed to commit collection membership"))?;

        Ok(movie_ids
            .iter()
            .enumerate()
            .map(|(index, movie_id)| MovieCollection {
                collection_id,
                movie_id: *movie_id,
                order: index as i32 + 1,
            })
            .collect())
    }
}
