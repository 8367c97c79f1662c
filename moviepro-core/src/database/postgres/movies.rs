use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, PgPool};
use tracing::debug;

use moviepro_model::{
    CollectionID, ImageContent, Movie, MovieCast, MovieCrew, MovieID, MovieListing, MovieRating,
    TmdbId,
};

use super::{append_member, column, lock_collection, movie_id, tmdb_from_db, tmdb_to_db};
use crate::database::ports::MovieRepository;
use crate::error::{CoreError, Result};

const LISTING_COLUMNS: &str = "id, tmdb_id, title, release_date, rating, vote_average";

#[derive(Debug, Clone)]
pub struct PostgresMovieRepository {
    pool: PgPool,
}

impl PostgresMovieRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn insert_credits(conn: &mut PgConnection, movie: &Movie) -> Result<()> {
        for (position, cast) in movie.cast.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO movie_cast
                    (movie_id, position, cast_id, name, character, department, image_url)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(movie.id.to_uuid())
            .bind(position as i16)
            .bind(tmdb_to_db(cast.cast_id)?)
            .bind(&cast.name)
            .bind(&cast.character)
            .bind(&cast.department)
            .bind(&cast.image_url)
            .execute(&mut *conn)
            .await
            .map_err(|e| CoreError::from(e).context("Failed to insert cast credit"))?;
        }

        for (position, crew) in movie.crew.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO movie_crew
                    (movie_id, position, crew_id, name, job, department, image_url)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(movie.id.to_uuid())
            .bind(position as i16)
            .bind(tmdb_to_db(crew.crew_id)?)
            .bind(&crew.name)
            .bind(&crew.job)
            .bind(&crew.department)
            .bind(&crew.image_url)
            .execute(&mut *conn)
            .await
            .map_err(|e| CoreError::from(e).context("Failed to insert crew credit"))?;
        }

        Ok(())
    }

    async fn load_credits(&self, id: MovieID) -> Result<(Vec<MovieCast>, Vec<MovieCrew>)> {
        let cast_rows = sqlx::query(
            r#"
            SELECT cast_id, name, character, department, image_url
            FROM movie_cast
            WHERE movie_id = $1
            ORDER BY position
            "#,
        )
        .bind(id.to_uuid())
        .fetch_all(self.pool())
        .await
        .map_err(|e| CoreError::from(e).context("Failed to load cast"))?;

        let crew_rows = sqlx::query(
            r#"
            SELECT crew_id, name, job, department, image_url
            FROM movie_crew
            WHERE movie_id = $1
            ORDER BY position
            "#,
        )
        .bind(id.to_uuid())
        .fetch_all(self.pool())
        .await
        .map_err(|e| CoreError::from(e).context("Failed to load crew"))?;

        let cast = cast_rows
            .iter()
            .map(|row| -> Result<MovieCast> {
                Ok(MovieCast {
                    cast_id: tmdb_from_db(column(row, "cast_id")?)?,
                    name: column(row, "name")?,
                    character: column(row, "character")?,
                    department: column(row, "department")?,
                    image_url: column(row, "image_url")?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let crew = crew_rows
            .iter()
            .map(|row| -> Result<MovieCrew> {
                Ok(MovieCrew {
                    crew_id: tmdb_from_db(column(row, "crew_id")?)?,
                    name: column(row, "name")?,
                    job: column(row, "job")?,
                    department: column(row, "department")?,
                    image_url: column(row, "image_url")?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok((cast, crew))
    }
}

pub(crate) fn map_listing(row: &PgRow) -> Result<MovieListing> {
    Ok(MovieListing {
        id: movie_id(row, "id")?,
        tmdb_id: optional_tmdb(row)?,
        title: column(row, "title")?,
        release_date: column::<NaiveDate>(row, "release_date")?,
        rating: rating(row)?,
        vote_average: column(row, "vote_average")?,
    })
}

fn optional_tmdb(row: &PgRow) -> Result<Option<TmdbId>> {
    column::<Option<i64>>(row, "tmdb_id")?
        .map(tmdb_from_db)
        .transpose()
}

fn rating(row: &PgRow) -> Result<MovieRating> {
    let raw: String = column(row, "rating")?;
    raw.parse()
        .map_err(|_| CoreError::Internal(format!("Stored rating {raw:?} is not recognised")))
}

fn image(row: &PgRow, bytes: &str, media_type: &str) -> Result<Option<ImageContent>> {
    let bytes: Option<Vec<u8>> = column(row, bytes)?;
    let media_type: Option<String> = column(row, media_type)?;
    Ok(bytes.map(|bytes| ImageContent {
        bytes,
        media_type: media_type.unwrap_or_default(),
    }))
}

fn runtime_to_db(runtime: Option<u32>) -> Result<Option<i32>> {
    runtime
        .map(|minutes| {
            i32::try_from(minutes)
                .map_err(|_| CoreError::Validation(format!("Runtime {minutes} is out of range")))
        })
        .transpose()
}

#[async_trait]
impl MovieRepository for PostgresMovieRepository {
    async fn find_by_tmdb_id(&self, tmdb_id: TmdbId) -> Result<Option<MovieID>> {
        let id: Option<uuid::Uuid> = sqlx::query_scalar("SELECT id FROM movies WHERE tmdb_id = $1")
            .bind(tmdb_to_db(tmdb_id)?)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| CoreError::from(e).context("Failed to look up movie by TMDB id"))?;
        Ok(id.map(MovieID))
    }

    async fn exists(&self, id: MovieID) -> Result<bool> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM movies WHERE id = $1)")
            .bind(id.to_uuid())
            .fetch_one(self.pool())
            .await
            .map_err(|e| CoreError::from(e).context("Failed to check movie"))
    }

    async fn get(&self, id: MovieID) -> Result<Option<Movie>> {
        let row = sqlx::query(
            r#"
            SELECT id, tmdb_id, title, tagline, overview, runtime, release_date,
                   vote_average, rating, trailer_url,
                   poster, poster_type, backdrop, backdrop_type
            FROM movies
            WHERE id = $1
            "#,
        )
        .bind(id.to_uuid())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| CoreError::from(e).context("Failed to load movie"))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let (cast, crew) = self.load_credits(id).await?;
        let runtime: Option<i32> = column(&row, "runtime")?;

        Ok(Some(Movie {
            id,
            tmdb_id: optional_tmdb(&row)?,
            title: column(&row, "title")?,
            tagline: column(&row, "tagline")?,
            overview: column(&row, "overview")?,
            runtime: runtime.and_then(|m| u32::try_from(m).ok()),
            release_date: column(&row, "release_date")?,
            vote_average: column(&row, "vote_average")?,
            rating: rating(&row)?,
            trailer_url: column(&row, "trailer_url")?,
            poster: image(&row, "poster", "poster_type")?,
            backdrop: image(&row, "backdrop", "backdrop_type")?,
            cast,
            crew,
        }))
    }

    async fn list(&self) -> Result<Vec<MovieListing>> {
        let rows = sqlx::query(&format!(
            "SELECT {LISTING_COLUMNS} FROM movies ORDER BY title, id"
        ))
        .fetch_all(self.pool())
        .await
        .map_err(|e| CoreError::from(e).context("Failed to list movies"))?;

        rows.iter().map(map_listing).collect()
    }

    async fn insert_movie_with_membership(
        &self,
        movie: &Movie,
        collection: CollectionID,
    ) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| CoreError::from(e).context("Failed to begin transaction"))?;

        sqlx::query(
            r#"
            INSERT INTO movies (
                id, tmdb_id, title, tagline, overview, runtime, release_date,
                vote_average, rating, trailer_url,
                poster, poster_type, backdrop, backdrop_type
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(movie.id.to_uuid())
        .bind(movie.tmdb_id.map(tmdb_to_db).transpose()?)
        .bind(&movie.title)
        .bind(&movie.tagline)
        .bind(&movie.overview)
        .bind(runtime_to_db(movie.runtime)?)
        .bind(movie.release_date)
        .bind(movie.vote_average)
        .bind(movie.rating.as_str())
        .bind(movie.trailer_url.as_deref())
        .bind(movie.poster.as_ref().map(|img| img.bytes.as_slice()))
        .bind(movie.poster.as_ref().map(|img| img.media_type.as_str()))
        .bind(movie.backdrop.as_ref().map(|img| img.bytes.as_slice()))
        .bind(movie.backdrop.as_ref().map(|img| img.media_type.as_str()))
        .execute(&mut *tx)
        .await
        .map_err(|e| CoreError::from(e).context(format!("Failed to insert movie {}", movie.title)))?;

        Self::insert_credits(&mut *tx, movie).await?;

        lock_collection(&mut *tx, collection).await?;
        let membership = append_member(&mut *tx, collection, movie.id).await?;

        tx.commit()
            .await
            .map_err(|e| CoreError::from(e).context("Failed to commit movie insert"))?;

        debug!(
            movie_id = %movie.id,
            collection_id = %collection,
            order = membership.order,
            "Inserted movie"
        );
        Ok(())
    }

    async fn update(&self, movie: &Movie) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE movies SET
                tmdb_id = $2,
                title = $3,
                tagline = $4,
                overview = $5,
                runtime = $6,
                release_date = $7,
                vote_average = $8,
                rating = $9,
                trailer_url = $10,
                poster = $11,
                poster_type = $12,
                backdrop = $13,
                backdrop_type = $14,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(movie.id.to_uuid())
        .bind(movie.tmdb_id.map(tmdb_to_db).transpose()?)
        .bind(&movie.title)
        .bind(&movie.tagline)
        .bind(&movie.overview)
        .bind(runtime_to_db(movie.runtime)?)
        .bind(movie.release_date)
        .bind(movie.vote_average)
        .bind(movie.rating.as_str())
        .bind(movie.trailer_url.as_deref())
        .bind(movie.poster.as_ref().map(|img| img.bytes.as_slice()))
        .bind(movie.poster.as_ref().map(|img| img.media_type.as_str()))
        .bind(movie.backdrop.as_ref().map(|img| img.bytes.as_slice()))
        .bind(movie.backdrop.as_ref().map(|img| img.media_type.as_str()))
        .execute(self.pool())
        .await
        .map_err(|e| CoreError::from(e).context(format!("Failed to update movie {}", movie.id)))?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(format!("Movie {}", movie.id)));
        }
        Ok(())
    }

    async fn delete(&self, id: MovieID) -> Result<bool> {
        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id.to_uuid())
            .execute(self.pool())
            .await
            .map_err(|e| CoreError::from(e).context(format!("Failed to delete movie {id}")))?;
        Ok(result.rows_affected() > 0)
    }
}
