use async_trait::async_trait;

use moviepro_model::{
    Collection, CollectionID, Movie, MovieCollection, MovieID, MovieListing, TmdbId,
};

use crate::error::Result;

#[async_trait]
pub trait MovieRepository: Send + Sync {
    /// Local id of the movie imported from `tmdb_id`, if any.
    async fn find_by_tmdb_id(&self, tmdb_id: TmdbId) -> Result<Option<MovieID>>;

    async fn exists(&self, id: MovieID) -> Result<bool>;

    /// Movie with cast and crew in stored rank order.
    async fn get(&self, id: MovieID) -> Result<Option<Movie>>;

    async fn list(&self) -> Result<Vec<MovieListing>>;

    /// Inserts the movie, its credits and a membership row appended to
    /// `collection` in a single transaction.
    ///
    /// A duplicate `tmdb_id` fails with `CoreError::Conflict` and leaves no
    /// trace.
    async fn insert_movie_with_membership(
        &self,
        movie: &Movie,
        collection: CollectionID,
    ) -> Result<()>;

    /// Overwrites the movie row. Credits are left untouched.
    async fn update(&self, movie: &Movie) -> Result<()>;

    /// Removes the movie together with its credits and memberships.
    async fn delete(&self, id: MovieID) -> Result<bool>;
}

#[async_trait]
pub trait CollectionRepository: Send + Sync {
    /// Fails with `CoreError::Conflict` when the name is taken, ignoring case.
    async fn create(&self, collection: &Collection) -> Result<()>;

    async fn get(&self, id: CollectionID) -> Result<Option<Collection>>;

    /// Case-insensitive lookup, matching the uniqueness rule.
    async fn find_by_name(&self, name: &str) -> Result<Option<Collection>>;

    /// All collections ordered by name.
    async fn list(&self) -> Result<Vec<Collection>>;

    async fn update(&self, collection: &Collection) -> Result<()>;

    async fn delete(&self, id: CollectionID) -> Result<bool>;

    /// Join rows of a collection ordered by position.
    async fn members(&self, id: CollectionID) -> Result<Vec<MovieCollection>>;

    /// Member movies ordered by position.
    async fn member_listings(&self, id: CollectionID) -> Result<Vec<MovieListing>>;

    /// Appends the movie after the current last member. Already present
    /// members keep their position and the existing row is returned.
    async fn append_member(
        &self,
        collection_id: CollectionID,
        movie_id: MovieID,
    ) -> Result<MovieCollection>;

    /// Replaces the membership wholesale with `movie_ids` in order, positions
    /// starting at 1. Callers pass distinct ids.
    async fn replace_members(
        &self,
        collection_id: CollectionID,
        movie_ids: &[MovieID],
    ) -> Result<Vec<MovieCollection>>;
}
