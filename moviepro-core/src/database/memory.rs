//! In-memory repositories mirroring the Postgres adapter's rules: unique
//! TMDB ids, case-insensitive unique collection names, cascading deletes
//! and 1-based collection positions.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use moviepro_model::{
    Collection, CollectionID, Movie, MovieCollection, MovieID, MovieListing, TmdbId,
};

use crate::database::ports::{CollectionRepository, MovieRepository};
use crate::error::{CoreError, Result};

#[derive(Debug, Default)]
struct State {
    movies: HashMap<MovieID, Movie>,
    collections: HashMap<CollectionID, Collection>,
    memberships: Vec<MovieCollection>,
}

impl State {
    fn append(&mut self, collection_id: CollectionID, movie_id: MovieID) -> MovieCollection {
        if let Some(existing) = self
            .memberships
            .iter()
            .find(|m| m.collection_id == collection_id && m.movie_id == movie_id)
        {
            return *existing;
        }

        let order = self
            .memberships
            .iter()
            .filter(|m| m.collection_id == collection_id)
            .map(|m| m.order)
            .max()
            .unwrap_or(0)
            + 1;
        let membership = MovieCollection {
            collection_id,
            movie_id,
            order,
        };
        self.memberships.push(membership);
        membership
    }

    fn name_taken(&self, name: &str, except: Option<CollectionID>) -> bool {
        let lowered = name.to_lowercase();
        self.collections
            .values()
            .any(|c| Some(c.id) != except && c.name.to_lowercase() == lowered)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryDatabase {
    state: Mutex<State>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MovieRepository for InMemoryDatabase {
    async fn find_by_tmdb_id(&self, tmdb_id: TmdbId) -> Result<Option<MovieID>> {
        let state = self.state.lock().await;
        Ok(state
            .movies
            .values()
            .find(|m| m.tmdb_id == Some(tmdb_id))
            .map(|m| m.id))
    }

    async fn exists(&self, id: MovieID) -> Result<bool> {
        Ok(self.state.lock().await.movies.contains_key(&id))
    }

    async fn get(&self, id: MovieID) -> Result<Option<Movie>> {
        Ok(self.state.lock().await.movies.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<MovieListing>> {
        let state = self.state.lock().await;
        let mut listings: Vec<MovieListing> = state.movies.values().map(Movie::listing).collect();
        listings.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        Ok(listings)
    }

    async fn insert_movie_with_membership(
        &self,
        movie: &Movie,
        collection: CollectionID,
    ) -> Result<()> {
        let mut state = self.state.lock().await;
        if let Some(tmdb_id) = movie.tmdb_id
            && state.movies.values().any(|m| m.tmdb_id == Some(tmdb_id))
        {
            return Err(CoreError::Conflict(format!(
                "Movie with TMDB id {tmdb_id} already exists"
            )));
        }
        if state.movies.contains_key(&movie.id) {
            return Err(CoreError::Conflict(format!("Movie {} already exists", movie.id)));
        }
        if !state.collections.contains_key(&collection) {
            return Err(CoreError::NotFound(format!("Collection {collection}")));
        }

        state.movies.insert(movie.id, movie.clone());
        state.append(collection, movie.id);
        Ok(())
    }

    async fn update(&self, movie: &Movie) -> Result<()> {
        let mut state = self.state.lock().await;
        if let Some(tmdb_id) = movie.tmdb_id
            && state
                .movies
                .values()
                .any(|m| m.id != movie.id && m.tmdb_id == Some(tmdb_id))
        {
            return Err(CoreError::Conflict(format!(
                "Movie with TMDB id {tmdb_id} already exists"
            )));
        }

        let stored = state
            .movies
            .get_mut(&movie.id)
            .ok_or_else(|| CoreError::NotFound(format!("Movie {}", movie.id)))?;
        let (cast, crew) = (std::mem::take(&mut stored.cast), std::mem::take(&mut stored.crew));
        *stored = Movie {
            cast,
            crew,
            ..movie.clone()
        };
        Ok(())
    }

    async fn delete(&self, id: MovieID) -> Result<bool> {
        let mut state = self.state.lock().await;
        let removed = state.movies.remove(&id).is_some();
        state.memberships.retain(|m| m.movie_id != id);
        Ok(removed)
    }
}

#[async_trait]
impl CollectionRepository for InMemoryDatabase {
    async fn create(&self, collection: &Collection) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.name_taken(&collection.name, None) {
            return Err(CoreError::Conflict(format!(
                "Collection {} already exists",
                collection.name
            )));
        }
        state.collections.insert(collection.id, collection.clone());
        Ok(())
    }

    async fn get(&self, id: CollectionID) -> Result<Option<Collection>> {
        Ok(self.state.lock().await.collections.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Collection>> {
        let lowered = name.to_lowercase();
        Ok(self
            .state
            .lock()
            .await
            .collections
            .values()
            .find(|c| c.name.to_lowercase() == lowered)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Collection>> {
        let state = self.state.lock().await;
        let mut collections: Vec<Collection> = state.collections.values().cloned().collect();
        collections.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then(a.id.cmp(&b.id))
        });
        Ok(collections)
    }

    async fn update(&self, collection: &Collection) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.name_taken(&collection.name, Some(collection.id)) {
            return Err(CoreError::Conflict(format!(
                "Collection {} already exists",
                collection.name
            )));
        }
        let stored = state
            .collections
            .get_mut(&collection.id)
            .ok_or_else(|| CoreError::NotFound(format!("Collection {}", collection.id)))?;
        *stored = collection.clone();
        Ok(())
    }

    async fn delete(&self, id: CollectionID) -> Result<bool> {
        let mut state = self.state.lock().await;
        let removed = state.collections.remove(&id).is_some();
        state.memberships.retain(|m| m.collection_id != id);
        Ok(removed)
    }

    async fn members(&self, id: CollectionID) -> Result<Vec<MovieCollection>> {
        let state = self.state.lock().await;
        let mut members: Vec<MovieCollection> = state
            .memberships
            .iter()
            .filter(|m| m.collection_id == id)
            .copied()
            .collect();
        members.sort_by(|a, b| a.order.cmp(&b.order).then(a.movie_id.cmp(&b.movie_id)));
        Ok(members)
    }

    async fn member_listings(&self, id: CollectionID) -> Result<Vec<MovieListing>> {
        let members = CollectionRepository::members(self, id).await?;
        let state = self.state.lock().await;
        Ok(members
            .iter()
            .filter_map(|m| state.movies.get(&m.movie_id).map(Movie::listing))
            .collect())
    }

    async fn append_member(
        &self,
        collection_id: CollectionID,
        movie_id: MovieID,
    ) -> Result<MovieCollection> {
        let mut state = self.state.lock().await;
        if !state.collections.contains_key(&collection_id) {
            return Err(CoreError::NotFound(format!("Collection {collection_id}")));
        }
        if !state.movies.contains_key(&movie_id) {
            return Err(CoreError::NotFound(format!("Movie {movie_id}")));
        }
        Ok(state.append(collection_id, movie_id))
    }

    async fn replace_members(
        &self,
        collection_id: CollectionID,
        movie_ids: &[MovieID],
    ) -> Result<Vec<MovieCollection>> {
        let mut state = self.state.lock().await;
        if !state.collections.contains_key(&collection_id) {
            return Err(CoreError::NotFound(format!("Collection {collection_id}")));
        }
        if let Some(missing) = movie_ids.iter().find(|id| !state.movies.contains_key(*id)) {
            return Err(CoreError::NotFound(format!("Movie {missing}")));
        }

        state.memberships.retain(|m| m.collection_id != collection_id);
        let rows: Vec<MovieCollection> = movie_ids
            .iter()
            .enumerate()
            .map(|(index, movie_id)| MovieCollection {
                collection_id,
                movie_id: *movie_id,
                order: index as i32 + 1,
            })
            .collect();
        state.memberships.extend(rows.iter().copied());
        Ok(rows)
    }
}
