use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use moviepro_config::DefaultCollectionConfig;
use moviepro_model::{
    Collection, CollectionChange, CollectionID, CollectionMembership, CollectionUpdate,
    MovieCollection, MovieID, NewCollection,
};

use crate::database::{CollectionRepository, MovieRepository};
use crate::error::{CoreError, Result};

/// Named collections and the ordering of movies inside them.
///
/// The configured default collection is created lazily, always exists once
/// a movie has been imported, and refuses renames and deletes.
#[derive(Clone)]
pub struct CollectionService {
    collections: Arc<dyn CollectionRepository>,
    movies: Arc<dyn MovieRepository>,
    default: DefaultCollectionConfig,
}

impl fmt::Debug for CollectionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionService")
            .field("default", &self.default.name)
            .finish_non_exhaustive()
    }
}

impl CollectionService {
    pub fn new(
        collections: Arc<dyn CollectionRepository>,
        movies: Arc<dyn MovieRepository>,
        default: DefaultCollectionConfig,
    ) -> Self {
        Self {
            collections,
            movies,
            default,
        }
    }

    pub fn default_name(&self) -> &str {
        &self.default.name
    }

    /// The stored default is whichever row the case-insensitive name lookup
    /// resolves to, so a configured name that only changes case keeps it.
    async fn default_id(&self) -> Result<Option<CollectionID>> {
        Ok(self
            .collections
            .find_by_name(&self.default.name)
            .await?
            .map(|c| c.id))
    }

    async fn is_default(&self, collection: &Collection) -> Result<bool> {
        Ok(self.default_id().await? == Some(collection.id))
    }

    async fn require(&self, id: CollectionID) -> Result<Collection> {
        self.collections
            .get(id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Collection {id}")))
    }

    pub async fn get_collection(&self, id: CollectionID) -> Result<Collection> {
        self.require(id).await
    }

    pub async fn ensure_default_collection(&self) -> Result<Collection> {
        if let Some(existing) = self.collections.find_by_name(&self.default.name).await? {
            if existing.name != self.default.name {
                warn!(
                    collection_id = %existing.id,
                    stored = %existing.name,
                    configured = %self.default.name,
                    "Default collection name differs from configuration only by case"
                );
            }
            return Ok(existing);
        }

        let collection = Collection {
            id: CollectionID::new(),
            name: self.default.name.clone(),
            description: self.default.description.clone(),
        };

        match self.collections.create(&collection).await {
            Ok(()) => {
                info!(collection_id = %collection.id, name = %collection.name, "Created default collection");
                Ok(collection)
            }
            // Lost a creation race; the winner's row is the default.
            Err(CoreError::Conflict(_)) => self
                .collections
                .find_by_name(&self.default.name)
                .await?
                .ok_or_else(|| {
                    CoreError::Internal("Default collection vanished after conflict".into())
                }),
            Err(err) => Err(err),
        }
    }

    pub async fn create_collection(&self, input: NewCollection) -> Result<Collection> {
        input.validate()?;
        // Reserve the default name before user collections can claim it.
        self.ensure_default_collection().await?;

        let collection = Collection {
            id: CollectionID::new(),
            name: input.name.trim().to_string(),
            description: input.description.trim().to_string(),
        };
        self.collections.create(&collection).await?;

        info!(collection_id = %collection.id, name = %collection.name, "Created collection");
        Ok(collection)
    }

    pub async fn update_collection(
        &self,
        id: CollectionID,
        update: CollectionUpdate,
    ) -> Result<CollectionChange> {
        update.validate()?;
        let current = self.require(id).await?;
        let name = update.name.trim();

        if name == self.default.name || self.is_default(&current).await? {
            warn!(collection_id = %id, "Refusing to rename the default collection");
            return Ok(CollectionChange::Protected);
        }

        self.collections
            .update(&Collection {
                id,
                name: name.to_string(),
                description: update.description.trim().to_string(),
            })
            .await?;
        Ok(CollectionChange::Applied)
    }

    pub async fn delete_collection(&self, id: CollectionID) -> Result<CollectionChange> {
        let current = self.require(id).await?;
        if self.is_default(&current).await? {
            warn!(collection_id = %id, "Refusing to delete the default collection");
            return Ok(CollectionChange::Protected);
        }

        if !self.collections.delete(id).await? {
            return Err(CoreError::NotFound(format!("Collection {id}")));
        }
        info!(collection_id = %id, name = %current.name, "Deleted collection");
        Ok(CollectionChange::Applied)
    }

    /// User collections, without the default one.
    pub async fn list_collections(&self) -> Result<Vec<Collection>> {
        let default_id = self.default_id().await?;
        Ok(self
            .collections
            .list()
            .await?
            .into_iter()
            .filter(|c| Some(c.id) != default_id)
            .collect())
    }

    /// Members in display order plus every library movie outside the
    /// collection. `None` selects the default collection.
    pub async fn collection_membership(
        &self,
        id: Option<CollectionID>,
    ) -> Result<CollectionMembership> {
        let collection = match id {
            Some(id) => self.require(id).await?,
            None => self.ensure_default_collection().await?,
        };

        let in_collection = self.collections.member_listings(collection.id).await?;
        let members: HashSet<MovieID> = in_collection.iter().map(|m| m.id).collect();
        let not_in_collection = self
            .movies
            .list()
            .await?
            .into_iter()
            .filter(|m| !members.contains(&m.id))
            .collect();

        Ok(CollectionMembership {
            collection,
            in_collection,
            not_in_collection,
        })
    }

    /// Replaces the collection's members with `movie_ids` in the given
    /// order. Repeated ids keep their first position.
    pub async fn set_membership(
        &self,
        id: CollectionID,
        movie_ids: &[MovieID],
    ) -> Result<Vec<MovieCollection>> {
        let mut seen = HashSet::with_capacity(movie_ids.len());
        let ordered: Vec<MovieID> = movie_ids
            .iter()
            .copied()
            .filter(|movie_id| seen.insert(*movie_id))
            .collect();
        if ordered.len() != movie_ids.len() {
            debug!(
                collection_id = %id,
                dropped = movie_ids.len() - ordered.len(),
                "Ignoring repeated movie ids"
            );
        }

        let rows = self.collections.replace_members(id, &ordered).await?;
        info!(collection_id = %id, members = rows.len(), "Replaced collection membership");
        Ok(rows)
    }

    pub async fn attach_to_collection(
        &self,
        movie_id: MovieID,
        collection_id: CollectionID,
    ) -> Result<MovieCollection> {
        self.collections.append_member(collection_id, movie_id).await
    }

    pub async fn attach_to_default_collection(&self, movie_id: MovieID) -> Result<MovieCollection> {
        let default = self.ensure_default_collection().await?;
        self.attach_to_collection(movie_id, default.id).await
    }
}
