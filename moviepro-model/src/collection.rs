use crate::error::{ModelError, Result};
use crate::ids::{CollectionID, MovieID};
use crate::movie::MovieListing;

const MAX_NAME_LEN: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Collection {
    pub id: CollectionID,
    pub name: String,
    pub description: String,
}

/// Join row placing a movie at a 1-based position inside a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovieCollection {
    pub collection_id: CollectionID,
    pub movie_id: MovieID,
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NewCollection {
    pub name: String,
    pub description: String,
}

impl NewCollection {
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollectionUpdate {
    pub name: String,
    pub description: String,
}

impl CollectionUpdate {
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)
    }
}

/// Result of a rename or delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CollectionChange {
    Applied,
    /// The request targeted the default collection and was ignored.
    Protected,
}

/// Ordered members of a collection alongside the library movies that are
/// not part of it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollectionMembership {
    pub collection: Collection,
    pub in_collection: Vec<MovieListing>,
    pub not_in_collection: Vec<MovieListing>,
}

fn validate_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ModelError::invalid_field("name", "must not be blank"));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(ModelError::invalid_field(
            "name",
            format!("must be at most {MAX_NAME_LEN} characters"),
        ));
    }
    Ok(())
}
