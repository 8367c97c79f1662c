use std::str::FromStr;

use uuid::Uuid;

use crate::error::ModelError;

/// Identifier assigned by the upstream catalog (TMDB).
pub type TmdbId = u64;

/// Strongly typed ID for locally persisted movies
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovieID(pub Uuid);

impl Default for MovieID {
    fn default() -> Self {
        Self::new()
    }
}

impl MovieID {
    pub fn new() -> Self {
        MovieID(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn to_uuid(&self) -> Uuid {
        self.0
    }
}

impl AsRef<Uuid> for MovieID {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl FromStr for MovieID {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_uuid("movie", s).map(MovieID)
    }
}

impl std::fmt::Display for MovieID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strongly typed ID for collections
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollectionID(pub Uuid);

impl Default for CollectionID {
    fn default() -> Self {
        Self::new()
    }
}

impl CollectionID {
    pub fn new() -> Self {
        CollectionID(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn to_uuid(&self) -> Uuid {
        self.0
    }
}

impl AsRef<Uuid> for CollectionID {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl FromStr for CollectionID {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_uuid("collection", s).map(CollectionID)
    }
}

impl std::fmt::Display for CollectionID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn parse_uuid(kind: &'static str, raw: &str) -> Result<Uuid, ModelError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ModelError::InvalidId {
            kind,
            value: raw.to_string(),
        });
    }
    Uuid::parse_str(trimmed).map_err(|_| ModelError::InvalidId {
        kind,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_display() {
        let id = MovieID::new();
        let parsed: MovieID = id.to_string().parse().expect("parse movie id");
        assert_eq!(parsed, id);
    }

    #[test]
    fn blank_collection_id_is_rejected() {
        let err = "  ".parse::<CollectionID>().unwrap_err();
        assert!(matches!(err, ModelError::InvalidId { kind: "collection", .. }));
    }
}
