use crate::ids::TmdbId;

/// Placeholder shown for actor fields the catalog left empty.
pub const NOT_AVAILABLE: &str = "Not Available";

/// Display-ready biography of a person from the catalog.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorDetail {
    pub id: TmdbId,
    pub name: String,
    pub biography: String,
    /// Either `MMM dd, yyyy` or [`NOT_AVAILABLE`].
    pub birthday: String,
    pub deathday: Option<String>,
    pub place_of_birth: String,
    pub profile_url: String,
    pub known_for_department: Option<String>,
    pub also_known_as: Vec<String>,
    pub popularity: f64,
    pub imdb_id: Option<String>,
    pub homepage: Option<String>,
    pub gender: u8,
}
