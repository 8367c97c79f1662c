//! Core data model definitions shared across MoviePro crates.

pub mod actor;
pub mod category;
pub mod collection;
pub mod error;
pub mod ids;
pub mod movie;
pub mod rating;

pub use actor::{ActorDetail, NOT_AVAILABLE};
pub use category::MovieCategory;
pub use collection::{
    Collection, CollectionChange, CollectionMembership, CollectionUpdate,
    MovieCollection, NewCollection,
};
pub use error::{ModelError, Result as ModelResult};
pub use ids::{CollectionID, MovieID, TmdbId};
pub use movie::{
    ImageContent, ImageUpload, MAX_CREDITS, Movie, MovieCast, MovieCrew,
    MovieListing, MovieUpdate, NewMovieInput,
};
pub use rating::MovieRating;
