//! Persistence ports and their adapters.

pub mod ports;
pub mod postgres;

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;

pub use ports::{CollectionRepository, MovieRepository};
pub use postgres::{PostgresCollectionRepository, PostgresDatabase, PostgresMovieRepository};

#[cfg(any(test, feature = "test-utils"))]
pub use memory::InMemoryDatabase;
