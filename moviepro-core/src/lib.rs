//! Core library for MoviePro.
//!
//! Imports movie metadata from TMDB, maps it into [`moviepro_model`]
//! records, persists it through repository ports and maintains the ordered
//! membership of movies inside named collections.
//!
//! Services receive their collaborators and configuration explicitly:
//!
//! - [`import::ImportService`] runs fetch, map and persist for one catalog id.
//! - [`collections::CollectionService`] owns the default collection and
//!   collection ordering.
//! - [`library::LibraryService`] covers hand-entered movies.
//! - [`catalog::CatalogService`] serves read-only catalog views.
//!
//! The `test-utils` feature exposes the in-memory repositories for
//! downstream test suites.

pub mod catalog;
pub mod collections;
pub mod database;
pub mod error;
pub mod image;
pub mod import;
pub mod library;
pub mod mapping;
pub mod providers;

#[cfg(test)]
mod test_support;

pub use catalog::CatalogService;
pub use collections::CollectionService;
pub use error::{CoreError, Result};
pub use image::{BinaryFetcher, HttpBinaryFetcher, ImageService};
pub use import::{ImportOutcome, ImportService};
pub use library::LibraryService;
pub use mapping::{MappingError, MappingSettings, MovieMapper};
pub use providers::{CatalogProvider, ProviderError, TmdbProvider};

/// Embedded schema migrations.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
