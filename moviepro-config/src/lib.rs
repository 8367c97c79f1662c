//! Shared configuration library for MoviePro.
//!
//! Catalog endpoints, image sizes, the default collection and database
//! settings are resolved once here and passed explicitly into each
//! component instead of being read from ambient state.

pub mod constants;
pub mod loader;
pub mod models;
pub mod util;

pub use loader::{ConfigLoad, ConfigLoader, error::ConfigLoadError};
pub use models::sources::{EnvConfig, FileConfig};
pub use models::{
    Config, DatabaseConfig, DefaultCollectionConfig, HttpConfig, LibraryConfig,
    TmdbConfig,
};
