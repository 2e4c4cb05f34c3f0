//! Persistence layer for a music album catalog backed by SQLite.
//! `CatalogStore` is the single entry point for catalog reads and writes.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod seed;
pub mod store;

pub use config::{ConfigError, SchemaPolicy, StoreConfig, StoreLocation};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::album::{Album, AlbumId, AlbumRecord, AlbumValidationError};
pub use repo::album_repo::{AlbumRepository, SqliteAlbumRepository};
pub use store::{CatalogStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
