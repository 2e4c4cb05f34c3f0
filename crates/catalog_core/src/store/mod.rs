//! Album catalog store facade.
//!
//! # Responsibility
//! - Own one SQLite connection for the lifetime of a store instance.
//! - Expose initialize/insert/query entry points to callers.
//!
//! # Invariants
//! - No operation runs before the schema has been applied and verified.
//! - The connection is released exactly once, on `close` or on drop.
//! - No locking beyond what SQLite provides.

mod error;

pub use error::{StoreError, StoreResult};

use crate::config::StoreConfig;
use crate::db::{ensure_schema, open_connection};
use crate::model::album::{Album, AlbumId, AlbumRecord};
use crate::repo::album_repo::{AlbumRepository, SqliteAlbumRepository};
use log::{debug, error, info};
use rusqlite::Connection;

/// Owned handle to an album catalog.
///
/// Independent instances never share state, so tests can open as many
/// in-memory stores as they need.
pub struct CatalogStore {
    conn: Connection,
}

impl CatalogStore {
    /// Opens the configured location and applies its schema policy.
    ///
    /// # Errors
    /// - `ConnectionFailed` when the location cannot be opened.
    /// - `SchemaError` when the schema cannot be created or verified.
    pub fn initialize(config: &StoreConfig) -> StoreResult<Self> {
        let mut conn = open_connection(&config.location, config.busy_timeout)
            .map_err(StoreError::ConnectionFailed)?;
        ensure_schema(&mut conn, config.schema_policy).map_err(StoreError::SchemaError)?;

        info!(
            "event=store_init module=store status=ok mode={} policy={}",
            config.location.mode(),
            config.schema_policy.as_str()
        );
        Ok(Self { conn })
    }

    /// Inserts one album and returns its new identifier.
    ///
    /// Input is validated before any write; a rejected album leaves the
    /// catalog unchanged.
    pub fn insert(&self, album: &Album) -> StoreResult<AlbumId> {
        match self.repo().insert_album(album) {
            Ok(id) => {
                debug!("event=album_insert module=store status=ok id={id}");
                Ok(id)
            }
            Err(err) => {
                error!("event=album_insert module=store status=error error={err}");
                Err(err)
            }
        }
    }

    /// Returns every album by exactly `artist` (case-sensitive).
    ///
    /// Callers should not rely on ordering; this implementation yields
    /// ascending identifiers.
    pub fn query_by_artist(&self, artist: &str) -> StoreResult<Vec<AlbumRecord>> {
        self.repo().albums_by_artist(artist)
    }

    /// Returns the album with `id`, or `StoreError::NotFound`.
    pub fn query_by_id(&self, id: AlbumId) -> StoreResult<AlbumRecord> {
        self.repo().album_by_id(id)
    }

    /// Number of albums currently stored.
    pub fn count(&self) -> StoreResult<u64> {
        self.repo().count_albums()
    }

    /// Releases the connection, reporting any close failure.
    pub fn close(self) -> StoreResult<()> {
        self.conn.close().map_err(|(_conn, err)| {
            error!("event=store_close module=store status=error error={err}");
            StoreError::ConnectionFailed(err.into())
        })?;
        info!("event=store_close module=store status=ok");
        Ok(())
    }

    fn repo(&self) -> SqliteAlbumRepository<'_> {
        SqliteAlbumRepository::from_verified(&self.conn)
    }
}
