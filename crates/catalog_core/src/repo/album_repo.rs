//! Album repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert and lookup APIs over the `album` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `Album::validate()` before any SQL runs.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - Every call is a single statement; no multi-statement transactions.

use crate::db::verify_schema;
use crate::model::album::{Album, AlbumId, AlbumRecord};
use crate::store::{StoreError, StoreResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const ALBUM_SELECT_SQL: &str = "SELECT id, title, artist, price FROM album";

/// Repository interface for album catalog operations.
pub trait AlbumRepository {
    /// Persists one album and returns its newly assigned identifier.
    fn insert_album(&self, album: &Album) -> StoreResult<AlbumId>;
    /// Returns every album whose artist matches exactly, by ascending id.
    fn albums_by_artist(&self, artist: &str) -> StoreResult<Vec<AlbumRecord>>;
    /// Returns the album with `id`, or `StoreError::NotFound`.
    fn album_by_id(&self, id: AlbumId) -> StoreResult<AlbumRecord>;
    fn count_albums(&self) -> StoreResult<u64>;
}

/// SQLite-backed album repository.
pub struct SqliteAlbumRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAlbumRepository<'conn> {
    /// Constructs a repository from a connection with a ready schema.
    ///
    /// # Errors
    /// - `StoreError::SchemaError` when the connection was never initialized
    ///   or its `album` table lacks a required column.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        verify_schema(conn).map_err(StoreError::SchemaError)?;
        Ok(Self { conn })
    }

    /// Wraps a connection whose schema the caller already verified.
    pub(crate) fn from_verified(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl AlbumRepository for SqliteAlbumRepository<'_> {
    fn insert_album(&self, album: &Album) -> StoreResult<AlbumId> {
        album.validate()?;

        self.conn
            .execute(
                "INSERT INTO album (title, artist, price) VALUES (?1, ?2, ?3);",
                params![album.title.as_str(), album.artist.as_str(), album.price],
            )
            .map_err(StoreError::WriteFailed)?;

        Ok(self.conn.last_insert_rowid())
    }

    fn albums_by_artist(&self, artist: &str) -> StoreResult<Vec<AlbumRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "{ALBUM_SELECT_SQL}
                 WHERE artist = ?1
                 ORDER BY id ASC;"
            ))
            .map_err(StoreError::QueryFailed)?;

        let rows = stmt
            .query_map([artist], read_album_row)
            .map_err(StoreError::QueryFailed)?;

        let mut albums = Vec::new();
        for row in rows {
            let record = row.map_err(StoreError::QueryFailed)?;
            albums.push(ensure_valid(record)?);
        }

        Ok(albums)
    }

    fn album_by_id(&self, id: AlbumId) -> StoreResult<AlbumRecord> {
        let record = self
            .conn
            .query_row(
                &format!("{ALBUM_SELECT_SQL} WHERE id = ?1;"),
                [id],
                read_album_row,
            )
            .optional()
            .map_err(StoreError::QueryFailed)?
            .ok_or(StoreError::NotFound(id))?;

        ensure_valid(record)
    }

    fn count_albums(&self) -> StoreResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM album;", [], |row| row.get(0))
            .map_err(StoreError::QueryFailed)?;

        u64::try_from(count)
            .map_err(|_| StoreError::InvalidData(format!("negative album count `{count}`")))
    }
}

fn read_album_row(row: &Row<'_>) -> rusqlite::Result<AlbumRecord> {
    Ok(AlbumRecord {
        id: row.get("id")?,
        album: Album {
            title: row.get("title")?,
            artist: row.get("artist")?,
            price: row.get("price")?,
        },
    })
}

fn ensure_valid(record: AlbumRecord) -> StoreResult<AlbumRecord> {
    record.album.validate().map_err(|err| {
        StoreError::InvalidData(format!("album {} in album table: {err}", record.id))
    })?;
    Ok(record)
}
