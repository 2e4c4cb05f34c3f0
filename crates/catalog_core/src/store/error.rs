use crate::db::DbError;
use crate::model::album::{AlbumId, AlbumValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Error kinds surfaced by catalog store operations.
#[derive(Debug)]
pub enum StoreError {
    /// The storage location could not be opened or configured.
    ConnectionFailed(DbError),
    /// Schema creation or verification failed.
    SchemaError(DbError),
    /// Caller input violates album invariants; nothing was written.
    InvalidInput(AlbumValidationError),
    /// No record carries the requested identifier.
    NotFound(AlbumId),
    QueryFailed(rusqlite::Error),
    WriteFailed(rusqlite::Error),
    /// A stored row violates album invariants.
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConnectionFailed(err) => write!(f, "cannot open catalog store: {err}"),
            Self::SchemaError(err) => write!(f, "catalog schema error: {err}"),
            Self::InvalidInput(err) => write!(f, "invalid album: {err}"),
            Self::NotFound(id) => write!(f, "album not found: {id}"),
            Self::QueryFailed(err) => write!(f, "album query failed: {err}"),
            Self::WriteFailed(err) => write!(f, "album write failed: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted album data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ConnectionFailed(err) | Self::SchemaError(err) => Some(err),
            Self::InvalidInput(err) => Some(err),
            Self::QueryFailed(err) | Self::WriteFailed(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<AlbumValidationError> for StoreError {
    fn from(value: AlbumValidationError) -> Self {
        Self::InvalidInput(value)
    }
}
