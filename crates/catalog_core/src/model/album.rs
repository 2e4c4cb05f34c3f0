//! Album domain model.
//!
//! # Responsibility
//! - Define the album value object and its persisted record shape.
//! - Own input validation shared by write and read paths.
//!
//! # Invariants
//! - `title` and `artist` are never empty; other text is stored verbatim.
//! - `price` is finite and non-negative.
//! - An `AlbumId` is assigned by the store and never reused.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned identifier of a persisted album.
pub type AlbumId = i64;

/// Album catalog entry without identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub title: String,
    pub artist: String,
    /// Unit price. Must be finite and `>= 0.0`.
    pub price: f64,
}

/// Album as persisted by the store, with its assigned identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumRecord {
    pub id: AlbumId,
    #[serde(flatten)]
    pub album: Album,
}

/// Reason an album was rejected before persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlbumValidationError {
    EmptyTitle,
    EmptyArtist,
    NegativePrice,
    NonFinitePrice,
}

impl Display for AlbumValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "album title must not be empty"),
            Self::EmptyArtist => write!(f, "album artist must not be empty"),
            Self::NegativePrice => write!(f, "album price must not be negative"),
            Self::NonFinitePrice => write!(f, "album price must be a finite number"),
        }
    }
}

impl Error for AlbumValidationError {}

impl Album {
    /// Builds an album from owned or borrowed parts.
    ///
    /// Does not validate; call [`Album::validate`] or let the store do it.
    pub fn new(title: impl Into<String>, artist: impl Into<String>, price: f64) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            price,
        }
    }

    /// Checks the album against catalog invariants.
    ///
    /// # Errors
    /// - `EmptyTitle` / `EmptyArtist` for empty text.
    /// - `NonFinitePrice` for NaN or infinite prices.
    /// - `NegativePrice` for prices below zero.
    pub fn validate(&self) -> Result<(), AlbumValidationError> {
        if self.title.is_empty() {
            return Err(AlbumValidationError::EmptyTitle);
        }
        if self.artist.is_empty() {
            return Err(AlbumValidationError::EmptyArtist);
        }
        if !self.price.is_finite() {
            return Err(AlbumValidationError::NonFinitePrice);
        }
        if self.price < 0.0 {
            return Err(AlbumValidationError::NegativePrice);
        }
        Ok(())
    }
}

impl AlbumRecord {
    pub fn new(id: AlbumId, album: Album) -> Self {
        Self { id, album }
    }
}
