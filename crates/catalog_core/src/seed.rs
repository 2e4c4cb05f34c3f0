//! Sample catalog content used by the CLI smoke run and tests.

use crate::model::album::{Album, AlbumId};
use crate::store::{CatalogStore, StoreResult};

/// The four reference albums, in insertion order.
pub fn sample_albums() -> Vec<Album> {
    vec![
        Album::new("Giant Steps", "John Coltrane", 63.99),
        Album::new("Jeru", "Gerry Mulligan", 17.99),
        Album::new("Sarah Vaughan", "Sarah Vaughan", 34.98),
        Album::new("Blue Train", "John Coltrane", 56.99),
    ]
}

/// Inserts [`sample_albums`] and returns the assigned identifiers.
///
/// Stops at the first failure; albums inserted before it stay stored.
pub fn insert_sample_albums(store: &CatalogStore) -> StoreResult<Vec<AlbumId>> {
    sample_albums()
        .iter()
        .map(|album| store.insert(album))
        .collect()
}
