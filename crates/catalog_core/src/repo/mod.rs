//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from the store facade.
//!
//! # Invariants
//! - Repository writes enforce `Album::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`, `InvalidInput`) in
//!   addition to storage errors.

pub mod album_repo;
