//! Album catalog domain model.
//!
//! # Responsibility
//! - Define the data structures shared by storage and callers.
//!
//! # Invariants
//! - Callers only ever hold owned copies of persisted records.

pub mod album;
