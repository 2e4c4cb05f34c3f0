//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure connection pragmas required by the catalog.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON` and a busy timeout.
//! - Schema handling is left to `db::schema`.

use super::DbResult;
use crate::config::StoreLocation;
use log::{error, info};
use rusqlite::Connection;
use std::time::{Duration, Instant};

/// Opens the catalog location and configures the connection.
///
/// File locations are created when missing; the parent directory must exist.
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
pub fn open_connection(location: &StoreLocation, busy_timeout: Duration) -> DbResult<Connection> {
    let started_at = Instant::now();
    let mode = location.mode();
    info!("event=db_open module=db status=start mode={mode}");

    let opened = match location {
        StoreLocation::File(path) => Connection::open(path),
        StoreLocation::Memory => Connection::open_in_memory(),
    };

    let result = opened.and_then(|conn| {
        configure_connection(&conn, busy_timeout)?;
        Ok(conn)
    });

    match result {
        Ok(conn) => {
            info!(
                "event=db_open module=db status=ok mode={mode} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err.into())
        }
    }
}

fn configure_connection(conn: &Connection, busy_timeout: Duration) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(busy_timeout)?;
    Ok(())
}
