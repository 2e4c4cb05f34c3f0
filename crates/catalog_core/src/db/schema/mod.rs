//! Album schema creation and verification.
//!
//! # Responsibility
//! - Apply the caller's `SchemaPolicy` to the `album` table atomically.
//! - Verify a connection carries the expected schema before use.
//!
//! # Invariants
//! - Applied schema version is mirrored to `PRAGMA user_version`.
//! - A database written by a newer schema version is never modified.

use crate::config::SchemaPolicy;
use crate::db::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::time::Instant;

const SCHEMA_VERSION: u32 = 1;
const CREATE_ALBUM_SQL: &str = include_str!("0001_album.sql");
const DROP_ALBUM_SQL: &str = "DROP TABLE IF EXISTS album;";

const ALBUM_TABLE: &str = "album";
const ALBUM_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec {
        name: "id",
        decl_type: "INTEGER",
        not_null: false,
        primary_key: true,
        declaration: "INTEGER PRIMARY KEY",
    },
    ColumnSpec {
        name: "title",
        decl_type: "TEXT",
        not_null: true,
        primary_key: false,
        declaration: "TEXT NOT NULL",
    },
    ColumnSpec {
        name: "artist",
        decl_type: "TEXT",
        not_null: true,
        primary_key: false,
        declaration: "TEXT NOT NULL",
    },
    ColumnSpec {
        name: "price",
        decl_type: "REAL",
        not_null: true,
        primary_key: false,
        declaration: "REAL NOT NULL",
    },
];

/// Declared shape a preserved `album` column must carry.
struct ColumnSpec {
    name: &'static str,
    decl_type: &'static str,
    not_null: bool,
    primary_key: bool,
    declaration: &'static str,
}

impl ColumnSpec {
    /// `id` must be the sole primary key so it aliases the rowid.
    fn matches(&self, column: &ColumnInfo) -> bool {
        let expected_pk = i64::from(self.primary_key);
        column.decl_type.eq_ignore_ascii_case(self.decl_type)
            && column.pk == expected_pk
            && (column.not_null || !self.not_null)
    }
}

struct ColumnInfo {
    name: String,
    decl_type: String,
    not_null: bool,
    pk: i64,
}

/// Returns the schema version written by this binary.
pub fn latest_version() -> u32 {
    SCHEMA_VERSION
}

/// Creates (or recreates) the `album` table according to `policy`.
///
/// `Preserve` keeps existing rows and adopts an unversioned legacy table when
/// its columns match. `Recreate` drops every row and restarts identifiers.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the database is newer than this binary.
/// - `MissingRequiredColumn` / `IncompatibleColumn` when a preserved table
///   has the wrong shape.
/// - `Sqlite` for any statement failure; the transaction is rolled back.
pub fn ensure_schema(conn: &mut Connection, policy: SchemaPolicy) -> DbResult<()> {
    let started_at = Instant::now();
    let policy_name = policy.as_str();

    let result = apply_policy(conn, policy);
    match &result {
        Ok(()) => info!(
            "event=schema_apply module=db status=ok policy={policy_name} version={SCHEMA_VERSION} duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=schema_apply module=db status=error policy={policy_name} duration_ms={} error={}",
            started_at.elapsed().as_millis(),
            err
        ),
    }
    result
}

fn apply_policy(conn: &mut Connection, policy: SchemaPolicy) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    if current_version > SCHEMA_VERSION {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: SCHEMA_VERSION,
        });
    }

    let tx = conn.transaction()?;
    if policy == SchemaPolicy::Recreate {
        tx.execute_batch(DROP_ALBUM_SQL)?;
    }
    tx.execute_batch(CREATE_ALBUM_SQL)?;
    tx.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
    verify_schema(&tx)?;
    tx.commit()?;

    Ok(())
}

/// Checks that `conn` carries the current album schema.
///
/// # Errors
/// - `UninitializedSchema` when `user_version` is older than expected.
/// - `UnsupportedSchemaVersion` when it is newer.
/// - `MissingRequiredTable`, `MissingRequiredColumn` or `IncompatibleColumn`
///   for shape mismatches: `id` must be the `INTEGER` primary key, the other
///   columns `NOT NULL` with their declared types.
pub fn verify_schema(conn: &Connection) -> DbResult<()> {
    let actual_version = current_user_version(conn)?;
    if actual_version > SCHEMA_VERSION {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: actual_version,
            latest_supported: SCHEMA_VERSION,
        });
    }
    if actual_version < SCHEMA_VERSION {
        return Err(DbError::UninitializedSchema {
            expected_version: SCHEMA_VERSION,
            actual_version,
        });
    }

    if !table_exists(conn, ALBUM_TABLE)? {
        return Err(DbError::MissingRequiredTable(ALBUM_TABLE));
    }

    let columns = table_columns(conn, ALBUM_TABLE)?;
    if columns.iter().filter(|column| column.pk > 0).count() > 1 {
        return Err(DbError::IncompatibleColumn {
            table: ALBUM_TABLE,
            column: "id",
            expected: "INTEGER PRIMARY KEY",
        });
    }
    for spec in ALBUM_COLUMNS {
        let Some(column) = columns.iter().find(|column| column.name == spec.name) else {
            return Err(DbError::MissingRequiredColumn {
                table: ALBUM_TABLE,
                column: spec.name,
            });
        };
        if !spec.matches(column) {
            return Err(DbError::IncompatibleColumn {
                table: ALBUM_TABLE,
                column: spec.name,
                expected: spec.declaration,
            });
        }
    }

    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

fn table_exists(conn: &Connection, table: &str) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_columns(conn: &Connection, table: &str) -> DbResult<Vec<ColumnInfo>> {
    let mut stmt =
        conn.prepare("SELECT name, type, \"notnull\", pk FROM pragma_table_info(?1);")?;
    let columns = stmt
        .query_map([table], |row| {
            Ok(ColumnInfo {
                name: row.get(0)?,
                decl_type: row.get(1)?,
                not_null: row.get::<_, i64>(2)? != 0,
                pk: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(columns)
}
