use catalog_core::db::schema::latest_version;
use catalog_core::db::{ensure_schema, open_connection, DbError};
use catalog_core::seed::insert_sample_albums;
use catalog_core::{
    Album, AlbumRepository, CatalogStore, SchemaPolicy, SqliteAlbumRepository, StoreConfig,
    StoreError, StoreLocation,
};
use rusqlite::Connection;
use std::time::Duration;

#[test]
fn initialize_creates_album_table_with_current_version() {
    let mut conn = open_connection(&StoreLocation::Memory, Duration::from_secs(1)).unwrap();
    ensure_schema(&mut conn, SchemaPolicy::Preserve).unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_eq!(
        column_names(&conn),
        vec!["id", "title", "artist", "price"]
    );
}

#[test]
fn preserve_policy_keeps_rows_and_continues_ids() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::file(dir.path().join("catalog.db"));

    let store = CatalogStore::initialize(&config).unwrap();
    insert_sample_albums(&store).unwrap();
    drop(store);

    let store = CatalogStore::initialize(&config).unwrap();
    assert_eq!(store.count().unwrap(), 4);
    assert_eq!(store.query_by_id(2).unwrap().album.title, "Jeru");

    let id = store
        .insert(&Album::new("Ballads", "John Coltrane", 9.99))
        .unwrap();
    assert_eq!(id, 5);
}

#[test]
fn recreate_policy_discards_rows_and_restarts_ids() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.db");

    let store = CatalogStore::initialize(&StoreConfig::file(&path)).unwrap();
    insert_sample_albums(&store).unwrap();
    drop(store);

    let config = StoreConfig::file(&path).schema_policy(SchemaPolicy::Recreate);
    let store = CatalogStore::initialize(&config).unwrap();
    assert_eq!(store.count().unwrap(), 0);
    assert!(store.query_by_artist("John Coltrane").unwrap().is_empty());

    let id = store
        .insert(&Album::new("Ballads", "John Coltrane", 9.99))
        .unwrap();
    assert_eq!(id, 1);
}

#[test]
fn unopenable_location_reports_connection_failed() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::file(dir.path().join("missing").join("catalog.db"));

    let err = CatalogStore::initialize(&config).err().unwrap();
    assert!(matches!(err, StoreError::ConnectionFailed(DbError::Sqlite(_))));
}

#[test]
fn newer_schema_version_is_refused_under_both_policies() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    for policy in [SchemaPolicy::Preserve, SchemaPolicy::Recreate] {
        let config = StoreConfig::file(&path).schema_policy(policy);
        let err = CatalogStore::initialize(&config).err().unwrap();
        match err {
            StoreError::SchemaError(DbError::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            }) => {
                assert_eq!(db_version, 999);
                assert_eq!(latest_supported, latest_version());
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

#[test]
fn preserve_adopts_unversioned_legacy_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE album (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            artist TEXT NOT NULL,
            price REAL NOT NULL
        );
        INSERT INTO album (title, artist, price) VALUES ('Jeru', 'Gerry Mulligan', 17.99);",
    )
    .unwrap();
    drop(conn);

    let store = CatalogStore::initialize(&StoreConfig::file(&path)).unwrap();
    assert_eq!(store.query_by_id(1).unwrap().album.artist, "Gerry Mulligan");
}

#[test]
fn preserve_rejects_legacy_table_with_wrong_shape() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE album (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            artist TEXT NOT NULL
        );",
    )
    .unwrap();
    drop(conn);

    let err = CatalogStore::initialize(&StoreConfig::file(&path))
        .err()
        .unwrap();
    assert!(matches!(
        err,
        StoreError::SchemaError(DbError::MissingRequiredColumn {
            table: "album",
            column: "price"
        })
    ));

    let conn = Connection::open(&path).unwrap();
    assert_eq!(schema_version(&conn), 0);
}

#[test]
fn preserve_rejects_legacy_table_without_key_or_constraints() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("CREATE TABLE album (id INTEGER, title TEXT, artist TEXT, price REAL);")
        .unwrap();
    drop(conn);

    let err = CatalogStore::initialize(&StoreConfig::file(&path))
        .err()
        .unwrap();
    assert!(matches!(
        err,
        StoreError::SchemaError(DbError::IncompatibleColumn {
            table: "album",
            column: "id",
            ..
        })
    ));

    let conn = Connection::open(&path).unwrap();
    assert_eq!(schema_version(&conn), 0);
}

#[test]
fn preserve_rejects_legacy_table_with_nullable_or_mistyped_columns() {
    let cases = [
        (
            "CREATE TABLE album (
                id INTEGER PRIMARY KEY,
                title TEXT,
                artist TEXT NOT NULL,
                price REAL NOT NULL
            );",
            "title",
        ),
        (
            "CREATE TABLE album (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                artist TEXT NOT NULL,
                price TEXT NOT NULL
            );",
            "price",
        ),
        (
            "CREATE TABLE album (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                artist TEXT NOT NULL,
                price REAL NOT NULL
            );",
            "id",
        ),
    ];

    for (ddl, bad_column) in cases {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(ddl).unwrap();
        drop(conn);

        let err = CatalogStore::initialize(&StoreConfig::file(&path))
            .err()
            .unwrap();
        match err {
            StoreError::SchemaError(DbError::IncompatibleColumn { column, .. }) => {
                assert_eq!(column, bad_column)
            }
            other => panic!("unexpected error for `{bad_column}`: {other}"),
        }
    }
}

#[test]
fn adopted_legacy_table_round_trips_inserted_ids() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "create table album (
            id integer primary key,
            title text not null,
            artist text not null,
            price real not null
        );",
    )
    .unwrap();
    drop(conn);

    let store = CatalogStore::initialize(&StoreConfig::file(&path)).unwrap();
    let album = Album::new("Jeru", "Gerry Mulligan", 17.99);
    let id = store.insert(&album).unwrap();

    assert_eq!(store.query_by_id(id).unwrap().album, album);
    let by_artist = store.query_by_artist("Gerry Mulligan").unwrap();
    assert_eq!(by_artist.len(), 1);
    assert_eq!(by_artist[0].id, id);
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteAlbumRepository::try_new(&conn) {
        Err(StoreError::SchemaError(DbError::UninitializedSchema {
            expected_version,
            actual_version: 0,
        })) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized schema error"),
    }
}

#[test]
fn repository_rejects_versioned_connection_without_album_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteAlbumRepository::try_new(&conn),
        Err(StoreError::SchemaError(DbError::MissingRequiredTable("album")))
    ));
}

#[test]
fn repository_surfaces_invalid_persisted_rows() {
    let mut conn = open_connection(&StoreLocation::Memory, Duration::from_secs(1)).unwrap();
    ensure_schema(&mut conn, SchemaPolicy::Preserve).unwrap();
    conn.execute(
        "INSERT INTO album (title, artist, price) VALUES ('Refund', 'Nobody', -1.0);",
        [],
    )
    .unwrap();

    let repo = SqliteAlbumRepository::try_new(&conn).unwrap();
    assert!(matches!(
        repo.album_by_id(1),
        Err(StoreError::InvalidData(_))
    ));
    assert!(matches!(
        repo.albums_by_artist("Nobody"),
        Err(StoreError::InvalidData(_))
    ));
}

#[test]
fn storage_failure_on_insert_reports_write_failed() {
    let mut conn = open_connection(&StoreLocation::Memory, Duration::from_secs(1)).unwrap();
    ensure_schema(&mut conn, SchemaPolicy::Preserve).unwrap();
    conn.execute_batch(
        "CREATE TRIGGER album_read_only BEFORE INSERT ON album
         BEGIN SELECT RAISE(ABORT, 'catalog is read-only'); END;",
    )
    .unwrap();

    let repo = SqliteAlbumRepository::try_new(&conn).unwrap();
    let err = repo
        .insert_album(&Album::new("Ballads", "John Coltrane", 9.99))
        .unwrap_err();
    assert!(matches!(err, StoreError::WriteFailed(_)));
    assert_eq!(repo.count_albums().unwrap(), 0);
}

#[test]
fn storage_failure_on_read_reports_query_failed() {
    let mut conn = open_connection(&StoreLocation::Memory, Duration::from_secs(1)).unwrap();
    ensure_schema(&mut conn, SchemaPolicy::Preserve).unwrap();
    conn.execute(
        "INSERT INTO album (title, artist, price) VALUES ('Jeru', 'Gerry Mulligan', 17.99);",
        [],
    )
    .unwrap();

    let repo = SqliteAlbumRepository::try_new(&conn).unwrap();
    conn.execute_batch("ALTER TABLE album RENAME COLUMN price TO cost;")
        .unwrap();

    assert!(matches!(
        repo.albums_by_artist("Gerry Mulligan"),
        Err(StoreError::QueryFailed(_))
    ));
    assert!(matches!(
        repo.album_by_id(1),
        Err(StoreError::QueryFailed(_))
    ));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn column_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM pragma_table_info('album') ORDER BY cid;")
        .unwrap();
    stmt.query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}
