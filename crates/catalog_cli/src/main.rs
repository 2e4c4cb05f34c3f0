//! CLI smoke entry point.
//!
//! # Responsibility
//! - Open a catalog from environment configuration and insert sample albums.
//! - Print each inserted record back by id for a quick local sanity check.

use catalog_core::seed::insert_sample_albums;
use catalog_core::{
    core_version, default_log_level, init_logging, logging_status, CatalogStore, StoreConfig,
};
use log::warn;
use std::error::Error;
use std::process::ExitCode;

const LOG_DIR_VAR: &str = "CATALOG_LOG_DIR";
const LOG_LEVEL_VAR: &str = "CATALOG_LOG_LEVEL";

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("catalog: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    if let Ok(log_dir) = std::env::var(LOG_DIR_VAR) {
        let level = std::env::var(LOG_LEVEL_VAR).unwrap_or_else(|_| default_log_level().into());
        init_logging(&level, &log_dir)?;
    }
    if let Some((level, log_dir)) = logging_status() {
        println!("logging level={level} dir={}", log_dir.display());
    }

    let config = StoreConfig::from_env()?;
    println!("catalog_core version={}", core_version());

    let store = CatalogStore::initialize(&config)?;
    println!(
        "database initialized (policy={})",
        config.schema_policy.as_str()
    );

    let ids = insert_sample_albums(&store)?;
    println!("sample data inserted: {} albums", ids.len());

    println!("querying sample data by album id..");
    for id in ids {
        match store.query_by_id(id) {
            Ok(record) => println!(
                "{} | {} | {} | {:.2}",
                record.id, record.album.title, record.album.artist, record.album.price
            ),
            Err(err) => {
                warn!("event=cli_query module=cli status=error id={id} error={err}");
                println!("error querying album id {id}: {err}");
            }
        }
    }

    store.close()?;
    Ok(())
}
