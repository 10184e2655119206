// ABOUTME: Main library for the db-bootstrap utility
// ABOUTME: Wires configuration, schema and seed loading and the row report into one run

use anyhow::{Context, Result};
use log::{error, info};
use rusqlite::Connection;
use std::io::Write;

// Module declarations
pub mod config;
pub mod db;
pub mod format;
pub mod logging;
pub mod models;
pub mod resources;

use config::{AppConfig, StatementCatalog};
use models::SeedReport;
use resources::ResourceLoader;

/// DDL script resource
pub const INIT_SQL_PATH: &str = "sql/init.sql";

/// Seed data script resource
pub const DATA_LOAD_PATH: &str = "sql/load.sql";

/// Create the schema and load the seed data on an open connection
pub fn prepare_database(loader: &ResourceLoader, conn: &mut Connection) -> Result<SeedReport> {
    let ddl = loader.read_as_text(INIT_SQL_PATH)?;
    db::run_schema(conn, &ddl).context("creating the schema")?;

    let seed = loader.read_as_text(DATA_LOAD_PATH)?;
    let report = db::run_seed(conn, &seed).context("loading seed data")?;
    Ok(report)
}

/// Load configuration, bootstrap the database and print the configured
/// statement's rows to `out`. Returns the number of rows printed.
pub fn bootstrap_and_report<W: Write>(loader: &ResourceLoader, out: &mut W) -> Result<usize> {
    let config = AppConfig::load(loader).context("loading connection properties")?;
    let catalog = StatementCatalog::load(loader).context("loading statement definitions")?;

    let mut conn = db::open(&config.connection)?;
    prepare_database(loader, &mut conn)?;

    let definition = catalog
        .definition(&config.report.statement)
        .with_context(|| {
            format!(
                "resolving statement {} (defined: {})",
                config.report.statement,
                catalog.names().join(", ")
            )
        })?;
    let printed = db::print_rows(&conn, &definition, out)
        .with_context(|| format!("running statement {}", definition.name))?;

    Ok(printed)
}

/// Run the whole program. Every failure ends up here, is logged, and the
/// run simply stops.
pub fn run() {
    let loader = ResourceLoader::discover();
    logging::init_or_default(&loader);
    info!("using resources from {}", loader.root().display());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if let Err(e) = bootstrap_and_report(&loader, &mut out) {
        error!("an unrecoverable error: {:#}", e);
    }
}
