// Script to create a seeded SQLite database file from the bundled resources
// Run with: cargo run --bin create-seeded-db -- [path/to/output.db]

use db_bootstrap_lib::config::ConnectionParams;
use db_bootstrap_lib::resources::ResourceLoader;
use db_bootstrap_lib::{db, logging, prepare_database};
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let db_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("resources/seeded.db"));

    // Ensure the target directory exists
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // Remove existing if present
    if db_path.exists() {
        std::fs::remove_file(&db_path)?;
    }

    let loader = ResourceLoader::discover();
    logging::init_or_default(&loader);

    let params = ConnectionParams {
        url: Some(format!("sqlite:{}", db_path.display())),
        ..Default::default()
    };
    let mut conn = db::open(&params)?;
    let report = prepare_database(&loader, &mut conn)?;

    println!("Created seeded database at: {}", db_path.display());
    println!(
        "   Rows inserted: {} ({} statements)",
        report.total(),
        report.statements()
    );

    Ok(())
}
