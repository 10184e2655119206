// ABOUTME: Database module exports for db-bootstrap
// ABOUTME: Connection setup, schema and seed loading, row extraction and the report

pub mod connection;
pub mod extract;
pub mod report;
pub mod seed;

pub use connection::{open, DatabaseUrl};
pub use extract::{extract_row, Cursor, CursorState, ExtractionStrategy};
pub use report::print_rows;
pub use seed::{run_schema, run_seed, split_statements};

use thiserror::Error;

use crate::format::FormatError;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Schema execution failed: {0}")]
    SchemaFailed(#[source] rusqlite::Error),
    #[error("Seed load failed: {0}")]
    SeedFailed(#[source] rusqlite::Error),
    #[error("Seed statement #{index} failed: {source}")]
    SeedStatementFailed {
        index: usize,
        #[source]
        source: rusqlite::Error,
    },
    #[error("Query failed: {0}")]
    QueryFailed(#[source] rusqlite::Error),
    #[error("Column extraction failed: {0}")]
    ExtractionFailed(String),
    #[error("Row formatting failed: {0}")]
    Format(#[from] FormatError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
