// ABOUTME: SQLite connection setup from the configured connection parameters
// ABOUTME: Parses the database URL and opens exactly one connection

use log::{debug, info};
use rusqlite::Connection;
use std::path::PathBuf;

use super::DbError;
use crate::config::ConnectionParams;

/// Where the database lives, parsed from `db.url`
#[derive(Debug, Clone, PartialEq)]
pub enum DatabaseUrl {
    Memory,
    File(PathBuf),
}

impl DatabaseUrl {
    /// Accepts `sqlite::memory:`, `:memory:`, `sqlite://<path>` and `sqlite:<path>`
    pub fn parse(url: &str) -> Result<Self, DbError> {
        let url = url.trim();
        if url == ":memory:" {
            return Ok(DatabaseUrl::Memory);
        }

        let rest = url
            .strip_prefix("sqlite:")
            .ok_or_else(|| DbError::ConnectionFailed(format!("unsupported database url: {}", url)))?;

        match rest {
            ":memory:" | ":memory" => Ok(DatabaseUrl::Memory),
            "" | "//" => Err(DbError::ConnectionFailed(format!(
                "database url has no path: {}",
                url
            ))),
            _ => {
                let path = rest.strip_prefix("//").unwrap_or(rest);
                Ok(DatabaseUrl::File(PathBuf::from(path)))
            }
        }
    }
}

/// Open the database described by `params`
pub fn open(params: &ConnectionParams) -> Result<Connection, DbError> {
    let url = params
        .url
        .as_deref()
        .ok_or_else(|| DbError::ConnectionFailed("no database url configured".to_string()))?;

    if let Some(user) = &params.user {
        // SQLite has no authentication; credentials are accepted and ignored
        debug!("connecting as {}", user);
    }

    let conn = match DatabaseUrl::parse(url)? {
        DatabaseUrl::Memory => Connection::open_in_memory(),
        DatabaseUrl::File(path) => Connection::open(&path),
    }
    .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

    // Opening is lazy; touch the schema so a bad file fails here
    conn.query_row("PRAGMA schema_version", [], |row| row.get::<_, i64>(0))
        .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

    info!("connected to {}", url);
    Ok(conn)
}
