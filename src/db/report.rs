// ABOUTME: Runs a configured statement and prints one formatted line per row
// ABOUTME: Drives the cursor, extraction strategies and formatter without buffering rows

use log::debug;
use rusqlite::Connection;
use std::io::Write;

use super::extract::{extract_row, Cursor};
use super::DbError;
use crate::config::StatementDefinition;
use crate::format;

/// Run `definition` and write each rendered row to `out`, returning how many
/// rows were printed
pub fn print_rows<W: Write>(
    conn: &Connection,
    definition: &StatementDefinition,
    out: &mut W,
) -> Result<usize, DbError> {
    let mut stmt = conn
        .prepare(&definition.statement)
        .map_err(DbError::QueryFailed)?;
    let column_count = stmt.column_count();
    let mut cursor = Cursor::new(stmt.query([]).map_err(DbError::QueryFailed)?);

    let mut printed = 0;
    while let Some(row) = cursor.advance()? {
        let values = extract_row(row, column_count, &definition.strategy)?;
        let line = format::render(&definition.format, &values)?;
        out.write_all(line.as_bytes())?;
        printed += 1;
    }
    out.flush()?;

    debug!("{} printed {} rows", definition.name, printed);
    Ok(printed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ExtractionStrategy;

    fn people() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE Person (id INT PRIMARY KEY, name VARCHAR(64));
             INSERT INTO Person VALUES (2,'Lin');
             INSERT INTO Person VALUES (1,'Ada');",
        )
        .unwrap();
        conn
    }

    fn definition(statement: &str, strategy: &[ExtractionStrategy], format: &str) -> StatementDefinition {
        StatementDefinition {
            name: "Person.selectAll".to_string(),
            statement: statement.to_string(),
            strategy: strategy.to_vec(),
            format: format.to_string(),
        }
    }

    #[test]
    fn test_prints_each_row() {
        let conn = people();
        let def = definition(
            "SELECT id, name FROM Person ORDER BY id",
            &[ExtractionStrategy::Int, ExtractionStrategy::String],
            "%d %s%n",
        );

        let mut out = Vec::new();
        let printed = print_rows(&conn, &def, &mut out).unwrap();

        assert_eq!(printed, 2);
        assert_eq!(String::from_utf8(out).unwrap(), "1 Ada\n2 Lin\n");
    }

    #[test]
    fn test_null_id_prints_as_zero() {
        let conn = people();
        conn.execute("INSERT INTO Person VALUES (NULL, 'Grace')", []).unwrap();
        let def = definition(
            "SELECT id, name FROM Person WHERE name = 'Grace'",
            &[ExtractionStrategy::Int, ExtractionStrategy::String],
            "%d %s%n",
        );

        let mut out = Vec::new();
        print_rows(&conn, &def, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "0 Grace\n");
    }

    #[test]
    fn test_empty_result_prints_nothing() {
        let conn = people();
        let def = definition(
            "SELECT id FROM Person WHERE id > 10",
            &[ExtractionStrategy::Int],
            "%d%n",
        );

        let mut out = Vec::new();
        assert_eq!(print_rows(&conn, &def, &mut out).unwrap(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_mismatch_stops_the_report() {
        let conn = people();
        let def = definition(
            "SELECT id, name FROM Person ORDER BY id",
            &[ExtractionStrategy::Int],
            "%d%n",
        );

        let mut out = Vec::new();
        let result = print_rows(&conn, &def, &mut out);
        assert!(matches!(result, Err(DbError::ExtractionFailed(_))));
        assert!(out.is_empty());
    }

    #[test]
    fn test_format_error() {
        let conn = people();
        let def = definition(
            "SELECT name FROM Person ORDER BY id",
            &[ExtractionStrategy::String],
            "%d%n",
        );

        let mut out = Vec::new();
        assert!(matches!(
            print_rows(&conn, &def, &mut out),
            Err(DbError::Format(_))
        ));
    }

    #[test]
    fn test_bad_query() {
        let conn = people();
        let def = definition("SELECT * FROM Nobody", &[ExtractionStrategy::Int], "%d%n");

        let mut out = Vec::new();
        assert!(matches!(
            print_rows(&conn, &def, &mut out),
            Err(DbError::QueryFailed(_))
        ));
    }
}
