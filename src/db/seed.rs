// ABOUTME: Schema creation and seed data loading
// ABOUTME: Runs the DDL script, then the ';'-separated seed script as one committed batch

use log::{debug, info};
use rusqlite::Connection;

use super::DbError;
use crate::models::SeedReport;

/// Execute the whole DDL text as one unit and commit
pub fn run_schema(conn: &mut Connection, ddl: &str) -> Result<(), DbError> {
    let tx = conn.transaction().map_err(DbError::SchemaFailed)?;
    tx.execute_batch(ddl).map_err(DbError::SchemaFailed)?;
    tx.commit().map_err(DbError::SchemaFailed)?;

    info!("created the database tables");
    Ok(())
}

/// Split a seed script into statements on every `;`.
///
/// The split is purely textual: a `;` inside a string literal or comment
/// also ends a statement. Blank fragments are dropped.
pub fn split_statements(text: &str) -> Vec<&str> {
    text.split(';')
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect()
}

/// True when a fragment holds nothing but `--` or `/* */` comments.
/// SQLite prepares such text to no statement at all.
fn is_comment_only(fragment: &str) -> bool {
    let mut rest = fragment.trim_start();
    loop {
        if rest.is_empty() || rest.starts_with("--") {
            return true;
        }
        match rest.strip_prefix("/*") {
            Some(body) => match body.find("*/") {
                Some(end) => rest = body[end + 2..].trim_start(),
                None => return true,
            },
            None => return false,
        }
    }
}

/// Execute every seed statement in one transaction and commit once.
///
/// Nothing is kept if any statement fails.
pub fn run_seed(conn: &mut Connection, seed: &str) -> Result<SeedReport, DbError> {
    let statements = split_statements(seed);
    let tx = conn.transaction().map_err(DbError::SeedFailed)?;

    let mut report = SeedReport::default();
    for (index, statement) in statements.iter().enumerate() {
        if is_comment_only(statement) {
            debug!("seed statement #{} is only a comment, skipped", index);
            continue;
        }
        let affected = tx
            .execute(statement, [])
            .map_err(|source| DbError::SeedStatementFailed { index, source })?;
        debug!("seed statement #{} affected {} rows", index, affected);
        report.affected.push(affected);
    }

    tx.commit().map_err(DbError::SeedFailed)?;

    info!(
        "inserted {} rows from {} seed statements",
        report.total(),
        report.statements()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DDL: &str = "CREATE TABLE Person (id INT PRIMARY KEY, name VARCHAR(64))";

    fn person_count(conn: &Connection) -> usize {
        conn.query_row("SELECT COUNT(*) FROM Person", [], |row| row.get::<_, i64>(0))
            .unwrap() as usize
    }

    fn schema_db() -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        run_schema(&mut conn, DDL).unwrap();
        conn
    }

    #[test]
    fn test_split_drops_empty_fragments() {
        let text = "INSERT INTO Person VALUES (1,'Ada');;  ;INSERT INTO Person VALUES (2,'Lin');";
        assert_eq!(
            split_statements(text),
            vec![
                "INSERT INTO Person VALUES (1,'Ada')",
                "INSERT INTO Person VALUES (2,'Lin')"
            ]
        );
        assert!(split_statements("").is_empty());
        assert!(split_statements(" ; ; ").is_empty());
    }

    #[test]
    fn test_split_is_deterministic() {
        let text = "INSERT INTO a VALUES (1); INSERT INTO a VALUES (2);";
        assert_eq!(split_statements(text), split_statements(text));

        let rejoined = split_statements(text).join(";");
        assert_eq!(split_statements(&rejoined), split_statements(text));
    }

    #[test]
    fn test_split_ignores_quoting() {
        // Known limitation: the literal is cut in two
        let fragments = split_statements("INSERT INTO Person VALUES (3,'a;b')");
        assert_eq!(fragments.len(), 2);
    }

    #[test]
    fn test_schema_creates_table() {
        let conn = schema_db();
        assert_eq!(person_count(&conn), 0);
    }

    #[test]
    fn test_schema_failure() {
        let mut conn = schema_db();
        assert!(matches!(
            run_schema(&mut conn, DDL),
            Err(DbError::SchemaFailed(_))
        ));
    }

    #[test]
    fn test_seed_total_matches_row_count() {
        let mut conn = schema_db();
        let report = run_seed(
            &mut conn,
            "INSERT INTO Person VALUES (1,'Ada');INSERT INTO Person VALUES (2,'Lin');\
             INSERT INTO Person VALUES (3,'Grace'),(4,'Edsger');",
        )
        .unwrap();

        assert_eq!(report.affected, vec![1, 1, 2]);
        assert_eq!(report.total(), 4);
        assert_eq!(report.total(), person_count(&conn));
    }

    #[test]
    fn test_seed_failure_rolls_back() {
        let mut conn = schema_db();
        let result = run_seed(
            &mut conn,
            "INSERT INTO Person VALUES (1,'Ada');INSERT INTO Missing VALUES (2);",
        );

        match result {
            Err(DbError::SeedStatementFailed { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected SeedStatementFailed, got {:?}", other),
        }
        assert_eq!(person_count(&conn), 0);
    }

    #[test]
    fn test_comment_only_fragment_is_skipped() {
        let mut conn = schema_db();
        let report = run_seed(
            &mut conn,
            "/* people */ INSERT INTO Person VALUES (1,'Ada');/* end of seed */;-- trailing",
        )
        .unwrap();

        assert_eq!(report.affected, vec![1]);
        assert_eq!(person_count(&conn), 1);
    }

    #[test]
    fn test_comment_detection() {
        assert!(is_comment_only("/* a */ /* b */"));
        assert!(is_comment_only("-- note"));
        assert!(is_comment_only("/* unterminated"));
        assert!(!is_comment_only("/* a */ INSERT INTO Person VALUES (1,'x')"));
        assert!(!is_comment_only("INSERT INTO Person VALUES (1,'--')"));
    }

    #[test]
    fn test_empty_seed() {
        let mut conn = schema_db();
        let report = run_seed(&mut conn, "").unwrap();
        assert_eq!(report.total(), 0);
        assert_eq!(report.statements(), 0);
    }
}
