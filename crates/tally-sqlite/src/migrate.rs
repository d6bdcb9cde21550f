//! Schema setup for rule stores
//!
//! The bookkeeping script runs on every open and records itself. Rule and
//! name tables follow as versioned steps, each applied once in its own
//! transaction and listed in `schema_migrations` afterwards.

use std::collections::HashSet;

use rusqlite::Connection;
use tracing::debug;

use crate::error::{Result, SqliteError};

/// Creates `schema_migrations` if missing; idempotent
const BOOKKEEPING: &str = include_str!("../migrations/000_create_schema_migrations.sql");

/// Versioned schema steps, in apply order
const STEPS: &[(&str, &str)] = &[
    ("001", include_str!("../migrations/001_create_rules_table.sql")),
    ("002", include_str!("../migrations/002_create_names_tables.sql")),
];

/// Bring a database up to the current schema.
///
/// # Errors
///
/// Returns [`SqliteError::Migration`] naming the step whose SQL failed; that
/// step is rolled back and later steps are not attempted.
pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(BOOKKEEPING)
        .map_err(|e| SqliteError::Migration(format!("000: {}", e)))?;

    let applied = applied_versions(conn)?;
    for (version, sql) in STEPS.iter().filter(|(v, _)| !applied.contains(*v)) {
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(sql)
            .map_err(|e| SqliteError::Migration(format!("{}: {}", version, e)))?;
        tx.execute(
            "INSERT INTO schema_migrations (version, applied_at) VALUES (?, CURRENT_TIMESTAMP)",
            [version],
        )?;
        tx.commit()?;
        debug!(version, "applied schema step");
    }
    Ok(())
}

/// Versions already recorded in `schema_migrations`
fn applied_versions(conn: &Connection) -> Result<HashSet<String>> {
    let mut stmt = conn.prepare("SELECT version FROM schema_migrations")?;
    let versions = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<HashSet<String>>>()?;
    Ok(versions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_exists(conn: &Connection, name: &str) -> bool {
        conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?")
            .unwrap()
            .exists([name])
            .unwrap()
    }

    #[test]
    fn test_migrate_creates_tables() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        for table in ["schema_migrations", "rules", "entities", "categories"] {
            assert!(table_exists(&conn, table), "missing table {table}");
        }
    }

    #[test]
    fn test_migrate_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        migrate(&conn).unwrap();
        migrate(&conn).unwrap();

        let mut versions: Vec<String> = applied_versions(&conn).unwrap().into_iter().collect();
        versions.sort();
        assert_eq!(versions, vec!["000", "001", "002"]);
    }

    #[test]
    fn test_only_missing_steps_are_applied() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(BOOKKEEPING).unwrap();
        conn.execute_batch(STEPS[0].1).unwrap();
        conn.execute(
            "INSERT INTO schema_migrations (version, applied_at) VALUES ('001', CURRENT_TIMESTAMP)",
            [],
        )
        .unwrap();

        migrate(&conn).unwrap();

        assert!(table_exists(&conn, "entities"));
        assert_eq!(applied_versions(&conn).unwrap().len(), 3);
    }

    #[test]
    fn test_failed_step_is_reported_and_rolled_back() {
        let conn = Connection::open_in_memory().unwrap();
        // A stray table with the same name makes step 001 fail
        conn.execute_batch("CREATE TABLE rules (x INTEGER)").unwrap();

        let err = migrate(&conn).unwrap_err();
        assert!(matches!(err, SqliteError::Migration(ref msg) if msg.starts_with("001")));
        assert!(!applied_versions(&conn).unwrap().contains("001"));
        assert!(!table_exists(&conn, "entities"));
    }
}
