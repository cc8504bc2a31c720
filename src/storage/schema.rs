//! Employee table definition.

use rusqlite::Connection;

use crate::storage::error::StorageResult;

const CREATE_EMPLOYEES: &str = "
    CREATE TABLE IF NOT EXISTS employees (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        org_id      TEXT NOT NULL,
        firstname   TEXT NOT NULL,
        lastname    TEXT NOT NULL,
        contact     TEXT NOT NULL,
        department  TEXT NOT NULL,
        position    TEXT NOT NULL,
        location    TEXT NOT NULL,
        status      TEXT NOT NULL,
        extra       TEXT NOT NULL DEFAULT '{}'
    );
    CREATE INDEX IF NOT EXISTS idx_employees_org ON employees (org_id);
";

/// Create the employee table and its tenant index if missing.
pub fn initialize_schema(conn: &Connection) -> StorageResult<()> {
    conn.execute_batch(CREATE_EMPLOYEES)?;
    Ok(())
}
