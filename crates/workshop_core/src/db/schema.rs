//! Fixed schema, applied idempotently on every open.
//!
//! There is no migration machinery: the schema is a constant, every
//! statement is `IF NOT EXISTS`, and an existing database is left as found.

use rusqlite::Connection;

/// The complete schema as a single batch.
pub const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Creates any missing tables and indexes. Safe to run on every connection.
pub fn apply_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}
