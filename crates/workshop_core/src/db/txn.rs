//! Explicit transaction primitives for store operations.
//!
//! # Invariants
//! - Exactly one of commit or rollback happens per `begin`: `commit`
//!   consumes the guard, and every other exit path rolls back when the
//!   guard drops.
//! - Rolling back a transaction that ran no statements is harmless, so
//!   read-only operations use the same begin/commit shape as writes.

use rusqlite::{Connection, Transaction, TransactionBehavior};

/// Starts an immediate transaction, taking the write lock up front so a
/// later statement cannot fail on lock escalation mid-operation.
pub fn begin(conn: &mut Connection) -> rusqlite::Result<Transaction<'_>> {
    conn.transaction_with_behavior(TransactionBehavior::Immediate)
}

/// Reads the identifier generated by the most recent insert into `table`,
/// from inside the same transaction as that insert.
///
/// Uses the per-table `sqlite_sequence` row maintained for AUTOINCREMENT
/// tables, so inserts into other tables cannot interfere.
pub fn last_insert_id(tx: &Transaction<'_>, table: &str) -> rusqlite::Result<i64> {
    tx.query_row(
        "SELECT seq FROM sqlite_sequence WHERE name = ?1;",
        [table],
        |row| row.get(0),
    )
}
