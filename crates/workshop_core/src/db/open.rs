//! Connection provider: one prepared connection per store operation.
//!
//! # Responsibility
//! - Hold the fixed database target chosen at process start.
//! - Open, configure and schema-check a fresh connection on demand.
//!
//! # Invariants
//! - `acquire` either returns a fully prepared connection or an error; no
//!   half-configured connection escapes.
//! - Acquisition failures surface before any transaction exists, so they
//!   never imply a rollback.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use log::{error, info};
use rusqlite::Connection;

use super::schema::apply_schema;
use super::{DbError, DbResult};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Fixed connection configuration, built once from startup options.
#[derive(Debug, Clone)]
pub struct DbConfig {
    path: PathBuf,
}

impl DbConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Display form of the target, used in log events and error messages.
    pub fn target(&self) -> String {
        self.path.display().to_string()
    }
}

/// Opens one database connection per store operation.
///
/// The provider owns no connection state, so it can be shared freely; the
/// operating system file lock plus SQLite's busy timeout arbitrate
/// concurrent access to the same file.
#[derive(Debug, Clone)]
pub struct ConnectionProvider {
    config: DbConfig,
}

impl ConnectionProvider {
    pub fn new(config: DbConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DbConfig {
        &self.config
    }

    /// Opens a fresh connection, enables foreign keys, sets the busy
    /// timeout and applies the schema.
    ///
    /// # Errors
    /// [`DbError::Open`] when the file cannot be opened, [`DbError::Bootstrap`]
    /// when per-connection preparation fails.
    pub fn acquire(&self) -> DbResult<Connection> {
        let started_at = Instant::now();
        let target = self.config.target();
        info!("event=db_open module=db status=start target={target}");

        let conn = match Connection::open(self.config.path()) {
            Ok(conn) => conn,
            Err(err) => {
                error!(
                    "event=db_open module=db status=error target={target} duration_ms={} error_code=db_open_failed error={err}",
                    started_at.elapsed().as_millis()
                );
                return Err(DbError::Open {
                    target,
                    source: err,
                });
            }
        };

        if let Err(err) = prepare_connection(&conn) {
            error!(
                "event=db_open module=db status=error target={target} duration_ms={} error_code=db_bootstrap_failed error={err}",
                started_at.elapsed().as_millis()
            );
            return Err(DbError::Bootstrap {
                target,
                source: err,
            });
        }

        info!(
            "event=db_open module=db status=ok target={target} duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(conn)
    }
}

fn prepare_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_schema(conn)?;
    Ok(())
}
