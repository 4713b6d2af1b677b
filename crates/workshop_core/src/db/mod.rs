//! SQLite access layer: configuration, bootstrap and transaction plumbing.
//!
//! # Responsibility
//! - Open connections against the configured database file and prepare each
//!   one (foreign keys, busy timeout, schema) before handing it out.
//! - Provide the explicit transaction primitives store operations build on.
//!
//! # Invariants
//! - Every connection returned by [`ConnectionProvider::acquire`] has the
//!   full schema present and foreign key enforcement on.
//! - No connection is cached; each store operation acquires and drops its
//!   own.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod open;
pub mod schema;
pub mod txn;

pub use open::{ConnectionProvider, DbConfig};

pub type DbResult<T> = Result<T, DbError>;

/// Failure to produce a usable connection.
///
/// Both variants mean no transaction was started; callers can retry without
/// cleanup concerns.
#[derive(Debug)]
pub enum DbError {
    /// The database file could not be opened at all.
    Open {
        target: String,
        source: rusqlite::Error,
    },
    /// The file opened but per-connection preparation failed.
    Bootstrap {
        target: String,
        source: rusqlite::Error,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { target, source } => {
                write!(f, "cannot open database at `{target}`: {source}")
            }
            Self::Bootstrap { target, source } => {
                write!(f, "cannot prepare database at `{target}`: {source}")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Bootstrap { source, .. } => Some(source),
        }
    }
}
