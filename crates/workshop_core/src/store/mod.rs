//! Persistence layer for project aggregates.
//!
//! # Responsibility
//! - Define the [`ProjectStore`] contract and its SQLite implementation.
//! - Keep row mapping (`row`) separate from statement plumbing
//!   (`project_store`).

pub mod project_store;
pub mod row;

pub use project_store::{ProjectStore, SqliteProjectStore, StoreError, StoreResult};
pub use row::{MappingError, MappingResult};
