//! Core library of the workshop project tracker.
//!
//! Owns the domain model, the SQLite persistence layer and the use-case
//! service; front ends stay thin and talk to [`ProjectService`].

pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use db::{ConnectionProvider, DbConfig, DbError, DbResult};
pub use logging::{default_log_level, init_logging};
pub use model::project::{
    Category, CategoryId, Decimal2, Decimal2ParseError, Material, MaterialId, Project,
    ProjectDraft, ProjectId, ProjectRecord, ProjectValidationError, Step, StepId,
};
pub use service::project_service::{
    ProjectName, ProjectService, ProjectServiceError, ServiceResult,
};
pub use store::project_store::{ProjectStore, SqliteProjectStore, StoreError, StoreResult};
pub use store::row::{MappingError, MappingResult};
