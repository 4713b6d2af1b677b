//! Domain model types shared by every layer.
//!
//! # Responsibility
//! - Declare the project aggregate, its child records and value types.
//! - Keep the model free of SQL and I/O; persistence lives in `store`.

pub mod project;

pub use project::{
    Category, CategoryId, Decimal2, Decimal2ParseError, Material, MaterialId, Project,
    ProjectDraft, ProjectId, ProjectRecord, ProjectValidationError, Step, StepId,
};
