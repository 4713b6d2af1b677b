//! Use-case services sitting between the front end and the store.

pub mod project_service;

pub use project_service::{ProjectName, ProjectService, ProjectServiceError, ServiceResult};
