//! Project use-case service.
//!
//! # Responsibility
//! - Present the operations the front end calls, over any [`ProjectStore`].
//! - Reclassify absence: where the store reports `None`/`false`, this layer
//!   raises [`ProjectServiceError::ProjectNotFound`].
//!
//! # Invariants
//! - The service holds no state of its own; every call is a fresh pass
//!   through the store.

use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::model::project::{Project, ProjectDraft, ProjectId, ProjectRecord};
use crate::store::project_store::{ProjectStore, StoreError};

pub type ServiceResult<T> = Result<T, ProjectServiceError>;

/// Failure of a service operation.
#[derive(Debug)]
pub enum ProjectServiceError {
    /// No project row exists under the given identifier.
    ProjectNotFound(ProjectId),
    /// Store-level failure, forwarded with its cause chain intact.
    Store(StoreError),
}

impl Display for ProjectServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProjectNotFound(project_id) => {
                write!(f, "project with ID={project_id} does not exist")
            }
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ProjectServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ProjectNotFound(_) => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for ProjectServiceError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

/// Identifier and name of one project, for listing menus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectName {
    pub project_id: ProjectId,
    pub project_name: String,
}

/// Use-case facade over a project store implementation.
pub struct ProjectService<S: ProjectStore> {
    store: S,
}

impl<S: ProjectStore> ProjectService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Adds one project and returns its record with the generated id.
    ///
    /// Field validation runs before this layer (`ProjectDraft::validate`);
    /// the service forwards the draft untouched.
    pub fn add_project(&self, draft: &ProjectDraft) -> ServiceResult<ProjectRecord> {
        Ok(self.store.insert_project(draft)?)
    }

    /// Lists id/name pairs sorted by identifier ascending.
    ///
    /// The store's own listing is name-ordered; this view re-sorts by id so
    /// menus show a stable numeric order. Callers must not assume the two
    /// orders agree.
    pub fn list_project_names(&self) -> ServiceResult<Vec<ProjectName>> {
        let mut names: Vec<ProjectName> = self
            .store
            .list_projects()?
            .into_iter()
            .map(|record| ProjectName {
                project_id: record.project_id,
                project_name: record.project_name,
            })
            .collect();
        names.sort_by_key(|name| name.project_id);
        Ok(names)
    }

    /// Fetches the full aggregate; absence is an error at this layer.
    pub fn fetch_project(&self, project_id: ProjectId) -> ServiceResult<Project> {
        self.store
            .fetch_project(project_id)?
            .ok_or(ProjectServiceError::ProjectNotFound(project_id))
    }

    /// Overwrites the five scalar fields of an existing project.
    pub fn modify_project_details(&self, record: &ProjectRecord) -> ServiceResult<()> {
        if self.store.update_project(record)? {
            Ok(())
        } else {
            Err(ProjectServiceError::ProjectNotFound(record.project_id))
        }
    }

    /// Deletes one project by identifier.
    pub fn delete_project(&self, project_id: ProjectId) -> ServiceResult<()> {
        if self.store.delete_project(project_id)? {
            Ok(())
        } else {
            Err(ProjectServiceError::ProjectNotFound(project_id))
        }
    }
}
