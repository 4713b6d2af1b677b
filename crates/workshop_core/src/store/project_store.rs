//! Project store: transactional persistence for the project aggregate.
//!
//! # Responsibility
//! - Implement insert, list, fetch, update and delete against the SQLite
//!   schema, one connection and one immediate transaction per operation.
//! - Classify failures as connection, persistence or mapping errors.
//!
//! # Invariants
//! - Every operation commits exactly once on success; any early return
//!   drops the transaction guard and rolls back.
//! - `fetch_project` assembles the aggregate only after the project row and
//!   all three child queries succeeded inside the same transaction; a
//!   partially populated aggregate is never returned.
//! - Absence is a value here: missing rows surface as `Ok(None)` or
//!   `Ok(false)`, never as an error.

use std::error::Error;
use std::fmt::{Display, Formatter};

use rusqlite::{params, Transaction};

use crate::db::{txn, ConnectionProvider, DbError};
use crate::model::project::{
    Category, Material, Project, ProjectDraft, ProjectId, ProjectRecord, Step,
};
use crate::store::row::{
    category_from_row, material_from_row, project_record_from_row, step_from_row, MappingError,
};

const PROJECT_SELECT_SQL: &str = "SELECT
    project_id,
    project_name,
    estimated_hours,
    actual_hours,
    difficulty,
    notes
FROM project";

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure of a store operation.
#[derive(Debug)]
pub enum StoreError {
    /// No usable connection; nothing was begun against the database.
    Connection(DbError),
    /// A statement or transaction step failed after the transaction scope
    /// opened; the operation was rolled back.
    Persistence(rusqlite::Error),
    /// A result row did not fit the model; the operation was rolled back.
    Mapping(MappingError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connection(err) => write!(f, "{err}"),
            Self::Persistence(err) => write!(f, "persistence failure: {err}"),
            Self::Mapping(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Connection(err) => Some(err),
            Self::Persistence(err) => Some(err),
            Self::Mapping(err) => Some(err),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        Self::Connection(err)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Persistence(err)
    }
}

impl From<MappingError> for StoreError {
    fn from(err: MappingError) -> Self {
        Self::Mapping(err)
    }
}

/// Persistence contract for project aggregates.
pub trait ProjectStore {
    /// Inserts one project and returns its record with the generated id.
    fn insert_project(&self, draft: &ProjectDraft) -> StoreResult<ProjectRecord>;

    /// Lists all project records ordered by name (underlying collation).
    fn list_projects(&self) -> StoreResult<Vec<ProjectRecord>>;

    /// Fetches one full aggregate; `Ok(None)` when no such project exists.
    fn fetch_project(&self, project_id: ProjectId) -> StoreResult<Option<Project>>;

    /// Overwrites the five scalar fields; `Ok(false)` when no row matched.
    fn update_project(&self, record: &ProjectRecord) -> StoreResult<bool>;

    /// Deletes one project (children cascade); `Ok(false)` when no row
    /// matched.
    fn delete_project(&self, project_id: ProjectId) -> StoreResult<bool>;
}

/// SQLite-backed project store.
pub struct SqliteProjectStore {
    provider: ConnectionProvider,
}

impl SqliteProjectStore {
    pub fn new(provider: ConnectionProvider) -> Self {
        Self { provider }
    }
}

impl ProjectStore for SqliteProjectStore {
    fn insert_project(&self, draft: &ProjectDraft) -> StoreResult<ProjectRecord> {
        let mut conn = self.provider.acquire()?;
        let tx = txn::begin(&mut conn)?;

        tx.execute(
            "INSERT INTO project (
                project_name,
                estimated_hours,
                actual_hours,
                difficulty,
                notes
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                draft.project_name.as_str(),
                draft.estimated_hours.map(|value| value.hundredths()),
                draft.actual_hours.map(|value| value.hundredths()),
                draft.difficulty,
                draft.notes.as_deref(),
            ],
        )?;

        let project_id = txn::last_insert_id(&tx, "project")?;
        tx.commit()?;

        Ok(draft.clone().into_record(project_id))
    }

    fn list_projects(&self) -> StoreResult<Vec<ProjectRecord>> {
        let mut conn = self.provider.acquire()?;
        let tx = txn::begin(&mut conn)?;

        let records = {
            let mut stmt = tx.prepare(&format!("{PROJECT_SELECT_SQL} ORDER BY project_name;"))?;
            let mut rows = stmt.query([])?;
            let mut records = Vec::new();
            while let Some(row) = rows.next()? {
                records.push(project_record_from_row(row)?);
            }
            records
        };

        tx.commit()?;
        Ok(records)
    }

    fn fetch_project(&self, project_id: ProjectId) -> StoreResult<Option<Project>> {
        let mut conn = self.provider.acquire()?;
        let tx = txn::begin(&mut conn)?;

        let record = {
            let mut stmt = tx.prepare(&format!("{PROJECT_SELECT_SQL} WHERE project_id = ?1;"))?;
            let mut rows = stmt.query([project_id])?;
            match rows.next()? {
                Some(row) => Some(project_record_from_row(row)?),
                None => None,
            }
        };

        match record {
            None => {
                tx.commit()?;
                Ok(None)
            }
            Some(record) => {
                let materials = materials_for_project(&tx, project_id)?;
                let steps = steps_for_project(&tx, project_id)?;
                let categories = categories_for_project(&tx, project_id)?;
                tx.commit()?;
                Ok(Some(Project::assemble(record, materials, steps, categories)))
            }
        }
    }

    fn update_project(&self, record: &ProjectRecord) -> StoreResult<bool> {
        let mut conn = self.provider.acquire()?;
        let tx = txn::begin(&mut conn)?;

        let changed = tx.execute(
            "UPDATE project
             SET
                project_name = ?1,
                estimated_hours = ?2,
                actual_hours = ?3,
                difficulty = ?4,
                notes = ?5
             WHERE project_id = ?6;",
            params![
                record.project_name.as_str(),
                record.estimated_hours.map(|value| value.hundredths()),
                record.actual_hours.map(|value| value.hundredths()),
                record.difficulty,
                record.notes.as_deref(),
                record.project_id,
            ],
        )?;

        tx.commit()?;
        Ok(changed == 1)
    }

    fn delete_project(&self, project_id: ProjectId) -> StoreResult<bool> {
        let mut conn = self.provider.acquire()?;
        let tx = txn::begin(&mut conn)?;

        let changed = tx.execute("DELETE FROM project WHERE project_id = ?1;", [project_id])?;

        tx.commit()?;
        Ok(changed == 1)
    }
}

fn materials_for_project(
    tx: &Transaction<'_>,
    project_id: ProjectId,
) -> StoreResult<Vec<Material>> {
    let mut stmt = tx.prepare(
        "SELECT
            material_id,
            project_id,
            material_name,
            num_required,
            cost
        FROM material
        WHERE project_id = ?1
        ORDER BY material_id ASC;",
    )?;
    let mut rows = stmt.query([project_id])?;
    let mut materials = Vec::new();
    while let Some(row) = rows.next()? {
        materials.push(material_from_row(row)?);
    }
    Ok(materials)
}

fn steps_for_project(tx: &Transaction<'_>, project_id: ProjectId) -> StoreResult<Vec<Step>> {
    let mut stmt = tx.prepare(
        "SELECT
            step_id,
            project_id,
            step_text,
            step_order
        FROM step
        WHERE project_id = ?1
        ORDER BY step_order ASC, step_id ASC;",
    )?;
    let mut rows = stmt.query([project_id])?;
    let mut steps = Vec::new();
    while let Some(row) = rows.next()? {
        steps.push(step_from_row(row)?);
    }
    Ok(steps)
}

fn categories_for_project(
    tx: &Transaction<'_>,
    project_id: ProjectId,
) -> StoreResult<Vec<Category>> {
    let mut stmt = tx.prepare(
        "SELECT
            c.category_id,
            c.category_name
        FROM category c
        INNER JOIN project_category pc ON pc.category_id = c.category_id
        WHERE pc.project_id = ?1
        ORDER BY c.category_id ASC;",
    )?;
    let mut rows = stmt.query([project_id])?;
    let mut categories = Vec::new();
    while let Some(row) = rows.next()? {
        categories.push(category_from_row(row)?);
    }
    Ok(categories)
}
