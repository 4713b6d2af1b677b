//! Row-to-entity mapping for store queries.
//!
//! # Responsibility
//! - Map result rows into model types by column name, independent of column
//!   order in the query.
//! - Classify shape problems (missing column) apart from value problems
//!   (type mismatch, out-of-domain value).
//!
//! # Invariants
//! - Mappers are pure: they read one row and never touch the connection.
//! - Persisted state that cannot enter the model (negative amounts,
//!   difficulty outside 1..=5) is rejected here rather than clamped.

use std::error::Error;
use std::fmt::{Display, Formatter};

use rusqlite::types::FromSql;
use rusqlite::Row;

use crate::model::project::{Category, Decimal2, Material, ProjectRecord, Step};

pub type MappingResult<T> = Result<T, MappingError>;

/// Mismatch between a query result row and the entity mapped from it.
#[derive(Debug)]
pub enum MappingError {
    /// The result row carries no column under the expected name.
    MissingColumn {
        entity: &'static str,
        column: &'static str,
    },
    /// The column exists but its value cannot enter the domain model.
    InvalidValue {
        entity: &'static str,
        column: &'static str,
        message: String,
    },
}

impl Display for MappingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingColumn { entity, column } => {
                write!(f, "column `{column}` missing while mapping {entity} row")
            }
            Self::InvalidValue {
                entity,
                column,
                message,
            } => {
                write!(
                    f,
                    "invalid value in `{column}` while mapping {entity} row: {message}"
                )
            }
        }
    }
}

impl Error for MappingError {}

fn column<T: FromSql>(
    row: &Row<'_>,
    entity: &'static str,
    column: &'static str,
) -> MappingResult<T> {
    row.get(column).map_err(|err| match err {
        rusqlite::Error::InvalidColumnName(_) => MappingError::MissingColumn { entity, column },
        other => MappingError::InvalidValue {
            entity,
            column,
            message: other.to_string(),
        },
    })
}

/// Reads a nullable hundredths amount and rejects negatives.
fn amount(
    row: &Row<'_>,
    entity: &'static str,
    name: &'static str,
) -> MappingResult<Option<Decimal2>> {
    match column::<Option<i64>>(row, entity, name)? {
        None => Ok(None),
        Some(raw) => Decimal2::from_hundredths(raw).map(Some).ok_or_else(|| {
            MappingError::InvalidValue {
                entity,
                column: name,
                message: format!("negative amount `{raw}`"),
            }
        }),
    }
}

fn difficulty(row: &Row<'_>, entity: &'static str) -> MappingResult<Option<u8>> {
    match column::<Option<i64>>(row, entity, "difficulty")? {
        None => Ok(None),
        Some(raw) if (1..=5).contains(&raw) => Ok(Some(raw as u8)),
        Some(raw) => Err(MappingError::InvalidValue {
            entity,
            column: "difficulty",
            message: format!("difficulty `{raw}` is outside 1..=5"),
        }),
    }
}

pub fn project_record_from_row(row: &Row<'_>) -> MappingResult<ProjectRecord> {
    Ok(ProjectRecord {
        project_id: column(row, "project", "project_id")?,
        project_name: column(row, "project", "project_name")?,
        estimated_hours: amount(row, "project", "estimated_hours")?,
        actual_hours: amount(row, "project", "actual_hours")?,
        difficulty: difficulty(row, "project")?,
        notes: column(row, "project", "notes")?,
    })
}

pub fn material_from_row(row: &Row<'_>) -> MappingResult<Material> {
    Ok(Material {
        material_id: column(row, "material", "material_id")?,
        project_id: column(row, "material", "project_id")?,
        material_name: column(row, "material", "material_name")?,
        num_required: column(row, "material", "num_required")?,
        cost: amount(row, "material", "cost")?,
    })
}

pub fn step_from_row(row: &Row<'_>) -> MappingResult<Step> {
    Ok(Step {
        step_id: column(row, "step", "step_id")?,
        project_id: column(row, "step", "project_id")?,
        step_text: column(row, "step", "step_text")?,
        step_order: column(row, "step", "step_order")?,
    })
}

pub fn category_from_row(row: &Row<'_>) -> MappingResult<Category> {
    Ok(Category {
        category_id: column(row, "category", "category_id")?,
        category_name: column(row, "category", "category_name")?,
    })
}
