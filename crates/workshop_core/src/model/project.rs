//! Project domain model.
//!
//! # Responsibility
//! - Define the project aggregate and its child records (materials, steps,
//!   categories) as plain owned values.
//! - Provide the fixed-point `Decimal2` representation used for hour and
//!   cost fields.
//! - Own field validation that must run before a draft reaches persistence.
//!
//! # Invariants
//! - `ProjectRecord` and `Project` always carry a database-assigned
//!   identifier; `ProjectDraft` never does.
//! - `Decimal2` values are non-negative and carry exactly two fractional
//!   digits.
//! - A `Project` is only built through `Project::assemble`, after all three
//!   child collections are available.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Database-assigned project identifier.
pub type ProjectId = i64;
/// Database-assigned material identifier.
pub type MaterialId = i64;
/// Database-assigned step identifier.
pub type StepId = i64;
/// Database-assigned category identifier.
pub type CategoryId = i64;

/// Non-negative fixed-point decimal with two fractional digits.
///
/// Held as hundredths in an `i64`, so `12.5` and `12.50` are the same value
/// and round-trip storage is exact. `Display` always renders two fractional
/// digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Decimal2(i64);

/// Parse failure for `Decimal2` input text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decimal2ParseError {
    /// Input is not a decimal number at all.
    Invalid(String),
    /// Input has more than two fractional digits.
    TooPrecise(String),
    /// Input is negative; hours and costs cannot be negative.
    Negative(String),
}

impl Display for Decimal2ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(value) => write!(f, "`{value}` is not a valid decimal number"),
            Self::TooPrecise(value) => write!(f, "`{value}` has more than two decimal places"),
            Self::Negative(value) => write!(f, "`{value}` is negative; this value cannot be negative"),
        }
    }
}

impl Error for Decimal2ParseError {}

impl Decimal2 {
    /// Wraps a stored hundredths value. Returns `None` for negative input,
    /// which has no representation in this domain.
    pub fn from_hundredths(hundredths: i64) -> Option<Self> {
        if hundredths < 0 {
            None
        } else {
            Some(Self(hundredths))
        }
    }

    /// Returns the raw hundredths value used for storage and arithmetic.
    pub fn hundredths(self) -> i64 {
        self.0
    }

    /// Parses decimal text such as `12`, `12.5`, `12.50` or `.75`.
    ///
    /// # Errors
    /// - `Invalid` for non-numeric text, a trailing dot, or overflow.
    /// - `TooPrecise` for more than two fractional digits.
    /// - `Negative` for a leading minus sign.
    pub fn parse(input: &str) -> Result<Self, Decimal2ParseError> {
        let text = input.trim();
        if text.is_empty() || text.ends_with('.') {
            return Err(Decimal2ParseError::Invalid(input.to_string()));
        }
        if text.starts_with('-') {
            return Err(Decimal2ParseError::Negative(text.to_string()));
        }

        let (whole, frac) = match text.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (text, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(Decimal2ParseError::Invalid(text.to_string()));
        }
        let all_digits =
            |part: &str| part.bytes().all(|byte| byte.is_ascii_digit());
        if !all_digits(whole) || !all_digits(frac) {
            return Err(Decimal2ParseError::Invalid(text.to_string()));
        }
        if frac.len() > 2 {
            return Err(Decimal2ParseError::TooPrecise(text.to_string()));
        }

        let whole_value: i64 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| Decimal2ParseError::Invalid(text.to_string()))?
        };
        let frac_value: i64 = if frac.is_empty() {
            0
        } else {
            let parsed: i64 = frac
                .parse()
                .map_err(|_| Decimal2ParseError::Invalid(text.to_string()))?;
            if frac.len() == 1 {
                parsed * 10
            } else {
                parsed
            }
        };

        whole_value
            .checked_mul(100)
            .and_then(|value| value.checked_add(frac_value))
            .map(Self)
            .ok_or_else(|| Decimal2ParseError::Invalid(text.to_string()))
    }
}

impl Display for Decimal2 {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// Field validation failure raised before any database access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectValidationError {
    /// Project name is empty or whitespace-only.
    BlankName,
    /// Difficulty must lie in 1..=5 when present.
    DifficultyOutOfRange(u8),
}

impl Display for ProjectValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "project name cannot be blank"),
            Self::DifficultyOutOfRange(value) => {
                write!(f, "difficulty {value} is not between 1 and 5")
            }
        }
    }
}

impl Error for ProjectValidationError {}

fn validate_fields(
    project_name: &str,
    difficulty: Option<u8>,
) -> Result<(), ProjectValidationError> {
    if project_name.trim().is_empty() {
        return Err(ProjectValidationError::BlankName);
    }
    if let Some(value) = difficulty {
        if !(1..=5).contains(&value) {
            return Err(ProjectValidationError::DifficultyOutOfRange(value));
        }
    }
    Ok(())
}

/// Caller-supplied project fields before an identifier exists.
///
/// The input layer validates a draft (`validate`) before handing it to the
/// service; the store inserts it verbatim and joins on the generated id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    pub project_name: String,
    pub estimated_hours: Option<Decimal2>,
    pub actual_hours: Option<Decimal2>,
    pub difficulty: Option<u8>,
    pub notes: Option<String>,
}

impl ProjectDraft {
    /// Creates a draft with only the name set.
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            estimated_hours: None,
            actual_hours: None,
            difficulty: None,
            notes: None,
        }
    }

    /// Checks the fields that must hold before any write reaches the store.
    pub fn validate(&self) -> Result<(), ProjectValidationError> {
        validate_fields(&self.project_name, self.difficulty)
    }

    /// Joins this draft with its database-assigned identifier.
    pub fn into_record(self, project_id: ProjectId) -> ProjectRecord {
        ProjectRecord {
            project_id,
            project_name: self.project_name,
            estimated_hours: self.estimated_hours,
            actual_hours: self.actual_hours,
            difficulty: self.difficulty,
            notes: self.notes,
        }
    }
}

/// One project row: identifier plus the five scalar fields.
///
/// This is the summary shape returned by insert and list, and the input to
/// update. Child collections are only carried by the full [`Project`]
/// aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRecord {
    pub project_id: ProjectId,
    pub project_name: String,
    pub estimated_hours: Option<Decimal2>,
    pub actual_hours: Option<Decimal2>,
    pub difficulty: Option<u8>,
    pub notes: Option<String>,
}

impl ProjectRecord {
    /// Same checks as [`ProjectDraft::validate`], for update inputs.
    pub fn validate(&self) -> Result<(), ProjectValidationError> {
        validate_fields(&self.project_name, self.difficulty)
    }
}

impl Display for ProjectRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.project_id, self.project_name)?;
        if let Some(hours) = self.estimated_hours {
            write!(f, ", estimated {hours}h")?;
        }
        if let Some(hours) = self.actual_hours {
            write!(f, ", actual {hours}h")?;
        }
        if let Some(difficulty) = self.difficulty {
            write!(f, ", difficulty {difficulty}/5")?;
        }
        if let Some(notes) = &self.notes {
            write!(f, ", notes: {notes}")?;
        }
        Ok(())
    }
}

/// Material required by one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Material {
    pub material_id: MaterialId,
    pub project_id: ProjectId,
    pub material_name: String,
    pub num_required: Option<i64>,
    pub cost: Option<Decimal2>,
}

/// One ordered instruction within a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub step_id: StepId,
    pub project_id: ProjectId,
    pub step_text: String,
    pub step_order: i64,
}

/// Category a project can be filed under (many-to-many).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub category_id: CategoryId,
    pub category_name: String,
}

/// The full aggregate: one project row plus all of its child collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub project_id: ProjectId,
    pub project_name: String,
    pub estimated_hours: Option<Decimal2>,
    pub actual_hours: Option<Decimal2>,
    pub difficulty: Option<u8>,
    pub notes: Option<String>,
    pub materials: Vec<Material>,
    pub steps: Vec<Step>,
    pub categories: Vec<Category>,
}

impl Project {
    /// Builds the aggregate from its parts. The single construction point:
    /// a project with only some children attached cannot exist.
    pub fn assemble(
        record: ProjectRecord,
        materials: Vec<Material>,
        steps: Vec<Step>,
        categories: Vec<Category>,
    ) -> Self {
        Self {
            project_id: record.project_id,
            project_name: record.project_name,
            estimated_hours: record.estimated_hours,
            actual_hours: record.actual_hours,
            difficulty: record.difficulty,
            notes: record.notes,
            materials,
            steps,
            categories,
        }
    }

    /// Returns the scalar fields as a record, e.g. as the base of an update.
    pub fn record(&self) -> ProjectRecord {
        ProjectRecord {
            project_id: self.project_id,
            project_name: self.project_name.clone(),
            estimated_hours: self.estimated_hours,
            actual_hours: self.actual_hours,
            difficulty: self.difficulty,
            notes: self.notes.clone(),
        }
    }
}

fn shown<T: Display>(value: &Option<T>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "-".to_string(),
    }
}

impl Display for Project {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "[{}] {}", self.project_id, self.project_name)?;
        writeln!(f, "  estimated hours: {}", shown(&self.estimated_hours))?;
        writeln!(f, "  actual hours: {}", shown(&self.actual_hours))?;
        writeln!(f, "  difficulty: {}", shown(&self.difficulty))?;
        writeln!(f, "  notes: {}", shown(&self.notes))?;

        if self.materials.is_empty() {
            writeln!(f, "  materials: (none)")?;
        } else {
            writeln!(f, "  materials:")?;
            for material in &self.materials {
                write!(f, "    - {}", material.material_name)?;
                if let Some(count) = material.num_required {
                    write!(f, " x{count}")?;
                }
                if let Some(cost) = material.cost {
                    write!(f, " (cost {cost})")?;
                }
                writeln!(f)?;
            }
        }

        if self.steps.is_empty() {
            writeln!(f, "  steps: (none)")?;
        } else {
            writeln!(f, "  steps:")?;
            for step in &self.steps {
                writeln!(f, "    {}. {}", step.step_order, step.step_text)?;
            }
        }

        if self.categories.is_empty() {
            writeln!(f, "  categories: (none)")
        } else {
            writeln!(f, "  categories:")?;
            for category in &self.categories {
                writeln!(f, "    - {}", category.category_name)?;
            }
            Ok(())
        }
    }
}
