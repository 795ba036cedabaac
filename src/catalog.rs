//! Catalog normalization
//!
//! The catalog collaborator hands over loosely-typed records (see
//! `CatalogEntry`). This module turns them into validated `Program`s. A
//! record with missing or unrecognized fields is skipped with a diagnostic;
//! a record with a non-positive program length is a catalog defect and
//! fails the whole batch.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::models::{CatalogEntry, Category, Difficulty, Program, ProgramMetadata, RaceCategory};
use crate::phase::MAX_PROGRAM_WEEKS;

// ---------------------------------------------------------------------------
// Error Types
// ---------------------------------------------------------------------------

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Program {program} is missing required field `{field}`")]
    MissingField { program: String, field: &'static str },

    #[error("Program {program} has unrecognized {field}: {value}")]
    UnknownValue {
        program: String,
        field: &'static str,
        value: String,
    },

    #[error("Program {program} has invalid total_weeks {total_weeks} (must be 1 to {max})", max = MAX_PROGRAM_WEEKS)]
    InvalidTotalWeeks { program: String, total_weeks: i64 },

    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

impl CatalogError {
    /// Configuration defects must reach an operator instead of being skipped
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::InvalidTotalWeeks { .. })
    }
}

// ---------------------------------------------------------------------------
// Catalog Boundary
// ---------------------------------------------------------------------------

/// Source of candidate programs. Implemented outside this crate.
pub trait ProgramCatalog {
    fn list_programs(&self) -> Result<Vec<CatalogEntry>, CatalogError>;

    /// Look up and normalize a single program by id
    fn find_program(&self, program_id: &str) -> Result<Option<Program>, CatalogError> {
        self.list_programs()?
            .iter()
            .find(|entry| entry.id.as_deref() == Some(program_id))
            .map(normalize_entry)
            .transpose()
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// A catalog record left out of ranking, and why
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedEntry {
    pub id: Option<String>,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct NormalizedCatalog {
    /// In original catalog order
    pub programs: Vec<Program>,
    pub skipped: Vec<SkippedEntry>,
}

/// Validate one catalog record
pub fn normalize_entry(entry: &CatalogEntry) -> Result<Program, CatalogError> {
    let id = entry.id.clone().ok_or_else(|| CatalogError::MissingField {
        program: "<unnamed>".to_string(),
        field: "id",
    })?;

    let missing = |field: &'static str| CatalogError::MissingField {
        program: id.clone(),
        field,
    };
    let unknown = |field: &'static str, value: &str| CatalogError::UnknownValue {
        program: id.clone(),
        field,
        value: value.to_string(),
    };

    let total_weeks = entry.total_weeks.ok_or_else(|| missing("total_weeks"))?;
    if total_weeks <= 0 || total_weeks > MAX_PROGRAM_WEEKS as i64 {
        return Err(CatalogError::InvalidTotalWeeks {
            program: id.clone(),
            total_weeks,
        });
    }

    let difficulty_raw = entry.difficulty.as_deref().ok_or_else(|| missing("difficulty"))?;
    let difficulty = difficulty_raw
        .parse::<Difficulty>()
        .map_err(|_| unknown("difficulty", difficulty_raw))?;

    let weekly_frequency = entry
        .weekly_frequency
        .ok_or_else(|| missing("weekly_frequency"))?;
    if weekly_frequency <= 0 || weekly_frequency > 14 {
        return Err(unknown("weekly_frequency", &weekly_frequency.to_string()));
    }

    let category_raw = entry.category.as_deref().ok_or_else(|| missing("category"))?;
    let category = category_raw
        .parse::<Category>()
        .map_err(|_| unknown("category", category_raw))?;

    let race_raw = entry
        .race_category
        .as_deref()
        .ok_or_else(|| missing("race_category"))?;
    let race_category = race_raw
        .parse::<RaceCategory>()
        .map_err(|_| unknown("race_category", race_raw))?;

    Ok(Program {
        name: entry.name.clone().unwrap_or_else(|| id.clone()),
        id,
        metadata: ProgramMetadata {
            difficulty,
            weekly_frequency: weekly_frequency as u32,
            category,
            race_category,
            total_weeks: total_weeks as i32,
        },
    })
}

/// Validate a whole catalog, skipping malformed records.
///
/// Fails only on configuration errors (a non-positive program length).
pub fn normalize_catalog(entries: &[CatalogEntry]) -> Result<NormalizedCatalog, CatalogError> {
    let mut catalog = NormalizedCatalog::default();

    for entry in entries {
        match normalize_entry(entry) {
            Ok(program) => catalog.programs.push(program),
            Err(e) if e.is_configuration_error() => return Err(e),
            Err(e) => {
                warn!(program = ?entry.id, error = %e, "skipping malformed catalog entry");
                catalog.skipped.push(SkippedEntry {
                    id: entry.id.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(catalog)
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------
