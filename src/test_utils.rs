//! Test utilities shared by the unit tests
//!
//! - Assessment and catalog factories
//! - In-memory catalog and progress store
//! - Date helpers

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::NaiveDate;

use crate::catalog::{CatalogError, ProgramCatalog};
use crate::models::{
  AssessmentAnswers, CatalogEntry, Category, Difficulty, Program, ProgramMetadata,
  ProgramPhaseState, RaceCategory,
};
use crate::store::{ProgressStore, StoreError};

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

/// Answers carrying only the experience fields
pub fn answers_with(events: u32, years: f64, background: Option<&str>) -> AssessmentAnswers {
  AssessmentAnswers {
    events_completed: Some(events as f64),
    fitness_experience_years: Some(years),
    training_background: background.map(str::to_string),
    ..Default::default()
  }
}

/// Validated singles program
pub fn program(
  id: &str,
  difficulty: Difficulty,
  weekly_frequency: u32,
  category: Category,
  total_weeks: i32,
) -> Program {
  Program {
    id: id.to_string(),
    name: format!("Program {}", id),
    metadata: ProgramMetadata {
      difficulty,
      weekly_frequency,
      category,
      race_category: RaceCategory::Singles,
      total_weeks,
    },
  }
}

/// Raw catalog record for the same program `program` builds
pub fn catalog_entry(
  id: &str,
  difficulty: Difficulty,
  weekly_frequency: u32,
  category: Category,
  total_weeks: i32,
) -> CatalogEntry {
  let p = program(id, difficulty, weekly_frequency, category, total_weeks);
  CatalogEntry::new(&p.id, &p.name, &p.metadata)
}

/// A small catalog spanning every difficulty and category
pub fn sample_catalog() -> Vec<CatalogEntry> {
  let mut doubles = program("hyrox-doubles-10", Difficulty::Intermediate, 4, Category::Hyrox, 10);
  doubles.metadata.race_category = RaceCategory::DoublesRelay;

  vec![
    catalog_entry("hyrox-beginner-12", Difficulty::Beginner, 3, Category::Hyrox, 12),
    catalog_entry("hyrox-advanced-16", Difficulty::Advanced, 6, Category::Hyrox, 16),
    CatalogEntry::new(&doubles.id, &doubles.name, &doubles.metadata),
    catalog_entry("strength-base-8", Difficulty::Intermediate, 4, Category::Strength, 8),
    catalog_entry("run-build-10", Difficulty::Beginner, 4, Category::Running, 10),
    catalog_entry("hybrid-12", Difficulty::Advanced, 5, Category::Mixed, 12),
  ]
}

/// ---------------------------------------------------------------------------
/// In-Memory Collaborators
/// ---------------------------------------------------------------------------

pub struct InMemoryCatalog {
  entries: Vec<CatalogEntry>,
}

impl InMemoryCatalog {
  pub fn new(entries: Vec<CatalogEntry>) -> Self {
    Self { entries }
  }
}

impl ProgramCatalog for InMemoryCatalog {
  fn list_programs(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
    Ok(self.entries.clone())
  }
}

/// Catalog whose backend is down
pub struct UnavailableCatalog;

impl ProgramCatalog for UnavailableCatalog {
  fn list_programs(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
    Err(CatalogError::Unavailable("connection refused".to_string()))
  }
}

/// Revision-checked store keeping one record per user
#[derive(Default)]
pub struct InMemoryStore {
  states: Mutex<HashMap<String, ProgramPhaseState>>,
  writes: Mutex<usize>,
}

impl InMemoryStore {
  /// Successful writes so far
  pub fn write_count(&self) -> usize {
    *self.writes.lock().unwrap()
  }
}

impl ProgressStore for InMemoryStore {
  fn read(&self, user_id: &str) -> Result<Option<ProgramPhaseState>, StoreError> {
    Ok(self.states.lock().unwrap().get(user_id).cloned())
  }

  fn write_atomic(&self, user_id: &str, state: &ProgramPhaseState) -> Result<(), StoreError> {
    let mut states = self.states.lock().unwrap();
    let found = states.get(user_id).map(|s| s.revision).unwrap_or(0);
    let expected = state.revision.saturating_sub(1);
    if state.revision == 0 || found != expected {
      return Err(StoreError::Conflict {
        user_id: user_id.to_string(),
        expected,
        found,
      });
    }
    states.insert(user_id.to_string(), state.clone());
    *self.writes.lock().unwrap() += 1;
    Ok(())
  }
}

/// ---------------------------------------------------------------------------
/// Time Helpers
/// ---------------------------------------------------------------------------

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::normalize_catalog;
  use crate::phase::calculate_phase;

  #[test]
  fn test_sample_catalog_is_fully_valid() {
    let catalog = normalize_catalog(&sample_catalog()).unwrap();
    assert_eq!(catalog.programs.len(), sample_catalog().len());
    assert!(catalog.skipped.is_empty());
  }

  #[test]
  fn test_store_enforces_revision_sequence() {
    let store = InMemoryStore::default();
    let mut state = calculate_phase(date(2024, 1, 1), None, 12)
      .unwrap()
      .into_state("p", 2);

    // First write must carry revision 1
    assert!(store.write_atomic("u", &state).is_err());
    state.revision = 1;
    store.write_atomic("u", &state).unwrap();

    // Replaying the same revision conflicts
    assert_eq!(
      store.write_atomic("u", &state),
      Err(StoreError::Conflict {
        user_id: "u".to_string(),
        expected: 0,
        found: 1,
      })
    );
    assert_eq!(store.write_count(), 1);
    assert_eq!(store.read("u").unwrap(), Some(state));
    assert_eq!(store.read("nobody").unwrap(), None);
  }
}
