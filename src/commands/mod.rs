pub mod progress;
pub mod recommendation;

use serde::Serialize;
use thiserror::Error;

use crate::catalog::{CatalogError, ProgramCatalog};
use crate::config::EngineConfig;
use crate::models::Program;
use crate::phase::PhaseError;
use crate::store::StoreError;
use crate::transition::TransitionError;

/// Error returned to request handlers
#[derive(Error, Debug)]
pub enum CommandError {
  #[error("Program not found: {0}")]
  ProgramNotFound(String),

  #[error("No program assigned for user {0}")]
  NoPhaseState(String),

  #[error(transparent)]
  Catalog(#[from] CatalogError),

  #[error(transparent)]
  Phase(#[from] PhaseError),

  #[error(transparent)]
  Store(#[from] StoreError),

  #[error(transparent)]
  Transition(#[from] TransitionError),
}

impl Serialize for CommandError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

/// Catalog program by id, or the configured fallback when that is the id asked for
fn resolve_program<C: ProgramCatalog + ?Sized>(
  catalog: &C,
  config: &EngineConfig,
  program_id: &str,
) -> Result<Program, CommandError> {
  if let Some(program) = catalog.find_program(program_id)? {
    return Ok(program);
  }
  if config.fallback_program.id == program_id {
    return Ok(config.fallback_program.clone());
  }
  Err(CommandError::ProgramNotFound(program_id.to_string()))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::{sample_catalog, InMemoryCatalog, UnavailableCatalog};

  #[test]
  fn test_resolve_program_prefers_catalog() {
    let catalog = InMemoryCatalog::new(sample_catalog());
    let program = resolve_program(&catalog, &EngineConfig::default(), "strength-base-8").unwrap();
    assert_eq!(program.metadata.total_weeks, 8);
  }

  #[test]
  fn test_resolve_program_falls_back_to_default_program() {
    let catalog = InMemoryCatalog::new(Vec::new());
    let config = EngineConfig::default();
    let program = resolve_program(&catalog, &config, &config.fallback_program.id).unwrap();
    assert_eq!(program, config.fallback_program);
  }

  #[test]
  fn test_resolve_unknown_program() {
    let catalog = InMemoryCatalog::new(sample_catalog());
    let err = resolve_program(&catalog, &EngineConfig::default(), "nope").unwrap_err();
    assert!(matches!(err, CommandError::ProgramNotFound(ref id) if id == "nope"));
  }

  #[test]
  fn test_errors_serialize_as_message() {
    let err = CommandError::from(StoreError::Backend("disk full".to_string()));
    assert_eq!(
      serde_json::to_string(&err).unwrap(),
      "\"Progress store error: disk full\""
    );

    let err = resolve_program(&UnavailableCatalog, &EngineConfig::default(), "x").unwrap_err();
    assert!(matches!(err, CommandError::Catalog(CatalogError::Unavailable(_))));
  }
}
