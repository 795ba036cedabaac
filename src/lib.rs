pub mod catalog;
pub mod commands;
pub mod config;
pub mod models;
pub mod modifications;
pub mod phase;
pub mod profile;
pub mod scoring;
pub mod store;
pub mod transition;

#[cfg(test)]
mod test_utils;

pub use catalog::{normalize_catalog, CatalogError, ProgramCatalog, SkippedEntry};
pub use commands::CommandError;
pub use config::{ConfigError, EngineConfig};
pub use models::{
  AssessmentAnswers, CatalogEntry, Category, Difficulty, Phase, Program, ProgramMetadata,
  ProgramPhaseState, RaceCategory,
};
pub use modifications::{advise_modifications, Modification, ModificationInputs, ModificationType};
pub use phase::{calculate_phase, PhaseCalculation, PhaseError};
pub use profile::{build_user_profile, UserProfile};
pub use scoring::{recommend_programs, RecommendationResult, ScoredProgram};
pub use store::{ProgressStore, StoreError};
pub use transition::{
  advance_day, check_for_phase_transition, transition_user_to_phase, TransitionCheck,
  TransitionError, TransitionReason,
};
