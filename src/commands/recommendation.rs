//! Recommendation command

use tracing::info;

use super::CommandError;
use crate::catalog::ProgramCatalog;
use crate::config::EngineConfig;
use crate::models::AssessmentAnswers;
use crate::scoring::{recommend_programs, RecommendationResult};

/// Rank the catalog for a submitted assessment
pub fn get_recommendations<C: ProgramCatalog + ?Sized>(
  catalog: &C,
  answers: &AssessmentAnswers,
  config: &EngineConfig,
) -> Result<RecommendationResult, CommandError> {
  let entries = catalog.list_programs()?;
  let result = recommend_programs(answers, &entries, config)?;

  info!(
    candidates = entries.len(),
    skipped = result.skipped.len(),
    top = ?result.top_program().map(|p| p.program_id.as_str()),
    "recommendations built"
  );

  Ok(result)
}
