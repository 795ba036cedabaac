pub mod assessment;
pub mod phase;
pub mod program;

mod lenient;

pub use assessment::AssessmentAnswers;
pub use phase::{Phase, ProgramPhaseState};
pub use program::{CatalogEntry, Category, Difficulty, Program, ProgramMetadata, RaceCategory};

/// Lowercase, trim, and fold spaces/hyphens into underscores so free-text
/// answers ("First Race", " general ") compare against table keys.
pub fn normalize_key(raw: &str) -> String {
  raw
    .trim()
    .to_lowercase()
    .chars()
    .map(|c| if c == ' ' || c == '-' { '_' } else { c })
    .collect()
}
