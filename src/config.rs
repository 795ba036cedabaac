//! Engine configuration loaded from the environment

use std::env;
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

use crate::models::{Category, Difficulty, Program, ProgramMetadata, RaceCategory};
use crate::phase::MAX_PROGRAM_WEEKS;

const FALLBACK_PROGRAM_ID: &str = "PHASE_ENGINE_FALLBACK_PROGRAM_ID";
const FALLBACK_PROGRAM_NAME: &str = "PHASE_ENGINE_FALLBACK_PROGRAM_NAME";
const FALLBACK_DIFFICULTY: &str = "PHASE_ENGINE_FALLBACK_DIFFICULTY";
const FALLBACK_WEEKLY_FREQUENCY: &str = "PHASE_ENGINE_FALLBACK_WEEKLY_FREQUENCY";
const FALLBACK_CATEGORY: &str = "PHASE_ENGINE_FALLBACK_CATEGORY";
const FALLBACK_RACE_CATEGORY: &str = "PHASE_ENGINE_FALLBACK_RACE_CATEGORY";
const FALLBACK_TOTAL_WEEKS: &str = "PHASE_ENGINE_FALLBACK_TOTAL_WEEKS";
const REASONING_TOP_N: &str = "PHASE_ENGINE_REASONING_TOP_N";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
  #[error("Invalid configuration value for {key}: {value:?}")]
  Invalid { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
  /// Recommended when no catalog program survives normalization
  pub fallback_program: Program,
  /// Programs named in the reasoning text, 1 to 3
  pub reasoning_top_n: usize,
}

impl Default for EngineConfig {
  fn default() -> Self {
    Self {
      fallback_program: Program {
        id: "hyrox-foundations".to_string(),
        name: "Hyrox Foundations".to_string(),
        metadata: ProgramMetadata {
          difficulty: Difficulty::Intermediate,
          weekly_frequency: 4,
          category: Category::Hyrox,
          race_category: RaceCategory::Singles,
          total_weeks: 12,
        },
      },
      reasoning_top_n: 3,
    }
  }
}

impl EngineConfig {
  /// Read overrides from `PHASE_ENGINE_*` variables; unset keys keep defaults
  pub fn from_env() -> Result<Self, ConfigError> {
    let defaults = Self::default();
    let fallback = defaults.fallback_program;

    let weekly_frequency: u32 =
      parse_var(FALLBACK_WEEKLY_FREQUENCY)?.unwrap_or(fallback.metadata.weekly_frequency);
    if !(1..=14).contains(&weekly_frequency) {
      return Err(invalid(FALLBACK_WEEKLY_FREQUENCY, weekly_frequency));
    }

    let total_weeks: i32 = parse_var(FALLBACK_TOTAL_WEEKS)?.unwrap_or(fallback.metadata.total_weeks);
    if total_weeks <= 0 || total_weeks > MAX_PROGRAM_WEEKS {
      return Err(invalid(FALLBACK_TOTAL_WEEKS, total_weeks));
    }

    let reasoning_top_n: usize = parse_var(REASONING_TOP_N)?.unwrap_or(defaults.reasoning_top_n);
    if !(1..=3).contains(&reasoning_top_n) {
      return Err(invalid(REASONING_TOP_N, reasoning_top_n));
    }

    let config = Self {
      fallback_program: Program {
        id: text_var(FALLBACK_PROGRAM_ID).unwrap_or(fallback.id),
        name: text_var(FALLBACK_PROGRAM_NAME).unwrap_or(fallback.name),
        metadata: ProgramMetadata {
          difficulty: parse_var(FALLBACK_DIFFICULTY)?.unwrap_or(fallback.metadata.difficulty),
          weekly_frequency,
          category: parse_var(FALLBACK_CATEGORY)?.unwrap_or(fallback.metadata.category),
          race_category: parse_var(FALLBACK_RACE_CATEGORY)?
            .unwrap_or(fallback.metadata.race_category),
          total_weeks,
        },
      },
      reasoning_top_n,
    };

    debug!(
      fallback = %config.fallback_program.id,
      reasoning_top_n = config.reasoning_top_n,
      "engine config loaded"
    );

    Ok(config)
  }

  /// Load a `.env` file if present, then read the environment
  pub fn load() -> Result<Self, ConfigError> {
    dotenvy::dotenv().ok();
    Self::from_env()
  }
}

fn text_var(key: &str) -> Option<String> {
  env::var(key)
    .ok()
    .map(|v| v.trim().to_string())
    .filter(|v| !v.is_empty())
}

fn parse_var<T: FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
  match text_var(key) {
    None => Ok(None),
    Some(raw) => raw.parse::<T>().map(Some).map_err(|_| invalid(key, raw)),
  }
}

fn invalid(key: &str, value: impl ToString) -> ConfigError {
  ConfigError::Invalid {
    key: key.to_string(),
    value: value.to_string(),
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
