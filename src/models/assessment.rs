use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{lenient, normalize_key};

/// Raw questionnaire answers as submitted. Every field may be missing or
/// malformed; the accessors below coerce to neutral values (0, empty, false).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssessmentAnswers {
  #[serde(deserialize_with = "lenient::number")]
  pub events_completed: Option<f64>,
  #[serde(deserialize_with = "lenient::number")]
  pub best_finish_time_minutes: Option<f64>,
  #[serde(deserialize_with = "lenient::number")]
  pub fitness_experience_years: Option<f64>,
  #[serde(deserialize_with = "lenient::text")]
  pub training_background: Option<String>,
  #[serde(deserialize_with = "lenient::number")]
  pub weekly_training_days: Option<f64>,
  #[serde(deserialize_with = "lenient::number")]
  pub average_session_minutes: Option<f64>,
  #[serde(deserialize_with = "lenient::text")]
  pub competition_format: Option<String>,
  #[serde(deserialize_with = "lenient::number")]
  pub age: Option<f64>,
  #[serde(deserialize_with = "lenient::flag")]
  pub injury_history: Option<bool>,
  #[serde(deserialize_with = "lenient::flag")]
  pub injury_recent: Option<bool>,
  #[serde(deserialize_with = "lenient::number")]
  pub run_5k_minutes: Option<f64>,
  #[serde(deserialize_with = "lenient::number")]
  pub deadlift_kg: Option<f64>,
  #[serde(deserialize_with = "lenient::string_list")]
  pub goals: Vec<String>,
  #[serde(deserialize_with = "lenient::text")]
  pub equipment_access: Option<String>,
}

impl AssessmentAnswers {
  /// Parse a JSON payload. Field-level junk is tolerated; only a payload
  /// that is not a JSON object at all is rejected.
  pub fn from_json(json: &str) -> Result<Self, String> {
    serde_json::from_str(json).map_err(|e| format!("Failed to parse assessment answers: {}", e))
  }

  pub fn events(&self) -> u32 {
    self.events_completed.map(|v| v.floor() as u32).unwrap_or(0)
  }

  pub fn fitness_years(&self) -> f64 {
    self.fitness_experience_years.unwrap_or(0.0)
  }

  pub fn training_days(&self) -> u32 {
    self.weekly_training_days.map(|v| v.floor() as u32).unwrap_or(0)
  }

  /// Normalized background key ("crossfit", "running", ...)
  pub fn background(&self) -> Option<String> {
    self.training_background.as_deref().map(normalize_key)
  }

  pub fn competition_format_key(&self) -> Option<String> {
    self.competition_format.as_deref().map(normalize_key)
  }

  pub fn age_years(&self) -> Option<u32> {
    self.age.map(|v| v.floor() as u32).filter(|a| *a > 0)
  }

  pub fn has_injury_history(&self) -> bool {
    self.injury_history.unwrap_or(false)
  }

  pub fn has_recent_injury(&self) -> bool {
    self.injury_recent.unwrap_or(false)
  }

  /// Goals as a set of normalized keys; duplicates collapse
  pub fn goal_keys(&self) -> BTreeSet<String> {
    self.goals.iter().map(|g| normalize_key(g)).collect()
  }

  pub fn equipment_key(&self) -> Option<String> {
    self.equipment_access.as_deref().map(normalize_key)
  }
}
