use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Periodization phase a user is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
  /// Repeating preparatory cycles before the event-anchored program starts
  Prep,
  /// The fixed-length program counted backward from the event
  Main,
  /// Repeating post-event cycles, indefinitely
  Maintenance,
}

impl std::fmt::Display for Phase {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Prep => write!(f, "PREP"),
      Self::Main => write!(f, "MAIN"),
      Self::Maintenance => write!(f, "MAINTENANCE"),
    }
  }
}

impl std::str::FromStr for Phase {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_uppercase().as_str() {
      "PREP" => Ok(Self::Prep),
      "MAIN" => Ok(Self::Main),
      "MAINTENANCE" => Ok(Self::Maintenance),
      _ => Err(format!("Unknown phase: {}", s)),
    }
  }
}

/// A user's position in their program, as held by the progress store.
///
/// Always written as one record. `revision` increases by one on every write
/// so the store can reject a write based on a stale read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramPhaseState {
  pub phase: Phase,
  pub program_id: String,
  /// Zero-based
  pub current_week: u32,
  /// Zero-based, 0..=6
  pub current_day: u32,
  pub start_date: NaiveDate,
  pub event_date: Option<NaiveDate>,
  pub main_program_start_date: Option<NaiveDate>,
  pub event_completed: bool,
  pub revision: u64,
}
