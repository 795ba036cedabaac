use serde::{Deserialize, Serialize};

use super::{lenient, normalize_key};

/// ---------------------------------------------------------------------------
/// Difficulty
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
  Beginner,
  Intermediate,
  Advanced,
}

impl Difficulty {
  /// Position on the ladder, used for level distance
  pub fn rank(self) -> i32 {
    match self {
      Self::Beginner => 0,
      Self::Intermediate => 1,
      Self::Advanced => 2,
    }
  }
}

impl std::fmt::Display for Difficulty {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Beginner => write!(f, "beginner"),
      Self::Intermediate => write!(f, "intermediate"),
      Self::Advanced => write!(f, "advanced"),
    }
  }
}

impl std::str::FromStr for Difficulty {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match normalize_key(s).as_str() {
      "beginner" => Ok(Self::Beginner),
      "intermediate" => Ok(Self::Intermediate),
      "advanced" => Ok(Self::Advanced),
      _ => Err(format!("Unknown difficulty: {}", s)),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Category
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
  Hyrox,
  Strength,
  Running,
  Mixed,
}

impl Category {
  pub const ALL: [Category; 4] = [Self::Hyrox, Self::Strength, Self::Running, Self::Mixed];
}

impl std::fmt::Display for Category {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Hyrox => write!(f, "hyrox"),
      Self::Strength => write!(f, "strength"),
      Self::Running => write!(f, "running"),
      Self::Mixed => write!(f, "mixed"),
    }
  }
}

impl std::str::FromStr for Category {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match normalize_key(s).as_str() {
      "hyrox" => Ok(Self::Hyrox),
      "strength" => Ok(Self::Strength),
      "running" => Ok(Self::Running),
      "mixed" => Ok(Self::Mixed),
      _ => Err(format!("Unknown category: {}", s)),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Race Category
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaceCategory {
  Singles,
  DoublesRelay,
}

impl std::fmt::Display for RaceCategory {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Singles => write!(f, "singles"),
      Self::DoublesRelay => write!(f, "doubles_relay"),
    }
  }
}

impl std::str::FromStr for RaceCategory {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match normalize_key(s).as_str() {
      "singles" => Ok(Self::Singles),
      "doubles_relay" | "doubles" | "relay" => Ok(Self::DoublesRelay),
      _ => Err(format!("Unknown race category: {}", s)),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Program Metadata
/// ---------------------------------------------------------------------------

/// Validated metadata used for scoring and phase math
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramMetadata {
  pub difficulty: Difficulty,
  pub weekly_frequency: u32,
  pub category: Category,
  pub race_category: RaceCategory,
  pub total_weeks: i32,
}

/// A catalog program after normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
  pub id: String,
  pub name: String,
  pub metadata: ProgramMetadata,
}

/// Catalog record as the catalog service hands it over.
///
/// Older exports used different field names (`level`, `frequency`,
/// `weeks`, ...) and free-text enum values, so everything is optional and
/// loosely typed here. See `catalog::normalize_entry`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogEntry {
  #[serde(deserialize_with = "lenient::text")]
  pub id: Option<String>,
  #[serde(alias = "title", deserialize_with = "lenient::text")]
  pub name: Option<String>,
  #[serde(alias = "level", deserialize_with = "lenient::text")]
  pub difficulty: Option<String>,
  #[serde(
    alias = "frequency",
    alias = "sessions_per_week",
    deserialize_with = "lenient::integer"
  )]
  pub weekly_frequency: Option<i64>,
  #[serde(alias = "focus", deserialize_with = "lenient::text")]
  pub category: Option<String>,
  #[serde(alias = "race_type", alias = "format", deserialize_with = "lenient::text")]
  pub race_category: Option<String>,
  #[serde(alias = "weeks", alias = "duration_weeks", deserialize_with = "lenient::integer")]
  pub total_weeks: Option<i64>,
}

impl CatalogEntry {
  /// Entry carrying every field, for catalogs built in code
  pub fn new(id: &str, name: &str, metadata: &ProgramMetadata) -> Self {
    Self {
      id: Some(id.to_string()),
      name: Some(name.to_string()),
      difficulty: Some(metadata.difficulty.to_string()),
      weekly_frequency: Some(metadata.weekly_frequency as i64),
      category: Some(metadata.category.to_string()),
      race_category: Some(metadata.race_category.to_string()),
      total_weeks: Some(metadata.total_weeks as i64),
    }
  }
}
