//! Modification Advisor
//!
//! Training-load adjustments derived from risk factors in the assessment.
//! Independent of program scoring; the result is attached to a
//! recommendation as-is.

use serde::{Deserialize, Serialize};

use crate::models::AssessmentAnswers;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModificationType {
    Recovery,
    VolumeReduction,
    FrequencyAdjustment,
    EquipmentSubstitution,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modification {
    #[serde(rename = "type")]
    pub kind: ModificationType,
    pub action: String,
    pub reason: String,
}

impl Modification {
    fn new(kind: ModificationType, action: &str, reason: String) -> Self {
        Self {
            kind,
            action: action.to_string(),
            reason,
        }
    }
}

/// Risk factors the advisor looks at
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModificationInputs {
    pub age: Option<u32>,
    pub injury_history: bool,
    pub injury_recent: bool,
    /// Program sessions per week minus sessions the user has available
    pub frequency_gap: i32,
    /// Normalized key, e.g. "full_gym", "home_gym", "none"
    pub equipment_access: Option<String>,
}

impl ModificationInputs {
    pub fn from_answers(answers: &AssessmentAnswers, frequency_gap: i32) -> Self {
        Self {
            age: answers.age_years(),
            injury_history: answers.has_injury_history(),
            injury_recent: answers.has_recent_injury(),
            frequency_gap,
            equipment_access: answers.equipment_key(),
        }
    }
}

/// Ordered recovery, volume, frequency, then equipment
pub fn advise_modifications(inputs: &ModificationInputs) -> Vec<Modification> {
    let mut mods = Vec::new();

    match inputs.age {
        Some(age) if age >= 50 => mods.push(Modification::new(
            ModificationType::Recovery,
            "extra_recovery_day",
            format!("At {} an extra recovery day between hard sessions supports adaptation", age),
        )),
        Some(age) if age >= 40 => mods.push(Modification::new(
            ModificationType::Recovery,
            "extended_warmup",
            format!("At {} a longer warm-up lowers strain on joints and tendons", age),
        )),
        _ => {}
    }

    if inputs.injury_history && !inputs.injury_recent {
        mods.push(Modification::new(
            ModificationType::Recovery,
            "prehab_work",
            "Previous injury: add mobility and prehab work to each session".to_string(),
        ));
    }

    if inputs.injury_recent {
        mods.push(Modification::new(
            ModificationType::VolumeReduction,
            "reduce_volume_25_percent",
            "Recent injury: start at 75% of prescribed volume and build back gradually".to_string(),
        ));
    }

    if inputs.frequency_gap > 0 {
        mods.push(Modification::new(
            ModificationType::FrequencyAdjustment,
            "combine_sessions",
            format!(
                "Program asks for {} more session{} per week than you have available; combine the lighter days",
                inputs.frequency_gap,
                if inputs.frequency_gap == 1 { "" } else { "s" }
            ),
        ));
    }

    match inputs.equipment_access.as_deref() {
        Some("none") | Some("minimal") | Some("bodyweight") => mods.push(Modification::new(
            ModificationType::EquipmentSubstitution,
            "bodyweight_substitutions",
            "Limited equipment: swap sled, rower and ski erg work for bodyweight and running alternatives"
                .to_string(),
        )),
        Some("home") | Some("home_gym") => mods.push(Modification::new(
            ModificationType::EquipmentSubstitution,
            "home_gym_substitutions",
            "Home gym: substitute sled pushes and wall balls with dumbbell and kettlebell variations"
                .to_string(),
        )),
        _ => {}
    }

    mods
}
