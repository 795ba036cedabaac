//! Profile Builder
//!
//! Turns raw assessment answers into the profile the scorer ranks against.
//! Nothing here fails: missing or junk answers fall through to neutral
//! defaults so a user always gets a recommendation.
//!
//! The profile is a derived view. It is rebuilt from the answers on every
//! call and never stored, so edited answers can't leave a stale profile.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{AssessmentAnswers, Category, Difficulty, RaceCategory};

// ---------------------------------------------------------------------------
/// User Profile
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub preferred_difficulty: Difficulty,
    /// Sessions per week the user can sustain, 3..=6
    pub available_frequency: u32,
    /// Normalized so the top category is exactly 1.0
    pub category_preferences: BTreeMap<Category, f64>,
    pub preferred_race_category: RaceCategory,
    /// 0.0..=1.0
    pub difficulty_confidence: f64,
}

impl UserProfile {
    /// Highest-scoring category; earliest in `Category::ALL` order on ties
    pub fn top_category(&self) -> Category {
        let mut best = Category::Hyrox;
        let mut best_score = f64::MIN;
        for category in Category::ALL {
            let score = self
                .category_preferences
                .get(&category)
                .copied()
                .unwrap_or(0.0);
            if score > best_score {
                best = category;
                best_score = score;
            }
        }
        best
    }
}

/// Build the full profile from one set of answers
pub fn build_user_profile(answers: &AssessmentAnswers) -> UserProfile {
    UserProfile {
        preferred_difficulty: assess_difficulty_preference(answers),
        available_frequency: assess_frequency_capacity(answers),
        category_preferences: assess_category_preferences(answers),
        preferred_race_category: assess_race_category_preference(answers),
        difficulty_confidence: calculate_difficulty_confidence(answers),
    }
}

// ---------------------------------------------------------------------------
// Difficulty
// ---------------------------------------------------------------------------

/// Decision table over events completed, years of training and background.
/// Rules are checked top to bottom; first match wins.
pub fn assess_difficulty_preference(answers: &AssessmentAnswers) -> Difficulty {
    let events = answers.events();
    let years = answers.fitness_years();
    let background = answers.background().unwrap_or_default();

    if events >= 6 || (events >= 3 && years >= 3.0) {
        return Difficulty::Advanced;
    }
    if events >= 3 && matches!(background.as_str(), "crossfit" | "powerlifting") {
        return Difficulty::Advanced;
    }
    if events == 0 && (years < 1.0 || background == "beginner") {
        return Difficulty::Beginner;
    }
    if events == 0 && years < 2.0 && matches!(background.as_str(), "beginner" | "general") {
        return Difficulty::Beginner;
    }
    Difficulty::Intermediate
}

// ---------------------------------------------------------------------------
// Frequency
// ---------------------------------------------------------------------------

pub const MIN_FREQUENCY: u32 = 3;
pub const MAX_FREQUENCY: u32 = 6;

/// Sessions per week the user can sustain, from the days they say they train
pub fn assess_frequency_capacity(answers: &AssessmentAnswers) -> u32 {
    answers
        .training_days()
        .clamp(MIN_FREQUENCY, MAX_FREQUENCY)
}

// ---------------------------------------------------------------------------
// Category Preferences
// ---------------------------------------------------------------------------

const BASE_CATEGORY_SCORES: [(Category, f64); 4] = [
    (Category::Hyrox, 0.5),
    (Category::Strength, 0.3),
    (Category::Running, 0.3),
    (Category::Mixed, 0.4),
];

/// Bonuses for a stated goal. Unknown goals add nothing.
fn goal_bonuses(goal: &str) -> &'static [(Category, f64)] {
    match goal {
        "compete" | "race_performance" => &[(Category::Hyrox, 0.3)],
        "first_race" => &[(Category::Hyrox, 0.2), (Category::Mixed, 0.1)],
        "get_stronger" | "strength" => &[(Category::Strength, 0.4)],
        "improve_running" | "endurance" => &[(Category::Running, 0.4)],
        "general_fitness" => &[(Category::Mixed, 0.3)],
        "weight_loss" => &[(Category::Mixed, 0.2), (Category::Running, 0.1)],
        _ => &[],
    }
}

/// Bonuses for a training background. Unknown backgrounds add nothing.
fn background_bonuses(background: &str) -> &'static [(Category, f64)] {
    match background {
        "crossfit" => &[(Category::Hyrox, 0.2), (Category::Mixed, 0.2)],
        "powerlifting" => &[(Category::Strength, 0.3)],
        "running" => &[(Category::Running, 0.3), (Category::Hyrox, 0.1)],
        "general" | "beginner" => &[(Category::Mixed, 0.1)],
        _ => &[],
    }
}

/// Base scores plus goal and background bonuses, scaled so the best
/// category is 1.0
pub fn assess_category_preferences(answers: &AssessmentAnswers) -> BTreeMap<Category, f64> {
    let mut scores: BTreeMap<Category, f64> = BASE_CATEGORY_SCORES.into_iter().collect();

    let mut apply = |bonuses: &[(Category, f64)]| {
        for (category, bonus) in bonuses {
            *scores.entry(*category).or_insert(0.0) += bonus;
        }
    };

    for goal in answers.goal_keys() {
        apply(goal_bonuses(&goal));
    }
    if let Some(background) = answers.background() {
        apply(background_bonuses(&background));
    }

    normalize_scores(scores)
}

fn normalize_scores(mut scores: BTreeMap<Category, f64>) -> BTreeMap<Category, f64> {
    let max = scores.values().copied().fold(0.0_f64, f64::max);
    if max > 0.0 {
        for score in scores.values_mut() {
            *score /= max;
        }
    }
    scores
}

// ---------------------------------------------------------------------------
// Race Category
// ---------------------------------------------------------------------------

/// Only an explicit doubles/relay answer moves away from singles
pub fn assess_race_category_preference(answers: &AssessmentAnswers) -> RaceCategory {
    match answers.competition_format_key().as_deref() {
        Some("doubles") | Some("relay") | Some("doubles_relay") => RaceCategory::DoublesRelay,
        _ => RaceCategory::Singles,
    }
}

// ---------------------------------------------------------------------------
// Confidence
// ---------------------------------------------------------------------------

/// How sure we are about the inferred difficulty. Starts at 0.5 and grows
/// with race history, a telling background, and years of training.
pub fn calculate_difficulty_confidence(answers: &AssessmentAnswers) -> f64 {
    let events = answers.events();
    let years = answers.fitness_years();
    let mut confidence: f64 = 0.5;

    if events >= 3 {
        confidence += 0.3;
    } else if events >= 1 {
        confidence += 0.2;
    }

    if matches!(
        answers.background().as_deref(),
        Some("crossfit") | Some("powerlifting") | Some("running")
    ) {
        confidence += 0.2;
    }

    if years >= 3.0 {
        confidence += 0.2;
    } else if years >= 1.0 {
        confidence += 0.1;
    }

    confidence.min(1.0)
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------
