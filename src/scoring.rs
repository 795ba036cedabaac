//! Program Scorer
//!
//! Weighted multi-candidate ranking of catalog programs against a
//! `UserProfile`. Four component scores in 0.0..=1.0 are blended with fixed
//! weights that sum to 1.0, so a program's total score is also in 0.0..=1.0.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::{normalize_catalog, CatalogError, SkippedEntry};
use crate::config::EngineConfig;
use crate::models::{AssessmentAnswers, CatalogEntry, Category, Difficulty, Program, ProgramMetadata, RaceCategory};
use crate::modifications::{advise_modifications, Modification, ModificationInputs};
use crate::profile::{build_user_profile, UserProfile};

// ---------------------------------------------------------------------------
// Weights
// ---------------------------------------------------------------------------

pub const DIFFICULTY_WEIGHT: f64 = 0.35;
pub const FREQUENCY_WEIGHT: f64 = 0.25;
pub const CATEGORY_WEIGHT: f64 = 0.25;
pub const RACE_CATEGORY_WEIGHT: f64 = 0.15;

/// Category score when the profile has no entry for the program's category
pub const DEFAULT_CATEGORY_SCORE: f64 = 0.3;

/// Below this, adjacent difficulty levels get extra credit
const LOW_CONFIDENCE_THRESHOLD: f64 = 0.6;

// ---------------------------------------------------------------------------
/// Scored Program
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub difficulty: f64,
    pub frequency: f64,
    pub category: f64,
    pub race_category: f64,
}

impl ScoreBreakdown {
    pub fn weighted_total(&self) -> f64 {
        self.difficulty * DIFFICULTY_WEIGHT
            + self.frequency * FREQUENCY_WEIGHT
            + self.category * CATEGORY_WEIGHT
            + self.race_category * RACE_CATEGORY_WEIGHT
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredProgram {
    pub program_id: String,
    pub program_name: String,
    pub metadata: ProgramMetadata,
    pub total_score: f64,
    pub breakdown: ScoreBreakdown,
}

// ---------------------------------------------------------------------------
// Component Scores
// ---------------------------------------------------------------------------

/// 1.0 for a match, 0.6..=0.9 for an adjacent level, 0.2 two levels apart.
///
/// Adjacent levels earn +0.1 when the candidate is the harder one and +0.2
/// when the profile's difficulty guess is uncertain. The two are additive.
pub fn score_difficulty(candidate: Difficulty, preferred: Difficulty, confidence: f64) -> f64 {
    let distance = candidate.rank() - preferred.rank();
    match distance.abs() {
        0 => 1.0,
        1 => {
            let mut score = 0.6;
            if distance > 0 {
                score += 0.1;
            }
            if confidence < LOW_CONFIDENCE_THRESHOLD {
                score += 0.2;
            }
            score
        }
        _ => 0.2,
    }
}

/// 1.0 when the program fits the user's week, falling off per extra session
pub fn score_frequency(required: u32, available: u32) -> f64 {
    match required.saturating_sub(available) {
        0 => 1.0,
        1 => 0.7,
        2 => 0.4,
        _ => 0.1,
    }
}

pub fn score_category(category: Category, profile: &UserProfile) -> f64 {
    profile
        .category_preferences
        .get(&category)
        .copied()
        .unwrap_or(DEFAULT_CATEGORY_SCORE)
}

pub fn score_race_category(candidate: RaceCategory, preferred: RaceCategory) -> f64 {
    if candidate == preferred {
        1.0
    } else {
        0.6
    }
}

/// Score one program against a profile
pub fn score_program(program: &Program, profile: &UserProfile) -> ScoredProgram {
    let metadata = &program.metadata;
    let breakdown = ScoreBreakdown {
        difficulty: score_difficulty(
            metadata.difficulty,
            profile.preferred_difficulty,
            profile.difficulty_confidence,
        ),
        frequency: score_frequency(metadata.weekly_frequency, profile.available_frequency),
        category: score_category(metadata.category, profile),
        race_category: score_race_category(metadata.race_category, profile.preferred_race_category),
    };

    ScoredProgram {
        program_id: program.id.clone(),
        program_name: program.name.clone(),
        metadata: metadata.clone(),
        total_score: breakdown.weighted_total(),
        breakdown,
    }
}

/// Score and rank. Sort is stable, so equal scores keep catalog order.
pub fn rank_programs(programs: &[Program], profile: &UserProfile) -> Vec<ScoredProgram> {
    let mut scored: Vec<ScoredProgram> = programs
        .iter()
        .map(|program| score_program(program, profile))
        .collect();
    scored.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));
    scored
}

// ---------------------------------------------------------------------------
/// Recommendation Result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResult {
    /// Best first; never empty
    pub ranked_programs: Vec<ScoredProgram>,
    pub user_profile: UserProfile,
    pub modifications: Vec<Modification>,
    pub reasoning_explanation: String,
    /// Catalog entries left out of ranking
    pub skipped: Vec<SkippedEntry>,
    /// True when no catalog program was usable and the default program was returned
    pub used_fallback: bool,
}

impl RecommendationResult {
    pub fn top_program(&self) -> Option<&ScoredProgram> {
        self.ranked_programs.first()
    }
}

/// Rank the catalog for one set of answers.
///
/// The profile is built once. Malformed catalog entries are skipped; when
/// nothing usable remains the configured fallback program is returned as
/// the single entry. Only catalog configuration errors fail.
pub fn recommend_programs(
    answers: &AssessmentAnswers,
    candidates: &[CatalogEntry],
    config: &EngineConfig,
) -> Result<RecommendationResult, CatalogError> {
    let profile = build_user_profile(answers);
    let catalog = normalize_catalog(candidates)?;

    let used_fallback = catalog.programs.is_empty();
    let ranked_programs = if used_fallback {
        warn!(
            candidates = candidates.len(),
            fallback = %config.fallback_program.id,
            "no usable catalog programs, recommending fallback"
        );
        vec![score_program(&config.fallback_program, &profile)]
    } else {
        rank_programs(&catalog.programs, &profile)
    };

    debug!(
        ranked = ranked_programs.len(),
        skipped = catalog.skipped.len(),
        top_score = ?ranked_programs.first().map(|p| p.total_score),
        "ranked catalog programs"
    );

    let frequency_gap = ranked_programs
        .first()
        .map(|top| top.metadata.weekly_frequency as i32 - profile.available_frequency as i32)
        .unwrap_or(0);
    let modifications = advise_modifications(&ModificationInputs::from_answers(answers, frequency_gap));

    let reasoning_explanation =
        build_reasoning(answers, &profile, &ranked_programs, config.reasoning_top_n);

    Ok(RecommendationResult {
        ranked_programs,
        user_profile: profile,
        modifications,
        reasoning_explanation,
        skipped: catalog.skipped,
        used_fallback,
    })
}

/// Templated explanation of why the top programs were chosen
pub fn build_reasoning(
    answers: &AssessmentAnswers,
    profile: &UserProfile,
    ranked: &[ScoredProgram],
    top_n: usize,
) -> String {
    let events = answers.events();
    let background = answers
        .training_background
        .clone()
        .unwrap_or_else(|| "general".to_string());

    let mut explanation = format!(
        "Based on your {} completed event{} and {} training background, we matched you to {} programs with a {} focus.",
        events,
        if events == 1 { "" } else { "s" },
        background,
        profile.preferred_difficulty,
        profile.top_category(),
    );

    let picks: Vec<String> = ranked
        .iter()
        .take(top_n.clamp(1, 3))
        .map(|p| {
            let fit = if p.metadata.weekly_frequency <= profile.available_frequency {
                "fits"
            } else {
                "exceeds"
            };
            format!(
                "{} ({} sessions/week {} your {} available)",
                p.program_name, p.metadata.weekly_frequency, fit, profile.available_frequency
            )
        })
        .collect();

    if !picks.is_empty() {
        explanation.push_str(" Top picks: ");
        explanation.push_str(&picks.join("; "));
        explanation.push('.');
    }

    explanation
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{answers_with, catalog_entry, program, sample_catalog};
    use std::collections::BTreeMap;

    const LEVELS: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    fn profile(difficulty: Difficulty, confidence: f64, frequency: u32) -> UserProfile {
        UserProfile {
            preferred_difficulty: difficulty,
            available_frequency: frequency,
            category_preferences: Category::ALL.iter().map(|c| (*c, 1.0)).collect(),
            preferred_race_category: RaceCategory::Singles,
            difficulty_confidence: confidence,
        }
    }

    #[test]
    fn test_weights_sum_to_one() {
        assert_close(
            DIFFICULTY_WEIGHT + FREQUENCY_WEIGHT + CATEGORY_WEIGHT + RACE_CATEGORY_WEIGHT,
            1.0,
        );
    }

    #[test]
    fn test_difficulty_score_decreases_with_distance() {
        for confidence in [0.3, 0.8] {
            for preferred in LEVELS {
                for candidate in LEVELS {
                    let score = score_difficulty(candidate, preferred, confidence);
                    match (candidate.rank() - preferred.rank()).abs() {
                        0 => assert_close(score, 1.0),
                        1 => assert!((0.6..=0.9 + 1e-9).contains(&score)),
                        _ => assert_close(score, 0.2),
                    }
                }
            }
        }
    }

    #[test]
    fn test_adjacent_harder_program_with_confident_profile() {
        // Intermediate user, confidence 0.8, Advanced program
        let score = score_difficulty(Difficulty::Advanced, Difficulty::Intermediate, 0.8);
        assert_close(score, 0.7);
    }

    #[test]
    fn test_adjacent_bonuses_are_additive() {
        assert_close(score_difficulty(Difficulty::Advanced, Difficulty::Intermediate, 0.5), 0.9);
        assert_close(score_difficulty(Difficulty::Beginner, Difficulty::Intermediate, 0.5), 0.8);
        assert_close(score_difficulty(Difficulty::Beginner, Difficulty::Intermediate, 0.6), 0.6);
    }

    #[test]
    fn test_frequency_score_steps() {
        assert_close(score_frequency(3, 4), 1.0);
        assert_close(score_frequency(4, 4), 1.0);
        assert_close(score_frequency(5, 4), 0.7);
        assert_close(score_frequency(6, 4), 0.4);
        assert_close(score_frequency(7, 4), 0.1);
        assert_close(score_frequency(14, 3), 0.1);
    }

    #[test]
    fn test_frequency_score_non_increasing_in_overage() {
        for available in 3..=6 {
            let mut previous = f64::MAX;
            for required in 1..=12 {
                let score = score_frequency(required, available);
                assert!(score <= previous);
                previous = score;
            }
        }
    }

    #[test]
    fn test_category_score_default_when_absent() {
        let mut p = profile(Difficulty::Beginner, 0.5, 3);
        p.category_preferences = BTreeMap::new();
        assert_close(score_category(Category::Running, &p), DEFAULT_CATEGORY_SCORE);
    }

    #[test]
    fn test_race_category_score() {
        assert_close(score_race_category(RaceCategory::Singles, RaceCategory::Singles), 1.0);
        assert_close(score_race_category(RaceCategory::DoublesRelay, RaceCategory::Singles), 0.6);
    }

    #[test]
    fn test_score_program_blends_components() {
        let p = profile(Difficulty::Intermediate, 0.8, 4);
        let candidate = program("adv-6", Difficulty::Advanced, 6, Category::Hyrox, 12);
        let scored = score_program(&candidate, &p);

        assert_close(scored.breakdown.difficulty, 0.7);
        assert_close(scored.breakdown.frequency, 0.4);
        assert_close(scored.breakdown.category, 1.0);
        assert_close(scored.breakdown.race_category, 1.0);
        assert_close(
            scored.total_score,
            0.7 * 0.35 + 0.4 * 0.25 + 1.0 * 0.25 + 1.0 * 0.15,
        );
    }

    #[test]
    fn test_recommendations_sorted_descending() {
        let answers = answers_with(2, 2.0, Some("running"));
        let result = recommend_programs(&answers, &sample_catalog(), &EngineConfig::default()).unwrap();

        assert!(!result.used_fallback);
        assert_eq!(result.ranked_programs.len(), sample_catalog().len());
        for pair in result.ranked_programs.windows(2) {
            assert!(pair[0].total_score >= pair[1].total_score);
        }
        assert_eq!(
            result.top_program().map(|p| p.program_id.as_str()),
            result.ranked_programs.first().map(|p| p.program_id.as_str())
        );
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let entries = vec![
            catalog_entry("first", Difficulty::Beginner, 3, Category::Mixed, 8),
            catalog_entry("second", Difficulty::Beginner, 3, Category::Mixed, 10),
            catalog_entry("third", Difficulty::Beginner, 3, Category::Mixed, 12),
        ];
        let result =
            recommend_programs(&AssessmentAnswers::default(), &entries, &EngineConfig::default()).unwrap();
        let ids: Vec<&str> = result.ranked_programs.iter().map(|p| p.program_id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_empty_catalog_returns_single_fallback() {
        let config = EngineConfig::default();
        let result = recommend_programs(&AssessmentAnswers::default(), &[], &config).unwrap();

        assert!(result.used_fallback);
        assert_eq!(result.ranked_programs.len(), 1);
        assert_eq!(result.ranked_programs[0].program_id, config.fallback_program.id);
    }

    #[test]
    fn test_all_malformed_catalog_falls_back() {
        let mut broken = catalog_entry("broken", Difficulty::Beginner, 3, Category::Mixed, 8);
        broken.difficulty = Some("legendary".to_string());

        let result =
            recommend_programs(&AssessmentAnswers::default(), &[broken], &EngineConfig::default()).unwrap();
        assert!(result.used_fallback);
        assert_eq!(result.ranked_programs.len(), 1);
        assert_eq!(result.skipped.len(), 1);
    }

    #[test]
    fn test_malformed_entries_do_not_sink_the_batch() {
        let mut entries = sample_catalog();
        let mut broken = catalog_entry("broken", Difficulty::Beginner, 3, Category::Mixed, 8);
        broken.weekly_frequency = None;
        entries.insert(1, broken);

        let result =
            recommend_programs(&AssessmentAnswers::default(), &entries, &EngineConfig::default()).unwrap();
        assert_eq!(result.ranked_programs.len(), sample_catalog().len());
        assert_eq!(result.skipped[0].id.as_deref(), Some("broken"));
    }

    #[test]
    fn test_invalid_program_length_propagates() {
        let mut entries = sample_catalog();
        entries[0].total_weeks = Some(0);
        let result = recommend_programs(&AssessmentAnswers::default(), &entries, &EngineConfig::default());
        assert!(matches!(result, Err(CatalogError::InvalidTotalWeeks { .. })));
    }

    #[test]
    fn test_reasoning_mentions_inputs_and_frequency() {
        let answers = answers_with(4, 3.5, Some("CrossFit"));
        let result = recommend_programs(&answers, &sample_catalog(), &EngineConfig::default()).unwrap();
        let text = &result.reasoning_explanation;
        let top = result.top_program().unwrap();

        assert!(text.contains("4 completed events"), "{}", text);
        assert!(text.contains("CrossFit"), "{}", text);
        assert!(text.contains("advanced"), "{}", text);
        assert!(text.contains(&result.user_profile.top_category().to_string()), "{}", text);
        assert!(text.contains(&top.program_name), "{}", text);
        assert!(
            text.contains(&format!("your {} available", result.user_profile.available_frequency)),
            "{}",
            text
        );
    }

    #[test]
    fn test_reasoning_lists_at_most_three_programs() {
        let p = profile(Difficulty::Beginner, 0.5, 3);
        let ranked: Vec<ScoredProgram> = (0..5)
            .map(|i| {
                score_program(
                    &program(&format!("plan-{}", i), Difficulty::Beginner, 3, Category::Mixed, 8),
                    &p,
                )
            })
            .collect();
        let text = build_reasoning(&AssessmentAnswers::default(), &p, &ranked, 10);
        assert!(text.contains("plan-2"));
        assert!(!text.contains("plan-3"));
        assert!(text.contains("0 completed events and general training background"));
    }

    #[test]
    fn test_frequency_gap_feeds_modifications() {
        // Three available sessions, only a six-day program in the catalog
        let entries = vec![catalog_entry("six", Difficulty::Beginner, 6, Category::Hyrox, 12)];
        let result =
            recommend_programs(&AssessmentAnswers::default(), &entries, &EngineConfig::default()).unwrap();
        assert!(result
            .modifications
            .iter()
            .any(|m| m.action == "combine_sessions"));
    }
}
