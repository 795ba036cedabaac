//! Phase Transition Monitor
//!
//! Decides when a persisted `ProgramPhaseState` has gone stale and replaces
//! it with a fresh calculation. Checks, in priority order:
//!
//! 1. PREP -> MAIN once the event falls inside the program window
//! 2. MAIN -> MAINTENANCE once the event has passed
//! 3. Cycle rollover: PREP or MAINTENANCE whose week has run past the cycle
//!
//! MAIN never transitions mid-program; its week/day only move through
//! `advance_day` when a workout is completed or skipped.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{Phase, ProgramPhaseState};
use crate::phase::{
    calculate_for_phase, days_until, PhaseError, DAYS_PER_WEEK, MAINTENANCE_CYCLE_WEEKS,
    PREP_CYCLE_WEEKS,
};
use crate::store::{ProgressStore, StoreError};

// ---------------------------------------------------------------------------
// Error Types
// ---------------------------------------------------------------------------

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransitionError {
    #[error(transparent)]
    Phase(#[from] PhaseError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

// ---------------------------------------------------------------------------
/// Transition Check
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionReason {
    EnteredMainProgram,
    EventCompleted,
    CycleRollover,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionCheck {
    pub should_transition: bool,
    pub new_phase: Option<Phase>,
    pub reason: Option<TransitionReason>,
}

impl TransitionCheck {
    fn stay() -> Self {
        Self {
            should_transition: false,
            new_phase: None,
            reason: None,
        }
    }

    fn to(phase: Phase, reason: TransitionReason) -> Self {
        Self {
            should_transition: true,
            new_phase: Some(phase),
            reason: Some(reason),
        }
    }
}

/// Length in weeks of the cycle a repeating phase is delivered in
fn cycle_weeks(phase: Phase) -> Option<i64> {
    match phase {
        Phase::Prep => Some(PREP_CYCLE_WEEKS),
        Phase::Maintenance => Some(MAINTENANCE_CYCLE_WEEKS),
        Phase::Main => None,
    }
}

/// Decide whether `state` must be recomputed as of `today`.
///
/// `program_total_weeks` is the length of the state's main program and must
/// be positive.
pub fn check_for_phase_transition(
    state: &ProgramPhaseState,
    program_total_weeks: i32,
    today: NaiveDate,
) -> Result<TransitionCheck, PhaseError> {
    if program_total_weeks <= 0 {
        return Err(PhaseError::InvalidProgramLength(program_total_weeks));
    }

    let Some(event) = state.event_date else {
        // Open-ended programs never change phase
        return Ok(TransitionCheck::stay());
    };

    let days_until_event = days_until(today, event);
    let program_days = program_total_weeks as i64 * DAYS_PER_WEEK;

    if state.phase == Phase::Prep && days_until_event <= program_days {
        // An event that already passed skips MAIN entirely
        let check = if days_until_event < 0 {
            TransitionCheck::to(Phase::Maintenance, TransitionReason::EventCompleted)
        } else {
            TransitionCheck::to(Phase::Main, TransitionReason::EnteredMainProgram)
        };
        return Ok(check);
    }

    if state.phase == Phase::Main && days_until_event < 0 {
        return Ok(TransitionCheck::to(
            Phase::Maintenance,
            TransitionReason::EventCompleted,
        ));
    }

    if let Some(cycle) = cycle_weeks(state.phase) {
        if state.current_week as i64 >= cycle {
            return Ok(TransitionCheck::to(state.phase, TransitionReason::CycleRollover));
        }
    }

    Ok(TransitionCheck::stay())
}

/// Recompute the user's position in `new_phase` and replace the stored
/// state with one write. The program id is kept; the revision moves up by one.
pub fn transition_user_to_phase<S: ProgressStore + ?Sized>(
    store: &S,
    user_id: &str,
    current: &ProgramPhaseState,
    new_phase: Phase,
    program_total_weeks: i32,
    today: NaiveDate,
) -> Result<ProgramPhaseState, TransitionError> {
    let calculation =
        calculate_for_phase(new_phase, today, current.event_date, program_total_weeks)?;
    let next = calculation.into_state(&current.program_id, current.revision + 1);

    store.write_atomic(user_id, &next)?;

    info!(
        user_id,
        from = %current.phase,
        to = %next.phase,
        week = next.current_week,
        day = next.current_day,
        "phase transition applied"
    );

    Ok(next)
}

// ---------------------------------------------------------------------------
// Day Advance
// ---------------------------------------------------------------------------

/// Move one day forward after a workout is completed or skipped.
///
/// Day 6 rolls over to day 0 of the next week. Weeks are not capped here;
/// the transition monitor rolls repeating phases over.
pub fn advance_day(state: &ProgramPhaseState) -> ProgramPhaseState {
    let mut next = state.clone();
    next.current_day += 1;
    if next.current_day as i64 >= DAYS_PER_WEEK {
        next.current_day = 0;
        next.current_week += 1;
    }
    next.revision = state.revision + 1;

    debug!(
        program_id = %next.program_id,
        week = next.current_week,
        day = next.current_day,
        "advanced program day"
    );

    next
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------
