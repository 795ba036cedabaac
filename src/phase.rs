//! Phase Calculator
//!
//! Pure date arithmetic: given today, an optional event date and the main
//! program's length, work out the periodization phase and the zero-based
//! week/day position inside it.
//!
//! - No event: open-ended MAIN, week 0 day 0.
//! - Event passed: MAINTENANCE, repeating 4-week cycles counted from the event.
//! - Event within the program window: MAIN, counted from
//!   `event - total_weeks`.
//! - Event further out: PREP, repeating 4-week cycles until the event falls
//!   inside the program window.
//!
//! A week is always 7 days here and in `transition`.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Phase, ProgramPhaseState};

pub const DAYS_PER_WEEK: i64 = 7;
pub const PREP_CYCLE_WEEKS: i64 = 4;
pub const MAINTENANCE_CYCLE_WEEKS: i64 = 4;

/// Longest main program a catalog may carry (ten years)
pub const MAX_PROGRAM_WEEKS: i32 = 520;

// ---------------------------------------------------------------------------
// Error Types
// ---------------------------------------------------------------------------

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PhaseError {
    #[error("Invalid program length: {0} weeks (must be > 0)")]
    InvalidProgramLength(i32),

    #[error("Phase dates fall outside the supported calendar range")]
    DateOutOfRange,
}

// ---------------------------------------------------------------------------
/// Phase Calculation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseCalculation {
    pub phase: Phase,
    pub current_week: u32,
    pub current_day: u32,
    /// Anchor for the calendar the user sees
    pub start_date: NaiveDate,
    /// Anchor that keeps day counting continuous across PREP cycles
    pub virtual_start_date: NaiveDate,
    pub main_program_start_date: Option<NaiveDate>,
    pub event_date: Option<NaiveDate>,
    pub event_completed: bool,
    /// Negative once the event has passed
    pub days_until_event: Option<i64>,
    pub total_prep_weeks: Option<u32>,
}

impl PhaseCalculation {
    /// Persistable state for a program at a given revision
    pub fn into_state(self, program_id: &str, revision: u64) -> ProgramPhaseState {
        ProgramPhaseState {
            phase: self.phase,
            program_id: program_id.to_string(),
            current_week: self.current_week,
            current_day: self.current_day,
            start_date: self.start_date,
            event_date: self.event_date,
            main_program_start_date: self.main_program_start_date,
            event_completed: self.event_completed,
            revision,
        }
    }
}

/// Whole days from `today` to `event`; negative once the event has passed
pub fn days_until(today: NaiveDate, event: NaiveDate) -> i64 {
    (event - today).num_days()
}

/// `date` moved by `days`, or `DateOutOfRange` past the calendar's ends
fn shift(date: NaiveDate, days: i64) -> Result<NaiveDate, PhaseError> {
    Duration::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .ok_or(PhaseError::DateOutOfRange)
}

/// First day of the main program for an event
pub fn main_program_start(event: NaiveDate, total_weeks: i32) -> Result<NaiveDate, PhaseError> {
    shift(event, -(total_weeks as i64 * DAYS_PER_WEEK))
}

/// Compute phase and position. Deterministic in its three inputs.
///
/// Never panics; a program so long (or a date so close to the calendar's
/// ends) that a derived date is unrepresentable yields `DateOutOfRange`.
pub fn calculate_phase(
    today: NaiveDate,
    event_date: Option<NaiveDate>,
    total_weeks: i32,
) -> Result<PhaseCalculation, PhaseError> {
    if total_weeks <= 0 {
        return Err(PhaseError::InvalidProgramLength(total_weeks));
    }

    let Some(event) = event_date else {
        return Ok(open_ended(today));
    };

    let days_until_event = days_until(today, event);
    let program_days = total_weeks as i64 * DAYS_PER_WEEK;

    if days_until_event < 0 {
        maintenance(event, days_until_event, total_weeks)
    } else if days_until_event < program_days {
        main_program(today, event, days_until_event, total_weeks)
    } else {
        prep(today, event, days_until_event, total_weeks)
    }
}

/// Compute position for a phase the transition monitor has decided on.
///
/// Identical to `calculate_phase` except on the day the main program
/// starts (`days_until_event == total_weeks * 7`), where the calculator
/// still reports PREP with zero prep weeks left but the monitor has already
/// moved the user into MAIN week 0, day 0.
pub fn calculate_for_phase(
    requested: Phase,
    today: NaiveDate,
    event_date: Option<NaiveDate>,
    total_weeks: i32,
) -> Result<PhaseCalculation, PhaseError> {
    let calculation = calculate_phase(today, event_date, total_weeks)?;
    match (requested, calculation.phase, event_date) {
        (Phase::Main, Phase::Prep, Some(event)) => {
            let days_until_event = days_until(today, event);
            if days_until_event == total_weeks as i64 * DAYS_PER_WEEK {
                main_program(today, event, days_until_event, total_weeks)
            } else {
                Ok(calculation)
            }
        }
        _ => Ok(calculation),
    }
}

fn open_ended(today: NaiveDate) -> PhaseCalculation {
    PhaseCalculation {
        phase: Phase::Main,
        current_week: 0,
        current_day: 0,
        start_date: today,
        virtual_start_date: today,
        main_program_start_date: None,
        event_date: None,
        event_completed: false,
        days_until_event: None,
        total_prep_weeks: None,
    }
}

fn maintenance(
    event: NaiveDate,
    days_until_event: i64,
    total_weeks: i32,
) -> Result<PhaseCalculation, PhaseError> {
    let days_since = days_until_event.abs();
    let weeks_since = days_since / DAYS_PER_WEEK;
    let completed_cycles = weeks_since / MAINTENANCE_CYCLE_WEEKS;
    let start_date = shift(event, completed_cycles * MAINTENANCE_CYCLE_WEEKS * DAYS_PER_WEEK)?;

    Ok(PhaseCalculation {
        phase: Phase::Maintenance,
        current_week: (weeks_since % MAINTENANCE_CYCLE_WEEKS) as u32,
        current_day: (days_since % DAYS_PER_WEEK) as u32,
        start_date,
        virtual_start_date: start_date,
        main_program_start_date: Some(main_program_start(event, total_weeks)?),
        event_date: Some(event),
        event_completed: true,
        days_until_event: Some(days_until_event),
        total_prep_weeks: None,
    })
}

fn main_program(
    today: NaiveDate,
    event: NaiveDate,
    days_until_event: i64,
    total_weeks: i32,
) -> Result<PhaseCalculation, PhaseError> {
    let main_start = main_program_start(event, total_weeks)?;
    let offset = (today - main_start).num_days();

    Ok(PhaseCalculation {
        phase: Phase::Main,
        current_week: (offset / DAYS_PER_WEEK) as u32,
        current_day: (offset % DAYS_PER_WEEK) as u32,
        start_date: main_start,
        virtual_start_date: main_start,
        main_program_start_date: Some(main_start),
        event_date: Some(event),
        event_completed: false,
        days_until_event: Some(days_until_event),
        total_prep_weeks: None,
    })
}

fn prep(
    today: NaiveDate,
    event: NaiveDate,
    days_until_event: i64,
    total_weeks: i32,
) -> Result<PhaseCalculation, PhaseError> {
    let program_days = total_weeks as i64 * DAYS_PER_WEEK;
    let gap_days = days_until_event - program_days;
    // ceil(gap / 7) for gap >= 0
    let total_prep_weeks = (gap_days + DAYS_PER_WEEK - 1) / DAYS_PER_WEEK;

    let current_week = total_prep_weeks % PREP_CYCLE_WEEKS;
    let current_day = days_until_event % DAYS_PER_WEEK;

    let main_start = main_program_start(event, total_weeks)?;
    let virtual_start_date = shift(main_start, -(total_prep_weeks * DAYS_PER_WEEK))?;
    let start_date = shift(today, -(current_week * DAYS_PER_WEEK + current_day))?;

    Ok(PhaseCalculation {
        phase: Phase::Prep,
        current_week: current_week as u32,
        current_day: current_day as u32,
        start_date,
        virtual_start_date,
        main_program_start_date: Some(main_start),
        event_date: Some(event),
        event_completed: false,
        days_until_event: Some(days_until_event),
        total_prep_weeks: Some(total_prep_weeks as u32),
    })
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------
