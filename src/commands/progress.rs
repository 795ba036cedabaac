//! Program assignment and phase tracking commands

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{resolve_program, CommandError};
use crate::catalog::ProgramCatalog;
use crate::config::EngineConfig;
use crate::models::ProgramPhaseState;
use crate::phase::calculate_phase;
use crate::store::ProgressStore;
use crate::transition::{advance_day, check_for_phase_transition, transition_user_to_phase};

/// Result of reconciling a stored state with today's date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOutcome {
  pub transitioned: bool,
  pub state: ProgramPhaseState,
}

/// Start a user on a program, replacing any previous assignment
pub fn assign_program<S, C>(
  store: &S,
  catalog: &C,
  config: &EngineConfig,
  user_id: &str,
  program_id: &str,
  event_date: Option<NaiveDate>,
  today: NaiveDate,
) -> Result<ProgramPhaseState, CommandError>
where
  S: ProgressStore + ?Sized,
  C: ProgramCatalog + ?Sized,
{
  let program = resolve_program(catalog, config, program_id)?;
  let revision = store.read(user_id)?.map(|s| s.revision + 1).unwrap_or(1);

  let state = calculate_phase(today, event_date, program.metadata.total_weeks)?
    .into_state(&program.id, revision);
  store.write_atomic(user_id, &state)?;

  info!(
    user_id,
    program_id = %program.id,
    phase = %state.phase,
    week = state.current_week,
    "program assigned"
  );

  Ok(state)
}

pub fn get_phase_state<S: ProgressStore + ?Sized>(
  store: &S,
  user_id: &str,
) -> Result<ProgramPhaseState, CommandError> {
  store
    .read(user_id)?
    .ok_or_else(|| CommandError::NoPhaseState(user_id.to_string()))
}

/// Check the stored state against `today` and apply a transition if one is due
pub fn sync_phase<S, C>(
  store: &S,
  catalog: &C,
  config: &EngineConfig,
  user_id: &str,
  today: NaiveDate,
) -> Result<SyncOutcome, CommandError>
where
  S: ProgressStore + ?Sized,
  C: ProgramCatalog + ?Sized,
{
  let current = get_phase_state(store, user_id)?;
  let program = resolve_program(catalog, config, &current.program_id)?;
  let total_weeks = program.metadata.total_weeks;

  let check = check_for_phase_transition(&current, total_weeks, today)?;
  let Some(new_phase) = check.new_phase.filter(|_| check.should_transition) else {
    debug!(user_id, phase = %current.phase, "no phase transition due");
    return Ok(SyncOutcome {
      transitioned: false,
      state: current,
    });
  };

  let state = transition_user_to_phase(store, user_id, &current, new_phase, total_weeks, today)?;
  Ok(SyncOutcome {
    transitioned: true,
    state,
  })
}

/// Advance one day after a workout is completed or skipped
pub fn record_workout_completion<S: ProgressStore + ?Sized>(
  store: &S,
  user_id: &str,
) -> Result<ProgramPhaseState, CommandError> {
  let current = get_phase_state(store, user_id)?;
  let next = advance_day(&current);
  store.write_atomic(user_id, &next)?;
  Ok(next)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
