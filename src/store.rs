//! Progress store boundary
//!
//! The engine reads and replaces a user's `ProgramPhaseState` through this
//! trait and never implements storage itself.
//!
//! Two writers touch the same record: the transition monitor and the
//! per-workout day advance. Every state the engine writes carries
//! `revision = previous + 1`; an implementation must apply the whole record
//! in one write and reject it with `StoreError::Conflict` unless the stored
//! revision is exactly one less (or there is no record and the revision is 1).

use thiserror::Error;

use crate::models::ProgramPhaseState;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
  #[error("Concurrent update for user {user_id}: expected revision {expected}, found {found}")]
  Conflict {
    user_id: String,
    expected: u64,
    found: u64,
  },

  #[error("Progress store error: {0}")]
  Backend(String),
}

pub trait ProgressStore {
  fn read(&self, user_id: &str) -> Result<Option<ProgramPhaseState>, StoreError>;

  /// Replace the user's state as a single record
  fn write_atomic(&self, user_id: &str, state: &ProgramPhaseState) -> Result<(), StoreError>;
}
