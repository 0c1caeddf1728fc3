//! Board operation errors.

use chrono::{DateTime, Utc};

/// Validation failures abort an operation before any mutation: no state
/// change, no audit record. Persistence failures are not represented here;
/// they occur after commit and are surfaced as warnings only.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("student not found: {0}")]
    NotFound(String),
    #[error("invalid window: end {end} is before start {start}")]
    InvalidWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    #[error("not eligible: {0}")]
    NotEligible(String),
    #[error("student name must not be blank")]
    InvalidName,
    #[error("actor must not be empty")]
    EmptyActor,
}
