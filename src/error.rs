use thiserror::Error;

/// Failures surfaced by the election store.
///
/// An operation whose precondition does not hold (duplicate user, election already exists,
/// already voted) is not an error; it yields `Outcome::Flag(false)`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(#[from] serde_json::Error),

    #[error("Incorrect date format for: {value}. Expected format: YYYY-MM-DD")]
    InvalidDate { value: String },

    #[error("Candidate {0} appears more than once")]
    DuplicateCandidate(String),

    #[error("Invalid election: {0}")]
    InvalidElection(String),

    #[error("Database error: {0}")]
    Backend(#[from] rusqlite::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
