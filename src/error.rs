use thiserror::Error;

/// Errors surfaced by rule validation, expansion and materialization.
///
/// Running past a window's end is not an error; the iterator just ends.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecurrenceError {
    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("invalid rule: {0}")]
    InvalidRule(String),

    #[error("invalid event: {0}")]
    InvalidEvent(String),
}

pub type RecurrenceResult<T> = Result<T, RecurrenceError>;
