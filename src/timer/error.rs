//! Timer validation errors
//!
//! Everything the state machine refuses to do. None of these mutate state.

use thiserror::Error;

/// Errors raised by timer transitions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// `start()` called with no subject selected
    #[error("Please select a subject first!")]
    SubjectNotSelected,

    /// Requested duration outside (0, max] minutes
    #[error("Please enter a time between 1 and {max} minutes")]
    DurationOutOfRange { minutes: i64, max: u32 },

    /// Duration changes are refused while the countdown is ticking
    #[error("Cannot change the duration while the timer is running")]
    Running,
}

/// Result type alias for timer transitions
pub type TimerResult<T> = Result<T, TimerError>;
