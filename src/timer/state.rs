//! Timer state
//!
//! Plain data; every mutation goes through [`super::TimerMachine`].

use chrono::{DateTime, Utc};

/// Where the countdown is in its lifecycle
///
/// Completion is not a resting state: the machine reports it from `tick()` and is
/// already back in `Idle` when the caller sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerStatus {
    #[default]
    Idle,
    Running,
    Paused,
}

/// Countdown state for one timer page
#[derive(Debug, Clone, PartialEq)]
pub struct TimerState {
    /// Seconds left, never above `total_seconds`
    pub remaining_seconds: u32,
    /// Configured duration in seconds, always positive
    pub total_seconds: u32,
    pub status: TimerStatus,
    /// Subject the next saved session is attributed to
    pub selected_subject: Option<String>,
    /// First start of the current session
    pub started_at: Option<DateTime<Utc>>,
}

impl TimerState {
    /// Idle state with a full duration of `minutes`
    pub fn with_minutes(minutes: u32) -> Self {
        let total_seconds = minutes.max(1).saturating_mul(60);
        Self {
            remaining_seconds: total_seconds,
            total_seconds,
            status: TimerStatus::Idle,
            selected_subject: None,
            started_at: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    /// Seconds counted down so far in this session
    pub fn elapsed_seconds(&self) -> u32 {
        self.total_seconds - self.remaining_seconds
    }

    /// Configured duration in whole minutes
    pub fn total_minutes(&self) -> u32 {
        self.total_seconds / 60
    }

    /// Back to Idle with the full configured duration; the subject is kept
    pub(crate) fn reset(&mut self) {
        self.remaining_seconds = self.total_seconds;
        self.status = TimerStatus::Idle;
        self.started_at = None;
    }
}
