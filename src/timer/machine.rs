//! Countdown State Machine
//!
//! Pure transitions over [`TimerState`]. Nothing here schedules ticks, talks to the
//! network or touches a screen; callers act on the returned outcomes.
//!
//! ```text
//!   Idle --start--> Running --pause--> Paused --start--> Running
//!    ^                 |                  |
//!    +------stop-------+-------stop-------+
//!    +---tick reaching 0 (Completed)------+
//! ```

use chrono::{DateTime, Utc};

use super::error::{TimerError, TimerResult};
use super::state::{TimerState, TimerStatus};
use crate::api::TimerRequest;
use crate::config::TimerConfig;

/// A session ready to be reported to the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSave {
    pub subject_id: String,
    pub duration_minutes: u32,
}

impl SessionSave {
    pub fn to_request(&self) -> TimerRequest {
        TimerRequest {
            subject_id: self.subject_id.clone(),
            duration: self.duration_minutes,
        }
    }
}

/// Result of `start()`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new tick process must be started
    Started,
    /// Already running; no second tick process
    AlreadyRunning,
}

/// Result of one tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running; the tick was stale
    Ignored,
    Counting { remaining_seconds: u32 },
    /// Countdown hit zero; the machine is back in Idle with the full duration
    Completed(SessionSave),
}

/// Result of `stop()`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopOutcome {
    /// Elapsed time rounded to the nearest minute
    pub elapsed_minutes: u32,
    /// Save to offer the user, if at least a minute was studied
    pub offer: Option<SessionSave>,
}

impl StopOutcome {
    /// Confirmation text shown before saving a stopped session
    pub fn prompt(&self) -> Option<String> {
        self.offer.as_ref().map(|save| match save.duration_minutes {
            1 => "Save 1 minute of study time?".to_string(),
            n => format!("Save {} minutes of study time for this session?", n),
        })
    }
}

/// Longest countdown a timer accepts, whatever the configuration says
pub const MAX_TIMER_MINUTES: u32 = 180;

/// Countdown state machine
#[derive(Debug, Clone)]
pub struct TimerMachine {
    state: TimerState,
    max_minutes: u32,
}

impl TimerMachine {
    /// Build from configuration, pulling the limits into `1..=MAX_TIMER_MINUTES`
    pub fn new(config: &TimerConfig) -> Self {
        let max_minutes = config.max_minutes.clamp(1, MAX_TIMER_MINUTES);
        let default_minutes = config.default_minutes.clamp(1, max_minutes);
        if max_minutes != config.max_minutes || default_minutes != config.default_minutes {
            tracing::warn!(
                max_minutes = config.max_minutes,
                default_minutes = config.default_minutes,
                "Timer limits out of range; using {} of at most {} minutes",
                default_minutes,
                max_minutes
            );
        }

        Self {
            state: TimerState::with_minutes(default_minutes),
            max_minutes,
        }
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    /// Set both remaining and total time to `minutes`
    pub fn set_duration(&mut self, minutes: i64) -> TimerResult<()> {
        if minutes <= 0 || minutes > i64::from(self.max_minutes) {
            tracing::warn!(minutes, "Rejected timer duration");
            return Err(TimerError::DurationOutOfRange {
                minutes,
                max: self.max_minutes,
            });
        }
        if self.state.is_running() {
            return Err(TimerError::Running);
        }

        let seconds = u32::try_from(minutes)
            .ok()
            .and_then(|m| m.checked_mul(60))
            .ok_or(TimerError::DurationOutOfRange {
                minutes,
                max: self.max_minutes,
            })?;
        self.state.total_seconds = seconds;
        self.state.remaining_seconds = seconds;
        tracing::debug!(minutes, "Timer duration set");
        Ok(())
    }

    /// Choose the subject for the next session; clearing it is refused while running
    pub fn select_subject(&mut self, subject: Option<String>) -> TimerResult<()> {
        let subject = subject.filter(|s| !s.is_empty());
        if subject.is_none() && self.state.is_running() {
            return Err(TimerError::Running);
        }
        self.state.selected_subject = subject;
        Ok(())
    }

    pub fn start(&mut self, now: DateTime<Utc>) -> TimerResult<StartOutcome> {
        if self.state.selected_subject.is_none() {
            return Err(TimerError::SubjectNotSelected);
        }
        if self.state.is_running() {
            return Ok(StartOutcome::AlreadyRunning);
        }

        self.state.status = TimerStatus::Running;
        self.state.started_at.get_or_insert(now);
        tracing::debug!(remaining = self.state.remaining_seconds, "Timer started");
        Ok(StartOutcome::Started)
    }

    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.is_running() {
            return TickOutcome::Ignored;
        }

        self.state.remaining_seconds = self.state.remaining_seconds.saturating_sub(1);
        if self.state.remaining_seconds > 0 {
            return TickOutcome::Counting {
                remaining_seconds: self.state.remaining_seconds,
            };
        }

        // select_subject() never clears the subject while running
        let Some(subject_id) = self.state.selected_subject.clone() else {
            self.state.reset();
            return TickOutcome::Ignored;
        };

        let save = SessionSave {
            subject_id,
            duration_minutes: self.state.total_minutes(),
        };
        self.state.reset();
        tracing::info!(minutes = save.duration_minutes, "Study session completed");
        TickOutcome::Completed(save)
    }

    /// Returns false when there was nothing to pause
    pub fn pause(&mut self) -> bool {
        if !self.state.is_running() {
            return false;
        }
        self.state.status = TimerStatus::Paused;
        tracing::debug!(remaining = self.state.remaining_seconds, "Timer paused");
        true
    }

    /// End the session early. The state is reset whatever the user later decides.
    pub fn stop(&mut self) -> StopOutcome {
        let elapsed_minutes = (self.state.elapsed_seconds() + 30) / 60;

        let offer = match (&self.state.selected_subject, elapsed_minutes) {
            (_, 0) => None,
            (Some(subject_id), minutes) => Some(SessionSave {
                subject_id: subject_id.clone(),
                duration_minutes: minutes,
            }),
            (None, minutes) => {
                tracing::warn!(minutes, "Stopped session has no subject; not offering a save");
                None
            }
        };

        self.state.reset();
        StopOutcome {
            elapsed_minutes,
            offer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine_with_subject(minutes: i64) -> TimerMachine {
        let mut machine = TimerMachine::new(&TimerConfig::default());
        machine.set_duration(minutes).unwrap();
        machine.select_subject(Some("physics".to_string())).unwrap();
        machine
    }

    #[test]
    fn test_default_duration() {
        let machine = TimerMachine::new(&TimerConfig::default());
        assert_eq!(machine.state().remaining_seconds, 25 * 60);
        assert_eq!(machine.state().status, TimerStatus::Idle);
    }

    #[test]
    fn test_set_duration_in_range() {
        let mut machine = TimerMachine::new(&TimerConfig::default());
        for minutes in [1, 45, 180] {
            machine.set_duration(minutes).unwrap();
            let seconds = minutes as u32 * 60;
            assert_eq!(machine.state().remaining_seconds, seconds);
            assert_eq!(machine.state().total_seconds, seconds);
        }
    }

    #[test]
    fn test_set_duration_out_of_range_leaves_state() {
        let mut machine = TimerMachine::new(&TimerConfig::default());
        let before = machine.state().clone();

        for minutes in [0, -5, 181] {
            let err = machine.set_duration(minutes).unwrap_err();
            assert!(matches!(err, TimerError::DurationOutOfRange { .. }));
            assert_eq!(machine.state(), &before);
        }
    }

    #[test]
    fn test_oversized_limits_are_clamped() {
        let config = TimerConfig {
            default_minutes: 400,
            max_minutes: 100_000_000,
        };
        let mut machine = TimerMachine::new(&config);

        assert_eq!(machine.state().total_seconds, MAX_TIMER_MINUTES * 60);
        assert_eq!(
            machine.set_duration(90_000_000),
            Err(TimerError::DurationOutOfRange {
                minutes: 90_000_000,
                max: MAX_TIMER_MINUTES,
            })
        );
        assert_eq!(machine.state().remaining_seconds, MAX_TIMER_MINUTES * 60);
    }

    #[test]
    fn test_zero_limits_are_clamped() {
        let config = TimerConfig {
            default_minutes: 0,
            max_minutes: 0,
        };
        let mut machine = TimerMachine::new(&config);

        assert_eq!(machine.state().total_seconds, 60);
        machine.set_duration(1).unwrap();
        assert!(machine.set_duration(2).is_err());
    }

    #[test]
    fn test_default_above_max_is_clamped() {
        let config = TimerConfig {
            default_minutes: 90,
            max_minutes: 30,
        };
        let machine = TimerMachine::new(&config);
        assert_eq!(machine.state().total_seconds, 30 * 60);
    }

    #[test]
    fn test_set_duration_refused_while_running() {
        let mut machine = machine_with_subject(10);
        machine.start(Utc::now()).unwrap();
        machine.tick();

        assert_eq!(machine.set_duration(5), Err(TimerError::Running));
        assert_eq!(machine.state().remaining_seconds, 599);
    }

    #[test]
    fn test_start_without_subject() {
        let mut machine = TimerMachine::new(&TimerConfig::default());
        let before = machine.state().clone();

        assert_eq!(machine.start(Utc::now()), Err(TimerError::SubjectNotSelected));
        assert_eq!(machine.tick(), TickOutcome::Ignored);
        assert_eq!(machine.state(), &before);
    }

    #[test]
    fn test_empty_subject_counts_as_unselected() {
        let mut machine = TimerMachine::new(&TimerConfig::default());
        machine.select_subject(Some(String::new())).unwrap();
        assert_eq!(machine.start(Utc::now()), Err(TimerError::SubjectNotSelected));
    }

    #[test]
    fn test_second_start_is_noop() {
        let mut machine = machine_with_subject(5);
        assert_eq!(machine.start(Utc::now()), Ok(StartOutcome::Started));
        assert_eq!(machine.start(Utc::now()), Ok(StartOutcome::AlreadyRunning));
    }

    #[test]
    fn test_run_to_completion() {
        let mut machine = machine_with_subject(1);
        let idle = machine.state().clone();
        machine.start(Utc::now()).unwrap();

        let mut saves = Vec::new();
        for _ in 0..60 {
            if let TickOutcome::Completed(save) = machine.tick() {
                saves.push(save);
            }
        }

        assert_eq!(
            saves,
            vec![SessionSave {
                subject_id: "physics".to_string(),
                duration_minutes: 1,
            }]
        );
        assert_eq!(machine.state(), &idle);
        assert_eq!(machine.tick(), TickOutcome::Ignored);
    }

    #[test]
    fn test_pause_then_resume_keeps_remaining() {
        let mut machine = machine_with_subject(2);
        machine.start(Utc::now()).unwrap();
        for _ in 0..10 {
            machine.tick();
        }

        assert!(machine.pause());
        assert_eq!(machine.state().status, TimerStatus::Paused);
        assert_eq!(machine.tick(), TickOutcome::Ignored);
        assert_eq!(machine.state().remaining_seconds, 110);

        assert_eq!(machine.start(Utc::now()), Ok(StartOutcome::Started));
        assert_eq!(
            machine.tick(),
            TickOutcome::Counting {
                remaining_seconds: 109
            }
        );
    }

    #[test]
    fn test_pause_when_idle() {
        let mut machine = machine_with_subject(2);
        assert!(!machine.pause());
        assert_eq!(machine.state().status, TimerStatus::Idle);
    }

    #[test]
    fn test_started_at_survives_pause() {
        let mut machine = machine_with_subject(2);
        let first = Utc::now();
        machine.start(first).unwrap();
        machine.pause();
        machine.start(first + chrono::Duration::seconds(30)).unwrap();
        assert_eq!(machine.state().started_at, Some(first));
    }

    #[test]
    fn test_stop_offers_rounded_minutes() {
        let mut machine = machine_with_subject(25);
        machine.start(Utc::now()).unwrap();
        for _ in 0..150 {
            machine.tick();
        }

        let outcome = machine.stop();
        assert_eq!(outcome.elapsed_minutes, 3);
        assert_eq!(outcome.offer.as_ref().map(|s| s.duration_minutes), Some(3));
        assert_eq!(
            outcome.prompt().as_deref(),
            Some("Save 3 minutes of study time for this session?")
        );
        assert_eq!(machine.state().remaining_seconds, 25 * 60);
        assert_eq!(machine.state().status, TimerStatus::Idle);
    }

    #[test]
    fn test_stop_single_minute_prompt() {
        let mut machine = machine_with_subject(25);
        machine.start(Utc::now()).unwrap();
        for _ in 0..60 {
            machine.tick();
        }
        let outcome = machine.stop();
        assert_eq!(outcome.prompt().as_deref(), Some("Save 1 minute of study time?"));
    }

    #[test]
    fn test_stop_under_half_minute_offers_nothing() {
        let mut machine = machine_with_subject(25);
        machine.start(Utc::now()).unwrap();
        for _ in 0..29 {
            machine.tick();
        }
        let outcome = machine.stop();
        assert_eq!(outcome.elapsed_minutes, 0);
        assert!(outcome.offer.is_none());
        assert!(outcome.prompt().is_none());
    }

    #[test]
    fn test_stop_from_paused() {
        let mut machine = machine_with_subject(25);
        machine.start(Utc::now()).unwrap();
        for _ in 0..120 {
            machine.tick();
        }
        machine.pause();
        machine.select_subject(None).unwrap();

        let outcome = machine.stop();
        assert_eq!(outcome.elapsed_minutes, 2);
        assert!(outcome.offer.is_none());
    }

    #[test]
    fn test_clearing_subject_refused_while_running() {
        let mut machine = machine_with_subject(5);
        machine.start(Utc::now()).unwrap();
        assert_eq!(machine.select_subject(None), Err(TimerError::Running));
        machine
            .select_subject(Some("chemistry".to_string()))
            .unwrap();
        assert_eq!(
            machine.state().selected_subject.as_deref(),
            Some("chemistry")
        );
    }
}
