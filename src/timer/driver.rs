//! Tick ownership
//!
//! [`TimerDriver`] pairs the state machine with the single repeating tick that
//! drives it. The previous tick handle is always cancelled before a new one is
//! created, so a countdown can never be decremented twice per second.

use chrono::{DateTime, Utc};

use super::error::TimerResult;
use super::machine::{StartOutcome, StopOutcome, TickOutcome, TimerMachine};
use super::state::TimerState;

/// Something that can fire a callback every second until its handle is cancelled
pub trait TickSource {
    type Handle;

    /// Begin a one-second repeating tick
    fn every_second(&mut self) -> Self::Handle;

    /// Stop a tick. Dropping the handle must be enough for the default.
    fn cancel(&mut self, handle: Self::Handle) {
        drop(handle);
    }
}

/// State machine plus at most one live tick
pub struct TimerDriver<S: TickSource> {
    machine: TimerMachine,
    source: S,
    ticker: Option<S::Handle>,
}

impl<S: TickSource> TimerDriver<S> {
    pub fn new(machine: TimerMachine, source: S) -> Self {
        Self {
            machine,
            source,
            ticker: None,
        }
    }

    pub fn state(&self) -> &TimerState {
        self.machine.state()
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn set_duration(&mut self, minutes: i64) -> TimerResult<()> {
        self.machine.set_duration(minutes)
    }

    pub fn select_subject(&mut self, subject: Option<String>) -> TimerResult<()> {
        self.machine.select_subject(subject)
    }

    pub fn start(&mut self, now: DateTime<Utc>) -> TimerResult<StartOutcome> {
        let outcome = self.machine.start(now)?;
        if outcome == StartOutcome::Started {
            self.cancel_ticker();
            self.ticker = Some(self.source.every_second());
        }
        Ok(outcome)
    }

    pub fn tick(&mut self) -> TickOutcome {
        let outcome = self.machine.tick();
        match outcome {
            TickOutcome::Completed(_) | TickOutcome::Ignored => self.cancel_ticker(),
            TickOutcome::Counting { .. } => {}
        }
        outcome
    }

    pub fn pause(&mut self) -> bool {
        self.cancel_ticker();
        self.machine.pause()
    }

    pub fn stop(&mut self) -> StopOutcome {
        self.cancel_ticker();
        self.machine.stop()
    }

    fn cancel_ticker(&mut self) {
        if let Some(handle) = self.ticker.take() {
            self.source.cancel(handle);
        }
    }
}
