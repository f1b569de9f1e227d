//! Display derivation for the countdown

use super::state::TimerState;

/// Radius of the SVG progress ring drawn around the clock
pub const PROGRESS_RING_RADIUS: f64 = 45.0;

/// `MM:SS`, zero padded; minutes keep counting past 59
pub fn format_countdown(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Stroke offset for a ring of `radius`: 0 when full, the circumference when empty
pub fn progress_offset(state: &TimerState, radius: f64) -> f64 {
    let circumference = 2.0 * std::f64::consts::PI * radius;
    let fraction_left = state.remaining_seconds as f64 / state.total_seconds as f64;
    circumference * (1.0 - fraction_left)
}

/// Everything a renderer needs to draw the timer, derived from state
#[derive(Debug, Clone, PartialEq)]
pub struct TimerView {
    pub clock: String,
    pub ring_offset: f64,
    pub running: bool,
}

impl From<&TimerState> for TimerView {
    fn from(state: &TimerState) -> Self {
        Self {
            clock: format_countdown(state.remaining_seconds),
            ring_offset: progress_offset(state, PROGRESS_RING_RADIUS),
            running: state.is_running(),
        }
    }
}
