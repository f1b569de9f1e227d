//! Study Timer
//!
//! A countdown with one subject, one duration and one tick. The pieces are kept
//! apart so each can be exercised on its own:
//!
//! - [`machine`]: pure transitions over [`TimerState`]
//! - [`driver`]: owns the single repeating tick
//! - [`session`]: saving finished or stopped sessions
//! - [`display`]: clock text and progress ring geometry

pub mod display;
pub mod driver;
pub mod error;
pub mod machine;
pub mod session;
pub mod state;

pub use display::{format_countdown, progress_offset, TimerView, PROGRESS_RING_RADIUS};
pub use driver::{TickSource, TimerDriver};
pub use error::{TimerError, TimerResult};
pub use machine::{
    SessionSave, StartOutcome, StopOutcome, TickOutcome, TimerMachine, MAX_TIMER_MINUTES,
};
pub use session::{confirm_and_save, save_session, SaveOutcome};
pub use state::{TimerState, TimerStatus};
