//! # StudyTrack client
//!
//! Client-side logic of the StudyTrack study tracker, independent of any browser:
//! the countdown timer, dashboard polling, chart setup and page flows. The WASM
//! frontend (`studytrack-ui`) and the `studytrack` terminal companion both sit on
//! top of this crate.
//!
//! ## Modules
//!
//! - [`timer`]: countdown state machine, tick ownership, session saving
//! - [`dashboard`]: statistics polling and display patches
//! - [`charts`]: chart configurations and the chart registry
//! - [`glue`]: subject deletion flow
//! - [`api`]: backend contract and client seam
//! - [`notify`]: notification and confirmation seams
//! - [`config`]: settings
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::Utc;
//! use studytrack::config::TimerConfig;
//! use studytrack::timer::{format_countdown, TickOutcome, TimerMachine};
//!
//! let mut timer = TimerMachine::new(&TimerConfig::default());
//! timer.set_duration(1).unwrap();
//! timer.select_subject(Some("math".to_string())).unwrap();
//! timer.start(Utc::now()).unwrap();
//!
//! let mut completed = None;
//! for _ in 0..60 {
//!     if let TickOutcome::Completed(save) = timer.tick() {
//!         completed = Some(save);
//!     }
//! }
//!
//! assert_eq!(completed.unwrap().duration_minutes, 1);
//! assert_eq!(format_countdown(timer.state().remaining_seconds), "01:00");
//! ```

pub mod api;
pub mod charts;
pub mod config;
pub mod dashboard;
pub mod format;
pub mod glue;
pub mod notify;
pub mod timer;

pub use api::{ClientError, StudyApi};
#[cfg(feature = "native")]
pub use api::HttpStudyApi;

pub use charts::{ChartConfig, ChartError, ChartKind, ChartSeries, ChartSpec, ChartSurface, ChartsController};

pub use config::{Config, ConfigError, generate_default_config};

pub use dashboard::{DashboardPoller, PollOutcome, StatsPatch, StatsView};

pub use glue::{delete_subject, DeleteOutcome, SubjectRef};

pub use notify::{CompletionHook, DecisionGate, FixedGate, FlashOrigin, FlashTiming, NotificationLevel, Notifier};

pub use timer::{
    SaveOutcome, SessionSave, StopOutcome, TickOutcome, TickSource, TimerDriver, TimerError,
    TimerMachine, TimerState, TimerStatus,
};
