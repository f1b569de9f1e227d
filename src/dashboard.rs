//! Dashboard Polling
//!
//! Fetches the statistics snapshot and turns it into the text and widths shown on
//! the dashboard. The snapshot is applied and dropped; nothing is retained between
//! polls. A failed poll changes nothing on screen; the next scheduled poll is the
//! only recovery.

use std::time::Duration;

use crate::api::{ClientResult, DashboardStats, StudyApi};
use crate::config::DashboardConfig;
use crate::format::format_number;
use crate::notify::Notifier;

pub const STATS_UPDATED_MESSAGE: &str = "Stats updated!";

/// Display values for one subject card
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectPatch {
    pub subject_id: String,
    /// CSS width of the progress fill, e.g. `40.5%`
    pub width: String,
    /// e.g. `45m today`
    pub label: String,
}

/// Display values derived from one statistics snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct StatsPatch {
    pub today: String,
    pub weekly: String,
    pub goal: String,
    pub subjects: Vec<SubjectPatch>,
}

impl From<&DashboardStats> for StatsPatch {
    fn from(stats: &DashboardStats) -> Self {
        Self {
            today: format!("{}h", format_number(stats.today_hours)),
            weekly: format!("{}h", format_number(stats.weekly_hours)),
            goal: format!("{}%", format_number(stats.daily_goal_percentage)),
            subjects: stats
                .subject_progress
                .iter()
                .map(|s| SubjectPatch {
                    subject_id: s.subject_id.clone(),
                    width: format!("{}%", format_number(s.percentage)),
                    label: format!("{}m today", format_number(s.today_minutes)),
                })
                .collect(),
        }
    }
}

/// Whatever shows the dashboard numbers
pub trait StatsView {
    fn apply(&self, patch: &StatsPatch);
}

/// How a poll ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Applied,
    /// Backend answered `success: false`
    Refused,
    /// Transport or decode failure, already logged
    Failed,
}

/// Periodic statistics fetcher
pub struct DashboardPoller<A> {
    api: A,
    interval: Duration,
}

impl<A: StudyApi> DashboardPoller<A> {
    pub fn new(api: A, config: &DashboardConfig) -> Self {
        Self {
            api,
            interval: Duration::from_secs(config.poll_interval_secs.max(1)),
        }
    }

    /// Time between scheduled polls
    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Fetch a snapshot; `Ok(None)` when the backend refused
    pub async fn fetch(&self) -> ClientResult<Option<StatsPatch>> {
        let response = self.api.dashboard_stats().await?;
        if !response.success {
            return Ok(None);
        }
        Ok(response.stats.as_ref().map(StatsPatch::from))
    }

    /// One scheduled poll. Never fails; errors end in the log.
    pub async fn poll_once<V: StatsView + ?Sized>(&self, view: &V) -> PollOutcome {
        match self.fetch().await {
            Ok(Some(patch)) => {
                view.apply(&patch);
                tracing::debug!(today = %patch.today, "Dashboard stats applied");
                PollOutcome::Applied
            }
            Ok(None) => {
                tracing::warn!("Dashboard stats request refused");
                PollOutcome::Refused
            }
            Err(e) => {
                tracing::error!("Error updating dashboard stats: {}", e);
                PollOutcome::Failed
            }
        }
    }

    /// Manual refresh: immediate poll plus a confirmation toast
    pub async fn refresh_now<V, N>(&self, view: &V, notifier: &N) -> PollOutcome
    where
        V: StatsView + ?Sized,
        N: Notifier + ?Sized,
    {
        notifier.success(STATS_UPDATED_MESSAGE);
        self.poll_once(view).await
    }
}
