//! Dashboard Page
//!
//! Polls statistics on load and every interval, and on the refresh button.

use gloo_timers::callback::Interval;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;

use studytrack::config::DashboardConfig;
use studytrack::{DashboardPoller, PollOutcome, StatsPatch, StatsView};

use crate::api::GlooStudyApi;
use crate::components::FlashNotifier;
use crate::dom;

/// Stat tiles in page order: today, sessions, week, goal
const TODAY_TILE: usize = 0;
const WEEKLY_TILE: usize = 2;
const GOAL_TILE: usize = 3;

/// Writes statistics into the server-rendered dashboard
struct DomStatsView;

impl StatsView for DomStatsView {
    fn apply(&self, patch: &StatsPatch) {
        let tiles = dom::query_all(".stat-number");
        for (index, text) in [
            (TODAY_TILE, &patch.today),
            (WEEKLY_TILE, &patch.weekly),
            (GOAL_TILE, &patch.goal),
        ] {
            if let Some(tile) = tiles.get(index) {
                dom::set_text(tile, text);
            }
        }

        for subject in &patch.subjects {
            let selector = format!("[data-subject-id=\"{}\"] .progress-fill", subject.subject_id);
            let Some(fill) = dom::query(&selector) else {
                continue;
            };
            dom::set_style(&fill, "width", &subject.width);

            let label = fill
                .closest(".subject-card")
                .ok()
                .flatten()
                .and_then(|card| dom::query_in(&card, ".subject-time"));
            if let Some(label) = label {
                dom::set_text(&label, &subject.label);
            }
        }
    }
}

/// Statistics poller bound to the dashboard page
pub struct Dashboard {
    poller: DashboardPoller<GlooStudyApi>,
    notifier: Rc<FlashNotifier>,
}

impl Dashboard {
    /// Start polling when the page is a dashboard
    pub fn mount(
        config: &DashboardConfig,
        api: GlooStudyApi,
        notifier: Rc<FlashNotifier>,
    ) -> Option<Rc<Self>> {
        dom::query(".dashboard-header")?;

        let dashboard = Rc::new(Self {
            poller: DashboardPoller::new(api, config),
            notifier,
        });

        dashboard.refresh();

        let period = dashboard.poller.interval().as_millis().min(u32::MAX as u128) as u32;
        let scheduled = Rc::clone(&dashboard);
        Interval::new(period, move || scheduled.refresh()).forget();

        if let Some(button) = dom::by_id("refreshStats") {
            let manual = Rc::clone(&dashboard);
            dom::on(&button, "click", move |_| manual.refresh_with_toast());
        }

        Some(dashboard)
    }

    /// Poll now; failures only reach the console
    pub fn refresh(self: &Rc<Self>) {
        let dashboard = Rc::clone(self);
        spawn_local(async move {
            report(dashboard.poller.poll_once(&DomStatsView).await);
        });
    }

    fn refresh_with_toast(self: &Rc<Self>) {
        let dashboard = Rc::clone(self);
        spawn_local(async move {
            let outcome = dashboard
                .poller
                .refresh_now(&DomStatsView, &*dashboard.notifier)
                .await;
            report(outcome);
        });
    }
}

fn report(outcome: PollOutcome) {
    match outcome {
        PollOutcome::Applied => {}
        PollOutcome::Refused => dom::log_error("Dashboard stats request refused"),
        PollOutcome::Failed => dom::log_error("Error updating dashboard stats"),
    }
}
