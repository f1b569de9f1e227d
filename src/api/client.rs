//! StudyTrack API seam
//!
//! Implemented over `reqwest` for the terminal and over `gloo-net` in the browser.

use async_trait::async_trait;

use super::dto::{ActionResponse, DashboardStatsResponse, TimerRequest};
use super::error::ClientResult;

pub const DASHBOARD_STATS_PATH: &str = "/api/dashboard_stats";
pub const START_TIMER_PATH: &str = "/api/start_timer";
pub const STOP_TIMER_PATH: &str = "/api/stop_timer";

/// Path of the delete endpoint for one subject, with the id as a single segment
pub fn delete_subject_path(subject_id: &str) -> String {
    format!("/api/delete_subject/{}", urlencoding::encode(subject_id))
}

/// Join a base URL and an absolute API path without doubling slashes
pub fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

/// Operations the client needs from the backend
///
/// `?Send` because browser futures are bound to the UI thread.
#[async_trait(?Send)]
pub trait StudyApi {
    async fn dashboard_stats(&self) -> ClientResult<DashboardStatsResponse>;

    async fn start_timer(&self, request: &TimerRequest) -> ClientResult<ActionResponse>;

    async fn stop_timer(&self, request: &TimerRequest) -> ClientResult<ActionResponse>;

    async fn delete_subject(&self, subject_id: &str) -> ClientResult<ActionResponse>;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::api::dto::DashboardStats;
    use crate::api::error::ClientError;
    use std::cell::RefCell;

    /// In-memory backend that records calls and replays scripted answers
    pub struct RecordingApi {
        pub stats: RefCell<ClientResult<DashboardStatsResponse>>,
        pub action: RefCell<ClientResult<ActionResponse>>,
        pub saves: RefCell<Vec<TimerRequest>>,
        pub deletes: RefCell<Vec<String>>,
        pub stats_calls: RefCell<usize>,
    }

    impl Default for RecordingApi {
        fn default() -> Self {
            Self {
                stats: RefCell::new(Ok(DashboardStatsResponse {
                    success: true,
                    stats: Some(DashboardStats::default()),
                    error: None,
                })),
                action: RefCell::new(Ok(ActionResponse::ok())),
                saves: RefCell::new(Vec::new()),
                deletes: RefCell::new(Vec::new()),
                stats_calls: RefCell::new(0),
            }
        }
    }

    impl RecordingApi {
        pub fn failing_actions(error: ClientError) -> Self {
            let api = Self::default();
            *api.action.borrow_mut() = Err(error);
            api
        }

        pub fn rejecting_actions(message: &str) -> Self {
            let api = Self::default();
            *api.action.borrow_mut() = Ok(ActionResponse::failed(message));
            api
        }
    }

    #[async_trait(?Send)]
    impl StudyApi for RecordingApi {
        async fn dashboard_stats(&self) -> ClientResult<DashboardStatsResponse> {
            *self.stats_calls.borrow_mut() += 1;
            self.stats.borrow().clone()
        }

        async fn start_timer(&self, _request: &TimerRequest) -> ClientResult<ActionResponse> {
            self.action.borrow().clone()
        }

        async fn stop_timer(&self, request: &TimerRequest) -> ClientResult<ActionResponse> {
            self.saves.borrow_mut().push(request.clone());
            self.action.borrow().clone()
        }

        async fn delete_subject(&self, subject_id: &str) -> ClientResult<ActionResponse> {
            self.deletes.borrow_mut().push(subject_id.to_string());
            self.action.borrow().clone()
        }
    }
}
