//! HTTP API Client
//!
//! `StudyApi` over `gloo-net` fetch. Requests go to the page's own origin unless a
//! base URL was stored in local storage.

use async_trait::async_trait;
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;

use studytrack::api::client::{DASHBOARD_STATS_PATH, START_TIMER_PATH, STOP_TIMER_PATH};
use studytrack::api::{
    delete_subject_path, join_url, ActionResponse, ClientError, ClientResult,
    DashboardStatsResponse, TimerRequest,
};
use studytrack::StudyApi;

/// Local storage key for an API base override
pub const API_BASE_KEY: &str = "studytrack_api_url";

/// Get the API base URL from local storage; empty means same origin
pub fn get_api_base() -> String {
    let url = crate::dom::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(API_BASE_KEY).ok().flatten())
        .unwrap_or_default();
    // Normalize: remove trailing slash
    url.trim_end_matches('/').to_string()
}

/// Backend client bound to one base URL
#[derive(Clone)]
pub struct GlooStudyApi {
    base_url: String,
}

impl GlooStudyApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn from_storage() -> Self {
        Self::new(get_api_base())
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }
}

fn network(e: gloo_net::Error) -> ClientError {
    ClientError::Network(e.to_string())
}

/// Decode the JSON envelope whatever the status
async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let status = response.status();
    let body = response.text().await.map_err(network)?;

    serde_json::from_str(&body).map_err(|e| ClientError::undecodable(status, e.to_string()))
}

async fn post_json(url: &str, request: &TimerRequest) -> ClientResult<ActionResponse> {
    let response = Request::post(url)
        .json(request)
        .map_err(|e| ClientError::Build(e.to_string()))?
        .send()
        .await
        .map_err(network)?;

    decode(response).await
}

#[async_trait(?Send)]
impl StudyApi for GlooStudyApi {
    async fn dashboard_stats(&self) -> ClientResult<DashboardStatsResponse> {
        let response = Request::get(&self.url(DASHBOARD_STATS_PATH))
            .send()
            .await
            .map_err(network)?;

        decode(response).await
    }

    async fn start_timer(&self, request: &TimerRequest) -> ClientResult<ActionResponse> {
        post_json(&self.url(START_TIMER_PATH), request).await
    }

    async fn stop_timer(&self, request: &TimerRequest) -> ClientResult<ActionResponse> {
        crate::dom::log(&format!(
            "Saving session: subject_id={}, duration={}",
            request.subject_id, request.duration
        ));
        post_json(&self.url(STOP_TIMER_PATH), request).await
    }

    async fn delete_subject(&self, subject_id: &str) -> ClientResult<ActionResponse> {
        let response = Request::delete(&self.url(&delete_subject_path(subject_id)))
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(network)?;

        decode(response).await
    }
}
