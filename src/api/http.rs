//! reqwest-backed API client
//!
//! Used by the terminal companion and the integration tests.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, COOKIE};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::client::{
    delete_subject_path, join_url, StudyApi, DASHBOARD_STATS_PATH, START_TIMER_PATH,
    STOP_TIMER_PATH,
};
use super::dto::{ActionResponse, DashboardStatsResponse, TimerRequest};
use super::error::{ClientError, ClientResult};
use crate::config::ApiConfig;

/// HTTP client for the StudyTrack backend
pub struct HttpStudyApi {
    client: Client,
    base_url: String,
}

impl HttpStudyApi {
    /// Create a client for the configured backend
    pub fn new(config: &ApiConfig) -> ClientResult<Self> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = &config.session_cookie {
            let value = HeaderValue::from_str(&format!("session={}", cookie))
                .map_err(|e| ClientError::Build(format!("invalid session cookie: {}", e)))?;
            headers.insert(COOKIE, value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }
}

fn transport_error(e: reqwest::Error) -> ClientError {
    if e.is_timeout() {
        ClientError::Network("request timed out".to_string())
    } else if e.is_connect() {
        ClientError::Network(format!("backend unavailable: {}", e))
    } else if e.is_builder() {
        ClientError::Build(e.to_string())
    } else {
        ClientError::Network(e.to_string())
    }
}

/// Decode the JSON envelope whatever the status; the backend reports refusals in-band
async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let status = response.status().as_u16();
    let body = response.text().await.map_err(transport_error)?;

    serde_json::from_str(&body).map_err(|e| {
        tracing::debug!(status, body = %body, "Undecodable response body");
        ClientError::undecodable(status, e.to_string())
    })
}

#[async_trait(?Send)]
impl StudyApi for HttpStudyApi {
    async fn dashboard_stats(&self) -> ClientResult<DashboardStatsResponse> {
        let response = self
            .client
            .get(self.url(DASHBOARD_STATS_PATH))
            .send()
            .await
            .map_err(transport_error)?;

        decode(response).await
    }

    async fn start_timer(&self, request: &TimerRequest) -> ClientResult<ActionResponse> {
        let response = self
            .client
            .post(self.url(START_TIMER_PATH))
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        decode(response).await
    }

    async fn stop_timer(&self, request: &TimerRequest) -> ClientResult<ActionResponse> {
        tracing::debug!(subject_id = %request.subject_id, duration = request.duration, "Saving session");

        let response = self
            .client
            .post(self.url(STOP_TIMER_PATH))
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        decode(response).await
    }

    async fn delete_subject(&self, subject_id: &str) -> ClientResult<ActionResponse> {
        let response = self
            .client
            .delete(self.url(&delete_subject_path(subject_id)))
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(transport_error)?;

        decode(response).await
    }
}
