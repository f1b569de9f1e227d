//! Request and response bodies of the StudyTrack backend
//!
//! Field names follow the JSON the server emits. Error responses carry only an
//! `error` string, so `success` defaults to `false` when absent.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/start_timer` and `POST /api/stop_timer`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerRequest {
    pub subject_id: String,
    /// Whole minutes
    pub duration: u32,
}

/// Generic `{success, message?, error?}` envelope
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActionResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            ..Default::default()
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
        }
    }
}

/// Response of `GET /api/dashboard_stats`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStatsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<DashboardStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate statistics for the signed-in user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub today_hours: f64,
    pub weekly_hours: f64,
    pub daily_goal_percentage: f64,
    #[serde(default)]
    pub subject_progress: Vec<SubjectProgress>,
}

/// Today's progress for one subject
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectProgress {
    pub subject_id: String,
    /// Share of the subject's daily goal, capped at 100 by the server
    pub percentage: f64,
    pub today_minutes: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_decodes_as_failure() {
        let body = r#"{"error": "Not authenticated"}"#;
        let response: ActionResponse = serde_json::from_str(body).unwrap();
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("Not authenticated"));
    }

    #[test]
    fn test_dashboard_stats_decode() {
        let body = r#"{
            "success": true,
            "stats": {
                "today_hours": 1.5,
                "weekly_hours": 7,
                "daily_goal_percentage": 75.0,
                "subject_progress": [
                    {"subject_id": "64f0c2", "percentage": 40.5, "today_minutes": 45}
                ]
            }
        }"#;
        let response: DashboardStatsResponse = serde_json::from_str(body).unwrap();
        let stats = response.stats.unwrap();
        assert_eq!(stats.weekly_hours, 7.0);
        assert_eq!(stats.subject_progress[0].subject_id, "64f0c2");
        assert_eq!(stats.subject_progress[0].today_minutes, 45.0);
    }

    #[test]
    fn test_timer_request_shape() {
        let request = TimerRequest {
            subject_id: "3".to_string(),
            duration: 25,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"subject_id": "3", "duration": 25})
        );
    }
}
