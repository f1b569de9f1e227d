//! HttpStudyApi against an in-process backend speaking the StudyTrack JSON contract

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{json, Value};
use std::cell::RefCell;
use std::sync::{Arc, Mutex};

use studytrack::api::TimerRequest;
use studytrack::config::ApiConfig;
use studytrack::timer::save_session;
use studytrack::{
    delete_subject, ClientError, DashboardPoller, DeleteOutcome, FixedGate, HttpStudyApi,
    NotificationLevel, Notifier, PollOutcome, SaveOutcome, StatsPatch, StatsView, StudyApi,
    SubjectRef, TickOutcome, TimerMachine,
};

const SESSION: &str = "session=letmein";

#[derive(Clone, Default)]
struct Backend {
    saved: Arc<Mutex<Vec<TimerRequest>>>,
    started: Arc<Mutex<Vec<TimerRequest>>>,
    deleted: Arc<Mutex<Vec<String>>>,
}

fn signed_in(headers: &HeaderMap) -> bool {
    headers
        .get("cookie")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains(SESSION))
        .unwrap_or(false)
}

fn unauthenticated() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": "Not authenticated"})),
    )
}

async fn dashboard_stats(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !signed_in(&headers) {
        return unauthenticated();
    }
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "stats": {
                "today_hours": 1.5,
                "weekly_hours": 7,
                "daily_goal_percentage": 75.0,
                "subject_progress": [
                    {"subject_id": "math", "percentage": 40.5, "today_minutes": 45}
                ]
            }
        })),
    )
}

async fn start_timer(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(request): Json<TimerRequest>,
) -> (StatusCode, Json<Value>) {
    if !signed_in(&headers) {
        return unauthenticated();
    }
    backend.started.lock().unwrap().push(request);
    (StatusCode::OK, Json(json!({"success": true, "message": "Timer started"})))
}

async fn stop_timer(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(request): Json<TimerRequest>,
) -> (StatusCode, Json<Value>) {
    if !signed_in(&headers) {
        return unauthenticated();
    }
    if request.duration == 0 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Invalid duration"})),
        );
    }
    backend.saved.lock().unwrap().push(request);
    (StatusCode::OK, Json(json!({"success": true, "message": "Study session saved"})))
}

async fn delete_subject_route(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> (StatusCode, Json<Value>) {
    if !signed_in(&headers) {
        return unauthenticated();
    }
    if id == "missing" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Subject not found"})),
        );
    }
    backend.deleted.lock().unwrap().push(id);
    (StatusCode::OK, Json(json!({"success": true})))
}

async fn spawn_backend() -> (String, Backend) {
    let backend = Backend::default();
    let app = Router::new()
        .route("/api/dashboard_stats", get(dashboard_stats))
        .route("/api/start_timer", post(start_timer))
        .route("/api/stop_timer", post(stop_timer))
        .route("/api/delete_subject/:id", delete(delete_subject_route))
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), backend)
}

async fn spawn_broken_backend() -> String {
    let app = Router::new().route(
        "/api/dashboard_stats",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error") }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn client(base_url: &str, signed_in: bool) -> HttpStudyApi {
    let config = ApiConfig {
        base_url: base_url.to_string(),
        session_cookie: signed_in.then(|| "letmein".to_string()),
        ..ApiConfig::default()
    };
    HttpStudyApi::new(&config).unwrap()
}

#[derive(Default)]
struct Collecting {
    messages: RefCell<Vec<(NotificationLevel, String)>>,
}

impl Notifier for Collecting {
    fn notify(&self, level: NotificationLevel, message: &str) {
        self.messages.borrow_mut().push((level, message.to_string()));
    }
}

#[derive(Default)]
struct Captured {
    patches: RefCell<Vec<StatsPatch>>,
}

impl StatsView for Captured {
    fn apply(&self, patch: &StatsPatch) {
        self.patches.borrow_mut().push(patch.clone());
    }
}

#[tokio::test]
async fn test_dashboard_poll_applies_stats() {
    let (url, _backend) = spawn_backend().await;
    let poller = DashboardPoller::new(client(&url, true), &Default::default());
    let view = Captured::default();

    assert_eq!(poller.poll_once(&view).await, PollOutcome::Applied);

    let patches = view.patches.borrow();
    assert_eq!(patches[0].today, "1.5h");
    assert_eq!(patches[0].weekly, "7h");
    assert_eq!(patches[0].subjects[0].width, "40.5%");
    assert_eq!(patches[0].subjects[0].label, "45m today");
}

#[tokio::test]
async fn test_unauthenticated_poll_is_refused() {
    let (url, _backend) = spawn_backend().await;
    let api = client(&url, false);

    let response = api.dashboard_stats().await.unwrap();
    assert!(!response.success);
    assert_eq!(response.error.as_deref(), Some("Not authenticated"));

    let poller = DashboardPoller::new(api, &Default::default());
    let view = Captured::default();
    assert_eq!(poller.poll_once(&view).await, PollOutcome::Refused);
    assert!(view.patches.borrow().is_empty());
}

#[tokio::test]
async fn test_non_json_error_reports_status() {
    let url = spawn_broken_backend().await;
    let api = client(&url, true);

    assert_eq!(
        api.dashboard_stats().await.unwrap_err(),
        ClientError::Status { status: 500 }
    );
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = client(&format!("http://{}", addr), true);
    assert!(matches!(
        api.dashboard_stats().await,
        Err(ClientError::Network(_))
    ));
}

#[tokio::test]
async fn test_completed_session_is_saved() {
    let (url, backend) = spawn_backend().await;
    let api = client(&url, true);
    let notifier = Collecting::default();

    let mut timer = TimerMachine::new(&Default::default());
    timer.set_duration(1).unwrap();
    timer.select_subject(Some("math".to_string())).unwrap();
    timer.start(Utc::now()).unwrap();

    let mut save = None;
    for _ in 0..60 {
        if let TickOutcome::Completed(done) = timer.tick() {
            save = Some(done);
        }
    }
    let save = save.unwrap();

    assert_eq!(save_session(&api, &notifier, None, &save).await, SaveOutcome::Saved);
    assert_eq!(
        backend.saved.lock().unwrap().as_slice(),
        &[TimerRequest {
            subject_id: "math".to_string(),
            duration: 1,
        }]
    );
    assert_eq!(notifier.messages.borrow()[0].0, NotificationLevel::Success);
}

#[tokio::test]
async fn test_start_timer_is_acknowledged() {
    let (url, backend) = spawn_backend().await;
    let api = client(&url, true);

    let request = TimerRequest {
        subject_id: "math".to_string(),
        duration: 25,
    };
    let response = api.start_timer(&request).await.unwrap();

    assert!(response.success);
    assert_eq!(backend.started.lock().unwrap().as_slice(), &[request]);
}

#[tokio::test]
async fn test_rejected_save_keeps_error_text() {
    let (url, backend) = spawn_backend().await;
    let api = client(&url, true);

    let response = api
        .stop_timer(&TimerRequest {
            subject_id: "math".to_string(),
            duration: 0,
        })
        .await
        .unwrap();

    assert!(!response.success);
    assert_eq!(response.error.as_deref(), Some("Invalid duration"));
    assert!(backend.saved.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_subject_flow() {
    let (url, backend) = spawn_backend().await;
    let api = client(&url, true);
    let notifier = Collecting::default();
    let removed = RefCell::new(Vec::new());

    let chemistry = SubjectRef {
        id: "chem".to_string(),
        name: "Chemistry".to_string(),
    };
    let outcome = delete_subject(&api, &FixedGate(true), &notifier, &chemistry, || {
        removed.borrow_mut().push(chemistry.id.clone())
    })
    .await;
    assert_eq!(outcome, DeleteOutcome::Deleted);

    let ghost = SubjectRef {
        id: "missing".to_string(),
        name: "Ghost".to_string(),
    };
    let outcome = delete_subject(&api, &FixedGate(true), &notifier, &ghost, || {
        removed.borrow_mut().push(ghost.id.clone())
    })
    .await;
    assert_eq!(outcome, DeleteOutcome::Failed);

    assert_eq!(removed.borrow().as_slice(), &["chem".to_string()]);
    assert_eq!(backend.deleted.lock().unwrap().as_slice(), &["chem".to_string()]);
    assert_eq!(
        notifier
            .messages
            .borrow()
            .iter()
            .map(|(level, _)| *level)
            .collect::<Vec<_>>(),
        vec![NotificationLevel::Success, NotificationLevel::Error]
    );
}

#[tokio::test]
async fn test_subject_id_with_reserved_characters_is_deleted() {
    let (url, backend) = spawn_backend().await;
    let api = client(&url, true);
    let notifier = Collecting::default();

    let odd = SubjectRef {
        id: "maths/2?term=1#a".to_string(),
        name: "Maths".to_string(),
    };
    let outcome = delete_subject(&api, &FixedGate(true), &notifier, &odd, || {}).await;

    assert_eq!(outcome, DeleteOutcome::Deleted);
    assert_eq!(
        backend.deleted.lock().unwrap().as_slice(),
        &["maths/2?term=1#a".to_string()]
    );
}

#[test]
fn test_base_url_drops_trailing_slash() {
    let api = client("http://localhost:5000/", false);
    assert_eq!(api.base_url(), "http://localhost:5000");
}
