//! Service tests against an in-process mock of the HireTrack API.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use api_client::{FailureKind, HttpClient};
use axum::{
    extract::{Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use hiretrack::{
    ApplicantFilters, ApplicantStatus, EmploymentType, HireTrack, HireTrackError, MemoryStore,
    NewApplicant, NewPosition, PositionFilters, PositionStatus, PositionUpdate, RequestFailure,
    UserProfile, UserType,
};
use serde_json::{json, Value};

// ============================================================================
// Mock API
// ============================================================================

#[derive(Debug, Clone)]
struct Seen {
    method: String,
    path: String,
    query: Option<String>,
    authorization: Option<String>,
}

#[derive(Clone, Default)]
struct Recorder {
    requests: Arc<Mutex<Vec<Seen>>>,
    bodies: Arc<Mutex<Vec<Value>>>,
}

impl Recorder {
    fn requests(&self) -> Vec<Seen> {
        self.requests.lock().unwrap().clone()
    }

    fn last(&self) -> Seen {
        self.requests().last().cloned().expect("no request recorded")
    }

    fn last_body(&self) -> Value {
        self.bodies.lock().unwrap().last().cloned().expect("no body recorded")
    }

    fn keep(&self, body: Value) {
        self.bodies.lock().unwrap().push(body);
    }
}

async fn record(State(recorder): State<Recorder>, request: Request, next: Next) -> Response {
    let seen = Seen {
        method: request.method().to_string(),
        path: request.uri().path().to_string(),
        query: request.uri().query().map(String::from),
        authorization: request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(String::from),
    };
    recorder.requests.lock().unwrap().push(seen);
    next.run(request).await
}

fn applicant_json(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "positionId": "p1",
        "positionTitle": "Backend Engineer",
        "status": status,
        "rating": 4,
        "appliedAt": "2024-05-01T10:00:00Z"
    })
}

fn position_json(id: &str) -> Value {
    json!({
        "id": id,
        "title": "Backend Engineer",
        "department": "Engineering",
        "location": "Remote",
        "type": "full-time",
        "status": "open",
        "applicantCount": 3,
        "postedAt": "2024-04-01T09:00:00Z"
    })
}

async fn list_applicants() -> Json<Value> {
    Json(json!({
        "data": [applicant_json("a1", "screening")],
        "total": 41,
        "page": 2,
        "limit": 1
    }))
}

async fn get_applicant(Path(id): Path<String>) -> Response {
    if id == "odd" {
        return Json(json!({"data": applicant_json(&id, "pending")})).into_response();
    }
    if id == "missing" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "Applicant not found"})),
        )
            .into_response();
    }
    Json(json!({"data": applicant_json(&id, "new")})).into_response()
}

async fn create_applicant(State(recorder): State<Recorder>, Json(body): Json<Value>) -> Response {
    recorder.keep(body);
    (
        StatusCode::CREATED,
        Json(json!({"data": applicant_json("a9", "new")})),
    )
        .into_response()
}

async fn applicant_status(
    State(recorder): State<Recorder>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let status = body["status"].as_str().unwrap_or("new").to_string();
    recorder.keep(body);
    match id.as_str() {
        "quiet" => Json(json!({"success": true, "message": "Status updated"})),
        "odd" => Json(json!({"data": applicant_json(&id, "pending")})),
        _ => Json(json!({"data": applicant_json(&id, &status)})),
    }
}

async fn delete_applicants(State(recorder): State<Recorder>, Json(body): Json<Value>) -> Json<Value> {
    recorder.keep(body);
    Json(json!({"message": "Applicants deleted"}))
}

async fn list_positions() -> Json<Value> {
    Json(json!([position_json("p1"), position_json("p2")]))
}

async fn get_position(Path(id): Path<String>) -> Json<Value> {
    Json(position_json(&id))
}

async fn update_position(
    State(recorder): State<Recorder>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if id == "quiet" {
        recorder.keep(body);
        return StatusCode::NO_CONTENT.into_response();
    }
    let mut position = position_json(&id);
    if let (Some(target), Some(changes)) = (position.as_object_mut(), body.as_object()) {
        for (key, value) in changes {
            target.insert(key.clone(), value.clone());
        }
    }
    recorder.keep(body);
    Json(position).into_response()
}

async fn delete_positions() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"message": "db down"})),
    )
        .into_response()
}

fn app(recorder: Recorder) -> Router {
    Router::new()
        .route("/applicants", get(list_applicants).post(create_applicant))
        .route("/applicants/batch", delete(delete_applicants))
        .route(
            "/applicants/:id",
            get(get_applicant).delete(|| async { StatusCode::NO_CONTENT }),
        )
        .route("/applicants/:id/status", axum::routing::patch(applicant_status))
        .route("/positions", get(list_positions))
        .route("/positions/batch", delete(delete_positions))
        .route("/positions/:id", get(get_position).put(update_position))
        .layer(middleware::from_fn_with_state(recorder.clone(), record))
        .with_state(recorder)
}

async fn spawn_server(recorder: Recorder) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app(recorder)).await.unwrap();
    });
    addr
}

async fn setup() -> (HireTrack, Recorder) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let recorder = Recorder::default();
    let addr = spawn_server(recorder.clone()).await;
    let client = HttpClient::new(format!("http://{}", addr)).unwrap();
    (HireTrack::new(client, Arc::new(MemoryStore::new())), recorder)
}

fn recruiter() -> UserProfile {
    UserProfile {
        id: "u1".into(),
        name: "Rita Recruiter".into(),
        email: "rita@example.com".into(),
        user_type: UserType::Recruiter,
    }
}

// ============================================================================
// Auth propagation
// ============================================================================

#[tokio::test]
async fn stored_token_is_sent_as_bearer() {
    let (hiretrack, recorder) = setup().await;
    hiretrack.auth.save_session("tok-1", &recruiter()).unwrap();

    hiretrack
        .applicants
        .list(&ApplicantFilters::new())
        .await
        .unwrap();

    assert_eq!(recorder.last().authorization.as_deref(), Some("Bearer tok-1"));
}

#[tokio::test]
async fn token_is_read_again_on_every_call() {
    let (hiretrack, recorder) = setup().await;

    hiretrack.auth.save_session("tok-1", &recruiter()).unwrap();
    hiretrack.applicants.get("a1").await.unwrap();
    hiretrack.auth.save_session("tok-2", &recruiter()).unwrap();
    hiretrack.applicants.get("a1").await.unwrap();
    hiretrack.auth.clear().unwrap();
    hiretrack.applicants.get("a1").await.unwrap();

    let auth: Vec<_> = recorder
        .requests()
        .into_iter()
        .map(|seen| seen.authorization)
        .collect();
    assert_eq!(
        auth,
        vec![
            Some("Bearer tok-1".to_string()),
            Some("Bearer tok-2".to_string()),
            None
        ]
    );
}

// ============================================================================
// Applicants
// ============================================================================

#[tokio::test]
async fn list_applicants_sends_filters_and_reads_page() {
    let (hiretrack, recorder) = setup().await;

    let filters = ApplicantFilters::new()
        .status(ApplicantStatus::Screening)
        .search("ada l")
        .limit(1);
    let page = hiretrack.applicants.list(&filters).await.unwrap();

    let seen = recorder.last();
    assert_eq!(seen.path, "/applicants");
    assert_eq!(seen.query.as_deref(), Some("status=screening&search=ada+l&limit=1"));
    assert_eq!(page.total, 41);
    assert_eq!(page.page, 2);
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].status, ApplicantStatus::Screening);
}

#[tokio::test]
async fn get_applicant_unwraps_data_envelope() {
    let (hiretrack, _) = setup().await;

    let applicant = hiretrack.applicants.get("a1").await.unwrap();

    assert_eq!(applicant.id, "a1");
    assert_eq!(applicant.rating, Some(4));
    assert_eq!(applicant.position_title.as_deref(), Some("Backend Engineer"));
}

#[tokio::test]
async fn missing_applicant_keeps_fixed_message_and_cause() {
    let (hiretrack, _) = setup().await;

    let err = hiretrack.applicants.get("missing").await.unwrap_err();

    assert_eq!(err.to_string(), "Failed to fetch applicant");
    assert_eq!(err.status(), Some(404));
    let cause = err.api_error().unwrap();
    assert_eq!(cause.kind, FailureKind::Http);
    assert_eq!(cause.message, "Applicant not found");
}

#[tokio::test]
async fn create_applicant_posts_camel_case_body() {
    let (hiretrack, recorder) = setup().await;

    let created = hiretrack
        .applicants
        .create(&NewApplicant {
            name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            position_id: "p1".into(),
            ..Default::default()
        })
        .await
        .unwrap()
        .expect("created applicant echoed");

    assert_eq!(created.id, "a9");
    assert_eq!(recorder.last().method, "POST");
    assert_eq!(
        recorder.last_body(),
        json!({"name": "Ada Lovelace", "email": "ada@example.com", "positionId": "p1"})
    );
}

#[tokio::test]
async fn invalid_applicant_never_reaches_the_api() {
    let (hiretrack, recorder) = setup().await;

    let err = hiretrack
        .applicants
        .create(&NewApplicant {
            name: "Ada Lovelace".into(),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, HireTrackError::Validation(_)));
    assert!(recorder.requests().is_empty());
}

#[tokio::test]
async fn update_status_patches_status_endpoint() {
    let (hiretrack, recorder) = setup().await;

    let updated = hiretrack
        .applicants
        .update_status("a1", ApplicantStatus::Interview)
        .await
        .unwrap()
        .expect("updated applicant echoed");

    let seen = recorder.last();
    assert_eq!(seen.method, "PATCH");
    assert_eq!(seen.path, "/applicants/a1/status");
    assert_eq!(recorder.last_body(), json!({"status": "interview"}));
    assert_eq!(updated.status, ApplicantStatus::Interview);
}

#[tokio::test]
async fn status_change_without_entity_is_still_a_success() {
    let (hiretrack, recorder) = setup().await;

    let updated = hiretrack
        .applicants
        .update_status("quiet", ApplicantStatus::Hired)
        .await
        .unwrap();

    assert_eq!(updated, None);
    assert_eq!(recorder.last_body(), json!({"status": "hired"}));
}

#[tokio::test]
async fn undecodable_entity_after_mutation_is_still_a_success() {
    let (hiretrack, _) = setup().await;

    let updated = hiretrack
        .applicants
        .update_status("odd", ApplicantStatus::Offer)
        .await
        .unwrap();

    assert_eq!(updated, None);
}

#[tokio::test]
async fn undecodable_entity_on_read_is_missing_payload() {
    let (hiretrack, _) = setup().await;

    let err = hiretrack.applicants.get("odd").await.unwrap_err();

    assert_eq!(err.to_string(), "Failed to fetch applicant");
    assert_eq!(err.status(), Some(200));
    assert!(err.api_error().is_none());
    assert!(matches!(
        err,
        HireTrackError::Request {
            source: RequestFailure::MissingPayload { status: 200 },
            ..
        }
    ));
}

#[tokio::test]
async fn delete_applicant_accepts_empty_response() {
    let (hiretrack, recorder) = setup().await;

    hiretrack.applicants.delete("a1").await.unwrap();

    let seen = recorder.last();
    assert_eq!(seen.method, "DELETE");
    assert_eq!(seen.path, "/applicants/a1");
}

#[tokio::test]
async fn batch_delete_sends_ids() {
    let (hiretrack, recorder) = setup().await;

    hiretrack
        .applicants
        .delete_batch(&["a1".to_string(), "a2".to_string()])
        .await
        .unwrap();

    assert_eq!(recorder.last().path, "/applicants/batch");
    assert_eq!(recorder.last_body(), json!({"ids": ["a1", "a2"]}));
}

#[tokio::test]
async fn empty_batch_is_rejected_locally() {
    let (hiretrack, recorder) = setup().await;

    let err = hiretrack.applicants.delete_batch(&[]).await.unwrap_err();

    assert!(matches!(err, HireTrackError::Validation(_)));
    assert!(recorder.requests().is_empty());
}

// ============================================================================
// Positions
// ============================================================================

#[tokio::test]
async fn bare_position_list_becomes_single_page() {
    let (hiretrack, recorder) = setup().await;

    let filters = PositionFilters::new()
        .status(PositionStatus::Open)
        .employment_type(EmploymentType::FullTime);
    let page = hiretrack.positions.list(&filters).await.unwrap();

    assert_eq!(recorder.last().query.as_deref(), Some("status=open&type=full-time"));
    assert_eq!(page.data.len(), 2);
    assert_eq!(page.total, 2);
    assert_eq!(page.page, 1);
}

#[tokio::test]
async fn bare_position_is_returned_as_is() {
    let (hiretrack, _) = setup().await;

    let position = hiretrack.positions.get("p7").await.unwrap();

    assert_eq!(position.id, "p7");
    assert_eq!(position.employment_type, EmploymentType::FullTime);
    assert_eq!(position.applicant_count, 3);
}

#[tokio::test]
async fn update_position_puts_only_changed_fields() {
    let (hiretrack, recorder) = setup().await;

    let updated = hiretrack
        .positions
        .update(
            "p1",
            &PositionUpdate {
                status: Some(PositionStatus::OnHold),
                salary_max: Some(150_000),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .expect("updated position echoed");

    assert_eq!(recorder.last().method, "PUT");
    assert_eq!(recorder.last_body(), json!({"status": "on-hold", "salaryMax": 150000}));
    assert_eq!(updated.status, PositionStatus::OnHold);
    assert_eq!(updated.salary_max, Some(150_000));
}

#[tokio::test]
async fn no_content_update_is_still_a_success() {
    let (hiretrack, recorder) = setup().await;

    let updated = hiretrack
        .positions
        .update(
            "quiet",
            &PositionUpdate {
                title: Some("Staff Engineer".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated, None);
    assert_eq!(recorder.last_body(), json!({"title": "Staff Engineer"}));
}

#[tokio::test]
async fn empty_position_update_is_rejected() {
    let (hiretrack, recorder) = setup().await;

    let err = hiretrack
        .positions
        .update("p1", &PositionUpdate::default())
        .await
        .unwrap_err();

    assert!(matches!(err, HireTrackError::Validation(_)));
    assert!(recorder.requests().is_empty());
}

#[tokio::test]
async fn invalid_position_never_reaches_the_api() {
    let (hiretrack, recorder) = setup().await;

    let err = hiretrack
        .positions
        .create(&NewPosition {
            title: "".into(),
            department: "Engineering".into(),
            location: "Remote".into(),
            employment_type: EmploymentType::Contract,
            status: None,
            description: None,
            salary_min: None,
            salary_max: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, HireTrackError::Validation(_)));
    assert!(recorder.requests().is_empty());
}

#[tokio::test]
async fn server_failure_keeps_server_message_as_cause() {
    let (hiretrack, _) = setup().await;

    let err = hiretrack
        .positions
        .delete_batch(&["p1".to_string()])
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Failed to delete positions");
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.api_error().unwrap().message, "db down");
}

// ============================================================================
// Transport failures
// ============================================================================

#[tokio::test]
async fn unreachable_api_is_a_network_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpClient::new(format!("http://{}", addr)).unwrap();
    let hiretrack = HireTrack::new(client, Arc::new(MemoryStore::new()));

    let err = hiretrack
        .positions
        .list(&PositionFilters::new())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Failed to fetch positions");
    assert_eq!(err.status(), Some(0));
    assert!(err.api_error().unwrap().is_network());
}
