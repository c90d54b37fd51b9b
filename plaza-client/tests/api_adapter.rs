//! `ProfileApiAdapter` against an in-process axum stub of the Plaza API.

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use parking_lot::Mutex;
use plaza_client::domains::profile::{
    CheckerSettings, UsernameChecker, UsernameStatus,
};
use plaza_client::infra::services::{
    AvailabilityClient, ProfileApiAdapter, ProfileService,
};
use plaza_client::infra::{ApiClient, ClientError};
use plaza_core::UsernameRule;
use plaza_core::api::routes::v1;
use plaza_model::{
    ApiResponse, BasicProfile, Profile, ProfileField, SetStatusRequest,
    SetVisibilityRequest, StatusMessage, UpdateBasicProfileRequest, UserId,
    UsernameAvailability, Visibility,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
struct Stub {
    profile: Profile,
    candidates: Arc<Mutex<Vec<String>>>,
    bearers: Arc<Mutex<Vec<Option<String>>>>,
    visibility: Arc<Mutex<Vec<SetVisibilityRequest>>>,
}

impl Stub {
    fn new() -> Self {
        Self {
            profile: Profile {
                id: UserId::new(),
                basic: BasicProfile {
                    username: "alice".into(),
                    display_name: "Alice".into(),
                    ..Default::default()
                },
                enhanced: Default::default(),
                visibility: Default::default(),
                status: None,
                counts: Default::default(),
            },
            candidates: Arc::default(),
            bearers: Arc::default(),
            visibility: Arc::default(),
        }
    }
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}

async fn availability(
    State(stub): State<Stub>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    stub.bearers.lock().push(bearer(&headers));
    let candidate = query.get("candidate").cloned().unwrap_or_default();
    stub.candidates.lock().push(candidate.clone());

    match candidate.as_str() {
        "alice" => Json(json!({
            "success": true,
            "available": false,
            "message": "Username is taken",
        }))
        .into_response(),
        "slow.down" => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "success": false, "message": "Too many checks" })),
        )
            .into_response(),
        "broken" => {
            (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response()
        }
        _ => Json(json!({ "success": true, "available": true })).into_response(),
    }
}

async fn me(State(stub): State<Stub>, headers: HeaderMap) -> Response {
    if bearer(&headers).as_deref() == Some("expired") {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(ApiResponse::success(stub.profile.clone())).into_response()
}

async fn update_basic(Json(_): Json<UpdateBasicProfileRequest>) -> Response {
    Json(ApiResponse::<Profile>::error("Username taken".into())).into_response()
}

async fn set_visibility(
    State(stub): State<Stub>,
    Json(req): Json<SetVisibilityRequest>,
) -> StatusCode {
    stub.visibility.lock().push(req);
    StatusCode::NO_CONTENT
}

async fn set_status(Json(req): Json<SetStatusRequest>) -> Response {
    if req.text.chars().count() > 10 {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error("Status too long".into())),
        )
            .into_response();
    }
    Json(ApiResponse::success(StatusMessage {
        text: req.text,
        emoji: req.emoji,
        expires_at: None,
    }))
    .into_response()
}

async fn clear_status() -> Json<serde_json::Value> {
    Json(json!({ "status": "success" }))
}

async fn serve(stub: Stub) -> Arc<ApiClient> {
    let router = Router::new()
        .route(v1::profile::USERNAME_AVAILABILITY, get(availability))
        .route(v1::profile::ME, get(me))
        .route(v1::profile::BASIC, put(update_basic))
        .route(v1::profile::VISIBILITY, put(set_visibility))
        .route(v1::profile::STATUS, put(set_status).delete(clear_status))
        .with_state(stub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let client =
        ApiClient::new(&format!("http://{addr}"), Duration::from_secs(5))
            .unwrap();
    client.set_token(Some("secret".into())).await;
    Arc::new(client)
}

#[tokio::test]
async fn availability_sends_encoded_candidate_and_token() {
    let stub = Stub::new();
    let adapter = ProfileApiAdapter::new(serve(stub.clone()).await);

    let answer = adapter.check_username("bob & co?").await.unwrap();
    assert_eq!(answer, UsernameAvailability::available());

    let answer = adapter.check_username("alice").await.unwrap();
    assert_eq!(answer, UsernameAvailability::taken("Username is taken"));

    assert_eq!(*stub.candidates.lock(), vec!["bob & co?", "alice"]);
    assert!(
        stub.bearers
            .lock()
            .iter()
            .all(|token| token.as_deref() == Some("secret"))
    );
}

#[tokio::test]
async fn availability_error_status_keeps_server_body() {
    let adapter = ProfileApiAdapter::new(serve(Stub::new()).await);

    let answer = adapter.check_username("slow.down").await.unwrap();
    assert!(!answer.success);
    assert_eq!(answer.message.as_deref(), Some("Too many checks"));

    let err = adapter.check_username("broken").await.unwrap_err();
    assert!(matches!(err, ClientError::Status { status: 500, .. }));
    assert_eq!(err.server_message(), Some("boom"));
}

#[tokio::test]
async fn fetch_me_unwraps_the_envelope() {
    let stub = Stub::new();
    let adapter = ProfileApiAdapter::new(serve(stub.clone()).await);

    let profile = adapter.fetch_me().await.unwrap();
    assert_eq!(profile, stub.profile);
}

#[tokio::test]
async fn unauthorized_clears_the_token() {
    let client = serve(Stub::new()).await;
    client.set_token(Some("expired".into())).await;
    let adapter = ProfileApiAdapter::new(Arc::clone(&client));

    let err = adapter.fetch_me().await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(client.get_token().await, None);
}

#[tokio::test]
async fn writes_surface_server_explanations() {
    let stub = Stub::new();
    let adapter = ProfileApiAdapter::new(serve(stub.clone()).await);

    adapter
        .set_field_visibility(SetVisibilityRequest {
            field: ProfileField::Email,
            visibility: Visibility::OnlyMe,
        })
        .await
        .unwrap();
    assert_eq!(stub.visibility.lock().len(), 1);

    let err = adapter
        .update_basic(UpdateBasicProfileRequest {
            username: Some("bob".into()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Rejected(ref m) if m == "Username taken"));

    let status = adapter
        .set_status(SetStatusRequest {
            text: "away".into(),
            emoji: None,
            expires_in_seconds: None,
        })
        .await
        .unwrap();
    assert_eq!(status.text, "away");

    let err = adapter
        .set_status(SetStatusRequest {
            text: "gone fishing all week".into(),
            emoji: None,
            expires_in_seconds: Some(60),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Status { status: 400, .. }));
    assert_eq!(err.server_message(), Some("Status too long"));

    adapter.clear_status().await.unwrap();
}

#[tokio::test]
async fn checker_settles_against_live_endpoint() {
    let stub = Stub::new();
    let adapter = Arc::new(ProfileApiAdapter::new(serve(stub.clone()).await));
    let checker = UsernameChecker::new(
        "bob",
        Arc::new(UsernameRule::default()),
        adapter,
        CheckerSettings {
            debounce: Duration::from_millis(10),
            ..Default::default()
        },
    );
    let mut updates = checker.subscribe();

    checker.on_edit("alice");
    let check = updates
        .wait_for(|c| c.status != UsernameStatus::Pending)
        .await
        .unwrap()
        .clone();
    assert_eq!(check.status, UsernameStatus::Taken);
    assert_eq!(check.message.as_deref(), Some("Username is taken"));

    checker.on_edit("slow.down");
    let check = updates
        .wait_for(|c| {
            c.candidate == "slow.down" && c.status != UsernameStatus::Pending
        })
        .await
        .unwrap()
        .clone();
    assert_eq!(check.status, UsernameStatus::Error);
    assert_eq!(check.message.as_deref(), Some("Too many checks"));

    assert_eq!(*stub.candidates.lock(), vec!["alice", "slow.down"]);
}
