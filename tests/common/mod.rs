#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use kwai_api::schema::SchemaRegistry;
use kwai_api::Transformer;

pub fn transformer() -> Transformer {
    Transformer::new(Arc::new(SchemaRegistry::kwai()))
}

/// A team without members
pub fn empty_team_document() -> Value {
    json!({
        "data": {
            "type": "teams",
            "id": "1",
            "attributes": { "name": "U11", "active": true, "remark": "" },
            "relationships": { "team_members": { "data": [] } }
        }
    })
}

pub fn team_member(id: &str, country: Option<&str>) -> Value {
    json!({
        "type": "team_members",
        "id": id,
        "attributes": {
            "active": true,
            "first_name": "Jigoro",
            "last_name": "Kano",
            "license_number": "JUDO-0001",
            "license_end_date": "2027-12-31",
            "gender": 1,
            "birthdate": "2014-10-28",
            "active_in_club": true
        },
        "relationships": {
            "nationality": { "data": country.map(|id| json!({ "type": "countries", "id": id })) }
        }
    })
}

pub fn japan() -> Value {
    json!({
        "type": "countries",
        "id": "81",
        "attributes": { "iso_2": "JP", "iso_3": "JPN", "name": "Japan" }
    })
}

/// A team with one member whose nationality is side-loaded
pub fn team_with_member_document() -> Value {
    json!({
        "data": {
            "type": "teams",
            "id": "1",
            "attributes": { "name": "U11", "active": true, "remark": "" },
            "relationships": {
                "team_members": { "data": [{ "type": "team_members", "id": "7" }] }
            }
        },
        "included": [team_member("7", Some("81")), japan()]
    })
}

pub fn team_collection_document() -> Value {
    json!({
        "meta": { "count": 2, "offset": 0, "limit": 10 },
        "data": [
            {
                "type": "teams",
                "id": "1",
                "attributes": { "name": "U11", "active": true, "remark": "" },
                "relationships": { "team_members": { "data": [] } }
            },
            {
                "type": "teams",
                "id": "2",
                "attributes": { "name": "U13", "active": false },
                "relationships": { "team_members": { "data": [] } }
            }
        ]
    })
}

/// Shared state of the mock API
#[derive(Debug, Default)]
pub struct MockState {
    pub authorized: AtomicBool,
    pub refresh_fails: AtomicBool,
    pub refreshes: AtomicUsize,
    pub requests: Mutex<Vec<String>>,
}

impl MockState {
    pub fn refresh_count(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    fn record(&self, line: String) {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(line);
        }
    }
}

pub struct MockApi {
    pub base_url: String,
    pub state: Arc<MockState>,
}

/// Start an in-process API on a free port
pub async fn spawn_mock_api(authorized: bool) -> Result<MockApi> {
    let state = Arc::new(MockState::default());
    state.authorized.store(authorized, Ordering::SeqCst);

    let app = Router::new()
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/access_token", post(refresh))
        .route("/api/v1/teams", get(list_teams).post(create_team))
        .route("/api/v1/teams/:id", get(show_team).patch(update_team).delete(delete_team))
        .route("/api/v1/broken", get(broken))
        .with_state(state.clone());

    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr).await.context("failed to bind mock api")?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(MockApi { base_url: format!("http://127.0.0.1:{}/api", port), state })
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "errors": [{ "status": "401", "title": "Unauthorized" }] }))).into_response()
}

async fn login(State(state): State<Arc<MockState>>, body: String) -> Response {
    state.record("POST /v1/auth/login".to_string());
    if body.contains("password=judo") {
        state.authorized.store(true, Ordering::SeqCst);
        StatusCode::OK.into_response()
    } else {
        unauthorized()
    }
}

async fn refresh(State(state): State<Arc<MockState>>) -> Response {
    state.refreshes.fetch_add(1, Ordering::SeqCst);
    // Keep the refresh in flight long enough for the other requests to queue up
    tokio::time::sleep(Duration::from_millis(50)).await;
    if state.refresh_fails.load(Ordering::SeqCst) {
        return unauthorized();
    }
    state.authorized.store(true, Ordering::SeqCst);
    StatusCode::OK.into_response()
}

async fn list_teams(State(state): State<Arc<MockState>>) -> Response {
    state.record("GET /v1/teams".to_string());
    if !state.authorized.load(Ordering::SeqCst) {
        return unauthorized();
    }
    Json(team_collection_document()).into_response()
}

async fn show_team(State(state): State<Arc<MockState>>, Path(id): Path<String>) -> Response {
    state.record(format!("GET /v1/teams/{}", id));
    if !state.authorized.load(Ordering::SeqCst) {
        return unauthorized();
    }
    Json(team_with_member_document()).into_response()
}

/// Echo the payload back with an id, the way the API answers a write
fn echo(body: &str, id: &str) -> Response {
    let Ok(mut payload) = serde_json::from_str::<Value>(body) else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    payload["data"]["id"] = json!(id);
    Json(payload).into_response()
}

async fn create_team(State(state): State<Arc<MockState>>, body: String) -> Response {
    state.record("POST /v1/teams".to_string());
    echo(&body, "42")
}

async fn update_team(State(state): State<Arc<MockState>>, Path(id): Path<String>, body: String) -> Response {
    state.record(format!("PATCH /v1/teams/{}", id));
    echo(&body, &id)
}

async fn delete_team(State(state): State<Arc<MockState>>, Path(id): Path<String>) -> Response {
    state.record(format!("DELETE /v1/teams/{}", id));
    StatusCode::NO_CONTENT.into_response()
}

async fn broken(State(state): State<Arc<MockState>>) -> Response {
    state.record("GET /v1/broken".to_string());
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({
            "errors": [{
                "status": "422",
                "title": "Invalid team",
                "detail": "name is required",
                "source": { "pointer": "/data/attributes/name" }
            }]
        })),
    )
        .into_response()
}
