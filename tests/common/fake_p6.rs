//! Fake P6 REST API
//!
//! A tiny axum server answering `/login`, `/obs` and `/project` the way P6
//! does. It records every request it receives so tests can check what the
//! bridge forwarded. The list endpoints ignore `Filter` and always return the
//! same fixture data.

use super::constants::*;
use axum::{
    extract::{Query, State},
    http::{
        header::{AUTHORIZATION, COOKIE, SET_COOKIE},
        HeaderMap, HeaderName, Method, StatusCode, Uri,
    },
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// How the fake answers the next requests.
#[derive(Clone, Debug, PartialEq)]
#[allow(dead_code)]
pub enum FakeP6Mode {
    /// Behave like a healthy P6
    Normal,
    /// Answer every request with this status
    Status(u16),
    /// Wait before answering normally
    Slow(Duration),
    /// List endpoints answer 200 with an empty body
    Empty,
}

/// A request as seen by the fake upstream.
#[derive(Clone, Debug)]
#[allow(dead_code)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: HashMap<String, String>,
    pub cookie: Option<String>,
    pub authorization: Option<String>,
}

#[derive(Clone)]
pub struct FakeP6 {
    mode: Arc<Mutex<FakeP6Mode>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FakeP6 {
    pub fn new() -> Self {
        Self {
            mode: Arc::new(Mutex::new(FakeP6Mode::Normal)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn set_mode(&self, mode: FakeP6Mode) {
        *self.mode.lock().unwrap() = mode;
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Starts serving on a random port.
    ///
    /// Returns the P6 base URL (prefix included) and the shutdown sender.
    pub async fn spawn(&self) -> (String, tokio::sync::oneshot::Sender<()>) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake P6 port");
        let port = listener
            .local_addr()
            .expect("Failed to get fake P6 address")
            .port();

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        let app = Router::new()
            .route(&format!("{}/{{*rest}}", P6_API_PREFIX), any(handle))
            .with_state(self.clone());

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Fake P6 failed");
        });

        (
            format!("http://127.0.0.1:{}{}", port, P6_API_PREFIX),
            shutdown_tx,
        )
    }
}

async fn handle(
    State(fake): State<FakeP6>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let header = |name: HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    fake.requests.lock().unwrap().push(RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: query.clone(),
        cookie: header(COOKIE),
        authorization: header(AUTHORIZATION),
    });

    let mode = fake.mode.lock().unwrap().clone();
    match mode {
        FakeP6Mode::Status(code) => {
            let status = StatusCode::from_u16(code).expect("Invalid fake status");
            return (status, "Fake P6 failure").into_response();
        }
        FakeP6Mode::Slow(delay) => tokio::time::sleep(delay).await,
        FakeP6Mode::Normal | FakeP6Mode::Empty => {}
    }

    let endpoint = uri.path().strip_prefix(P6_API_PREFIX).unwrap_or_default();
    match (method, endpoint) {
        (Method::POST, "/login") => login(header(AUTHORIZATION), &query),
        (Method::GET, "/obs") => list(header(COOKIE), &mode, obs_fixture()),
        (Method::GET, "/project") => list(header(COOKIE), &mode, project_fixture()),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

fn login(authorization: Option<String>, query: &HashMap<String, String>) -> Response {
    if query.get("DatabaseName").map(String::as_str) != Some(P6_DATABASE) {
        return (StatusCode::BAD_REQUEST, "Unknown database").into_response();
    }
    if authorization.as_deref() != Some(P6_BASIC_AUTH) {
        return (StatusCode::UNAUTHORIZED, "Invalid username or password").into_response();
    }
    (
        StatusCode::OK,
        [(
            SET_COOKIE,
            format!("JSESSIONID={}; Path=/p6ws; HttpOnly", P6_JSESSIONID),
        )],
    )
        .into_response()
}

fn list(cookie: Option<String>, mode: &FakeP6Mode, data: Value) -> Response {
    let expected = format!("JSESSIONID={}", P6_JSESSIONID);
    if !cookie.is_some_and(|c| c.split(';').any(|pair| pair.trim() == expected)) {
        return (StatusCode::UNAUTHORIZED, "Session expired or invalid").into_response();
    }
    if *mode == FakeP6Mode::Empty {
        return StatusCode::OK.into_response();
    }
    Json(data).into_response()
}

fn obs_fixture() -> Value {
    json!([
        {
            "ObjectId": OBS_1_ID,
            "Name": OBS_1_NAME,
            "Description": "All civil engineering",
            "GUID": "{A1}",
            "SequenceNumber": 10,
            "CreateUser": "admin"
        },
        {
            "ObjectId": OBS_2_ID,
            "Name": OBS_2_NAME,
            "ParentObjectId": OBS_1_ID,
            "SequenceNumber": "20"
        },
        {
            "ObjectId": OBS_3_ID,
            "Name": OBS_3_NAME,
            "ParentObjectId": OBS_1_ID,
            "SequenceNumber": 30
        }
    ])
}

fn project_fixture() -> Value {
    json!([
        {
            "ObjectId": 9001,
            "Id": PROJECT_1_ID,
            "Name": "Harbour Bridge",
            "Status": "Active",
            "StartDate": "2026-01-05T08:00:00",
            "FinishDate": "2027-06-30T17:00:00",
            "OBSObjectId": OBS_1_ID,
            "OBSName": OBS_1_NAME
        },
        {
            "ObjectId": "9002",
            "Id": PROJECT_2_ID,
            "Name": "Ring Road",
            "Status": "Planned",
            "OBSObjectId": OBS_1_ID,
            "OBSName": OBS_1_NAME
        }
    ])
}
