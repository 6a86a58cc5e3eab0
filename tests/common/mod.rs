//! In-process stand-in for the service under test.
//!
//! One axum server plays both backend and frontend. `Behaviour` controls
//! which production traits it exhibits so each probe can be driven into
//! PASS or FAIL.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::http::header::{
    ACCEPT_LANGUAGE, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, STRICT_TRANSPORT_SECURITY, X_CONTENT_TYPE_OPTIONS,
    X_FRAME_OPTIONS, X_XSS_PROTECTION,
};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use prodcheck::config::HarnessConfig;
use serde_json::json;

pub const ACCESSIBLE_PAGE: &str = r#"<!doctype html>
<html lang="en">
  <head>
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>Mocko Designs</title>
  </head>
  <body><img src="/logo.svg" alt="Mocko logo" /></body>
</html>"#;

#[derive(Clone)]
pub struct Behaviour {
    /// Value of the `status` field in the `/health` body.
    pub health_status: &'static str,
    /// 1-based `/health` request numbers answered with 429.
    pub throttle_on: Vec<usize>,
    /// 1-based `/health` request numbers answered with 500.
    pub fail_on: Vec<usize>,
    pub security_headers: bool,
    pub cors: bool,
    pub api_status: StatusCode,
    pub page: &'static str,
    /// `Accept-Language` value answered with 406.
    pub reject_language: Option<&'static str>,
}

impl Default for Behaviour {
    fn default() -> Self {
        Self {
            health_status: "healthy",
            throttle_on: Vec::new(),
            fail_on: Vec::new(),
            security_headers: true,
            cors: true,
            api_status: StatusCode::OK,
            page: ACCESSIBLE_PAGE,
            reject_language: None,
        }
    }
}

struct MockState {
    behaviour: Behaviour,
    health_hits: AtomicUsize,
}

pub struct MockService {
    pub url: String,
    state: Arc<MockState>,
}

impl MockService {
    pub fn health_hits(&self) -> usize {
        self.state.health_hits.load(Ordering::SeqCst)
    }

    /// Config pointing both targets at this service, with no inter-probe
    /// pause and the report written under `dir`.
    pub fn config(&self, dir: &tempfile::TempDir) -> HarnessConfig {
        config_for(&self.url, dir)
    }
}

pub fn config_for(url: &str, dir: &tempfile::TempDir) -> HarnessConfig {
    let mut config = HarnessConfig::default();
    config.targets.backend = url.to_string();
    config.targets.frontend = url.to_string();
    config.run.pause_ms = 0;
    config.run.report_path = dir.path().join("test_report.json");
    config
}

pub async fn spawn(behaviour: Behaviour) -> MockService {
    let state = Arc::new(MockState {
        behaviour,
        health_hits: AtomicUsize::new(0),
    });

    let app = Router::new()
        .route("/", get(page))
        .route("/health", get(health))
        .route("/api/v1/designs", get(api).options(preflight))
        .route("/api/v1/templates", get(api))
        .route("/api/v1/fonts", get(api))
        .route("/api/v1/auth/me", get(api))
        .with_state(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockService {
        url: format!("http://{}", addr),
        state,
    }
}

/// URL of a local port with nothing listening on it.
pub async fn closed_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

async fn health(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    let n = state.health_hits.fetch_add(1, Ordering::SeqCst) + 1;
    let b = &state.behaviour;

    if b.throttle_on.contains(&n) {
        return (StatusCode::TOO_MANY_REQUESTS, "Too many requests").into_response();
    }
    if b.fail_on.contains(&n) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    if let Some(rejected) = b.reject_language {
        let lang = headers.get(ACCEPT_LANGUAGE).and_then(|v| v.to_str().ok());
        if lang == Some(rejected) {
            return StatusCode::NOT_ACCEPTABLE.into_response();
        }
    }

    let mut response = Json(json!({ "status": b.health_status, "service": "api-gateway" }))
        .into_response();
    if b.security_headers {
        let h = response.headers_mut();
        h.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
        h.insert(X_FRAME_OPTIONS, HeaderValue::from_static("SAMEORIGIN"));
        h.insert(X_XSS_PROTECTION, HeaderValue::from_static("0"));
        h.insert(
            STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=15552000; includeSubDomains"),
        );
    }
    response
}

async fn preflight(State(state): State<Arc<MockState>>) -> Response {
    if !state.behaviour.cors {
        return StatusCode::NO_CONTENT.into_response();
    }
    (
        StatusCode::NO_CONTENT,
        [
            (ACCESS_CONTROL_ALLOW_ORIGIN, "https://mocko-designs.vercel.app"),
            (ACCESS_CONTROL_ALLOW_METHODS, "GET,HEAD,PUT,PATCH,POST,DELETE"),
            (ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type, Authorization"),
        ],
    )
        .into_response()
}

async fn api(State(state): State<Arc<MockState>>) -> Response {
    (state.behaviour.api_status, Json(json!({ "error": "Access token required" }))).into_response()
}

async fn page(State(state): State<Arc<MockState>>) -> Html<&'static str> {
    Html(state.behaviour.page)
}
