#![allow(dead_code)]

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use campaign_insights::config::GatewayConfig;
use campaign_insights::gateway::InsightGateway;

/// How the stub generation service answers every request.
#[derive(Clone, Copy)]
pub enum StubMode {
    Reply(&'static str),
    Status(u16),
    NoCandidates,
    Slow(Duration),
}

#[derive(Clone)]
struct StubState {
    mode: StubMode,
    captured: Arc<Mutex<Vec<Captured>>>,
}

#[derive(Debug, Clone)]
pub struct Captured {
    pub path: String,
    pub api_key: Option<String>,
    pub body: Value,
}

pub struct Stub {
    pub endpoint: String,
    pub captured: Arc<Mutex<Vec<Captured>>>,
}

impl Stub {
    pub fn requests(&self) -> Vec<Captured> {
        self.captured.lock().unwrap().clone()
    }

    /// Prompt text of the n-th captured request.
    pub fn prompt(&self, n: usize) -> String {
        self.requests()[n].body["contents"][0]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .to_string()
    }
}

async fn handle(
    State(stub): State<StubState>,
    uri: axum::http::Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> axum::response::Response {
    stub.captured.lock().unwrap().push(Captured {
        path: uri.path().to_string(),
        api_key: headers
            .get("x-goog-api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });

    match stub.mode {
        StubMode::Reply(text) => Json(json!({
            "candidates": [{ "content": { "parts": [{ "text": text }], "role": "model" } }]
        }))
        .into_response(),
        StubMode::Status(code) => (
            StatusCode::from_u16(code).unwrap(),
            "Resource has been exhausted",
        )
            .into_response(),
        StubMode::NoCandidates => Json(json!({ "promptFeedback": {} })).into_response(),
        StubMode::Slow(delay) => {
            tokio::time::sleep(delay).await;
            Json(json!({
                "candidates": [{ "content": { "parts": [{ "text": "late" }] } }]
            }))
            .into_response()
        }
    }
}

pub async fn spawn_stub(mode: StubMode) -> Stub {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new().fallback(handle).with_state(StubState {
        mode,
        captured: captured.clone(),
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Stub {
        endpoint: format!("http://{}/v1beta/models", addr),
        captured,
    }
}

/// An endpoint on a port nothing listens on.
pub async fn closed_endpoint() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/v1beta/models", addr)
}

pub fn gateway_config(endpoint: &str, timeout: Duration) -> GatewayConfig {
    GatewayConfig {
        endpoint: endpoint.to_string(),
        api_key: "test-key".to_string(),
        model: "gemini-1.5-flash".to_string(),
        timeout,
    }
}

pub fn gateway(endpoint: &str) -> InsightGateway {
    InsightGateway::new(gateway_config(endpoint, Duration::from_secs(5))).unwrap()
}
