#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Router,
};
use serde_json::{json, Map, Value};

use growth_actions_api::config::ServerConfig;
use growth_actions_api::database::{Order, Store, StoreError, Table};
use growth_actions_api::AppState;

pub const TOKEN: &str = "test-bearer-token";

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Select { table: Table, order: Order },
    Insert { table: Table, row: Map<String, Value> },
}

/// In-memory stand-in for the hosted store that records every call.
#[derive(Default)]
pub struct FakeStore {
    pub rows: Vec<Value>,
    pub error: Option<String>,
    calls: Mutex<Vec<Call>>,
    returned: Mutex<Vec<Value>>,
}

impl FakeStore {
    pub fn with_rows(rows: Vec<Value>) -> Self {
        Self { rows, ..Default::default() }
    }

    pub fn failing(message: &str) -> Self {
        Self { error: Some(message.to_string()), ..Default::default() }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Rows handed back from `insert_one`, in order.
    pub fn returned(&self) -> Vec<Value> {
        self.returned.lock().unwrap().clone()
    }
}

#[async_trait]
impl Store for FakeStore {
    async fn select_all(&self, table: Table, order: Order) -> Result<Vec<Value>, StoreError> {
        self.calls.lock().unwrap().push(Call::Select { table, order });
        match &self.error {
            Some(msg) => Err(StoreError::new(msg.clone())),
            None => Ok(self.rows.clone()),
        }
    }

    async fn insert_one(&self, table: Table, row: Map<String, Value>) -> Result<Value, StoreError> {
        let n = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(Call::Insert { table, row: row.clone() });
            calls.len()
        };
        if let Some(msg) = &self.error {
            return Err(StoreError::new(msg.clone()));
        }

        let mut stored = row;
        stored.insert("id".into(), json!(format!("{}-{}", table, n)));
        stored.insert("created_at".into(), json!("2026-10-19T12:00:00+00:00"));
        let stored = Value::Object(stored);
        self.returned.lock().unwrap().push(stored.clone());
        Ok(stored)
    }
}

pub struct TestServer {
    pub base_url: String,
    pub store: Arc<FakeStore>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Serve the real router in-process on a free port, backed by `store`.
pub async fn spawn_app(store: FakeStore) -> Result<TestServer> {
    spawn_app_with(store, Some(TOKEN), ServerConfig::default()).await
}

pub async fn spawn_app_with(
    store: FakeStore,
    token: Option<&str>,
    server: ServerConfig,
) -> Result<TestServer> {
    let store = Arc::new(store);
    let state = AppState::new(store.clone(), token.map(str::to_string));
    let app = growth_actions_api::router(state, &server);

    let addr = serve_on_free_port(app).await?;
    Ok(TestServer { base_url: format!("http://{}", addr), store })
}

async fn serve_on_free_port(app: Router) -> Result<SocketAddr> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test listener")?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(addr)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::new()
}

// ---- Mock PostgREST endpoint ------------------------------------------------

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Value,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    body: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

/// A PostgREST look-alike that answers every request with one canned reply.
pub struct MockPostgrest {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockPostgrest {
    pub async fn start(status: StatusCode, body: impl Into<String>) -> Result<Self> {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState { status, body: body.into(), requests: requests.clone() };
        let app = Router::new().fallback(mock_reply).with_state(state);

        let addr = serve_on_free_port(app).await?;
        Ok(Self { base_url: format!("http://{}", addr), requests })
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

async fn mock_reply(State(state): State<MockState>, request: Request) -> impl IntoResponse {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_else(|_| Bytes::new());
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    state.requests.lock().unwrap().push(Recorded {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        headers: parts.headers,
        body,
    });

    (
        state.status,
        [(axum::http::header::CONTENT_TYPE, "application/json")],
        state.body,
    )
}

// ---- Spawned binary ---------------------------------------------------------

pub const BIN: &str = env!("CARGO_BIN_EXE_growth-actions-api");

pub async fn wait_ready(base_url: &str, timeout: Duration) -> Result<()> {
    let client = client();
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if let Ok(resp) = client.get(format!("{}/health", base_url)).send().await {
            if resp.status() == StatusCode::OK {
                return Ok(());
            }
        }
        tokio::time::sleep(Duration::from_millis(150)).await;
    }
    anyhow::bail!("server did not become ready on {} within {:?}", base_url, timeout)
}
