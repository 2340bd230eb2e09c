//! Fake Lightstep query API for integration tests.
//!
//! Spins up a minimal `axum` HTTP server on a random TCP port bound to
//! 127.0.0.1, standing in for the host's data source proxy. Serves:
//! - `POST /projects/{project}/telemetry/query_timeseries`: canned responses
//!   keyed by query text, recording every request body
//! - `GET /test`: a configurable health-check status
//!
//! # Example
//!
//! ```rust,no_run
//! let api = FakeLightstepApi::start().await.unwrap();
//! api.respond_to("metric requests", StatusCode::OK, json!({"data": ...})).await;
//! let transport = HyperTransport::new(api.base_url());
//! ```

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// A request the fake received.
#[derive(Debug, Clone)]
pub struct RecordedQuery {
    pub project: String,
    pub body: Value,
}

/// State shared between the router and test code.
struct ApiState {
    /// Canned responses keyed by the `query` attribute of the request body.
    responses: HashMap<String, (StatusCode, Value)>,
    received: Vec<RecordedQuery>,
    health: (StatusCode, Value),
}

impl Default for ApiState {
    fn default() -> Self {
        Self {
            responses: HashMap::new(),
            received: Vec::new(),
            health: (StatusCode::OK, json!({})),
        }
    }
}

type Shared = Arc<Mutex<ApiState>>;

/// Handle to the running fake API server.
pub struct FakeLightstepApi {
    addr: SocketAddr,
    state: Shared,
}

impl FakeLightstepApi {
    /// Start the fake API on a random port. Returns once the server is
    /// listening.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state: Shared = Arc::new(Mutex::new(ApiState::default()));

        let app = Router::new()
            .route(
                "/projects/{project}/telemetry/query_timeseries",
                post(query_timeseries),
            )
            .route("/test", get(health))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Ok(Self { addr, state })
    }

    /// Base URL for the API (e.g. `http://127.0.0.1:PORT`).
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Answer queries whose text equals `query` with `status` and `body`.
    pub async fn respond_to(&self, query: &str, status: StatusCode, body: Value) {
        self.state
            .lock()
            .await
            .responses
            .insert(query.to_string(), (status, body));
    }

    /// Set the `/test` response.
    pub async fn set_health(&self, status: StatusCode, body: Value) {
        self.state.lock().await.health = (status, body);
    }

    /// Every query request received so far, in arrival order.
    pub async fn received(&self) -> Vec<RecordedQuery> {
        self.state.lock().await.received.clone()
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

async fn query_timeseries(
    Path(project): Path<String>,
    State(state): State<Shared>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let query = body["data"]["attributes"]["query"]
        .as_str()
        .unwrap_or_default()
        .to_string();

    let mut state = state.lock().await;
    state.received.push(RecordedQuery { project, body });

    match state.responses.get(&query) {
        Some((status, body)) => (*status, Json(body.clone())),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "errors": [format!("no canned response for {query:?}")] })),
        ),
    }
}

async fn health(State(state): State<Shared>) -> impl IntoResponse {
    let (status, body) = state.lock().await.health.clone();
    (status, Json(body))
}
