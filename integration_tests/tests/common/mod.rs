use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Local stand-in for the vendor ingestion endpoint. Behavior is steered per
/// event through well-known attributes in the envelope:
/// `delay_ms` stalls the response, `respond_status` forces a status code.
#[derive(Default)]
pub struct IngestState {
    received: Mutex<Vec<Value>>,
    hits: AtomicUsize,
}

pub struct IngestServer {
    state: Arc<IngestState>,
    addr: SocketAddr,
    _handle: JoinHandle<()>,
}

impl IngestServer {
    pub async fn launch() -> Self {
        let state = Arc::new(IngestState::default());
        let app = Router::new()
            .route("/track/{token}", post(track))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        IngestServer {
            state,
            addr,
            _handle: handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    pub async fn received(&self) -> Vec<Value> {
        self.state.received.lock().await.clone()
    }
}

async fn track(
    State(state): State<Arc<IngestState>>,
    Path(token): Path<String>,
    Json(envelope): Json<Value>,
) -> (StatusCode, String) {
    state.hits.fetch_add(1, Ordering::SeqCst);
    state.received.lock().await.push(envelope.clone());

    if token == "bad-token" {
        return (StatusCode::UNAUTHORIZED, "invalid token".to_string());
    }

    let attributes = &envelope["properties"]["attributes"];
    if let Some(ms) = attributes["delay_ms"].as_u64() {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
    if let Some(status) = attributes["respond_status"].as_u64() {
        let status = StatusCode::from_u16(status as u16).unwrap_or(StatusCode::IM_A_TEAPOT);
        return (status, "forced status".to_string());
    }

    (StatusCode::OK, "1".to_string())
}
