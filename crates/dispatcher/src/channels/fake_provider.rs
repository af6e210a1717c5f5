//! In-process fake provider for channel tests

use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::Router;

/// One request seen by the fake provider
#[derive(Debug, Clone)]
pub(crate) struct CapturedRequest {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: serde_json::Value,
}

#[derive(Clone)]
struct ProviderState {
    status: StatusCode,
    reply: Option<String>,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

/// HTTP server on 127.0.0.1 that records every request and answers with a fixed status
pub(crate) struct FakeProvider {
    pub base_url: String,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl FakeProvider {
    pub async fn start(status: u16) -> Self {
        Self::launch(status, None).await
    }

    /// Answer every request with `reply` as the body
    pub async fn start_with_reply(status: u16, reply: String) -> Self {
        Self::launch(status, Some(reply)).await
    }

    async fn launch(status: u16, reply: Option<String>) -> Self {
        let captured = Arc::new(Mutex::new(Vec::new()));
        let state = ProviderState {
            status: StatusCode::from_u16(status).unwrap(),
            reply,
            captured: Arc::clone(&captured),
        };
        let app = Router::new().fallback(record_request).with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            captured,
        }
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.captured.lock().unwrap().clone()
    }

    pub fn hits(&self) -> usize {
        self.captured.lock().unwrap().len()
    }
}

async fn record_request(
    State(state): State<ProviderState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    let body = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    state.captured.lock().unwrap().push(CapturedRequest {
        method,
        path: uri.path().to_string(),
        headers,
        body,
    });
    let reply = match state.reply {
        Some(reply) => reply,
        None if state.status.is_success() => r#"{"id":"fake-1"}"#.to_string(),
        None => r#"{"message":"rejected by fake provider"}"#.to_string(),
    };
    (state.status, reply)
}
