//! HTTP host: routes, security headers and the serve loop.

use std::future::Future;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::header::{
    CONTENT_SECURITY_POLICY, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS, X_XSS_PROTECTION,
};
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use contracts::FeedbackError;
use dispatcher::{DispatchOutcome, Dispatcher, MetricsSnapshot, ResultEnvelope};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

pub const SUBMIT_PATH: &str = "/api/submit-feedback";
pub const HEALTH_PATH: &str = "/api/health";

/// Largest request body read into memory
pub const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// Headers set on every response, including errors and fallbacks
fn security_headers() -> [(HeaderName, HeaderValue); 4] {
    [
        (
            CONTENT_SECURITY_POLICY,
            HeaderValue::from_static("default-src 'none'"),
        ),
        (X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff")),
        (X_FRAME_OPTIONS, HeaderValue::from_static("DENY")),
        (X_XSS_PROTECTION, HeaderValue::from_static("1; mode=block")),
    ]
}

#[derive(Clone)]
struct AppState {
    dispatcher: Arc<Dispatcher>,
}

#[derive(Serialize)]
struct HealthReport {
    status: &'static str,
    method: String,
    submissions: MetricsSnapshot,
}

/// Build the application router around a dispatcher
pub fn router(dispatcher: Arc<Dispatcher>) -> Router {
    let mut app = Router::new()
        .route(SUBMIT_PATH, post(submit_feedback))
        .route(HEALTH_PATH, get(health))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(AppState { dispatcher });

    for (name, value) in security_headers() {
        app = app.layer(SetResponseHeaderLayer::overriding(name, value));
    }

    app.layer(TraceLayer::new_for_http())
}

/// Serve until `shutdown` resolves, then drain in-flight requests
pub async fn serve(
    listener: TcpListener,
    app: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

/// The body is read as raw bytes so a malformed payload still gets an envelope.
/// Unreadable bodies keep the rejection's status but answer with an envelope too.
async fn submit_feedback(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> (StatusCode, Json<ResultEnvelope>) {
    match body {
        Ok(body) => respond(state.dispatcher.dispatch(&body).await),
        Err(rejection) => {
            let status = rejection.status();
            let outcome = state
                .dispatcher
                .reject(FeedbackError::malformed(rejection.body_text()));
            (status, Json(outcome.envelope))
        }
    }
}

fn respond(outcome: DispatchOutcome) -> (StatusCode, Json<ResultEnvelope>) {
    let status =
        StatusCode::from_u16(outcome.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(outcome.envelope))
}

async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    Json(HealthReport {
        status: "ok",
        method: state.dispatcher.method().to_string(),
        submissions: state.dispatcher.metrics(),
    })
}
