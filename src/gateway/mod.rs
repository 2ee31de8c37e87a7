//! HTTP gateway (axum) for the reconciliation service.

pub mod error;
pub mod handler;
pub mod state;
pub mod types;


use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::reconcile_handler;
pub use state::HandlerState;
pub use types::{ReconcileRequest, ReconcileResponse};

use crate::constants::{
    LEDGERMATCH_STATUS_HEADER, STATUS_HEALTHY, STATUS_NOT_READY, STATUS_READY,
};

pub fn create_router_with_state(state: HandlerState) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/reconcile", post(reconcile_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub store: &'static str,
    pub encoder: &'static str,
    pub encoder_mode: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        LEDGERMATCH_STATUS_HEADER,
        HeaderValue::from_static(STATUS_HEALTHY),
    );

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}

#[tracing::instrument(skip(state))]
pub async fn ready_handler(State(state): State<HandlerState>) -> Response {
    let encoder_ready = state.encoder.is_ready();

    let components = ComponentStatus {
        http: STATUS_READY,
        store: STATUS_READY,
        encoder: if encoder_ready {
            STATUS_READY
        } else {
            STATUS_NOT_READY
        },
        encoder_mode: state.encoder.mode(),
    };

    let (status_code, status_msg) = if encoder_ready {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "pending")
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        LEDGERMATCH_STATUS_HEADER,
        HeaderValue::from_str(status_msg).unwrap_or(HeaderValue::from_static("error")),
    );

    (
        status_code,
        headers,
        Json(ReadyResponse {
            status: status_msg,
            components,
        }),
    )
        .into_response()
}
