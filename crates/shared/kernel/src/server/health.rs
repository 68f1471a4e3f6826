use super::ApiState;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::{Json, response::IntoResponse};
use charachat_derive::{api_handler, api_model};
use charachat_domain::constants::SYSTEM_TAG;
use std::sync::LazyLock;
use std::time::Instant;
use tracing::warn;

const NO_CACHE: [(header::HeaderName, &str); 2] = [
    (header::CACHE_CONTROL, "no-store, no-cache, must-revalidate"),
    (header::PRAGMA, "no-cache"),
];

#[api_model]
/// Health check response
struct HealthResponse {
    /// Status
    status: String,
    /// Version
    version: String,
    /// Uptime in seconds
    uptime: u64,
}

#[api_model]
/// Readiness of the backing services
struct ReadyResponse {
    /// `up` or `down`
    database: String,
}

static START_TIME: LazyLock<Instant> = LazyLock::new(Instant::now);

#[api_handler(
    get,
    path = "/health",
    responses((status = OK, description = "Healthcheck endpoint", body = HealthResponse)),
    tag = SYSTEM_TAG,
)]
pub(super) async fn health_handler() -> impl IntoResponse {
    let body = HealthResponse {
        status: "up".to_owned(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
        uptime: START_TIME.elapsed().as_secs(),
    };

    (NO_CACHE, Json(body))
}

#[api_handler(
    get,
    path = "/health/ready",
    responses(
        (status = OK, description = "Database reachable", body = ReadyResponse),
        (status = SERVICE_UNAVAILABLE, description = "Database unreachable", body = ReadyResponse),
    ),
    tag = SYSTEM_TAG,
)]
pub(super) async fn ready_handler(State(state): State<ApiState>) -> impl IntoResponse {
    let (status, database) = match state.database.health().await {
        Ok(()) => (StatusCode::OK, "up"),
        Err(e) => {
            warn!(error = %e, "Database health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "down")
        },
    };

    (status, NO_CACHE, Json(ReadyResponse { database: database.to_owned() }))
}
