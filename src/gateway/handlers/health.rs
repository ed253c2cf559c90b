//! Health check handler

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::State;
use utoipa::ToSchema;

use super::super::response::{ApiError, ApiResult, error_codes, ok};
use super::super::state::AppState;

/// Health check response data
#[derive(serde::Serialize, ToSchema)]
pub struct HealthResponse {
    /// Server timestamp in milliseconds
    #[schema(example = 1703494800000_u64)]
    pub timestamp_ms: u64,
}

/// Health check endpoint
///
/// Pings PostgreSQL; internal details are never exposed in the response.
///
/// - Healthy: 200 OK + {code: 0, data: {timestamp_ms}}
/// - Unhealthy: 503 Service Unavailable
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponse, content_type = "application/json"),
        (status = 503, description = "Service unavailable")
    ),
    tag = "System"
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> ApiResult<HealthResponse> {
    if let Err(err) = state.db.health_check().await {
        tracing::warn!("health check failed: {err}");
        return Err(ApiError::new(
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            error_codes::SERVICE_UNAVAILABLE,
            "unavailable",
        ));
    }

    let timestamp_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    ok(HealthResponse { timestamp_ms })
}
