//! Health check handler

use std::sync::Arc;

use axum::extract::State;
use chrono::{DateTime, Utc};
use utoipa::ToSchema;

use super::super::state::{AppState, BackendMode};
use super::super::types::{ApiResponse, ApiResult, ok};

/// Health check response data
#[derive(serde::Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Process status
    #[schema(example = "running")]
    pub status: &'static str,
    /// Operating mode: emulated or live backend
    pub mode: BackendMode,
    /// Current server time (UTC)
    pub timestamp: DateTime<Utc>,
}

/// Health check endpoint
///
/// Reports process status, operating mode and the current timestamp.
/// No side effects and no backend calls.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service running", body = ApiResponse<HealthResponse>)
    ),
    tag = "System"
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> ApiResult<HealthResponse> {
    ok(HealthResponse {
        status: "running",
        mode: state.mode,
        timestamp: Utc::now(),
    })
}
