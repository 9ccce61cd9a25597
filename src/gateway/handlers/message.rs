//! Queue debug handler

use std::sync::Arc;

use axum::extract::State;

use crate::stores::QueuedMessage;

use super::super::state::AppState;
use super::super::types::{ApiResponse, ApiResult, ok};

/// Receive batch size for the debug peek.
const MAX_MESSAGES: usize = 10;
/// Short wait so an empty queue answers quickly.
const WAIT_SECONDS: u64 = 1;

/// List queued messages (debug peek)
///
/// GET /messages
///
/// Receives up to 10 messages with a short wait and returns each
/// message's id, body and acknowledgment handle. Nothing is deleted;
/// this is not a consumer.
#[utoipa::path(
    get,
    path = "/messages",
    responses(
        (status = 200, description = "Pending messages", body = ApiResponse<Vec<QueuedMessage>>),
        (status = 500, description = "Queue failed")
    ),
    tag = "Debug"
)]
pub async fn list_messages(State(state): State<Arc<AppState>>) -> ApiResult<Vec<QueuedMessage>> {
    let address = state
        .queue
        .resolve_address(&state.backend.queue_name)
        .await?;
    let messages = state
        .queue
        .receive(&address, MAX_MESSAGES, WAIT_SECONDS)
        .await?;
    ok(messages)
}
