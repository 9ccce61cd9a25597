//! Receipt handlers (list, get content)

use std::sync::Arc;

use axum::extract::{Path, State};
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::receipt_key;
use crate::stores::{BlobMeta, StoreError};

use super::super::state::AppState;
use super::super::types::{ApiError, ApiResponse, ApiResult, ok};

/// Blob key prefix under which receipts are stored.
const RECEIPT_PREFIX: &str = "receipts/";

/// Receipt content response data
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptResponse {
    pub order_id: String,
    /// Full plain-text receipt
    pub content: String,
}

/// List stored receipts
///
/// GET /receipts
#[utoipa::path(
    get,
    path = "/receipts",
    responses(
        (status = 200, description = "Receipt objects under the receipts/ prefix",
         body = ApiResponse<Vec<BlobMeta>>),
        (status = 500, description = "Store failed")
    ),
    tag = "Receipts"
)]
pub async fn list_receipts(State(state): State<Arc<AppState>>) -> ApiResult<Vec<BlobMeta>> {
    let listed = state
        .blobs
        .list(&state.backend.bucket_name, RECEIPT_PREFIX)
        .await?;
    ok(listed)
}

/// Get receipt content for one order
///
/// GET /receipts/{order_id}
///
/// 404 only when the store signals a missing object; any other failure
/// propagates as a server error.
#[utoipa::path(
    get,
    path = "/receipts/{order_id}",
    params(
        ("order_id" = String, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Receipt text", body = ApiResponse<ReceiptResponse>),
        (status = 404, description = "Receipt not found"),
        (status = 500, description = "Store failed")
    ),
    tag = "Receipts"
)]
pub async fn get_receipt(
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<String>,
) -> ApiResult<ReceiptResponse> {
    match state
        .blobs
        .get(&state.backend.bucket_name, &receipt_key(&order_id))
        .await
    {
        Ok(content) => ok(ReceiptResponse { order_id, content }),
        Err(StoreError::NotFound) => ApiError::not_found("Receipt not found").into_err(),
        Err(e) => ApiError::from(e).into_err(),
    }
}
