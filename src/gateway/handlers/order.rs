//! Order handlers (create, get, list)
//!
//! Create fans out to the three collaborators strictly in sequence:
//! key-value record, then receipt blob, then queue event. There is no
//! rollback: the first failing step aborts the sequence and surfaces
//! as a server error, leaving earlier writes in place.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
};

use crate::models::{Order, receipt_key};

use super::super::state::AppState;
use super::super::types::{ApiError, ApiResponse, ApiResult, ok};

/// Create order endpoint
///
/// POST /orders
#[utoipa::path(
    post,
    path = "/orders",
    request_body = crate::models::CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = ApiResponse<Order>,
         headers(("Location" = String, description = "Resource location of the created order"))),
        (status = 500, description = "A collaborator call failed")
    ),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    Json(req): Json<crate::models::CreateOrderRequest>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<ApiResponse<Order>>), ApiError> {
    let order = Order::create(req);
    tracing::info!("[TRACE] Create Order {}: received", order.order_id);

    // Strictly sequential, no compensation on partial failure.
    save_record(&state, &order).await?;
    upload_receipt(&state, &order).await?;
    publish_event(&state, &order).await?;

    tracing::info!("[TRACE] Create Order {}: ✅ all three stores written", order.order_id);

    let location = format!("/orders/{}", order.order_id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ApiResponse::success(order)),
    ))
}

/// Step 1: write the full order record to the key-value store.
async fn save_record(state: &AppState, order: &Order) -> Result<(), ApiError> {
    state
        .kv
        .put(&state.backend.table_name, &order.order_id, order.to_record())
        .await?;
    tracing::info!("[TRACE] Create Order {}: record saved", order.order_id);
    Ok(())
}

/// Step 2: render the plain-text receipt and write it to the blob store.
async fn upload_receipt(state: &AppState, order: &Order) -> Result<(), ApiError> {
    state
        .blobs
        .put(
            &state.backend.bucket_name,
            &receipt_key(&order.order_id),
            &order.render_receipt(),
        )
        .await?;
    tracing::info!("[TRACE] Create Order {}: receipt uploaded", order.order_id);
    Ok(())
}

/// Step 3: publish the serialized order to the queue.
async fn publish_event(state: &AppState, order: &Order) -> Result<(), ApiError> {
    let address = state
        .queue
        .resolve_address(&state.backend.queue_name)
        .await?;
    let body = serde_json::to_string(order)
        .map_err(|e| ApiError::internal(format!("Serialize failed: {}", e)))?;
    state.queue.send(&address, &body).await?;
    tracing::info!("[TRACE] Create Order {}: event published", order.order_id);
    Ok(())
}

/// Get single order by id
///
/// GET /orders/{order_id}
#[utoipa::path(
    get,
    path = "/orders/{order_id}",
    params(
        ("order_id" = String, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order details", body = ApiResponse<Order>),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Stored record malformed or store failed")
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<String>,
) -> ApiResult<Order> {
    match state.kv.get(&state.backend.table_name, &order_id).await? {
        Some(record) => ok(Order::from_record(&record)?),
        None => ApiError::not_found("Order not found").into_err(),
    }
}

/// List all orders
///
/// GET /orders
///
/// Full table scan; records come back in whatever order the store
/// returns them.
#[utoipa::path(
    get,
    path = "/orders",
    responses(
        (status = 200, description = "All stored orders", body = ApiResponse<Vec<Order>>),
        (status = 500, description = "Store failed")
    ),
    tag = "Orders"
)]
pub async fn list_orders(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Order>> {
    let records = state.kv.scan(&state.backend.table_name).await?;
    let orders = records
        .iter()
        .map(Order::from_record)
        .collect::<Result<Vec<_>, _>>()?;
    ok(orders)
}
