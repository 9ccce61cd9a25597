//! OpenAPI / Swagger UI documentation
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::OpenApi;

use crate::gateway::handlers::health::HealthResponse;
use crate::gateway::state::BackendMode;
use crate::gateway::handlers::receipt::ReceiptResponse;
use crate::models::{CreateOrderRequest, Order};
use crate::stores::{BlobMeta, QueuedMessage};

/// Main API documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Order Gateway API",
        version = "1.0.0",
        description = "Demonstration order service fanning out to a key-value store, a blob store and a message queue.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health::health_check,
        crate::gateway::handlers::order::create_order,
        crate::gateway::handlers::order::get_order,
        crate::gateway::handlers::order::list_orders,
        crate::gateway::handlers::message::list_messages,
        crate::gateway::handlers::receipt::list_receipts,
        crate::gateway::handlers::receipt::get_receipt,
    ),
    components(
        schemas(
            HealthResponse,
            BackendMode,
            Order,
            CreateOrderRequest,
            QueuedMessage,
            BlobMeta,
            ReceiptResponse,
        )
    ),
    tags(
        (name = "System", description = "Health and status"),
        (name = "Orders", description = "Order creation and lookup"),
        (name = "Receipts", description = "Stored receipt objects"),
        (name = "Debug", description = "Queue inspection"),
    )
)]
pub struct ApiDoc;
