//! Order Gateway: a demonstration HTTP order service.
//!
//! Each order-creation request fans out to three external
//! collaborators, strictly in sequence:
//!
//! ```text
//! POST /orders ──▶ key-value store (order record)
//!              ──▶ blob store      (plain-text receipt)
//!              ──▶ message queue   (order-created event)
//! ```
//!
//! # Modules
//!
//! - [`config`] - yaml configuration (gateway + backend resources)
//! - [`logging`] - tracing / rolling file appender setup
//! - [`models`] - Order types, record encoding, receipt rendering
//! - [`stores`] - collaborator traits with emulated and Redis backends
//! - [`gateway`] - axum router, state, handlers, OpenAPI docs

pub mod config;
pub mod gateway;
pub mod logging;
pub mod models;
pub mod stores;

// Convenient re-exports at crate root
pub use config::{AppConfig, BackendConfig, GatewayConfig};
pub use gateway::state::{AppState, BackendMode};
pub use models::{CreateOrderRequest, Order, receipt_key};
pub use stores::{
    Attribute, BlobMeta, BlobStore, KeyValueStore, MessageQueue, QueuedMessage, Record, StoreError,
};
