//! Collaborator interfaces for the three backing services.
//!
//! The gateway talks to a key-value store, a blob store and a message
//! queue through these traits. Clients are long-lived, stateless and
//! injected into the handlers via `AppState`, so every handler can be
//! exercised against the in-memory backends in tests.

pub mod memory;
pub mod redis;

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use self::memory::{MemoryBlobStore, MemoryKeyValueStore, MemoryQueue};
pub use self::redis::{RedisBlobStore, RedisKeyValueStore, RedisQueue};

/// A typed attribute value. The key-value store keeps numbers as
/// strings, so the numeric variant carries the exact decimal text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Attribute {
    /// String attribute
    S(String),
    /// Numeric attribute, stored as its exact decimal string
    N(String),
}

/// One stored record: attribute name -> typed value.
pub type Record = BTreeMap<String, Attribute>;

/// Metadata for one stored blob, as returned by `BlobStore::list`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlobMeta {
    pub key: String,
    /// Content size in bytes
    pub size: u64,
    pub last_modified: DateTime<Utc>,
}

/// One received queue message. The handle is an opaque acknowledgment
/// token a consumer would use for deletion; this service never deletes.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QueuedMessage {
    pub id: String,
    pub body: String,
    pub handle: String,
}

/// Backing-store failure taxonomy: a missing record/object (mapped to
/// 404 by the HTTP layer) or anything else (mapped to 500). No retries
/// and no compensation happen at this level.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("object not found")]
    NotFound,
    #[error("backend error: {0}")]
    Backend(String),
}

impl From<::redis::RedisError> for StoreError {
    fn from(e: ::redis::RedisError) -> Self {
        StoreError::Backend(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}

/// Structured records addressable by a unique key within a table.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Write a record. Overwrites on key collision (last write wins).
    async fn put(&self, table: &str, key: &str, record: Record) -> Result<(), StoreError>;

    /// Read a record by key. `Ok(None)` when absent.
    async fn get(&self, table: &str, key: &str) -> Result<Option<Record>, StoreError>;

    /// Full table scan. No ordering guarantee.
    async fn scan(&self, table: &str) -> Result<Vec<Record>, StoreError>;
}

/// Opaque content addressable by key within a bucket.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, bucket: &str, key: &str, content: &str) -> Result<(), StoreError>;

    /// Fetch full content. A missing object is `StoreError::NotFound`.
    async fn get(&self, bucket: &str, key: &str) -> Result<String, StoreError>;

    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<BlobMeta>, StoreError>;
}

/// At-least-once asynchronous message delivery.
#[async_trait]
pub trait MessageQueue: Send + Sync {
    /// Resolve a queue name to its address. Performed per request, as
    /// a consumer of a managed queue would resolve its URL.
    async fn resolve_address(&self, name: &str) -> Result<String, StoreError>;

    async fn send(&self, address: &str, body: &str) -> Result<(), StoreError>;

    /// Receive up to `max` messages, waiting up to `wait_seconds` when
    /// the queue is empty. Messages are not removed (debug peek).
    async fn receive(
        &self,
        address: &str,
        max: usize,
        wait_seconds: u64,
    ) -> Result<Vec<QueuedMessage>, StoreError>;
}
