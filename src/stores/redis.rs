//! Redis-backed live backends.
//!
//! One Redis endpoint serves all three collaborator roles:
//!
//! - records live as JSON strings under `kv:{table}:{key}`, with a
//!   `kv:{table}:keys` set standing in for a table scan;
//! - blobs live as JSON envelopes under `blob:{bucket}:{key}` with the
//!   same index-set scheme;
//! - each queue is a Redis list of JSON message envelopes.
//!
//! Connections are multiplexed and cheap to clone, so every store holds
//! one and clones it per operation.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{BlobMeta, BlobStore, KeyValueStore, MessageQueue, QueuedMessage, Record, StoreError};

/// Open one multiplexed connection for the live backend.
pub async fn connect(url: &str) -> Result<MultiplexedConnection, StoreError> {
    let client = redis::Client::open(url).map_err(StoreError::from)?;
    let con = client.get_multiplexed_async_connection().await?;
    Ok(con)
}

pub struct RedisKeyValueStore {
    con: MultiplexedConnection,
}

impl RedisKeyValueStore {
    pub fn new(con: MultiplexedConnection) -> Self {
        Self { con }
    }

    fn value_key(table: &str, key: &str) -> String {
        format!("kv:{}:{}", table, key)
    }

    fn index_key(table: &str) -> String {
        format!("kv:{}:keys", table)
    }
}

#[async_trait]
impl KeyValueStore for RedisKeyValueStore {
    async fn put(&self, table: &str, key: &str, record: Record) -> Result<(), StoreError> {
        let mut con = self.con.clone();
        let json = serde_json::to_string(&record)?;
        let _: () = con.set(Self::value_key(table, key), json).await?;
        let _: () = con.sadd(Self::index_key(table), key).await?;
        Ok(())
    }

    async fn get(&self, table: &str, key: &str) -> Result<Option<Record>, StoreError> {
        let mut con = self.con.clone();
        let json: Option<String> = con.get(Self::value_key(table, key)).await?;
        match json {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn scan(&self, table: &str) -> Result<Vec<Record>, StoreError> {
        let mut con = self.con.clone();
        let keys: Vec<String> = con.smembers(Self::index_key(table)).await?;
        let mut records = Vec::with_capacity(keys.len());
        for key in keys {
            // An indexed key may have been dropped out of band; skip it.
            if let Some(record) = self.get(table, &key).await? {
                records.push(record);
            }
        }
        Ok(records)
    }
}

/// Stored blob envelope: content plus write-time metadata.
#[derive(Debug, Serialize, Deserialize)]
struct StoredBlob {
    content: String,
    last_modified: DateTime<Utc>,
}

pub struct RedisBlobStore {
    con: MultiplexedConnection,
}

impl RedisBlobStore {
    pub fn new(con: MultiplexedConnection) -> Self {
        Self { con }
    }

    fn value_key(bucket: &str, key: &str) -> String {
        format!("blob:{}:{}", bucket, key)
    }

    fn index_key(bucket: &str) -> String {
        format!("blob:{}:keys", bucket)
    }
}

#[async_trait]
impl BlobStore for RedisBlobStore {
    async fn put(&self, bucket: &str, key: &str, content: &str) -> Result<(), StoreError> {
        let mut con = self.con.clone();
        let blob = StoredBlob {
            content: content.to_string(),
            last_modified: Utc::now(),
        };
        let json = serde_json::to_string(&blob)?;
        let _: () = con.set(Self::value_key(bucket, key), json).await?;
        let _: () = con.sadd(Self::index_key(bucket), key).await?;
        Ok(())
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<String, StoreError> {
        let mut con = self.con.clone();
        let json: Option<String> = con.get(Self::value_key(bucket, key)).await?;
        let blob: StoredBlob = match json {
            Some(json) => serde_json::from_str(&json)?,
            None => return Err(StoreError::NotFound),
        };
        Ok(blob.content)
    }

    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<BlobMeta>, StoreError> {
        let mut con = self.con.clone();
        let keys: Vec<String> = con.smembers(Self::index_key(bucket)).await?;
        let mut listed = Vec::new();
        for key in keys {
            if !key.starts_with(prefix) {
                continue;
            }
            let json: Option<String> = con.get(Self::value_key(bucket, &key)).await?;
            if let Some(json) = json {
                let blob: StoredBlob = serde_json::from_str(&json)?;
                listed.push(BlobMeta {
                    key,
                    size: blob.content.len() as u64,
                    last_modified: blob.last_modified,
                });
            }
        }
        Ok(listed)
    }
}

pub struct RedisQueue {
    con: MultiplexedConnection,
}

impl RedisQueue {
    pub fn new(con: MultiplexedConnection) -> Self {
        Self { con }
    }
}

#[async_trait]
impl MessageQueue for RedisQueue {
    async fn resolve_address(&self, name: &str) -> Result<String, StoreError> {
        Ok(format!("queue:{}", name))
    }

    async fn send(&self, address: &str, body: &str) -> Result<(), StoreError> {
        let mut con = self.con.clone();
        let message = QueuedMessage {
            id: Uuid::new_v4().to_string(),
            body: body.to_string(),
            handle: Uuid::new_v4().to_string(),
        };
        let json = serde_json::to_string(&message)?;
        let _: () = con.rpush(address, json).await?;
        Ok(())
    }

    async fn receive(
        &self,
        address: &str,
        max: usize,
        wait_seconds: u64,
    ) -> Result<Vec<QueuedMessage>, StoreError> {
        if max == 0 {
            return Ok(Vec::new());
        }

        let mut con = self.con.clone();
        let stop = (max - 1) as isize;
        let mut raw: Vec<String> = con.lrange(address, 0, stop).await?;

        // Cheap stand-in for long polling: one retry after the wait.
        if raw.is_empty() && wait_seconds > 0 {
            tokio::time::sleep(Duration::from_secs(wait_seconds)).await;
            raw = con.lrange(address, 0, stop).await?;
        }

        raw.iter()
            .map(|json| serde_json::from_str(json).map_err(StoreError::from))
            .collect()
    }
}
