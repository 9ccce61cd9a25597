//! In-process emulated backends.
//!
//! Used when `backend.use_emulator` is set and by the test suite. Each
//! store is a DashMap keyed by table/bucket/queue name; semantics match
//! the live backend minus the network.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use super::{BlobMeta, BlobStore, KeyValueStore, MessageQueue, QueuedMessage, Record, StoreError};

#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    tables: DashMap<String, BTreeMap<String, Record>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn put(&self, table: &str, key: &str, record: Record) -> Result<(), StoreError> {
        self.tables
            .entry(table.to_string())
            .or_default()
            .insert(key.to_string(), record);
        Ok(())
    }

    async fn get(&self, table: &str, key: &str) -> Result<Option<Record>, StoreError> {
        Ok(self
            .tables
            .get(table)
            .and_then(|table| table.get(key).cloned()))
    }

    async fn scan(&self, table: &str) -> Result<Vec<Record>, StoreError> {
        Ok(self
            .tables
            .get(table)
            .map(|table| table.values().cloned().collect())
            .unwrap_or_default())
    }
}

#[derive(Debug, Clone)]
struct StoredBlob {
    content: String,
    last_modified: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    buckets: DashMap<String, BTreeMap<String, StoredBlob>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, bucket: &str, key: &str, content: &str) -> Result<(), StoreError> {
        self.buckets.entry(bucket.to_string()).or_default().insert(
            key.to_string(),
            StoredBlob {
                content: content.to_string(),
                last_modified: Utc::now(),
            },
        );
        Ok(())
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<String, StoreError> {
        self.buckets
            .get(bucket)
            .and_then(|bucket| bucket.get(key).map(|blob| blob.content.clone()))
            .ok_or(StoreError::NotFound)
    }

    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<BlobMeta>, StoreError> {
        Ok(self
            .buckets
            .get(bucket)
            .map(|bucket| {
                bucket
                    .iter()
                    .filter(|(key, _)| key.starts_with(prefix))
                    .map(|(key, blob)| BlobMeta {
                        key: key.clone(),
                        size: blob.content.len() as u64,
                        last_modified: blob.last_modified,
                    })
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[derive(Debug, Default)]
pub struct MemoryQueue {
    queues: DashMap<String, Vec<QueuedMessage>>,
}

impl MemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageQueue for MemoryQueue {
    async fn resolve_address(&self, name: &str) -> Result<String, StoreError> {
        Ok(format!("memory://{}", name))
    }

    async fn send(&self, address: &str, body: &str) -> Result<(), StoreError> {
        self.queues
            .entry(address.to_string())
            .or_default()
            .push(QueuedMessage {
                id: Uuid::new_v4().to_string(),
                body: body.to_string(),
                handle: Uuid::new_v4().to_string(),
            });
        Ok(())
    }

    async fn receive(
        &self,
        address: &str,
        max: usize,
        _wait_seconds: u64,
    ) -> Result<Vec<QueuedMessage>, StoreError> {
        // Pure peek: repeated debug reads see the same messages.
        Ok(self
            .queues
            .get(address)
            .map(|queue| queue.iter().take(max).cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::Attribute;

    fn record(id: &str) -> Record {
        Record::from([("OrderId".to_string(), Attribute::S(id.to_string()))])
    }

    #[tokio::test]
    async fn test_kv_put_get_round_trip() {
        let kv = MemoryKeyValueStore::new();
        kv.put("Orders", "k1", record("k1")).await.unwrap();
        let fetched = kv.get("Orders", "k1").await.unwrap().unwrap();
        assert_eq!(fetched, record("k1"));
    }

    #[tokio::test]
    async fn test_kv_get_absent_is_none() {
        let kv = MemoryKeyValueStore::new();
        assert!(kv.get("Orders", "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_kv_put_overwrites_on_collision() {
        let kv = MemoryKeyValueStore::new();
        kv.put("Orders", "k1", record("old")).await.unwrap();
        kv.put("Orders", "k1", record("new")).await.unwrap();
        let fetched = kv.get("Orders", "k1").await.unwrap().unwrap();
        assert_eq!(fetched, record("new"));
        assert_eq!(kv.scan("Orders").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_kv_scan_returns_all_records() {
        let kv = MemoryKeyValueStore::new();
        for i in 0..5 {
            let key = format!("k{}", i);
            kv.put("Orders", &key, record(&key)).await.unwrap();
        }
        assert_eq!(kv.scan("Orders").await.unwrap().len(), 5);
        assert!(kv.scan("OtherTable").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blob_round_trip_is_byte_identical() {
        let blobs = MemoryBlobStore::new();
        let content = "Order Receipt\n\nAmount: $99.99\n";
        blobs.put("bucket", "receipts/x.txt", content).await.unwrap();
        assert_eq!(blobs.get("bucket", "receipts/x.txt").await.unwrap(), content);
    }

    #[tokio::test]
    async fn test_blob_get_missing_is_not_found() {
        let blobs = MemoryBlobStore::new();
        assert!(matches!(
            blobs.get("bucket", "nope").await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_blob_list_filters_by_prefix() {
        let blobs = MemoryBlobStore::new();
        blobs.put("bucket", "receipts/a.txt", "aa").await.unwrap();
        blobs.put("bucket", "receipts/b.txt", "bbb").await.unwrap();
        blobs.put("bucket", "other/c.txt", "c").await.unwrap();

        let listed = blobs.list("bucket", "receipts/").await.unwrap();
        assert_eq!(listed.len(), 2);
        let sizes: Vec<u64> = listed.iter().map(|meta| meta.size).collect();
        assert!(sizes.contains(&2) && sizes.contains(&3));
    }

    #[tokio::test]
    async fn test_queue_receive_is_a_peek() {
        let queue = MemoryQueue::new();
        let addr = queue.resolve_address("orders-events").await.unwrap();
        queue.send(&addr, "first").await.unwrap();
        queue.send(&addr, "second").await.unwrap();

        let once = queue.receive(&addr, 10, 1).await.unwrap();
        let twice = queue.receive(&addr, 10, 1).await.unwrap();
        assert_eq!(once.len(), 2);
        assert_eq!(twice.len(), 2);
        assert_eq!(once[0].id, twice[0].id);
        assert_eq!(once[0].body, "first");
        assert!(!once[0].handle.is_empty());
    }

    #[tokio::test]
    async fn test_queue_receive_zero_max_is_empty() {
        let queue = MemoryQueue::new();
        let addr = queue.resolve_address("orders-events").await.unwrap();
        queue.send(&addr, "m").await.unwrap();
        assert!(queue.receive(&addr, 0, 1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_queue_receive_respects_max() {
        let queue = MemoryQueue::new();
        let addr = queue.resolve_address("orders-events").await.unwrap();
        for i in 0..15 {
            queue.send(&addr, &format!("m{}", i)).await.unwrap();
        }
        assert_eq!(queue.receive(&addr, 10, 1).await.unwrap().len(), 10);
    }
}
