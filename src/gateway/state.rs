use std::sync::Arc;

use serde::Serialize;

use crate::config::BackendConfig;
use crate::stores::{BlobStore, KeyValueStore, MessageQueue};

/// Operating mode reported by the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    /// In-process stores
    Emulated,
    /// Real network backend
    Live,
}

/// Gateway application state (shared).
///
/// The three collaborator clients are long-lived, reused, stateless
/// singletons injected at startup; handlers hold no other state.
#[derive(Clone)]
pub struct AppState {
    pub kv: Arc<dyn KeyValueStore>,
    pub blobs: Arc<dyn BlobStore>,
    pub queue: Arc<dyn MessageQueue>,
    /// Resource names (table / bucket / queue)
    pub backend: BackendConfig,
    pub mode: BackendMode,
}

impl AppState {
    pub fn new(
        kv: Arc<dyn KeyValueStore>,
        blobs: Arc<dyn BlobStore>,
        queue: Arc<dyn MessageQueue>,
        backend: BackendConfig,
        mode: BackendMode,
    ) -> Self {
        Self {
            kv,
            blobs,
            queue,
            backend,
            mode,
        }
    }

    /// Emulated state over fresh in-memory stores. Used by tests and
    /// by `--env` configs with `use_emulator: true`.
    pub fn emulated(backend: BackendConfig) -> Self {
        use crate::stores::{MemoryBlobStore, MemoryKeyValueStore, MemoryQueue};
        Self::new(
            Arc::new(MemoryKeyValueStore::new()),
            Arc::new(MemoryBlobStore::new()),
            Arc::new(MemoryQueue::new()),
            backend,
            BackendMode::Emulated,
        )
    }
}
