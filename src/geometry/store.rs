use std::sync::Arc;

use super::kv::KeyValueStore;
use super::{StoredGeometry, WindowGeometry};

/// Per-window geometry persistence on top of a key-value store.
///
/// Loading never fails: missing or malformed values read as `None` so the
/// caller falls back to a default. Saving is fire-and-forget; write failures
/// are logged and dropped.
#[derive(Clone)]
pub struct GeometryStore {
    kv: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for GeometryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeometryStore").finish_non_exhaustive()
    }
}

impl GeometryStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(super::kv::MemoryKv::new()))
    }

    fn storage_key(id: &str) -> String {
        format!("window:{id}:geometry")
    }

    pub fn load(&self, id: &str) -> Option<WindowGeometry> {
        let raw = self.kv.get(&Self::storage_key(id))?;
        match serde_json::from_str::<StoredGeometry>(&raw) {
            Ok(stored) => Some(stored.into()),
            Err(err) => {
                tracing::warn!(window = id, "discarding malformed stored geometry: {err}");
                None
            }
        }
    }

    pub fn save(&self, id: &str, geometry: WindowGeometry) {
        let encoded = match serde_json::to_string(&StoredGeometry::from(geometry)) {
            Ok(encoded) => encoded,
            Err(err) => {
                tracing::warn!(window = id, "failed to encode geometry: {err}");
                return;
            }
        };
        if let Err(err) = self.kv.set(&Self::storage_key(id), encoded) {
            tracing::warn!(window = id, "failed to persist geometry: {err}");
        } else {
            tracing::trace!(window = id, ?geometry, "geometry saved");
        }
    }
}
