use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::error::{StoreError, StoreResult};
use crate::handle::BlobHandle;
use crate::traits::BlobStore;

/// In-memory, map-based blob store.
///
/// Intended for tests and embedding. Handles are `blob-{seq}` with a
/// zero-padded, monotonically increasing sequence, so `list` returns blobs in
/// creation order. Deleted sequence numbers are never reused.
pub struct InMemoryBlobStore {
    inner: RwLock<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    blobs: BTreeMap<BlobHandle, String>,
    next_seq: u64,
}

impl MemoryState {
    fn insert(&mut self, content: String) -> BlobHandle {
        self.next_seq += 1;
        let handle = BlobHandle::new(format!("blob-{:010}", self.next_seq));
        self.blobs.insert(handle.clone(), content);
        handle
    }
}

impl InMemoryBlobStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryState::default()),
        }
    }

    /// Number of live blobs.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.state()?.blobs.len())
    }

    /// Returns `true` if the store holds no blobs.
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Store `content` synchronously. Handy for seeding tests with raw,
    /// possibly malformed, blobs.
    pub fn insert_raw(&self, content: impl Into<String>) -> StoreResult<BlobHandle> {
        Ok(self.state_mut()?.insert(content.into()))
    }

    /// Handles of every live blob, in creation order.
    pub fn handles(&self) -> StoreResult<Vec<BlobHandle>> {
        Ok(self.state()?.blobs.keys().cloned().collect())
    }

    /// Content of a live blob, if any.
    pub fn content(&self, handle: &BlobHandle) -> StoreResult<Option<String>> {
        Ok(self.state()?.blobs.get(handle).cloned())
    }

    fn state(&self) -> StoreResult<RwLockReadGuard<'_, MemoryState>> {
        self.inner
            .read()
            .map_err(|_| StoreError::Backend("in-memory store lock poisoned".into()))
    }

    fn state_mut(&self) -> StoreResult<RwLockWriteGuard<'_, MemoryState>> {
        self.inner
            .write()
            .map_err(|_| StoreError::Backend("in-memory store lock poisoned".into()))
    }
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn list(&self) -> StoreResult<Vec<BlobHandle>> {
        Ok(self.state()?.blobs.keys().cloned().collect())
    }

    async fn read(&self, handle: &BlobHandle) -> StoreResult<String> {
        self.state()?
            .blobs
            .get(handle)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(handle.clone()))
    }

    async fn write(&self, content: String) -> StoreResult<BlobHandle> {
        Ok(self.state_mut()?.insert(content))
    }

    async fn delete(&self, handle: &BlobHandle) -> StoreResult<()> {
        self.state_mut()?
            .blobs
            .remove(handle)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(handle.clone()))
    }
}

impl std::fmt::Debug for InMemoryBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBlobStore")
            .field("blob_count", &self.len().ok())
            .finish()
    }
}
