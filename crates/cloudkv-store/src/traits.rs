use std::sync::Arc;

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::handle::BlobHandle;

/// Append-only store of immutable text blobs.
///
/// All implementations must satisfy these invariants:
/// - `read` returns exactly what the `write` that minted the handle stored.
/// - `write` always mints a fresh, unique handle; callers never name blobs.
/// - `list` returns live handles in a stable order (creation order for the
///   bundled backends). The order drives merge order and compaction.
/// - A single `write` is atomic: a half-written blob is never listed.
/// - All I/O errors are propagated, never silently ignored.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// List the handles of every live blob.
    async fn list(&self) -> StoreResult<Vec<BlobHandle>>;

    /// Read the full content of a blob.
    ///
    /// Returns [`StoreError::NotFound`](crate::StoreError::NotFound) if the
    /// handle does not name a live blob.
    async fn read(&self, handle: &BlobHandle) -> StoreResult<String>;

    /// Persist `content` as a new blob and return its handle.
    async fn write(&self, content: String) -> StoreResult<BlobHandle>;

    /// Remove a blob. Used by compaction only.
    async fn delete(&self, handle: &BlobHandle) -> StoreResult<()>;
}

#[async_trait]
impl<S: BlobStore + ?Sized> BlobStore for Arc<S> {
    async fn list(&self) -> StoreResult<Vec<BlobHandle>> {
        (**self).list().await
    }

    async fn read(&self, handle: &BlobHandle) -> StoreResult<String> {
        (**self).read(handle).await
    }

    async fn write(&self, content: String) -> StoreResult<BlobHandle> {
        (**self).write(content).await
    }

    async fn delete(&self, handle: &BlobHandle) -> StoreResult<()> {
        (**self).delete(handle).await
    }
}
