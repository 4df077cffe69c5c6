use cloudkv_store::BlobHandle;
use serde::Serialize;

/// What a [`KvStore::load`](crate::KvStore::load) did.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Blobs listed and merged.
    pub blobs_read: usize,
    /// Records decoded across all blobs, duplicates included.
    pub records_read: usize,
    /// Times the resolver was asked to pick between two records.
    pub conflicts_resolved: usize,
    /// Handle of the compacted blob, when the load compacted.
    pub compacted: Option<BlobHandle>,
}

impl LoadReport {
    pub fn did_compact(&self) -> bool {
        self.compacted.is_some()
    }
}
