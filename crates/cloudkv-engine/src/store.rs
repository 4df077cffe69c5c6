use cloudkv_resolve::ConflictResolver;
use cloudkv_store::{BlobHandle, BlobStore, StoreError};
use cloudkv_types::{CodecError, Record, RecordSet, Values};
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::report::LoadReport;

/// Eventually-consistent key-value store over an append-only blob store.
///
/// State is two record sets: `clean`, the merged view of everything already
/// persisted, and `dirty`, local writes not yet committed. A key lives in at
/// most one of them. The store is fully rebuildable from the blob store with
/// a fresh [`load`](Self::load).
///
/// One owner per instance: `load` and `commit` take `&mut self`, so the
/// borrow checker rules out concurrent use. Both mutate in-memory state only
/// after their last await point, so dropping their future mid-flight leaves
/// the store as it was.
pub struct KvStore<S, R> {
    blobs: S,
    resolver: R,
    config: EngineConfig,
    clean: RecordSet,
    dirty: RecordSet,
}

impl<S: BlobStore, R: ConflictResolver> KvStore<S, R> {
    /// Create an empty store with the default configuration.
    pub fn new(blobs: S, resolver: R) -> Self {
        Self::with_config(blobs, resolver, EngineConfig::default())
    }

    pub fn with_config(blobs: S, resolver: R, config: EngineConfig) -> Self {
        Self {
            blobs,
            resolver,
            config,
            clean: RecordSet::new(),
            dirty: RecordSet::new(),
        }
    }

    /// Merge every blob into the clean view, compacting when the blob count
    /// reaches the configured threshold.
    ///
    /// Blobs are merged in the order the store lists them. A key already
    /// present is replaced by `handle_conflict(key, existing, incoming)`.
    /// Merging starts from the current clean view, so calling `load` again
    /// re-merges the same blobs (harmless for a deterministic resolver).
    ///
    /// On any error the clean and dirty sets are left exactly as before.
    pub async fn load(&mut self) -> EngineResult<LoadReport> {
        let handles = self.blobs.list().await?;
        let mut merged = self.clean.clone();
        let mut report = LoadReport {
            blobs_read: handles.len(),
            ..LoadReport::default()
        };

        for handle in &handles {
            let incoming = self.read_blob(handle).await?;
            debug!(blob = %handle, records = incoming.len(), "merging blob");

            report.records_read += incoming.len();
            for (key, record) in incoming {
                let current = match merged.remove(&key) {
                    Some(existing) => {
                        report.conflicts_resolved += 1;
                        self.resolver.handle_conflict(&key, existing, record)?
                    }
                    None => record,
                };
                merged.insert(key, current);
            }
        }

        if self.config.should_compact(handles.len()) {
            report.compacted = Some(self.compact(&merged, &handles).await?);
        }

        // Pending local writes shadow whatever the blobs say until commit.
        for key in self.dirty.keys() {
            merged.remove(key);
        }
        self.clean = merged;

        debug!(
            blobs = report.blobs_read,
            records = report.records_read,
            conflicts = report.conflicts_resolved,
            keys = self.size(),
            "load complete"
        );
        Ok(report)
    }

    /// Read and decode one blob. Content that is not UTF-8 text or not a
    /// record set is malformed.
    async fn read_blob(&self, handle: &BlobHandle) -> EngineResult<RecordSet> {
        let decoded = match self.blobs.read(handle).await {
            Ok(content) => RecordSet::decode(&content),
            Err(StoreError::NotText { source, .. }) => {
                Err(CodecError::Malformed(source.to_string()))
            }
            Err(err) => return Err(err.into()),
        };
        decoded.map_err(|source| {
            warn!(blob = %handle, error = %source, "blob does not decode; aborting load");
            EngineError::MalformedBlob {
                handle: handle.clone(),
                source,
            }
        })
    }

    /// Write `merged` as one blob, then delete every blob it replaces, in
    /// listing order.
    async fn compact(&self, merged: &RecordSet, handles: &[BlobHandle]) -> EngineResult<BlobHandle> {
        let content = merged.encode().map_err(EngineError::Encode)?;
        let compacted = self.blobs.write(content).await?;
        for handle in handles {
            self.blobs.delete(handle).await?;
        }
        info!(
            replaced = handles.len(),
            keys = merged.len(),
            blob = %compacted,
            "compacted blob store"
        );
        Ok(compacted)
    }

    /// Current values for `key`. Pending writes take precedence.
    pub fn get(&self, key: &str) -> Option<&Values> {
        self.dirty
            .get(key)
            .or_else(|| self.clean.get(key))
            .map(Record::values)
    }

    /// Stage `values` as the full new value of `key`.
    ///
    /// A clean key moves to the dirty set, stamped relative to the version it
    /// replaces. Any other key is stamped as new; a key that is already dirty
    /// simply has its pending write replaced.
    pub fn put(&mut self, key: impl Into<String>, values: Values) {
        let key = key.into();
        let version = match self.clean.remove(&key) {
            Some(replaced) => self
                .resolver
                .stamp_existing_record(&values, replaced.version()),
            None => self.resolver.stamp_new_record(&values),
        };
        self.dirty.insert(key, Record::new(values, version));
    }

    /// Persist all pending writes as one new blob and fold them into the
    /// clean view.
    ///
    /// Returns `None` without touching the blob store when nothing is
    /// pending. If the write fails, pending writes are kept so the commit
    /// can be retried. Never compacts.
    pub async fn commit(&mut self) -> EngineResult<Option<BlobHandle>> {
        if self.dirty.is_empty() {
            return Ok(None);
        }

        let content = self.dirty.encode().map_err(EngineError::Encode)?;
        let handle = self.blobs.write(content).await?;

        let flushed = std::mem::take(&mut self.dirty);
        debug!(blob = %handle, records = flushed.len(), "committed pending writes");
        self.clean.absorb(flushed);
        Ok(Some(handle))
    }

    /// Number of distinct keys, committed or pending.
    pub fn size(&self) -> usize {
        self.clean.len() + self.dirty.len()
    }

    /// Number of keys with uncommitted writes.
    pub fn pending(&self) -> usize {
        self.dirty.len()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn blob_store(&self) -> &S {
        &self.blobs
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }
}

impl<S, R> std::fmt::Debug for KvStore<S, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KvStore")
            .field("clean", &self.clean.len())
            .field("dirty", &self.dirty.len())
            .field("config", &self.config)
            .finish()
    }
}
