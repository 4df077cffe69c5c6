use serde::{Deserialize, Serialize};

/// Blob count at which a load compacts the store.
pub const DEFAULT_COMPACTION_THRESHOLD: usize = 10;

/// Tunables for [`KvStore`](crate::KvStore).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// A load that reads at least this many blobs rewrites them as one.
    /// `0` disables compaction.
    pub compaction_threshold: usize,
}

impl EngineConfig {
    pub fn with_compaction_threshold(mut self, threshold: usize) -> Self {
        self.compaction_threshold = threshold;
        self
    }

    /// Whether a load that read `blob_count` blobs should compact.
    pub fn should_compact(&self, blob_count: usize) -> bool {
        self.compaction_threshold > 0 && blob_count >= self.compaction_threshold
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            compaction_threshold: DEFAULT_COMPACTION_THRESHOLD,
        }
    }
}
