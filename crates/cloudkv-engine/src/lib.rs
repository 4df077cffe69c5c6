//! Store engine for cloudkv.
//!
//! [`KvStore`] merges every blob of a [`BlobStore`] into one in-memory view,
//! resolving keys that appear in several blobs through a pluggable
//! [`ConflictResolver`]. Local writes are staged in memory and flushed as a
//! single new blob on [`KvStore::commit`]. Once a load sees enough blobs, it
//! compacts them into one.
//!
//! ```no_run
//! # async fn demo() -> cloudkv_engine::EngineResult<()> {
//! use cloudkv_engine::{KvStore, Values};
//! use cloudkv_resolve::LwwResolver;
//! use cloudkv_store::InMemoryBlobStore;
//!
//! let mut kv = KvStore::new(InMemoryBlobStore::new(), LwwResolver::new());
//! kv.load().await?;
//! kv.put("user:1", Values::from([("name".to_string(), "ada".to_string())]));
//! kv.commit().await?;
//! assert_eq!(kv.get("user:1").map(|v| v["name"].as_str()), Some("ada"));
//! # Ok(())
//! # }
//! ```
//!
//! [`BlobStore`]: cloudkv_store::BlobStore
//! [`ConflictResolver`]: cloudkv_resolve::ConflictResolver

pub mod config;
pub mod error;
pub mod report;
pub mod store;

#[cfg(test)]
mod fixtures;

pub use config::{EngineConfig, DEFAULT_COMPACTION_THRESHOLD};
pub use error::{EngineError, EngineResult};
pub use report::LoadReport;
pub use store::KvStore;

// Re-export the model so embedders need only this crate.
pub use cloudkv_types::{Record, RecordSet, Values, Version};
