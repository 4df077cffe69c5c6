//! Append-only blob storage for cloudkv.
//!
//! A blob store holds immutable text blobs, each the encoding of one record
//! set. The store never interprets blob contents and never lets callers name
//! blobs: every write mints a fresh [`BlobHandle`].
//!
//! # Storage Backends
//!
//! All backends implement the [`BlobStore`] trait:
//!
//! - [`InMemoryBlobStore`] -- `BTreeMap`-based store for tests and embedding
//! - [`DirectoryBlobStore`] -- one file per blob in a (possibly cloud-synced) folder
//!
//! # Design Rules
//!
//! 1. Blobs are immutable once written.
//! 2. `list` order is significant: it drives merge order and compaction
//!    delete order, so backends return blobs in creation order.
//! 3. A partially written blob must never be listed.
//! 4. All I/O errors are propagated, never silently ignored.

pub mod directory;
pub mod error;
pub mod handle;
pub mod memory;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use directory::DirectoryBlobStore;
pub use error::{StoreError, StoreResult};
pub use handle::BlobHandle;
pub use memory::InMemoryBlobStore;
pub use traits::BlobStore;
