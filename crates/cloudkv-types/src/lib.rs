//! Record model for cloudkv.
//!
//! A cloudkv store is a set of immutable blobs, each holding one
//! [`RecordSet`]: a mapping from logical key to [`Record`]. A record pairs the
//! caller's opaque [`Values`] with opaque [`Version`] metadata owned by the
//! conflict resolver.
//!
//! # Wire Format
//!
//! A blob is a UTF-8 JSON object keyed by record key:
//!
//! ```json
//! {"user:1": {"values": {"name": "ada"}, "version": {"timestamp": "2024-07-26T01:01:33.907Z"}}}
//! ```
//!
//! The `version` field may be absent in older blobs and decodes to an empty
//! map.

pub mod error;
pub mod record;

pub use error::CodecError;
pub use record::{Record, RecordSet, Values, Version};
