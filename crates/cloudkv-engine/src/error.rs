use cloudkv_resolve::ResolveError;
use cloudkv_store::{BlobHandle, StoreError};
use cloudkv_types::CodecError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// A list/read/write/delete call on the blob store failed. Not retried.
    #[error("blob store error: {0}")]
    BlobStore(#[from] StoreError),

    /// A blob's content is not a record set. Aborts the load.
    #[error("malformed blob {handle}: {source}")]
    MalformedBlob {
        handle: BlobHandle,
        source: CodecError,
    },

    #[error(transparent)]
    Encode(CodecError),

    /// The conflict resolver refused to merge a key. Aborts the load.
    #[error("conflict resolution failed: {0}")]
    Resolution(#[from] ResolveError),
}

pub type EngineResult<T> = Result<T, EngineError>;
