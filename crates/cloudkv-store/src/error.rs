use crate::handle::BlobHandle;

/// Errors from blob store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested blob does not exist (never written, or deleted).
    #[error("blob not found: {0}")]
    NotFound(BlobHandle),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The handle cannot name a blob in this backend.
    #[error("invalid blob handle: {0}")]
    InvalidHandle(String),

    /// The blob exists but its bytes are not UTF-8 text.
    #[error("blob {handle} is not UTF-8 text: {source}")]
    NotText {
        handle: BlobHandle,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// Any other backend failure (remote service, lock poisoning, ...).
    #[error("backend error: {0}")]
    Backend(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
