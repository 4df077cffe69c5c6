use thiserror::Error;

/// Errors produced while encoding or decoding a blob's record set.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The blob content is not a valid record set encoding.
    #[error("malformed record set: {0}")]
    Malformed(String),

    #[error("failed to encode record set: {0}")]
    Encode(String),
}
