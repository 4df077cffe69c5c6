use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier of one blob, minted by the blob store on write.
///
/// Callers never construct handles to name new blobs; they only pass back
/// handles a store returned from `list` or `write`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlobHandle(String);

impl BlobHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BlobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlobHandle({})", self.0)
    }
}

impl fmt::Display for BlobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlobHandle {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for BlobHandle {
    fn from(name: String) -> Self {
        Self(name)
    }
}
