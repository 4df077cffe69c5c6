use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::handle::BlobHandle;
use crate::traits::BlobStore;

/// Extension of committed blob files.
const BLOB_EXTENSION: &str = "json";

/// Extension of in-flight writes. Never listed.
const TEMP_EXTENSION: &str = "tmp";

/// Blob store backed by a directory, one file per blob.
///
/// The directory may be local or synced by a cloud drive client. Blob files
/// are named `{uuid-v7}.json`; UUID v7 is time-ordered, so sorting names
/// yields creation order across writers with roughly synchronized clocks.
///
/// Writes land in a `.tmp` sibling first and are renamed into place, so a
/// crash mid-write never leaves a truncated blob in the listing.
#[derive(Clone, Debug)]
pub struct DirectoryBlobStore {
    dir: PathBuf,
}

impl DirectoryBlobStore {
    /// Open a store rooted at `dir`, creating the directory if missing.
    pub async fn open(dir: impl AsRef<Path>) -> StoreResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir).await?;
        debug!(dir = %dir.display(), "opened directory blob store");
        Ok(Self { dir })
    }

    /// Root directory of the store.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolve a handle to its file path, rejecting anything that is not a
    /// bare blob file name.
    fn blob_path(&self, handle: &BlobHandle) -> StoreResult<PathBuf> {
        let name = handle.as_str();
        let is_plain = !name.is_empty()
            && !name.starts_with('.')
            && !name.contains(['/', '\\'])
            && Path::new(name).extension().is_some_and(|e| e == BLOB_EXTENSION);
        if !is_plain {
            return Err(StoreError::InvalidHandle(name.to_string()));
        }
        Ok(self.dir.join(name))
    }
}

fn not_found_as(handle: &BlobHandle, err: io::Error) -> StoreError {
    if err.kind() == io::ErrorKind::NotFound {
        StoreError::NotFound(handle.clone())
    } else {
        StoreError::Io(err)
    }
}

/// Write `bytes` to `temp`, flush to disk, then move into place. On failure
/// the temp file is removed.
async fn write_durably(temp: &Path, target: &Path, bytes: &[u8]) -> io::Result<()> {
    let result = async {
        let mut file = tokio::fs::File::create(temp).await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        drop(file);
        tokio::fs::rename(temp, target).await
    }
    .await;

    if result.is_err() {
        if let Err(cleanup) = tokio::fs::remove_file(temp).await {
            if cleanup.kind() != io::ErrorKind::NotFound {
                warn!(file = %temp.display(), error = %cleanup, "could not remove temp blob");
            }
        }
    }
    result
}

#[async_trait]
impl BlobStore for DirectoryBlobStore {
    async fn list(&self) -> StoreResult<Vec<BlobHandle>> {
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        let mut handles = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                warn!(path = %path.display(), "skipping non UTF-8 file name");
                continue;
            };
            let extension = path.extension().and_then(|e| e.to_str());
            if extension == Some(TEMP_EXTENSION) {
                debug!(file = name, "skipping in-flight blob");
                continue;
            }
            if extension != Some(BLOB_EXTENSION)
                || name.starts_with('.')
                || !entry.file_type().await?.is_file()
            {
                warn!(file = name, "skipping foreign file in blob directory");
                continue;
            }
            handles.push(BlobHandle::new(name));
        }

        handles.sort();
        Ok(handles)
    }

    async fn read(&self, handle: &BlobHandle) -> StoreResult<String> {
        let path = self.blob_path(handle)?;
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| not_found_as(handle, e))?;
        String::from_utf8(bytes).map_err(|source| StoreError::NotText {
            handle: handle.clone(),
            source,
        })
    }

    async fn write(&self, content: String) -> StoreResult<BlobHandle> {
        let stem = Uuid::now_v7();
        let handle = BlobHandle::new(format!("{stem}.{BLOB_EXTENSION}"));
        let final_path = self.dir.join(handle.as_str());
        let temp_path = self.dir.join(format!("{stem}.{TEMP_EXTENSION}"));

        write_durably(&temp_path, &final_path, content.as_bytes()).await?;

        debug!(blob = %handle, bytes = content.len(), "blob written");
        Ok(handle)
    }

    async fn delete(&self, handle: &BlobHandle) -> StoreResult<()> {
        let path = self.blob_path(handle)?;
        tokio::fs::remove_file(&path)
            .await
            .map_err(|e| not_found_as(handle, e))?;
        debug!(blob = %handle, "blob deleted");
        Ok(())
    }
}
