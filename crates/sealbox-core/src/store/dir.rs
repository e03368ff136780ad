use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::{BlobSlot, BlobStore};
use crate::error::{Result, VaultError};
use crate::fs::write_atomic;

/// One file per slot inside a vault directory.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, slot: BlobSlot) -> PathBuf {
        self.root.join(slot.file_name())
    }
}

#[async_trait]
impl BlobStore for DirStore {
    async fn read(&self, slot: BlobSlot) -> Result<Option<String>> {
        let path = self.path_for(slot);
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(VaultError::Storage(format!(
                "Failed to read {} at {}: {}",
                slot,
                path.display(),
                err
            ))),
        }
    }

    async fn write(&self, slot: BlobSlot, contents: &str) -> Result<()> {
        let path = self.path_for(slot);
        let data = contents.as_bytes().to_vec();
        let target = path.clone();
        tokio::task::spawn_blocking(move || write_atomic(&target, &data))
            .await?
            .map_err(|e| {
                VaultError::Storage(format!(
                    "Failed to write {} at {}: {}",
                    slot,
                    path.display(),
                    e
                ))
            })?;
        debug!(%slot, bytes = contents.len(), "Blob written");
        Ok(())
    }
}
