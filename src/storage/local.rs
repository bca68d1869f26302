//! Local filesystem seen-set store.
//!
//! Writes go to a sibling temp file which is flushed, synced and renamed
//! over the target, so readers only ever see a complete set. The parent
//! directory is synced after the rename.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::SeenSet;
use crate::storage::SeenStore;

/// JSON file backed seen-set store.
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    /// Create a store for the given state file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read bytes, returning None if the file doesn't exist.
    async fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::state(&self.path, e)),
        }
    }

    /// Directory holding the state file; `.` for a bare file name.
    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// Write bytes atomically (write to temp, sync, rename, sync directory).
    async fn write_bytes(&self, bytes: &[u8]) -> std::io::Result<()> {
        let dir = self.parent_dir();
        tokio::fs::create_dir_all(dir).await?;

        let tmp = self.path.with_extension("json.tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        sync_dir(dir).await
    }
}

/// Flush a directory entry so a completed rename survives power loss.
#[cfg(unix)]
async fn sync_dir(dir: &Path) -> std::io::Result<()> {
    tokio::fs::File::open(dir).await?.sync_all().await
}

#[cfg(not(unix))]
async fn sync_dir(_dir: &Path) -> std::io::Result<()> {
    Ok(())
}

#[async_trait]
impl SeenStore for LocalStore {
    async fn load(&self) -> Result<SeenSet> {
        let Some(bytes) = self.read_bytes().await? else {
            log::info!("No seen state at {}, starting empty", self.path.display());
            return Ok(SeenSet::new());
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            log::warn!("Seen state at {} is empty, starting empty", self.path.display());
            return Ok(SeenSet::new());
        }

        let seen: SeenSet =
            serde_json::from_slice(&bytes).map_err(|e| AppError::state(&self.path, e))?;
        log::debug!("Loaded {} seen ids from {}", seen.len(), self.path.display());
        Ok(seen)
    }

    async fn persist(&self, seen: &SeenSet) -> Result<()> {
        let mut bytes = serde_json::to_vec_pretty(seen)?;
        bytes.push(b'\n');
        self.write_bytes(&bytes)
            .await
            .map_err(|e| AppError::persist(&self.path, e))
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
