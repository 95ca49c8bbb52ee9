//! Write stage: persist a rendered entry.
//!
//! Writes are plain overwrites, not temp-file-and-rename. Two titles that
//! slugify to the same name land on the same path and the later write wins.

use async_trait::async_trait;
use std::path::Path;
use tracing::debug;

#[cfg(test)]
use mockall::automock;

/// Somewhere rendered entries can be written.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait EntryStore: Send + Sync {
    async fn write(&self, path: &Path, text: &str) -> std::io::Result<()>;
}

/// [`EntryStore`] over the local file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStore;

#[async_trait]
impl EntryStore for FsStore {
    async fn write(&self, path: &Path, text: &str) -> std::io::Result<()> {
        tokio::fs::write(path, text).await?;
        debug!("Wrote {} bytes to {}", text.len(), path.display());
        Ok(())
    }
}
