//! Snapshots of raw tracker responses.
//!
//! Every fetched issue page and comment feed is written out before it is
//! processed, so a run can be inspected offline and the resume point of an
//! interrupted run can be worked out from the files on disk.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur while writing a snapshot.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Failed to write a snapshot file.
    #[error("Failed to write snapshot '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Destination for raw response snapshots.
#[async_trait]
pub trait ArchiveSink: Send + Sync {
    /// Stores `bytes` under `name`, replacing any earlier snapshot.
    async fn write(&self, name: &str, bytes: &[u8]) -> Result<(), ArchiveError>;
}

/// Writes a snapshot, logging instead of failing when the sink errors.
pub(crate) async fn write_snapshot(sink: &dyn ArchiveSink, name: &str, bytes: &[u8]) {
    if let Err(e) = sink.write(name, bytes).await {
        warn!(name, error = %e, "Failed to archive snapshot");
    }
}

/// Snapshot file name for a page of source issues.
pub fn issue_page_name(page: u32) -> String {
    format!("issues-page-{page}.json")
}

/// Snapshot file name for the comment feed of a source issue.
pub fn comments_name(page: u32, source_number: u64) -> String {
    format!("comments-page-{page}-issue-{source_number}.json")
}

/// Writes snapshots as files into a directory.
#[derive(Debug, Clone)]
pub struct DirectoryArchive {
    root: PathBuf,
}

impl DirectoryArchive {
    /// Creates an archive rooted at `root`. The directory is created on the
    /// first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the archive directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl ArchiveSink for DirectoryArchive {
    async fn write(&self, name: &str, bytes: &[u8]) -> Result<(), ArchiveError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| ArchiveError::IoError {
                path: self.root.display().to_string(),
                source: e,
            })?;

        let path = self.root.join(name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| ArchiveError::IoError {
                path: path.display().to_string(),
                source: e,
            })?;

        debug!(path = %path.display(), size = bytes.len(), "Archived snapshot");
        Ok(())
    }
}

/// Discards every snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoArchive;

#[async_trait]
impl ArchiveSink for NoArchive {
    async fn write(&self, _name: &str, _bytes: &[u8]) -> Result<(), ArchiveError> {
        Ok(())
    }
}
