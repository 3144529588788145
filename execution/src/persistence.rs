//! Snapshot stores for the persistence collaborator.
//!
//! The engine never calls a store itself. A caller loads the last snapshot at
//! startup, restores it into a [`crate::Contest`], and saves
//! [`crate::Contest::snapshot`] after each mutation. A failed save leaves the
//! in-memory contest untouched, so the caller may simply retry.
//!
//! # Durability
//!
//! [`FileSnapshotStore`] writes with a write-rename pattern:
//! 1. Write the encoded snapshot to a temporary sibling file
//! 2. Sync the file to disk (`fsync`)
//! 3. Rename over the final path (atomic on POSIX)

use giveaway_types::{Snapshot, SnapshotError};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while loading or saving snapshots.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot could not be encoded, decoded or verified.
    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
}

/// Backend that keeps the latest contest snapshot.
pub trait SnapshotStore {
    /// Load the latest snapshot, `None` on a fresh start.
    fn load(&self) -> Result<Option<Snapshot>, StoreError>;

    /// Replace the stored snapshot.
    fn save(&mut self, snapshot: &Snapshot) -> Result<(), StoreError>;
}

/// In-memory store for tests and embedding.
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    encoded: Option<Vec<u8>>,
    saves: usize,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful saves.
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        match &self.encoded {
            Some(bytes) => Ok(Some(Snapshot::from_json(bytes)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), StoreError> {
        self.encoded = Some(snapshot.to_json()?);
        self.saves += 1;
        Ok(())
    }
}

/// Store backed by a single JSON file.
#[derive(Clone, Debug)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    /// Use `path` as the snapshot file. Parent directories are created on save.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let snapshot = Snapshot::from_json(&bytes)?;
        debug!(path = %self.path.display(), users = snapshot.users.len(), "loaded snapshot");
        Ok(Some(snapshot))
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let encoded = snapshot.to_json()?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let temp_path = self.temp_path();
        {
            let mut file = std::fs::File::create(&temp_path)?;
            file.write_all(&encoded)?;
            file.sync_all()?;
        }
        std::fs::rename(&temp_path, &self.path)?;
        debug!(path = %self.path.display(), bytes = encoded.len(), "saved snapshot");
        Ok(())
    }
}
