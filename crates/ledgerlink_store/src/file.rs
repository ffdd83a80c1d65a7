//! File-based snapshot store.

use crate::backend::SnapshotStore;
use crate::error::StoreResult;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// A snapshot store backed by a single file.
///
/// # Durability
///
/// `save` writes the snapshot to a temporary file in the target's
/// directory, calls `sync_all`, renames it over the target and then syncs
/// the directory so the rename itself survives a crash. Readers see either
/// the old or the new snapshot, never a torn one.
///
/// # Example
///
/// ```no_run
/// use ledgerlink_store::{FileStore, SnapshotStore};
///
/// let mut store = FileStore::new("my_blockchain.save");
/// store.save("1:-1:\n").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Creates a store for the file at `path`. Nothing is touched on disk.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the snapshot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl SnapshotStore for FileStore {
    fn load(&self) -> StoreResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&mut self, snapshot: &str) -> StoreResult<()> {
        let directory = self.directory();
        fs::create_dir_all(directory)?;

        let mut staged = NamedTempFile::new_in(directory)?;
        staged.write_all(snapshot.as_bytes())?;
        staged.as_file().sync_all()?;
        staged.persist(&self.path).map_err(|err| err.error)?;
        sync_directory(directory)?;

        debug!(path = %self.path.display(), bytes = snapshot.len(), "saved snapshot");
        Ok(())
    }
}

/// Syncs `directory` so entries created or renamed in it are durable.
#[cfg(unix)]
fn sync_directory(directory: &Path) -> io::Result<()> {
    fs::File::open(directory)?.sync_all()
}

/// NTFS journals metadata; there is no directory handle to sync.
#[cfg(not(unix))]
fn sync_directory(_directory: &Path) -> io::Result<()> {
    Ok(())
}
