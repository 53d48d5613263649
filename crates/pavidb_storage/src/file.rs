//! File-based storage backend for persistent storage.

use crate::backend::StorageBackend;
use crate::error::StorageResult;
use parking_lot::Mutex;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// A file-based storage backend.
///
/// This backend persists the snapshot with OS file APIs. Data survives
/// process restarts.
///
/// # Durability
///
/// `write()` uses the write-to-temp-then-rename pattern:
/// 1. Write the snapshot to `<path>.tmp`
/// 2. `sync_all()` the temporary file
/// 3. Rename it over `<path>`
/// 4. Fsync the parent directory so the rename is durable
///
/// A crash at any point leaves either the previous snapshot or the new
/// one on disk, never a truncated mix.
///
/// # Thread Safety
///
/// This backend is thread-safe and can be shared across threads.
///
/// # Example
///
/// ```no_run
/// use pavidb_storage::{StorageBackend, FileBackend};
/// use std::path::Path;
///
/// let mut backend = FileBackend::open(Path::new("contratos.dat")).unwrap();
/// backend.write(b"snapshot bytes").unwrap();
/// ```
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    // Serializes the temp-write-rename sequence
    io: Mutex<()>,
}

impl FileBackend {
    /// Opens a file backend at the given path.
    ///
    /// The file itself is created lazily on the first `write`; opening a
    /// backend for a snapshot that does not exist yet is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the path exists but is not a regular file.
    pub fn open(path: &Path) -> StorageResult<Self> {
        if path.exists() && !path.is_file() {
            return Err(crate::StorageError::Corrupted(format!(
                "snapshot path is not a regular file: {}",
                path.display()
            )));
        }

        Ok(Self {
            path: path.to_path_buf(),
            io: Mutex::new(()),
        })
    }

    /// Opens a file backend, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directories cannot be created.
    pub fn open_with_create_dirs(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Self::open(path)
    }

    /// Returns the path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Syncs the parent directory so file creation/rename is durable.
    ///
    /// Windows NTFS journaling provides equivalent metadata durability,
    /// so the explicit fsync is Unix-only.
    #[cfg(unix)]
    fn sync_parent_dir(&self) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            let dir = File::open(parent)?;
            dir.sync_all()?;
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn sync_parent_dir(&self) -> StorageResult<()> {
        Ok(())
    }
}

impl StorageBackend for FileBackend {
    fn read(&self) -> StorageResult<Option<Vec<u8>>> {
        let _guard = self.io.lock();
        if !self.path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read(&self.path)?))
    }

    fn write(&mut self, data: &[u8]) -> StorageResult<()> {
        let _guard = self.io.lock();
        let temp = self.temp_path();

        let mut file = File::create(&temp)?;
        file.write_all(data)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp, &self.path)?;
        self.sync_parent_dir()?;

        Ok(())
    }

    fn sync(&mut self) -> StorageResult<()> {
        let _guard = self.io.lock();
        if self.path.exists() {
            let file = File::open(&self.path)?;
            file.sync_all()?;
        }
        Ok(())
    }

    fn size(&self) -> StorageResult<u64> {
        let _guard = self.io.lock();
        if !self.path.exists() {
            return Ok(0);
        }
        Ok(fs::metadata(&self.path)?.len())
    }
}
