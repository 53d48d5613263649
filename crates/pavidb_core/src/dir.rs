//! Store directory management.
//!
//! This module handles the file system layout for a PavIDB store:
//!
//! ```text
//! <store_path>/
//! ├─ LOCK              # Advisory lock for single-writer
//! ├─ contratos.dat     # One CBOR snapshot per collection
//! ├─ medicoes.dat
//! ├─ ruas.dat
//! ├─ trechos.dat
//! ├─ profissionais.dat
//! └─ servicos.dat
//! ```
//!
//! The LOCK file ensures only one process can write to the store at a time.

use crate::error::{CoreError, CoreResult};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

const LOCK_FILE: &str = "LOCK";

/// Manages the store directory structure and file locking.
///
/// # Thread Safety
///
/// `StoreDir` holds an exclusive advisory lock on the store directory.
/// Only one instance can exist per directory at a time.
#[derive(Debug)]
pub struct StoreDir {
    /// Root directory path.
    path: PathBuf,
    /// Lock file handle (held for exclusive access).
    _lock_file: File,
}

impl StoreDir {
    /// Opens or creates a store directory.
    ///
    /// Creating the directory when it is absent makes reopening idempotent:
    /// opening the same path any number of times yields the same store.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The path exists but is not a directory
    /// - Another process holds the lock (returns `StoreLocked`)
    /// - I/O errors occur
    pub fn open(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            fs::create_dir_all(path)?;
        }

        if !path.is_dir() {
            return Err(CoreError::invalid_operation(format!(
                "store path is not a directory: {}",
                path.display()
            )));
        }

        let lock_path = path.join(LOCK_FILE);
        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        if lock_file.try_lock_exclusive().is_err() {
            return Err(CoreError::StoreLocked);
        }

        Ok(Self {
            path: path.to_path_buf(),
            _lock_file: lock_file,
        })
    }

    /// Returns the path to the store directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the snapshot path for a collection.
    #[must_use]
    pub fn collection_path(&self, collection: &str) -> PathBuf {
        self.path.join(format!("{collection}.dat"))
    }
}

impl Drop for StoreDir {
    fn drop(&mut self) {
        // fs2 releases the advisory lock when the file handle closes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn open_creates_directory() {
        let temp = tempdir().unwrap();
        let store_path = temp.path().join("new_store");

        assert!(!store_path.exists());

        let dir = StoreDir::open(&store_path).unwrap();
        assert!(store_path.is_dir());

        drop(dir);
    }

    #[test]
    fn lock_prevents_second_open() {
        let temp = tempdir().unwrap();
        let store_path = temp.path().join("locked_store");

        let _dir1 = StoreDir::open(&store_path).unwrap();

        let result = StoreDir::open(&store_path);
        assert!(matches!(result, Err(CoreError::StoreLocked)));
    }

    #[test]
    fn lock_released_on_drop() {
        let temp = tempdir().unwrap();
        let store_path = temp.path().join("reopen_store");

        {
            let _dir = StoreDir::open(&store_path).unwrap();
        }

        let _dir2 = StoreDir::open(&store_path).unwrap();
    }

    #[test]
    fn collection_paths() {
        let temp = tempdir().unwrap();
        let store_path = temp.path().join("paths_store");

        let dir = StoreDir::open(&store_path).unwrap();
        assert_eq!(
            dir.collection_path("contratos"),
            store_path.join("contratos.dat")
        );
    }

    #[test]
    fn open_rejects_file_path() {
        let temp = tempdir().unwrap();
        let file_path = temp.path().join("not_a_dir");
        std::fs::write(&file_path, b"x").unwrap();

        assert!(StoreDir::open(&file_path).is_err());
    }
}
