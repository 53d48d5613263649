//! In-memory storage backend for testing.

use crate::backend::StorageBackend;
use crate::error::StorageResult;
use parking_lot::RwLock;

/// An in-memory storage backend.
///
/// This backend keeps the snapshot in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral stores that don't need persistence
///
/// # Thread Safety
///
/// This backend is thread-safe and can be shared across threads.
///
/// # Example
///
/// ```rust
/// use pavidb_storage::{StorageBackend, MemoryBackend};
///
/// let mut backend = MemoryBackend::new();
/// assert!(backend.read().unwrap().is_none());
/// backend.write(b"test data").unwrap();
/// assert_eq!(backend.size().unwrap(), 9);
/// ```
#[derive(Debug, Default)]
pub struct MemoryBackend {
    data: RwLock<Option<Vec<u8>>>,
}

impl MemoryBackend {
    /// Creates a new empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an in-memory backend with a pre-existing snapshot.
    ///
    /// Useful for testing load scenarios.
    #[must_use]
    pub fn with_data(data: Vec<u8>) -> Self {
        Self {
            data: RwLock::new(Some(data)),
        }
    }

    /// Clears the snapshot.
    pub fn clear(&mut self) {
        *self.data.write() = None;
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.data.read().clone())
    }

    fn write(&mut self, data: &[u8]) -> StorageResult<()> {
        *self.data.write() = Some(data.to_vec());
        Ok(())
    }

    fn sync(&mut self) -> StorageResult<()> {
        // Nothing to sync for in-memory data
        Ok(())
    }

    fn size(&self) -> StorageResult<u64> {
        Ok(self.data.read().as_ref().map_or(0, |d| d.len() as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_new_is_empty() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.size().unwrap(), 0);
        assert!(backend.read().unwrap().is_none());
    }

    #[test]
    fn memory_write_then_read() {
        let mut backend = MemoryBackend::new();
        backend.write(b"hello").unwrap();
        assert_eq!(backend.read().unwrap().as_deref(), Some(&b"hello"[..]));
        assert_eq!(backend.size().unwrap(), 5);
    }

    #[test]
    fn memory_write_replaces_snapshot() {
        let mut backend = MemoryBackend::new();
        backend.write(b"first").unwrap();
        backend.write(b"second snapshot").unwrap();
        assert_eq!(
            backend.read().unwrap().as_deref(),
            Some(&b"second snapshot"[..])
        );
    }

    #[test]
    fn memory_with_data() {
        let backend = MemoryBackend::with_data(b"preloaded".to_vec());
        assert_eq!(backend.size().unwrap(), 9);
        assert_eq!(backend.read().unwrap().as_deref(), Some(&b"preloaded"[..]));
    }

    #[test]
    fn memory_empty_write() {
        let mut backend = MemoryBackend::new();
        backend.write(b"").unwrap();
        // An empty snapshot is still a snapshot
        assert_eq!(backend.read().unwrap().as_deref(), Some(&b""[..]));
        assert_eq!(backend.size().unwrap(), 0);
    }

    #[test]
    fn memory_clear() {
        let mut backend = MemoryBackend::new();
        backend.write(b"some data").unwrap();
        backend.clear();
        assert!(backend.read().unwrap().is_none());
    }

    #[test]
    fn memory_sync_succeeds() {
        let mut backend = MemoryBackend::new();
        backend.write(b"data").unwrap();
        assert!(backend.sync().is_ok());
    }
}
