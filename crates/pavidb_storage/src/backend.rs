//! Storage backend trait definition.

use crate::error::StorageResult;

/// A low-level snapshot store for PavIDB.
///
/// Storage backends are **opaque byte stores**. Each backend holds the
/// serialized snapshot of exactly one collection; PavIDB core owns all
/// format interpretation - backends do not understand records, entities,
/// or sync metadata.
///
/// # Invariants
///
/// - `read` returns exactly the bytes of the last successful `write`,
///   or `None` if nothing has been written yet
/// - `write` replaces the snapshot atomically: a crash mid-write leaves
///   either the old snapshot or the new one, never a mix
/// - `sync` ensures the last written snapshot is durable
/// - Backends must be `Send + Sync`
///
/// # Implementors
///
/// - [`super::MemoryBackend`] - For testing
/// - [`super::FileBackend`] - For persistent storage
pub trait StorageBackend: Send + Sync {
    /// Reads the current snapshot.
    ///
    /// Returns `None` if no snapshot has ever been written.
    ///
    /// # Errors
    ///
    /// Returns an error if an I/O error occurs.
    fn read(&self) -> StorageResult<Option<Vec<u8>>>;

    /// Replaces the snapshot with `data`.
    ///
    /// # Errors
    ///
    /// Returns an error if an I/O error occurs. On error the previous
    /// snapshot remains readable.
    fn write(&mut self, data: &[u8]) -> StorageResult<()>;

    /// Syncs the snapshot to durable storage.
    ///
    /// After this returns successfully, the last written snapshot is
    /// guaranteed to survive process termination.
    ///
    /// # Errors
    ///
    /// Returns an error if the sync operation fails.
    fn sync(&mut self) -> StorageResult<()>;

    /// Returns the size of the current snapshot in bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the size cannot be determined.
    fn size(&self) -> StorageResult<u64>;
}
