//! # PavIDB Storage
//!
//! Snapshot storage backends for PavIDB.
//!
//! This crate provides the lowest-level storage abstraction for PavIDB.
//! Storage backends are **opaque byte stores** - each backend holds one
//! serialized collection snapshot and does not interpret its contents.
//!
//! ## Design Principles
//!
//! - Backends hold a single snapshot (read whole, replace whole)
//! - No knowledge of PavIDB record formats or collections
//! - Must be `Send + Sync`
//! - PavIDB core owns all format interpretation
//!
//! ## Available Backends
//!
//! - [`MemoryBackend`] - For testing and ephemeral stores
//! - [`FileBackend`] - For persistent storage using OS file APIs
//!
//! ## Example
//!
//! ```rust
//! use pavidb_storage::{StorageBackend, MemoryBackend};
//!
//! let mut backend = MemoryBackend::new();
//! backend.write(b"snapshot").unwrap();
//! assert_eq!(backend.read().unwrap().as_deref(), Some(&b"snapshot"[..]));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::StorageBackend;
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use memory::MemoryBackend;
