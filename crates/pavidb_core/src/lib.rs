//! # PavIDB Core
//!
//! Offline persistence core for a municipal pavement-works field-inspection
//! tool.
//!
//! This crate provides:
//! - A typed entity model for the inspection hierarchy
//!   (contract → measurement → street → segment/service, plus professionals)
//! - The [`Store`] engine: per-collection CRUD with mandatory sync-metadata
//!   stamping over snapshot storage backends
//! - Cascade deletion across the ownership hierarchy
//! - Read-time dirty/pending-sync aggregation
//! - Full-database export/import with contract-number conflict resolution
//!
//! ## Opening a store
//!
//! ```rust,ignore
//! use pavidb_core::{Store, model::Contract};
//!
//! let store = Store::open(std::path::Path::new("inspection_db"))?;
//! let contract = store.save(&Contract::new("042/2024"), false)?;
//! assert!(contract.sync.is_dirty);
//! store.close()?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod backup;
pub mod cascade;
mod dir;
mod entity;
mod error;
pub mod model;
mod store;
pub mod sync;
pub mod validate;

pub use entity::{Entity, EntityId, SyncMeta};
pub use error::{CoreError, CoreResult};
pub use store::{Store, COLLECTIONS};

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
