//! The store engine: per-collection CRUD with sync-metadata stamping.

use crate::dir::StoreDir;
use crate::entity::{Entity, EntityId};
use crate::error::{CoreError, CoreResult};
use chrono::Utc;
use parking_lot::RwLock;
use pavidb_storage::{FileBackend, MemoryBackend, StorageBackend};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::{debug, warn};

/// The six record collections, in hierarchy-then-reference order.
pub const COLLECTIONS: [&str; 6] = [
    "contratos",
    "medicoes",
    "ruas",
    "trechos",
    "profissionais",
    "servicos",
];

/// One named collection: its records and the backend persisting them.
struct Collection {
    /// Records keyed by their `id` string. Values stay raw JSON so fields
    /// this build does not know about survive round trips untouched.
    records: BTreeMap<String, Value>,
    backend: Box<dyn StorageBackend>,
}

impl Collection {
    /// Loads a collection from its backend snapshot.
    fn load(name: &str, backend: Box<dyn StorageBackend>) -> CoreResult<Self> {
        let mut records = BTreeMap::new();

        if let Some(bytes) = backend.read()? {
            let loaded: Vec<Value> = ciborium::de::from_reader(bytes.as_slice())?;
            for record in loaded {
                match record.get("id").and_then(Value::as_str) {
                    Some(id) => {
                        records.insert(id.to_string(), record);
                    }
                    None => {
                        warn!(collection = name, "skipping stored record without id");
                    }
                }
            }
        }

        Ok(Self { records, backend })
    }

    /// Writes the current records back through the backend.
    fn persist(&mut self) -> CoreResult<()> {
        let snapshot: Vec<&Value> = self.records.values().collect();
        let mut buf = Vec::new();
        ciborium::ser::into_writer(&snapshot, &mut buf)?;
        self.backend.write(&buf)?;
        Ok(())
    }
}

/// The main store handle.
///
/// `Store` is the single entry point for reading and writing inspection
/// records. Every write stamps sync metadata (`updatedAt`, `isDirty`,
/// `lastSyncedAt`) and persists the affected collection snapshot before
/// returning; failures propagate to the caller, nothing is swallowed.
///
/// The store performs no business-key validation - callers are expected to
/// run the checks in [`crate::validate`] before saving.
///
/// # Opening a store
///
/// Use `Store::open()` for a persistent store (acquires an exclusive lock
/// on the directory) or `Store::open_in_memory()` for tests.
pub struct Store {
    /// Collections by name.
    inner: RwLock<HashMap<&'static str, Collection>>,
    /// Whether the store is open.
    is_open: RwLock<bool>,
    /// Store directory (holds the lock). None for in-memory stores.
    dir: Option<StoreDir>,
}

impl Store {
    /// Opens a store from a directory path.
    ///
    /// Creates the directory and empty collections if absent; reopening an
    /// existing directory loads the persisted snapshots. Safe to call on
    /// the same path any number of times (sequentially - the directory
    /// lock admits one live handle).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Another process has the store locked (`StoreLocked`)
    /// - A collection snapshot cannot be read or decoded
    /// - I/O errors occur
    pub fn open(path: &Path) -> CoreResult<Self> {
        let dir = StoreDir::open(path)?;

        let mut collections = HashMap::new();
        for name in COLLECTIONS {
            let backend = FileBackend::open(&dir.collection_path(name))?;
            collections.insert(name, Collection::load(name, Box::new(backend))?);
        }

        Ok(Self {
            inner: RwLock::new(collections),
            is_open: RwLock::new(true),
            dir: Some(dir),
        })
    }

    /// Opens a fresh in-memory store for testing.
    ///
    /// Data is lost when the store is dropped.
    pub fn open_in_memory() -> CoreResult<Self> {
        Self::open_with_backends(|_| Box::new(MemoryBackend::new()))
    }

    /// Opens a store over caller-supplied backends, one per collection.
    ///
    /// `backend_for` is invoked once per collection name. The store takes
    /// no directory lock; callers wanting persistence with locking use
    /// [`Store::open`]. Mainly useful for tests that need to observe or
    /// fault-inject the persistence layer.
    pub fn open_with_backends<F>(mut backend_for: F) -> CoreResult<Self>
    where
        F: FnMut(&str) -> Box<dyn StorageBackend>,
    {
        let mut collections = HashMap::new();
        for name in COLLECTIONS {
            collections.insert(name, Collection::load(name, backend_for(name))?);
        }

        Ok(Self {
            inner: RwLock::new(collections),
            is_open: RwLock::new(true),
            dir: None,
        })
    }

    /// Returns the store directory path, if persistent.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.dir.as_ref().map(StoreDir::path)
    }

    /// Upserts a typed record.
    ///
    /// Stamps `updatedAt = now` and `isDirty = !mark_synced`; when
    /// `mark_synced` is set, also stamps `lastSyncedAt = now`. A record
    /// sharing the id is overwritten - create and edit are the same
    /// operation. Returns the record as stored.
    pub fn save<T: Entity>(&self, record: &T, mark_synced: bool) -> CoreResult<T> {
        let value = serde_json::to_value(record)?;
        let stored = self.save_raw(T::COLLECTION, value, mark_synced)?;
        Ok(serde_json::from_value(stored)?)
    }

    /// Upserts a raw record into a named collection.
    ///
    /// Same stamping as [`Store::save`]. The record must be a JSON object
    /// with a string `id` field. Returns the record as stored.
    pub fn save_raw(
        &self,
        collection: &str,
        mut record: Value,
        mark_synced: bool,
    ) -> CoreResult<Value> {
        self.ensure_open()?;

        let obj = record
            .as_object_mut()
            .ok_or_else(|| CoreError::invalid_record("record is not a JSON object"))?;
        let id = obj
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| CoreError::invalid_record("record has no string id"))?
            .to_string();

        let now = serde_json::to_value(Utc::now())?;
        obj.insert("isDirty".into(), Value::Bool(!mark_synced));
        obj.insert("updatedAt".into(), now.clone());
        if mark_synced {
            obj.insert("lastSyncedAt".into(), now);
        }

        let mut inner = self.inner.write();
        let col = Self::collection_mut(&mut inner, collection)?;
        let previous = col.records.insert(id.clone(), record.clone());
        if let Err(err) = col.persist() {
            // keep memory and disk in step: undo the insert
            match previous {
                Some(prev) => {
                    col.records.insert(id.clone(), prev);
                }
                None => {
                    col.records.remove(&id);
                }
            }
            return Err(err);
        }

        debug!(collection, id = %id, mark_synced, "saved record");
        Ok(record)
    }

    /// Point lookup of a typed record.
    pub fn get<T: Entity>(&self, id: EntityId) -> CoreResult<Option<T>> {
        match self.get_raw(T::COLLECTION, &id.to_string())? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Point lookup of a raw record.
    pub fn get_raw(&self, collection: &str, id: &str) -> CoreResult<Option<Value>> {
        self.ensure_open()?;
        let inner = self.inner.read();
        let col = Self::collection_ref(&inner, collection)?;
        Ok(col.records.get(id).cloned())
    }

    /// Returns every typed record in the entity's collection.
    ///
    /// Ordering is an implementation detail; callers must not depend on it.
    pub fn get_all<T: Entity>(&self) -> CoreResult<Vec<T>> {
        self.get_all_raw(T::COLLECTION)?
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(CoreError::from))
            .collect()
    }

    /// Returns every raw record in a collection.
    pub fn get_all_raw(&self, collection: &str) -> CoreResult<Vec<Value>> {
        self.ensure_open()?;
        let inner = self.inner.read();
        let col = Self::collection_ref(&inner, collection)?;
        Ok(col.records.values().cloned().collect())
    }

    /// Returns every typed record with `isDirty == true`.
    pub fn get_dirty<T: Entity>(&self) -> CoreResult<Vec<T>> {
        self.get_dirty_raw(T::COLLECTION)?
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(CoreError::from))
            .collect()
    }

    /// Returns every raw record with `isDirty == true`.
    pub fn get_dirty_raw(&self, collection: &str) -> CoreResult<Vec<Value>> {
        Ok(self
            .get_all_raw(collection)?
            .into_iter()
            .filter(|v| v.get("isDirty").and_then(Value::as_bool) == Some(true))
            .collect())
    }

    /// Deletes a typed record by id. Absence is not an error.
    pub fn delete<T: Entity>(&self, id: EntityId) -> CoreResult<()> {
        self.delete_raw(T::COLLECTION, &id.to_string())
    }

    /// Deletes a raw record by id. Absence is not an error.
    pub fn delete_raw(&self, collection: &str, id: &str) -> CoreResult<()> {
        self.ensure_open()?;
        let mut inner = self.inner.write();
        let col = Self::collection_mut(&mut inner, collection)?;

        if let Some(previous) = col.records.remove(id) {
            if let Err(err) = col.persist() {
                col.records.insert(id.to_string(), previous);
                return Err(err);
            }
            debug!(collection, id, "deleted record");
        }
        Ok(())
    }

    /// Returns the number of records in a collection.
    pub fn count(&self, collection: &str) -> CoreResult<usize> {
        self.ensure_open()?;
        let inner = self.inner.read();
        Ok(Self::collection_ref(&inner, collection)?.records.len())
    }

    /// Returns the number of dirty records in a collection.
    pub fn dirty_count(&self, collection: &str) -> CoreResult<usize> {
        Ok(self.get_dirty_raw(collection)?.len())
    }

    /// Closes the store.
    ///
    /// Every mutation persists eagerly, so closing only flushes backends
    /// and marks the handle unusable. Idempotent.
    pub fn close(&self) -> CoreResult<()> {
        let mut is_open = self.is_open.write();
        if !*is_open {
            return Ok(());
        }

        let mut inner = self.inner.write();
        for col in inner.values_mut() {
            col.backend.sync()?;
        }

        *is_open = false;
        Ok(())
    }

    /// Checks if the store is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        *self.is_open.read()
    }

    fn ensure_open(&self) -> CoreResult<()> {
        if *self.is_open.read() {
            Ok(())
        } else {
            Err(CoreError::StoreClosed)
        }
    }

    fn collection_ref<'a>(
        inner: &'a HashMap<&'static str, Collection>,
        name: &str,
    ) -> CoreResult<&'a Collection> {
        inner.get(name).ok_or_else(|| CoreError::UnknownCollection {
            name: name.to_string(),
        })
    }

    fn collection_mut<'a>(
        inner: &'a mut HashMap<&'static str, Collection>,
        name: &str,
    ) -> CoreResult<&'a mut Collection> {
        inner
            .get_mut(name)
            .ok_or_else(|| CoreError::UnknownCollection {
                name: name.to_string(),
            })
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("is_open", &self.is_open())
            .field("path", &self.path())
            .finish_non_exhaustive()
    }
}

impl Drop for Store {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
