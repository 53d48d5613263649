//! Entity identity and sync metadata.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a record.
///
/// Entity IDs are UUIDs that are:
/// - Globally unique across devices (each device mints its own v4 ids)
/// - Immutable once assigned
/// - Serialized as their canonical string form in every interchange format
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(Uuid);

impl EntityId {
    /// Creates a new random entity ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an entity ID from a UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Parses an entity ID from its string form.
    ///
    /// Returns `None` if the string is not a valid UUID.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for EntityId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<EntityId> for Uuid {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// Sync metadata carried by every record.
///
/// The store stamps this on every write: `updated_at` is always reset,
/// `is_dirty` is set unless the write is explicitly marked as synced, and
/// `last_synced_at` is set only on synced writes. All fields are tolerated
/// as absent when deserializing foreign documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncMeta {
    /// True if locally modified and not yet confirmed synced.
    #[serde(rename = "isDirty", default)]
    pub is_dirty: bool,

    /// Set on every write.
    #[serde(
        rename = "updatedAt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,

    /// Set only when a write is explicitly marked as synced.
    #[serde(
        rename = "lastSyncedAt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_synced_at: Option<DateTime<Utc>>,
}

impl SyncMeta {
    /// Metadata for a freshly created, never-synced record.
    #[must_use]
    pub fn dirty() -> Self {
        Self {
            is_dirty: true,
            ..Self::default()
        }
    }
}

/// A typed record belonging to one of the store's collections.
///
/// Implementors map a Rust struct onto one named collection and expose
/// their identity and sync metadata. Serialization must produce a JSON
/// object whose `id` field is the record's entity ID string.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send {
    /// Name of the collection this entity type is stored in.
    const COLLECTION: &'static str;

    /// Returns the record's identity.
    fn id(&self) -> EntityId;

    /// Returns the record's sync metadata.
    fn sync(&self) -> &SyncMeta;

    /// Returns the record's sync metadata mutably.
    fn sync_mut(&mut self) -> &mut SyncMeta;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_unique() {
        let id1 = EntityId::new();
        let id2 = EntityId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn parse_roundtrip() {
        let id = EntityId::new();
        let parsed = EntityId::parse(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(EntityId::parse("not-a-uuid").is_none());
        assert!(EntityId::parse("").is_none());
    }

    #[test]
    fn serializes_as_string() {
        let id = EntityId::new();
        let json = serde_json::to_value(id).unwrap();
        assert_eq!(json, serde_json::Value::String(id.to_string()));
    }

    #[test]
    fn sync_meta_tolerates_absent_fields() {
        let meta: SyncMeta = serde_json::from_str("{}").unwrap();
        assert!(!meta.is_dirty);
        assert!(meta.updated_at.is_none());
        assert!(meta.last_synced_at.is_none());
    }

    #[test]
    fn sync_meta_dirty() {
        let meta = SyncMeta::dirty();
        assert!(meta.is_dirty);
        assert!(meta.updated_at.is_none());
    }
}
