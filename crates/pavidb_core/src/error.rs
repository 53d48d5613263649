//! Error types for PavIDB core.

use std::io;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in PavIDB core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] pavidb_storage::StorageError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CBOR snapshot codec error.
    #[error("codec error: {message}")]
    Codec {
        /// Description of the codec failure.
        message: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Store directory is already open in another process.
    #[error("store locked: another process has exclusive access")]
    StoreLocked,

    /// Store is closed.
    #[error("store is closed")]
    StoreClosed,

    /// Unknown collection name.
    #[error("unknown collection: {name}")]
    UnknownCollection {
        /// Name of the collection.
        name: String,
    },

    /// A record is structurally invalid.
    #[error("invalid record: {message}")]
    InvalidRecord {
        /// Description of the problem.
        message: String,
    },

    /// A required field is empty or missing.
    #[error("required field is empty: {field}")]
    RequiredField {
        /// Name of the field.
        field: &'static str,
    },

    /// A contract number collides with an existing one.
    #[error("duplicate contract number: {number}")]
    DuplicateContractNumber {
        /// The colliding number as entered.
        number: String,
    },

    /// A measurement number collides within the same contract.
    #[error("duplicate measurement number within contract: {number}")]
    DuplicateMeasurementNumber {
        /// The colliding number as entered.
        number: String,
    },

    /// An import document is not a valid backup.
    #[error("invalid backup document: {message}")]
    InvalidBackup {
        /// Description of the problem.
        message: String,
    },

    /// An import cannot commit while conflicts remain unresolved.
    #[error("import has {count} unresolved contract conflict(s)")]
    UnresolvedConflicts {
        /// Number of conflicts without a resolution.
        count: usize,
    },

    /// Operation not permitted in current state.
    #[error("invalid operation: {message}")]
    InvalidOperation {
        /// Description of why the operation is invalid.
        message: String,
    },
}

impl CoreError {
    /// Creates a codec error.
    pub fn codec(message: impl Into<String>) -> Self {
        Self::Codec {
            message: message.into(),
        }
    }

    /// Creates an invalid record error.
    pub fn invalid_record(message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            message: message.into(),
        }
    }

    /// Creates an invalid backup error.
    pub fn invalid_backup(message: impl Into<String>) -> Self {
        Self::InvalidBackup {
            message: message.into(),
        }
    }

    /// Creates an invalid operation error.
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }
}

impl From<ciborium::de::Error<io::Error>> for CoreError {
    fn from(err: ciborium::de::Error<io::Error>) -> Self {
        Self::codec(err.to_string())
    }
}

impl From<ciborium::ser::Error<io::Error>> for CoreError {
    fn from(err: ciborium::ser::Error<io::Error>) -> Self {
        Self::codec(err.to_string())
    }
}
