//! Error types for CampusLink.
//!
//! CampusLink uses a hierarchical error system:
//! - `CampusError` is the top-level error returned by all public APIs
//! - Specific error types (`StorageError`, `ValidationError`,
//!   `RelationshipError`, `NotFoundError`) provide detail
//!
//! Every failure is local and recoverable. Callers distinguish "nothing
//! found" ([`CampusError::is_not_found`]) from "operation failed"
//! ([`CampusError::is_transient`]) by matching on the returned error.
//!
//! # Error Handling Pattern
//! ```rust,ignore
//! use campuslink::{CampusDB, Config, Result};
//!
//! fn example() -> Result<()> {
//!     let db = CampusDB::open("./campus.db", Config::default())?;
//!     // ... operations that may fail ...
//!     db.close()?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

use crate::types::UserId;

/// Result type alias for CampusLink operations.
pub type Result<T> = std::result::Result<T, CampusError>;

/// Top-level error enum for all CampusLink operations.
///
/// This is the only error type returned by public APIs.
/// Use pattern matching to handle specific error cases.
#[derive(Debug, Error)]
pub enum CampusError {
    /// Storage layer error (I/O, corruption, transactions). Retryable.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Input validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration error.
    #[error("Configuration error: {reason}")]
    Config {
        /// Description of what's wrong with the configuration.
        reason: String,
    },

    /// Requested entity not found.
    #[error("{0}")]
    NotFound(#[from] NotFoundError),

    /// A connection could not be added.
    #[error("Relationship error: {0}")]
    Relationship(#[from] RelationshipError),

    /// The caller supplied a profile id that is already taken.
    #[error("Duplicate identity: profile {0} already exists")]
    DuplicateIdentity(UserId),

    /// General I/O error. Retryable.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CampusError {
    /// Creates a configuration error with the given reason.
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Returns true if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns true if the configuration was rejected.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }

    /// Returns true if this is a validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is a storage error.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }

    /// Returns true if this is a relationship error.
    pub fn is_relationship(&self) -> bool {
        matches!(self, Self::Relationship(_))
    }

    /// Returns true if this is a duplicate identity error.
    pub fn is_duplicate_identity(&self) -> bool {
        matches!(self, Self::DuplicateIdentity(_))
    }

    /// Returns true if the failure came from the persistence layer.
    ///
    /// Transient failures are retryable I/O errors, not logical errors.
    /// Schema mismatches and corruption are reported as storage errors
    /// too, but retrying them will not help.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Io(_) => true,
            Self::Storage(err) => err.is_transient(),
            _ => false,
        }
    }
}

/// Storage-related errors.
///
/// These errors indicate problems with the underlying storage layer.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database file or data is corrupted.
    #[error("Database corrupted: {0}")]
    Corrupted(String),

    /// Database is locked by another process.
    #[error("Database is locked by another writer")]
    DatabaseLocked,

    /// Transaction failed (commit, rollback, etc.).
    #[error("Transaction failed: {0}")]
    Transaction(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Error from the redb storage engine.
    #[error("Storage engine error: {0}")]
    Redb(String),

    /// Database schema version doesn't match expected version.
    #[error("Schema version mismatch: expected {expected}, found {found}")]
    SchemaVersionMismatch {
        /// Expected schema version.
        expected: u32,
        /// Actual schema version found in database.
        found: u32,
    },
}

impl StorageError {
    /// Creates a corruption error with the given message.
    pub fn corrupted(msg: impl Into<String>) -> Self {
        Self::Corrupted(msg.into())
    }

    /// Creates a transaction error with the given message.
    pub fn transaction(msg: impl Into<String>) -> Self {
        Self::Transaction(msg.into())
    }

    /// Creates a serialization error with the given message.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Returns true if retrying the operation may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::DatabaseLocked | Self::Transaction(_) | Self::Redb(_)
        )
    }
}

// Conversions from redb error types
impl From<redb::Error> for StorageError {
    fn from(err: redb::Error) -> Self {
        StorageError::Redb(err.to_string())
    }
}

impl From<redb::DatabaseError> for StorageError {
    fn from(err: redb::DatabaseError) -> Self {
        StorageError::Redb(err.to_string())
    }
}

impl From<redb::TransactionError> for StorageError {
    fn from(err: redb::TransactionError) -> Self {
        StorageError::Transaction(err.to_string())
    }
}

impl From<redb::CommitError> for StorageError {
    fn from(err: redb::CommitError) -> Self {
        StorageError::Transaction(format!("Commit failed: {}", err))
    }
}

impl From<redb::TableError> for StorageError {
    fn from(err: redb::TableError) -> Self {
        StorageError::Redb(format!("Table error: {}", err))
    }
}

impl From<redb::StorageError> for StorageError {
    fn from(err: redb::StorageError) -> Self {
        StorageError::Redb(format!("Storage error: {}", err))
    }
}

impl From<bincode::Error> for StorageError {
    fn from(err: bincode::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

impl From<redb::Error> for CampusError {
    fn from(err: redb::Error) -> Self {
        CampusError::Storage(StorageError::from(err))
    }
}

impl From<redb::DatabaseError> for CampusError {
    fn from(err: redb::DatabaseError) -> Self {
        CampusError::Storage(StorageError::from(err))
    }
}

impl From<redb::TransactionError> for CampusError {
    fn from(err: redb::TransactionError) -> Self {
        CampusError::Storage(StorageError::from(err))
    }
}

impl From<redb::CommitError> for CampusError {
    fn from(err: redb::CommitError) -> Self {
        CampusError::Storage(StorageError::from(err))
    }
}

impl From<redb::TableError> for CampusError {
    fn from(err: redb::TableError) -> Self {
        CampusError::Storage(StorageError::from(err))
    }
}

impl From<redb::StorageError> for CampusError {
    fn from(err: redb::StorageError) -> Self {
        CampusError::Storage(StorageError::from(err))
    }
}

impl From<bincode::Error> for CampusError {
    fn from(err: bincode::Error) -> Self {
        CampusError::Storage(StorageError::from(err))
    }
}

/// Validation errors for input data.
///
/// These errors indicate problems with data provided by the caller.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A field has an invalid value.
    #[error("Invalid field '{field}': {reason}")]
    InvalidField {
        /// Name of the invalid field.
        field: String,
        /// Why the value is invalid.
        reason: String,
    },

    /// Content exceeds maximum allowed size.
    #[error("Content too large in '{field}': {size} bytes (max: {max} bytes)")]
    ContentTooLarge {
        /// Name of the field.
        field: String,
        /// Actual content size in bytes.
        size: usize,
        /// Maximum allowed size in bytes.
        max: usize,
    },

    /// A required field is missing or empty.
    #[error("Required field missing: {field}")]
    RequiredField {
        /// Name of the missing field.
        field: String,
    },

    /// Too many items in a collection field.
    #[error("Too many items in '{field}': {count} (max: {max})")]
    TooManyItems {
        /// Name of the field.
        field: String,
        /// Actual count.
        count: usize,
        /// Maximum allowed.
        max: usize,
    },

    /// A facet list holds two entries that are equal ignoring case.
    #[error("Duplicate value in '{field}': '{value}'")]
    DuplicateValue {
        /// Name of the facet field.
        field: String,
        /// The repeated value as written by the caller.
        value: String,
    },
}

impl ValidationError {
    /// Creates an invalid field error.
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a content too large error.
    pub fn content_too_large(field: impl Into<String>, size: usize, max: usize) -> Self {
        Self::ContentTooLarge {
            field: field.into(),
            size,
            max,
        }
    }

    /// Creates a required field error.
    pub fn required_field(field: impl Into<String>) -> Self {
        Self::RequiredField {
            field: field.into(),
        }
    }

    /// Creates a too many items error.
    pub fn too_many_items(field: impl Into<String>, count: usize, max: usize) -> Self {
        Self::TooManyItems {
            field: field.into(),
            count,
            max,
        }
    }

    /// Creates a duplicate value error.
    pub fn duplicate_value(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::DuplicateValue {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Reasons a connection cannot be added.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RelationshipError {
    /// The viewer tried to connect to themselves.
    #[error("Cannot connect profile {0} to itself")]
    SelfReference(UserId),

    /// The target profile does not exist.
    #[error("Unknown connection target: profile {0} does not exist")]
    UnknownTarget(UserId),
}

/// Not found errors for specific entity types.
#[derive(Debug, Error)]
pub enum NotFoundError {
    /// Profile with given ID not found.
    #[error("Profile not found: {0}")]
    Profile(String),

    /// Report with given ID not found.
    #[error("Report not found: {0}")]
    Report(String),
}

impl NotFoundError {
    /// Creates a profile not found error.
    pub fn profile(id: impl ToString) -> Self {
        Self::Profile(id.to_string())
    }

    /// Creates a report not found error.
    pub fn report(id: impl ToString) -> Self {
        Self::Report(id.to_string())
    }
}
