//! Storage layer abstractions for CampusLink.
//!
//! This module provides a trait-based abstraction over the storage engine.
//! The facade and the search engine only ever talk to `dyn StorageEngine`,
//! so a different backend (for instance a networked database) can be
//! dropped in without touching them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      CampusDB                                │
//! │                     │         │                              │
//! │                     │         ▼                              │
//! │                     │   search_profiles()                    │
//! │                     ▼         │                              │
//! │              ┌─────────────────────┐                        │
//! │              │   StorageEngine     │  ← Trait               │
//! │              └─────────────────────┘                        │
//! │                         ▲                                    │
//! │                 ┌───────┴───────┐                            │
//! │                 │  RedbStorage  │  file or in-memory backend │
//! │                 └───────────────┘                            │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod redb;
pub mod schema;

pub use self::redb::RedbStorage;
pub use schema::{DatabaseMetadata, SCHEMA_VERSION};

use std::collections::BTreeSet;
use std::path::Path;

use crate::config::Config;
use crate::error::Result;
use crate::profile::{NewUserProfile, ProfileUpdate, UserProfile};
use crate::report::{Report, ReportStatus};
use crate::types::{ReportId, Timestamp, UserId};

/// Storage engine trait for CampusLink.
///
/// Every method is one request/response round trip against the backend:
/// it opens and commits (or drops) its own transaction.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow the database to be shared
/// across threads. The engine handles internal synchronization.
pub trait StorageEngine: Send + Sync {
    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Returns the database metadata.
    fn metadata(&self) -> &DatabaseMetadata;

    /// Closes the storage engine, flushing any pending writes.
    ///
    /// This method consumes the storage engine.
    fn close(self: Box<Self>) -> Result<()>;

    /// Returns the path to the database file, if applicable.
    ///
    /// In-memory engines have no path.
    fn path(&self) -> Option<&Path>;

    // =========================================================================
    // Profile Storage Operations
    // =========================================================================

    /// Inserts a new profile and returns the stored record.
    ///
    /// Assigns a fresh id when `new.id` is `None`. The id check, id
    /// allocation and insert happen in one write transaction.
    ///
    /// # Errors
    ///
    /// Returns `CampusError::DuplicateIdentity` if `new.id` is already taken.
    fn insert_profile(&self, new: &NewUserProfile, now: Timestamp) -> Result<UserProfile>;

    /// Retrieves a profile by id. Returns `None` if absent.
    fn get_profile(&self, id: UserId) -> Result<Option<UserProfile>>;

    /// Lists every profile in insertion order.
    fn list_profiles(&self) -> Result<Vec<UserProfile>>;

    /// Counts stored profiles.
    fn count_profiles(&self) -> Result<u64>;

    /// Applies an update to a stored profile.
    ///
    /// Returns the updated record, or `None` if the profile doesn't exist.
    fn update_profile(
        &self,
        id: UserId,
        update: &ProfileUpdate,
        now: Timestamp,
    ) -> Result<Option<UserProfile>>;

    /// Deletes a profile together with its order entry and every
    /// connection from or to it.
    ///
    /// Returns `true` if the profile existed.
    fn delete_profile(&self, id: UserId) -> Result<bool>;

    // =========================================================================
    // Connection Storage Operations
    // =========================================================================

    /// Stores the edge `viewer → target`.
    ///
    /// Returns `true` if the edge is new, `false` if it already existed.
    ///
    /// # Errors
    ///
    /// Returns `RelationshipError::UnknownTarget` if `target` has no
    /// profile. The check runs inside the insert transaction.
    fn save_connection(&self, viewer: UserId, target: UserId) -> Result<bool>;

    /// Deletes the edge `viewer → target`.
    ///
    /// Returns `true` if the edge existed.
    fn delete_connection(&self, viewer: UserId, target: UserId) -> Result<bool>;

    /// Returns every target the viewer is connected to.
    fn list_connections(&self, viewer: UserId) -> Result<BTreeSet<UserId>>;

    /// Returns `true` if the edge `viewer → target` exists.
    fn connection_exists(&self, viewer: UserId, target: UserId) -> Result<bool>;

    // =========================================================================
    // Report Storage Operations
    // =========================================================================

    /// Saves a report, overwriting any report with the same id.
    fn save_report(&self, report: &Report) -> Result<()>;

    /// Retrieves a report by id. Returns `None` if absent.
    fn get_report(&self, id: ReportId) -> Result<Option<Report>>;

    /// Lists every report ordered by id (filing order).
    fn list_reports(&self) -> Result<Vec<Report>>;

    /// Sets the status of a report.
    ///
    /// Returns `false` if no report with the given id exists.
    fn update_report_status(&self, id: ReportId, status: ReportStatus) -> Result<bool>;
}

/// Opens a file-backed storage engine at the given path.
///
/// # Errors
///
/// Returns an error if:
/// - The database file is corrupted
/// - The database is locked by another process
/// - Schema version doesn't match
pub fn open_storage(path: impl AsRef<Path>, config: &Config) -> Result<Box<dyn StorageEngine>> {
    let storage = RedbStorage::open(path, config)?;
    Ok(Box::new(storage))
}

/// Opens a fresh storage engine that lives entirely in memory.
///
/// Nothing survives `close()`.
pub fn open_in_memory_storage(config: &Config) -> Result<Box<dyn StorageEngine>> {
    let storage = RedbStorage::open_in_memory(config)?;
    Ok(Box::new(storage))
}
