//! Database schema definitions and versioning.
//!
//! This module defines the table structure for the redb storage engine.
//! All table definitions are compile-time constants to ensure consistency.
//!
//! # Schema Versioning
//!
//! The schema version is stored in the metadata table. When opening an
//! existing database, we check the version and fail if it doesn't match.
//!
//! # Table Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │ METADATA_TABLE         &str -> &[u8] (bincode)              │
//! │   "db_metadata" -> DatabaseMetadata                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │ COUNTERS_TABLE         &str -> u64                          │
//! │   "next_user_id", "next_profile_seq"                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │ PROFILES_TABLE         u64 (UserId) -> &[u8] (bincode)      │
//! │ PROFILE_ORDER_TABLE    u64 (seq) -> u64 (UserId)            │
//! │ PROFILE_SEQ_TABLE      u64 (UserId) -> u64 (seq)            │
//! ├─────────────────────────────────────────────────────────────┤
//! │ CONNECTIONS_TABLE      multimap u64 (viewer) -> u64 (target)│
//! │ CONNECTIONS_BY_TARGET  multimap u64 (target) -> u64 (viewer)│
//! ├─────────────────────────────────────────────────────────────┤
//! │ REPORTS_TABLE          &[u8; 16] (ReportId) -> &[u8]        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Profile ids can be supplied by the caller, so id order is not insertion
//! order. `PROFILE_ORDER_TABLE` keys on a monotonically increasing
//! sequence number instead; `PROFILE_SEQ_TABLE` is its reverse index for
//! deletes.

use redb::{MultimapTableDefinition, TableDefinition};
use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// Current schema version.
///
/// Increment this when making breaking changes to the schema.
/// The database will refuse to open if versions don't match.
pub const SCHEMA_VERSION: u32 = 1;

/// Maximum display name length in bytes.
pub const MAX_NAME_LENGTH: usize = 100;

/// Maximum course length in bytes.
pub const MAX_COURSE_LENGTH: usize = 200;

/// Maximum bio size in bytes (10 KB).
pub const MAX_BIO_SIZE: usize = 10 * 1024;

/// Maximum length of a single facet entry in bytes.
pub const MAX_FACET_VALUE_LENGTH: usize = 100;

/// Default maximum number of entries per facet list.
pub const DEFAULT_MAX_FACET_ENTRIES: usize = 50;

/// Upper bound accepted for `Config::max_facet_entries`.
pub const FACET_ENTRIES_CEILING: usize = 500;

/// Maximum report reason size in bytes (1 KB).
pub const MAX_REPORT_REASON_SIZE: usize = 1024;

// ============================================================================
// Table Definitions
// ============================================================================

/// Metadata table for database-level information.
pub const METADATA_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("metadata");

/// Monotonic counters (id and sequence allocation).
pub const COUNTERS_TABLE: TableDefinition<&str, u64> = TableDefinition::new("counters");

/// Profiles table.
///
/// Key: UserId value
/// Value: bincode-serialized UserProfile
pub const PROFILES_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("profiles");

/// Index: insertion sequence -> UserId. Iterating it yields directory order.
pub const PROFILE_ORDER_TABLE: TableDefinition<u64, u64> = TableDefinition::new("profile_order");

/// Index: UserId -> insertion sequence.
pub const PROFILE_SEQ_TABLE: TableDefinition<u64, u64> = TableDefinition::new("profile_seq");

/// Connections, viewer -> targets.
///
/// A multimap stores each (key, value) pair at most once, which gives
/// idempotent adds for free.
pub const CONNECTIONS_TABLE: MultimapTableDefinition<u64, u64> =
    MultimapTableDefinition::new("connections");

/// Reverse connection index, target -> viewers. Used to drop incoming
/// edges when a profile is deleted.
pub const CONNECTIONS_BY_TARGET_TABLE: MultimapTableDefinition<u64, u64> =
    MultimapTableDefinition::new("connections_by_target");

/// Reports table.
///
/// Key: ReportId as 16-byte UUID (v7, so key order is filing order)
/// Value: bincode-serialized Report
pub const REPORTS_TABLE: TableDefinition<&[u8; 16], &[u8]> = TableDefinition::new("reports");

/// Counter key for the next store-assigned profile id.
pub const NEXT_USER_ID_KEY: &str = "next_user_id";

/// Counter key for the next profile insertion sequence number.
pub const NEXT_PROFILE_SEQ_KEY: &str = "next_profile_seq";

// ============================================================================
// Database Metadata
// ============================================================================

/// Database metadata stored in the metadata table.
///
/// This is serialized with bincode and stored under the key "db_metadata".
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DatabaseMetadata {
    /// Schema version for compatibility checking.
    pub schema_version: u32,

    /// Timestamp when the database was created.
    pub created_at: Timestamp,

    /// Last time the database was opened (updated on each open).
    pub last_opened_at: Timestamp,
}

impl DatabaseMetadata {
    /// Creates new metadata for a fresh database.
    pub fn new() -> Self {
        let now = Timestamp::now();
        Self {
            schema_version: SCHEMA_VERSION,
            created_at: now,
            last_opened_at: now,
        }
    }

    /// Updates the last_opened_at timestamp.
    pub fn touch(&mut self) {
        self.last_opened_at = Timestamp::now();
    }

    /// Checks if this metadata is compatible with the current schema.
    pub fn is_compatible(&self) -> bool {
        self.schema_version == SCHEMA_VERSION
    }
}

impl Default for DatabaseMetadata {
    fn default() -> Self {
        Self::new()
    }
}
