//! Configuration types for CampusLink.
//!
//! The [`Config`] struct controls database behavior including:
//! - Cache size handed to the storage engine
//! - Durability of write transactions
//! - Per-profile facet limits
//!
//! # Example
//! ```rust
//! use campuslink::{Config, SyncMode};
//!
//! // Use defaults
//! let config = Config::default();
//!
//! // Customize for a bulk import
//! let config = Config {
//!     cache_size_mb: 128,
//!     sync_mode: SyncMode::Fast,
//!     ..Default::default()
//! };
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::storage::schema::{DEFAULT_MAX_FACET_ENTRIES, FACET_ENTRIES_CEILING};

/// Database configuration options.
///
/// All fields have sensible defaults. Use struct update syntax to override
/// specific settings:
///
/// ```rust
/// use campuslink::Config;
///
/// let config = Config {
///     cache_size_mb: 256,
///     ..Default::default()
/// };
/// ```
#[derive(Clone, Debug)]
pub struct Config {
    /// Cache size in megabytes for the storage engine.
    ///
    /// Default: 64 MB
    pub cache_size_mb: usize,

    /// Durability mode for write operations.
    pub sync_mode: SyncMode,

    /// Maximum number of entries in each facet list (skills, hobbies,
    /// interests) of a single profile.
    ///
    /// Default: 50
    pub max_facet_entries: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_size_mb: 64,
            sync_mode: SyncMode::Normal,
            max_facet_entries: DEFAULT_MAX_FACET_ENTRIES,
        }
    }
}

impl Config {
    /// Creates a new Config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the configuration.
    ///
    /// Called automatically by `CampusDB::open()`.
    ///
    /// # Errors
    /// Returns `ValidationError` if:
    /// - `cache_size_mb` is 0
    /// - `max_facet_entries` is 0 or above the hard ceiling
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.cache_size_mb == 0 {
            return Err(ValidationError::invalid_field(
                "cache_size_mb",
                "must be greater than 0",
            ));
        }

        if self.max_facet_entries == 0 {
            return Err(ValidationError::invalid_field(
                "max_facet_entries",
                "must be greater than 0",
            ));
        }
        if self.max_facet_entries > FACET_ENTRIES_CEILING {
            return Err(ValidationError::invalid_field(
                "max_facet_entries",
                format!("must not exceed {}", FACET_ENTRIES_CEILING),
            ));
        }

        Ok(())
    }

    /// Returns the cache size in bytes.
    pub fn cache_size_bytes(&self) -> usize {
        self.cache_size_mb.saturating_mul(1024 * 1024)
    }
}

/// Durability mode for write operations.
///
/// Controls the trade-off between write performance and crash safety.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncMode {
    /// Sync to disk on transaction commit.
    #[default]
    Normal,

    /// Async sync (faster writes, may lose recent data on crash).
    ///
    /// Suitable for seeding a directory from a fixture.
    Fast,

    /// Sync on commit with two-phase commit enabled.
    Paranoid,
}

impl SyncMode {
    /// Returns true if this mode uses two-phase commit.
    pub fn is_paranoid(&self) -> bool {
        matches!(self, Self::Paranoid)
    }

    /// Returns true if this mode is async (may lose data on crash).
    pub fn is_fast(&self) -> bool {
        matches!(self, Self::Fast)
    }
}
