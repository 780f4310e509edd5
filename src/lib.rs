//! # CampusLink DB
//!
//! Embedded student-collaboration directory: profiles, collaborator
//! connections and faceted search, stored in a single redb file.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use campuslink::{CampusDB, Config, NewUserProfile, SearchCriteria, StudyYear};
//!
//! let db = CampusDB::open("./campus.db", Config::default())?;
//!
//! let rahul = db.create_profile(NewUserProfile {
//!     name: "Rahul Sharma".into(),
//!     course: "B.Tech CSE".into(),
//!     study_year: StudyYear::Third,
//!     skills: vec!["React".into(), "Node.js".into()],
//!     hobbies: vec!["Gaming".into(), "Hiking".into()],
//!     interests: vec!["Web Development".into(), "AI".into()],
//!     ..Default::default()
//! })?;
//!
//! let priya = db.create_profile(NewUserProfile {
//!     name: "Priya Patel".into(),
//!     course: "B.Des".into(),
//!     study_year: StudyYear::Second,
//!     skills: vec!["UI/UX".into(), "Figma".into()],
//!     ..Default::default()
//! })?;
//!
//! db.add_connection(rahul, priya)?;
//!
//! for hit in db.search_profiles(rahul, &SearchCriteria::query("figma"))? {
//!     println!("{} (connected: {})", hit.profile.name, hit.is_connected);
//! }
//!
//! db.close()?;
//! ```
//!
//! ## Key Concepts
//!
//! ### Profile
//!
//! A **profile** is one student's directory record: name, course, study year,
//! a bio and three facet lists (skills, hobbies, interests). Profiles are
//! listed in the order they were created.
//!
//! ### Connection
//!
//! A **connection** is a directed edge `viewer → target`. Every search result
//! carries an `is_connected` flag computed for the viewer.
//!
//! ### Search
//!
//! A free-text query matches names and facet entries by case-insensitive
//! substring; the study-year filter is exact; facet filters match whole
//! entries ignoring case. Active parts combine with AND.
//!
//! ## Thread Safety
//!
//! `CampusDB` is `Send + Sync` and can be shared across threads using `Arc`.
//! The database uses MVCC for concurrent reads with exclusive write locking.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_op_in_unsafe_fn)]

// ============================================================================
// Module declarations
// ============================================================================

mod config;
mod db;
mod error;
mod types;

pub mod storage;

// Domain modules
mod profile;
mod relationship;
mod report;
mod search;

// ============================================================================
// Public API re-exports
// ============================================================================

// Main database interface
pub use db::CampusDB;

// Configuration
pub use config::{Config, SyncMode};

// Error handling
pub use error::{
    CampusError, NotFoundError, RelationshipError, Result, StorageError, ValidationError,
};

// Core types
pub use types::{ReportId, Timestamp, UserId};

// Domain types
pub use profile::{FacetKind, NewUserProfile, ProfileUpdate, StudyYear, UserProfile};
pub use report::{NewReport, Report, ReportKind, ReportStatus};

// Search
pub use search::{FacetValues, SearchCriteria, SearchResult, ANY_FILTER};

// Storage (for advanced users)
pub use storage::DatabaseMetadata;

// ============================================================================
// Prelude module for convenient imports
// ============================================================================

/// Convenient imports for common CampusLink usage.
///
/// ```rust
/// use campuslink::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{Config, SyncMode};
    pub use crate::db::CampusDB;
    pub use crate::error::{CampusError, Result};
    pub use crate::profile::{FacetKind, NewUserProfile, ProfileUpdate, StudyYear, UserProfile};
    pub use crate::search::{SearchCriteria, SearchResult};
    pub use crate::types::{Timestamp, UserId};
}
