//! CampusDB main struct and lifecycle operations.
//!
//! The [`CampusDB`] struct is the primary interface for interacting with
//! the directory. It provides methods for:
//!
//! - Opening and closing the database
//! - Creating, editing and deleting student profiles
//! - Managing collaborator connections
//! - Searching and filtering the directory
//! - Filing and moderating reports
//!
//! # Quick Start
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
//!     ..Default::default()
//! })?;
//!
//! let hits = db.search_profiles(rahul, &SearchCriteria::query("react"))?;
//!
//! db.close()?;
//! ```
//!
//! # Thread Safety
//!
//! `CampusDB` is `Send + Sync` and can be shared across threads using `Arc`.
//! The underlying storage uses MVCC for concurrent reads with exclusive
//! write locking, so concurrent writes resolve last-writer-wins.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use campuslink::CampusDB;
//!
//! let db = Arc::new(CampusDB::open("./campus.db", Config::default())?);
//!
//! let db_clone = Arc::clone(&db);
//! std::thread::spawn(move || {
//!     let _ = db_clone.list_profiles();
//! });
//! ```

use std::collections::BTreeSet;
use std::path::Path;

use tracing::{debug, info, instrument};

use crate::config::Config;
use crate::error::{CampusError, NotFoundError, Result};
use crate::profile::{
    facet_with_value, facet_without_value, validate_new_profile, validate_profile_update,
    FacetKind, NewUserProfile, ProfileUpdate, UserProfile,
};
use crate::relationship::validate_new_connection;
use crate::report::{
    validate_new_report, validate_status_change, NewReport, Report, ReportStatus,
};
use crate::search::{self, FacetValues, SearchCriteria, SearchResult};
use crate::storage::{open_in_memory_storage, open_storage, DatabaseMetadata, StorageEngine};
use crate::types::{ReportId, Timestamp, UserId};

/// The main CampusDB database handle.
///
/// This is the primary interface for all directory operations. Create an
/// instance with [`CampusDB::open()`] or [`CampusDB::open_in_memory()`] and
/// close it with [`CampusDB::close()`].
///
/// # Ownership
///
/// `CampusDB` owns its storage. When you call `close()`, the database is
/// consumed and cannot be used afterward.
pub struct CampusDB {
    /// Storage engine.
    storage: Box<dyn StorageEngine>,

    /// Configuration used to open this database.
    config: Config,
}

impl std::fmt::Debug for CampusDB {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CampusDB")
            .field("config", &self.config)
            .field("path", &self.storage.path())
            .finish_non_exhaustive()
    }
}

impl CampusDB {
    /// Opens or creates a CampusDB database at the specified path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration is invalid (see [`Config::validate`])
    /// - Database file is corrupted
    /// - Database is locked by another process
    /// - Schema version doesn't match (needs migration)
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use campuslink::{CampusDB, Config, SyncMode};
    ///
    /// let db = CampusDB::open("./campus.db", Config {
    ///     sync_mode: SyncMode::Fast,
    ///     ..Default::default()
    /// })?;
    /// ```
    #[instrument(skip(config), fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>, config: Config) -> Result<Self> {
        config
            .validate()
            .map_err(|e| CampusError::config(e.to_string()))?;

        info!("Opening CampusDB");

        let storage = open_storage(&path, &config)?;

        info!(sync_mode = ?config.sync_mode, "CampusDB opened successfully");

        Ok(Self { storage, config })
    }

    /// Creates a fresh database held entirely in memory.
    ///
    /// Useful for tests and throwaway sessions. Nothing survives `close()`.
    #[instrument(skip(config))]
    pub fn open_in_memory(config: Config) -> Result<Self> {
        config
            .validate()
            .map_err(|e| CampusError::config(e.to_string()))?;

        let storage = open_in_memory_storage(&config)?;

        info!("In-memory CampusDB opened");
        Ok(Self { storage, config })
    }

    /// Closes the database, flushing all pending writes.
    ///
    /// This method consumes the `CampusDB` instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend reports a flush failure.
    #[instrument(skip(self))]
    pub fn close(self) -> Result<()> {
        info!("Closing CampusDB");

        self.storage.close()?;

        info!("CampusDB closed successfully");
        Ok(())
    }

    /// Returns a reference to the database configuration.
    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the database metadata (schema version and timestamps).
    #[inline]
    pub fn metadata(&self) -> &DatabaseMetadata {
        self.storage.metadata()
    }

    /// Returns the storage engine, for integration tests that poke at
    /// storage directly.
    #[doc(hidden)]
    #[inline]
    pub fn storage_for_test(&self) -> &dyn StorageEngine {
        self.storage.as_ref()
    }

    // =========================================================================
    // Profile Management
    // =========================================================================

    /// Creates a new profile and returns its id.
    ///
    /// The store assigns the id unless `new.id` is set.
    ///
    /// # Errors
    ///
    /// - [`ValidationError`](crate::ValidationError) for blank names, oversized
    ///   fields or duplicate facet entries
    /// - [`CampusError::DuplicateIdentity`] if `new.id` is already taken
    #[instrument(skip(self, new), fields(name = %new.name))]
    pub fn create_profile(&self, new: NewUserProfile) -> Result<UserId> {
        validate_new_profile(&new, self.config.max_facet_entries)?;

        let profile = self.storage.insert_profile(&new, Timestamp::now())?;

        info!(id = %profile.id, "Profile created");
        Ok(profile.id)
    }

    /// Returns the profile with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError::Profile`] if no such profile exists.
    pub fn get_profile(&self, id: UserId) -> Result<UserProfile> {
        self.storage
            .get_profile(id)?
            .ok_or_else(|| NotFoundError::profile(id).into())
    }

    /// Lists every profile in directory (insertion) order.
    pub fn list_profiles(&self) -> Result<Vec<UserProfile>> {
        self.storage.list_profiles()
    }

    /// Returns the number of profiles in the directory.
    pub fn profile_count(&self) -> Result<u64> {
        self.storage.count_profiles()
    }

    /// Applies a partial update and returns the updated profile.
    ///
    /// Facet fields that are `Some` replace the whole list.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use campuslink::{FacetKind, ProfileUpdate};
    ///
    /// db.update_profile(id, ProfileUpdate {
    ///     bio: Some("Full-stack, mostly React".into()),
    ///     ..ProfileUpdate::facet(FacetKind::Skill, vec!["React".into()])
    /// })?;
    /// ```
    #[instrument(skip(self, update))]
    pub fn update_profile(&self, id: UserId, update: ProfileUpdate) -> Result<UserProfile> {
        validate_profile_update(&update, self.config.max_facet_entries)?;

        let profile = self
            .storage
            .update_profile(id, &update, Timestamp::now())?
            .ok_or_else(|| CampusError::from(NotFoundError::profile(id)))?;

        info!(id = %id, "Profile updated");
        Ok(profile)
    }

    /// Adds one entry to a facet of a profile and returns the profile.
    ///
    /// The value is trimmed. Adding an empty value, or one already present
    /// ignoring case, leaves the profile unchanged.
    #[instrument(skip(self, value))]
    pub fn add_facet_value(&self, id: UserId, kind: FacetKind, value: &str) -> Result<UserProfile> {
        let profile = self.get_profile(id)?;

        match facet_with_value(&profile, kind, value) {
            Some(values) => self.update_profile(id, ProfileUpdate::facet(kind, values)),
            None => {
                debug!(id = %id, "Facet value already present or empty");
                Ok(profile)
            }
        }
    }

    /// Removes one entry (matched ignoring case) from a facet of a profile
    /// and returns the profile. Removing an absent value is a no-op.
    #[instrument(skip(self, value))]
    pub fn remove_facet_value(
        &self,
        id: UserId,
        kind: FacetKind,
        value: &str,
    ) -> Result<UserProfile> {
        let profile = self.get_profile(id)?;

        match facet_without_value(&profile, kind, value) {
            Some(values) => self.update_profile(id, ProfileUpdate::facet(kind, values)),
            None => Ok(profile),
        }
    }

    /// Deletes a profile and every connection from or to it.
    ///
    /// Returns `true` if the profile existed.
    #[instrument(skip(self))]
    pub fn delete_profile(&self, id: UserId) -> Result<bool> {
        let existed = self.storage.delete_profile(id)?;
        if existed {
            info!(id = %id, "Profile deleted");
        }
        Ok(existed)
    }

    // =========================================================================
    // Connections
    // =========================================================================

    /// Adds the edge `viewer → target`. Adding an existing edge succeeds
    /// without creating a duplicate.
    ///
    /// # Errors
    ///
    /// - [`RelationshipError::SelfReference`](crate::RelationshipError::SelfReference)
    ///   if `viewer == target`
    /// - [`RelationshipError::UnknownTarget`](crate::RelationshipError::UnknownTarget)
    ///   if `target` has no profile
    #[instrument(skip(self))]
    pub fn add_connection(&self, viewer: UserId, target: UserId) -> Result<()> {
        validate_new_connection(viewer, target)?;

        if self.storage.save_connection(viewer, target)? {
            info!(viewer = %viewer, target = %target, "Connection added");
        }
        Ok(())
    }

    /// Removes the edge `viewer → target`. Removing an absent edge succeeds.
    #[instrument(skip(self))]
    pub fn remove_connection(&self, viewer: UserId, target: UserId) -> Result<()> {
        if self.storage.delete_connection(viewer, target)? {
            info!(viewer = %viewer, target = %target, "Connection removed");
        }
        Ok(())
    }

    /// Returns the ids the viewer is connected to.
    pub fn list_connections(&self, viewer: UserId) -> Result<BTreeSet<UserId>> {
        self.storage.list_connections(viewer)
    }

    /// Returns `true` if the edge `viewer → target` exists.
    pub fn is_connected(&self, viewer: UserId, target: UserId) -> Result<bool> {
        self.storage.connection_exists(viewer, target)
    }

    /// Returns the profiles the viewer is connected to, in directory order.
    pub fn get_connected_profiles(&self, viewer: UserId) -> Result<Vec<UserProfile>> {
        let connections = self.storage.list_connections(viewer)?;
        if connections.is_empty() {
            return Ok(Vec::new());
        }

        let profiles = self.storage.list_profiles()?;
        Ok(profiles
            .into_iter()
            .filter(|p| connections.contains(&p.id))
            .collect())
    }

    /// Returns one profile annotated with whether the viewer is connected
    /// to it.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError::Profile`] if no such profile exists.
    pub fn get_profile_for(&self, viewer: UserId, id: UserId) -> Result<SearchResult> {
        let profile = self.get_profile(id)?;
        let is_connected = self.storage.connection_exists(viewer, id)?;
        Ok(SearchResult {
            profile,
            is_connected,
        })
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Searches the directory on behalf of `viewer`.
    ///
    /// Returns matching profiles in directory order, each flagged with
    /// whether the viewer is connected to it. See [`SearchCriteria`] for the
    /// matching rules.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use campuslink::{SearchCriteria, StudyYear};
    ///
    /// let third_years_doing_react = db.search_profiles(
    ///     viewer,
    ///     &SearchCriteria::default()
    ///         .with_study_year(StudyYear::Third)
    ///         .with_skill("react"),
    /// )?;
    /// ```
    pub fn search_profiles(
        &self,
        viewer: UserId,
        criteria: &SearchCriteria,
    ) -> Result<Vec<SearchResult>> {
        search::search_profiles(self.storage.as_ref(), viewer, criteria)
    }

    /// Returns the distinct skill, hobby and interest values in the
    /// directory, for populating filter drop-downs.
    pub fn facet_values(&self) -> Result<FacetValues> {
        search::facet_values(self.storage.as_ref())
    }

    // =========================================================================
    // Reports
    // =========================================================================

    /// Files a report and returns its id. New reports are `Pending`.
    ///
    /// The reported target is not checked: message ids belong to the
    /// messaging service.
    #[instrument(skip(self, report), fields(kind = ?report.kind, target = report.target_id))]
    pub fn submit_report(&self, report: NewReport) -> Result<ReportId> {
        validate_new_report(&report)?;

        let report = Report::from_new(report, Timestamp::now());
        self.storage.save_report(&report)?;

        info!(id = %report.id, "Report submitted");
        Ok(report.id)
    }

    /// Returns the report with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError::Report`] if no such report exists.
    pub fn get_report(&self, id: ReportId) -> Result<Report> {
        self.storage
            .get_report(id)?
            .ok_or_else(|| NotFoundError::report(id).into())
    }

    /// Lists every report in filing order.
    pub fn list_reports(&self) -> Result<Vec<Report>> {
        self.storage.list_reports()
    }

    /// Moves a report to `Reviewed` or `Resolved`.
    ///
    /// # Errors
    ///
    /// - [`ValidationError`](crate::ValidationError) if `status` is `Pending`
    /// - [`NotFoundError::Report`] if no such report exists
    #[instrument(skip(self))]
    pub fn update_report_status(&self, id: ReportId, status: ReportStatus) -> Result<()> {
        validate_status_change(status)?;

        if !self.storage.update_report_status(id, status)? {
            return Err(NotFoundError::report(id).into());
        }

        info!(id = %id, status = ?status, "Report status updated");
        Ok(())
    }
}

// CampusDB is auto Send + Sync: Box<dyn StorageEngine> (Send + Sync
// supertraits) and Config are both Send + Sync.
