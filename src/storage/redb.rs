//! redb storage engine implementation.
//!
//! This module provides the storage backend for CampusLink using
//! [redb](https://docs.rs/redb), a pure Rust embedded key-value store.
//!
//! # Features
//!
//! - ACID transactions with MVCC
//! - Single-writer, multiple-reader concurrency
//! - Automatic crash recovery
//! - File-backed or purely in-memory operation
//!
//! Because redb admits one write transaction at a time, every read-check-write
//! sequence below (duplicate id checks, id allocation, target existence on
//! connect) runs inside a single write transaction and cannot interleave with
//! another writer.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use ::redb::backends::InMemoryBackend;
use ::redb::{
    Database, DatabaseError, Durability, ReadableMultimapTable, ReadableTable,
    ReadableTableMetadata, WriteTransaction,
};
use bincode::Options;
use tracing::{debug, info, instrument, warn};

use super::schema::{
    DatabaseMetadata, CONNECTIONS_BY_TARGET_TABLE, CONNECTIONS_TABLE, COUNTERS_TABLE,
    METADATA_TABLE, NEXT_PROFILE_SEQ_KEY, NEXT_USER_ID_KEY, PROFILES_TABLE, PROFILE_ORDER_TABLE,
    PROFILE_SEQ_TABLE, REPORTS_TABLE, SCHEMA_VERSION,
};
use super::StorageEngine;
use crate::config::{Config, SyncMode};
use crate::error::{CampusError, RelationshipError, Result, StorageError, ValidationError};
use crate::profile::{NewUserProfile, ProfileUpdate, UserProfile};
use crate::report::{Report, ReportStatus};
use crate::types::{ReportId, Timestamp, UserId};

/// Metadata key in the metadata table.
const METADATA_KEY: &str = "db_metadata";

/// First id handed out by a fresh directory.
const FIRST_USER_ID: u64 = 1;

/// redb storage engine wrapper.
///
/// This struct holds the redb database handle and cached metadata.
/// It implements [`StorageEngine`] for use with CampusLink.
///
/// # Thread Safety
///
/// `RedbStorage` is `Send + Sync`. redb handles internal synchronization
/// using MVCC for readers and exclusive locking for writers.
#[derive(Debug)]
pub struct RedbStorage {
    /// The redb database handle.
    db: Database,

    /// Cached database metadata.
    metadata: DatabaseMetadata,

    /// Path to the database file. `None` for in-memory databases.
    path: Option<PathBuf>,

    /// Durability applied to every write transaction.
    sync_mode: SyncMode,
}

impl RedbStorage {
    /// Opens or creates a database at the given path.
    ///
    /// If the database doesn't exist, it is created and initialized.
    /// If it exists, its metadata is validated.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The database file is corrupted
    /// - The database is locked by another process
    /// - Schema version doesn't match
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use campuslink::{Config, storage::RedbStorage};
    ///
    /// let storage = RedbStorage::open("./campus.db", &Config::default())?;
    /// ```
    #[instrument(skip(config), fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>, config: &Config) -> Result<Self> {
        let path = path.as_ref();
        let db_exists = path.exists();

        debug!(db_exists = db_exists, "Opening storage engine");

        let db = Self::create_database(path, config)?;

        if db_exists {
            Self::open_existing(db, path.to_path_buf(), config)
        } else {
            Self::initialize_new(db, Some(path.to_path_buf()), config)
        }
    }

    /// Creates a fresh database held entirely in memory.
    #[instrument(skip(config))]
    pub fn open_in_memory(config: &Config) -> Result<Self> {
        let mut builder = Database::builder();
        builder.set_cache_size(config.cache_size_bytes());

        let db = builder
            .create_with_backend(InMemoryBackend::new())
            .map_err(StorageError::from)?;

        Self::initialize_new(db, None, config)
    }

    /// Creates the redb database with appropriate settings.
    fn create_database(path: &Path, config: &Config) -> Result<Database> {
        let mut builder = Database::builder();
        builder.set_cache_size(config.cache_size_bytes());

        let db = builder.create(path).map_err(|e| match e {
            DatabaseError::DatabaseAlreadyOpen => StorageError::DatabaseLocked,
            other => StorageError::Redb(other.to_string()),
        })?;

        debug!(cache_size_mb = config.cache_size_mb, "Database file opened");
        Ok(db)
    }

    /// Initializes a new database with tables and metadata.
    #[instrument(skip(db, config))]
    fn initialize_new(db: Database, path: Option<PathBuf>, config: &Config) -> Result<Self> {
        info!(in_memory = path.is_none(), "Initializing new database");

        let metadata = DatabaseMetadata::new();

        // Create all tables and write metadata in a single transaction
        let write_txn = db.begin_write().map_err(StorageError::from)?;
        {
            let mut meta_table = write_txn.open_table(METADATA_TABLE)?;
            let metadata_bytes = bincode::serialize(&metadata)
                .map_err(|e| StorageError::serialization(e.to_string()))?;
            meta_table.insert(METADATA_KEY, metadata_bytes.as_slice())?;

            let mut counters = write_txn.open_table(COUNTERS_TABLE)?;
            counters.insert(NEXT_USER_ID_KEY, FIRST_USER_ID)?;
            counters.insert(NEXT_PROFILE_SEQ_KEY, 0)?;

            let _ = write_txn.open_table(PROFILES_TABLE)?;
            let _ = write_txn.open_table(PROFILE_ORDER_TABLE)?;
            let _ = write_txn.open_table(PROFILE_SEQ_TABLE)?;
            let _ = write_txn.open_multimap_table(CONNECTIONS_TABLE)?;
            let _ = write_txn.open_multimap_table(CONNECTIONS_BY_TARGET_TABLE)?;
            let _ = write_txn.open_table(REPORTS_TABLE)?;
        }
        write_txn.commit().map_err(StorageError::from)?;

        info!(schema_version = SCHEMA_VERSION, "Database initialized");

        Ok(Self {
            db,
            metadata,
            path,
            sync_mode: config.sync_mode,
        })
    }

    /// Opens and validates an existing database.
    #[instrument(skip(db, config), fields(path = %path.display()))]
    fn open_existing(db: Database, path: PathBuf, config: &Config) -> Result<Self> {
        info!("Opening existing database");

        let read_txn = db.begin_read().map_err(StorageError::from)?;

        let metadata = {
            let meta_table = read_txn.open_table(METADATA_TABLE).map_err(|e| {
                StorageError::corrupted(format!("Cannot open metadata table: {}", e))
            })?;

            let metadata_bytes = meta_table
                .get(METADATA_KEY)
                .map_err(StorageError::from)?
                .ok_or_else(|| StorageError::corrupted("Missing database metadata"))?;

            bincode::DefaultOptions::new()
                .with_fixint_encoding()
                .reject_trailing_bytes()
                .deserialize::<DatabaseMetadata>(metadata_bytes.value())
                .map_err(|e| StorageError::corrupted(format!("Invalid metadata format: {}", e)))?
        };

        drop(read_txn);

        if !metadata.is_compatible() {
            warn!(
                expected = SCHEMA_VERSION,
                found = metadata.schema_version,
                "Schema version mismatch"
            );
            return Err(CampusError::Storage(StorageError::SchemaVersionMismatch {
                expected: SCHEMA_VERSION,
                found: metadata.schema_version,
            }));
        }

        let mut metadata = metadata;
        metadata.touch();

        let write_txn = db.begin_write().map_err(StorageError::from)?;
        {
            let mut meta_table = write_txn.open_table(METADATA_TABLE)?;
            let metadata_bytes = bincode::serialize(&metadata)
                .map_err(|e| StorageError::serialization(e.to_string()))?;
            meta_table.insert(METADATA_KEY, metadata_bytes.as_slice())?;
        }
        write_txn.commit().map_err(StorageError::from)?;

        info!(
            schema_version = metadata.schema_version,
            "Database opened successfully"
        );

        Ok(Self {
            db,
            metadata,
            path: Some(path),
            sync_mode: config.sync_mode,
        })
    }

    /// Returns a reference to the underlying redb database.
    #[cfg(test)]
    pub(crate) fn database(&self) -> &Database {
        &self.db
    }

    /// Begins a write transaction with the configured durability.
    fn begin_write(&self) -> Result<WriteTransaction> {
        let mut txn = self.db.begin_write().map_err(StorageError::from)?;
        match self.sync_mode {
            SyncMode::Normal => {}
            SyncMode::Fast => txn.set_durability(Durability::Eventual),
            SyncMode::Paranoid => txn.set_two_phase_commit(true),
        }
        Ok(txn)
    }
}

fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
    bincode::serialize(value).map_err(|e| StorageError::serialization(e.to_string()).into())
}

fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    bincode::deserialize(bytes).map_err(|e| StorageError::serialization(e.to_string()).into())
}

impl StorageEngine for RedbStorage {
    // =========================================================================
    // Lifecycle
    // =========================================================================

    fn metadata(&self) -> &DatabaseMetadata {
        &self.metadata
    }

    #[instrument(skip(self))]
    fn close(self: Box<Self>) -> Result<()> {
        info!("Closing storage engine");

        // redb flushes on drop and `Database::drop` is infallible.
        drop(self.db);

        info!("Storage engine closed");
        Ok(())
    }

    fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    // =========================================================================
    // Profile Storage Operations
    // =========================================================================

    fn insert_profile(&self, new: &NewUserProfile, now: Timestamp) -> Result<UserProfile> {
        let write_txn = self.begin_write()?;
        let profile;
        {
            let mut profiles = write_txn.open_table(PROFILES_TABLE)?;
            let mut counters = write_txn.open_table(COUNTERS_TABLE)?;

            let next_id = counters
                .get(NEXT_USER_ID_KEY)?
                .map(|v| v.value())
                .unwrap_or(FIRST_USER_ID);

            let id = match new.id {
                Some(id) => id,
                None => UserId::new(next_id),
            };

            // Dropping write_txn on an early return aborts it.
            if profiles.get(id.get())?.is_some() {
                return match new.id {
                    Some(_) => Err(CampusError::DuplicateIdentity(id)),
                    // The counter saturates at u64::MAX; once that id is
                    // taken there is nothing left to assign.
                    None => Err(ValidationError::invalid_field(
                        "id",
                        "profile id space exhausted",
                    )
                    .into()),
                };
            }

            // Explicit ids advance the counter so assigned ids never collide
            // with them.
            let following = id.get().saturating_add(1);
            counters.insert(NEXT_USER_ID_KEY, next_id.max(following))?;

            let seq = counters
                .get(NEXT_PROFILE_SEQ_KEY)?
                .map(|v| v.value())
                .unwrap_or(0);
            counters.insert(NEXT_PROFILE_SEQ_KEY, seq + 1)?;

            profile = UserProfile::from_new(id, new, now);
            let bytes = encode(&profile)?;
            profiles.insert(id.get(), bytes.as_slice())?;

            write_txn.open_table(PROFILE_ORDER_TABLE)?.insert(seq, id.get())?;
            write_txn.open_table(PROFILE_SEQ_TABLE)?.insert(id.get(), seq)?;
        }
        write_txn.commit().map_err(StorageError::from)?;

        debug!(id = %profile.id, name = %profile.name, "Profile saved");
        Ok(profile)
    }

    fn get_profile(&self, id: UserId) -> Result<Option<UserProfile>> {
        let read_txn = self.db.begin_read().map_err(StorageError::from)?;
        let table = read_txn.open_table(PROFILES_TABLE)?;

        let profile = match table.get(id.get())? {
            Some(value) => Some(decode(value.value())?),
            None => None,
        };
        Ok(profile)
    }

    fn list_profiles(&self) -> Result<Vec<UserProfile>> {
        let read_txn = self.db.begin_read().map_err(StorageError::from)?;
        let order = read_txn.open_table(PROFILE_ORDER_TABLE)?;
        let profiles = read_txn.open_table(PROFILES_TABLE)?;

        let mut listed = Vec::new();
        for entry in order.iter()? {
            let (seq, id) = entry.map_err(StorageError::from)?;
            let bytes = profiles.get(id.value())?.ok_or_else(|| {
                StorageError::corrupted(format!(
                    "Order entry {} points at missing profile {}",
                    seq.value(),
                    id.value()
                ))
            })?;
            listed.push(decode(bytes.value())?);
        }

        Ok(listed)
    }

    fn count_profiles(&self) -> Result<u64> {
        let read_txn = self.db.begin_read().map_err(StorageError::from)?;
        let table = read_txn.open_table(PROFILES_TABLE)?;
        Ok(table.len()?)
    }

    fn update_profile(
        &self,
        id: UserId,
        update: &ProfileUpdate,
        now: Timestamp,
    ) -> Result<Option<UserProfile>> {
        let write_txn = self.begin_write()?;
        let profile;
        {
            let mut table = write_txn.open_table(PROFILES_TABLE)?;

            let mut existing: UserProfile = match table.get(id.get())? {
                Some(value) => decode(value.value())?,
                None => return Ok(None),
            };

            update.apply_to(&mut existing, now);
            let bytes = encode(&existing)?;
            table.insert(id.get(), bytes.as_slice())?;
            profile = existing;
        }
        write_txn.commit().map_err(StorageError::from)?;

        debug!(id = %id, "Profile updated");
        Ok(Some(profile))
    }

    fn delete_profile(&self, id: UserId) -> Result<bool> {
        let write_txn = self.begin_write()?;
        let existed;
        {
            let mut profiles = write_txn.open_table(PROFILES_TABLE)?;
            existed = profiles.remove(id.get())?.is_some();

            if existed {
                let mut seqs = write_txn.open_table(PROFILE_SEQ_TABLE)?;
                let seq = seqs.remove(id.get())?.map(|v| v.value());
                if let Some(seq) = seq {
                    write_txn.open_table(PROFILE_ORDER_TABLE)?.remove(seq)?;
                }
            }

            // Edges are dropped even if the profile row was already gone, since
            // connections may point from a viewer that never had a profile.
            let mut outgoing = write_txn.open_multimap_table(CONNECTIONS_TABLE)?;
            let mut incoming = write_txn.open_multimap_table(CONNECTIONS_BY_TARGET_TABLE)?;

            let targets = outgoing
                .get(id.get())?
                .map(|v| v.map(|g| g.value()))
                .collect::<std::result::Result<Vec<u64>, ::redb::StorageError>>()?;
            for target in targets {
                outgoing.remove(id.get(), target)?;
                incoming.remove(target, id.get())?;
            }

            let viewers = incoming
                .get(id.get())?
                .map(|v| v.map(|g| g.value()))
                .collect::<std::result::Result<Vec<u64>, ::redb::StorageError>>()?;
            for viewer in viewers {
                outgoing.remove(viewer, id.get())?;
                incoming.remove(id.get(), viewer)?;
            }
        }
        write_txn.commit().map_err(StorageError::from)?;

        if existed {
            debug!(id = %id, "Profile deleted");
        }
        Ok(existed)
    }

    // =========================================================================
    // Connection Storage Operations
    // =========================================================================

    fn save_connection(&self, viewer: UserId, target: UserId) -> Result<bool> {
        let write_txn = self.begin_write()?;
        let already_present;
        {
            let profiles = write_txn.open_table(PROFILES_TABLE)?;
            if profiles.get(target.get())?.is_none() {
                return Err(RelationshipError::UnknownTarget(target).into());
            }

            let mut outgoing = write_txn.open_multimap_table(CONNECTIONS_TABLE)?;
            already_present = outgoing.insert(viewer.get(), target.get())?;

            let mut incoming = write_txn.open_multimap_table(CONNECTIONS_BY_TARGET_TABLE)?;
            incoming.insert(target.get(), viewer.get())?;
        }
        write_txn.commit().map_err(StorageError::from)?;

        debug!(viewer = %viewer, target = %target, new = !already_present, "Connection saved");
        Ok(!already_present)
    }

    fn delete_connection(&self, viewer: UserId, target: UserId) -> Result<bool> {
        let write_txn = self.begin_write()?;
        let existed;
        {
            let mut outgoing = write_txn.open_multimap_table(CONNECTIONS_TABLE)?;
            existed = outgoing.remove(viewer.get(), target.get())?;

            let mut incoming = write_txn.open_multimap_table(CONNECTIONS_BY_TARGET_TABLE)?;
            incoming.remove(target.get(), viewer.get())?;
        }
        write_txn.commit().map_err(StorageError::from)?;

        if existed {
            debug!(viewer = %viewer, target = %target, "Connection deleted");
        }
        Ok(existed)
    }

    fn list_connections(&self, viewer: UserId) -> Result<BTreeSet<UserId>> {
        let read_txn = self.db.begin_read().map_err(StorageError::from)?;
        let table = read_txn.open_multimap_table(CONNECTIONS_TABLE)?;

        let mut targets = BTreeSet::new();
        for entry in table.get(viewer.get())? {
            let target = entry.map_err(StorageError::from)?;
            targets.insert(UserId::new(target.value()));
        }

        Ok(targets)
    }

    fn connection_exists(&self, viewer: UserId, target: UserId) -> Result<bool> {
        let read_txn = self.db.begin_read().map_err(StorageError::from)?;
        let table = read_txn.open_multimap_table(CONNECTIONS_TABLE)?;

        for entry in table.get(viewer.get())? {
            if entry.map_err(StorageError::from)?.value() == target.get() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    // =========================================================================
    // Report Storage Operations
    // =========================================================================

    fn save_report(&self, report: &Report) -> Result<()> {
        let bytes = encode(report)?;

        let write_txn = self.begin_write()?;
        {
            let mut table = write_txn.open_table(REPORTS_TABLE)?;
            table.insert(report.id.as_bytes(), bytes.as_slice())?;
        }
        write_txn.commit().map_err(StorageError::from)?;

        debug!(id = %report.id, kind = ?report.kind, "Report saved");
        Ok(())
    }

    fn get_report(&self, id: ReportId) -> Result<Option<Report>> {
        let read_txn = self.db.begin_read().map_err(StorageError::from)?;
        let table = read_txn.open_table(REPORTS_TABLE)?;

        let report = match table.get(id.as_bytes())? {
            Some(value) => Some(decode(value.value())?),
            None => None,
        };
        Ok(report)
    }

    fn list_reports(&self) -> Result<Vec<Report>> {
        let read_txn = self.db.begin_read().map_err(StorageError::from)?;
        let table = read_txn.open_table(REPORTS_TABLE)?;

        let mut reports = Vec::new();
        for result in table.iter()? {
            let (_, value) = result.map_err(StorageError::from)?;
            reports.push(decode(value.value())?);
        }

        Ok(reports)
    }

    fn update_report_status(&self, id: ReportId, status: ReportStatus) -> Result<bool> {
        let write_txn = self.begin_write()?;
        {
            let mut table = write_txn.open_table(REPORTS_TABLE)?;

            let mut report: Report = match table.get(id.as_bytes())? {
                Some(value) => decode(value.value())?,
                None => return Ok(false),
            };

            report.status = status;
            let bytes = encode(&report)?;
            table.insert(id.as_bytes(), bytes.as_slice())?;
        }
        write_txn.commit().map_err(StorageError::from)?;

        debug!(id = %id, status = ?status, "Report status updated");
        Ok(true)
    }
}

// RedbStorage is auto Send + Sync: Database, DatabaseMetadata, PathBuf and
// SyncMode are all Send + Sync.
