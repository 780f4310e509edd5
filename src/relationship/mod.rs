//! Relationship (connection) management module.
//!
//! A **connection** is a directed edge `viewer → target` meaning "viewer has
//! added target as a collaborator". Edges are keyed by the ordered pair, so
//! `A → B` and `B → A` are independent records.
//!
//! # Operations
//!
//! All connection operations are available on [`CampusDB`](crate::CampusDB):
//!
//! - [`add_connection(viewer, target)`](crate::CampusDB::add_connection)
//! - [`remove_connection(viewer, target)`](crate::CampusDB::remove_connection)
//! - [`list_connections(viewer)`](crate::CampusDB::list_connections)
//! - [`is_connected(viewer, target)`](crate::CampusDB::is_connected)
//! - [`get_connected_profiles(viewer)`](crate::CampusDB::get_connected_profiles)
//!
//! # Constraints
//!
//! - No self-edges (`viewer != target`)
//! - At most one edge per ordered pair; re-adding is a no-op success
//! - The target must have a profile when the edge is added
//! - The viewer does not need a profile
//! - Removing an absent edge is a no-op success

use crate::error::{CampusError, RelationshipError};
use crate::types::UserId;

/// Validates a new connection before storage.
///
/// Only checks the self-reference rule. Target existence requires a
/// storage lookup and is checked inside the write transaction that
/// inserts the edge.
pub(crate) fn validate_new_connection(viewer: UserId, target: UserId) -> Result<(), CampusError> {
    if viewer == target {
        return Err(RelationshipError::SelfReference(viewer).into());
    }
    Ok(())
}
