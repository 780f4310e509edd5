//! Search operations for CampusLink.
//!
//! The search engine is a pure function over a [`StorageEngine`]: it reads
//! every profile in directory order, keeps the ones that pass the
//! [`SearchCriteria`], and annotates each survivor with whether the viewer
//! is connected to it. It never writes.

mod facets;
mod filter;

pub use facets::FacetValues;
pub use filter::{SearchCriteria, ANY_FILTER};

use tracing::{debug, instrument};

use crate::error::Result;
use crate::profile::UserProfile;
use crate::storage::StorageEngine;
use crate::types::UserId;

/// A profile returned by a search, annotated for the viewer.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult {
    /// The matching profile.
    pub profile: UserProfile,

    /// Whether the viewer has an edge to this profile.
    pub is_connected: bool,
}

/// Runs a search on behalf of `viewer`.
///
/// Results keep directory (insertion) order. The viewer does not need a
/// profile; an unknown viewer simply has no connections.
#[instrument(skip(storage, criteria), fields(viewer = %viewer))]
pub(crate) fn search_profiles(
    storage: &dyn StorageEngine,
    viewer: UserId,
    criteria: &SearchCriteria,
) -> Result<Vec<SearchResult>> {
    let profiles = storage.list_profiles()?;
    let total = profiles.len();
    let connections = storage.list_connections(viewer)?;

    let results: Vec<SearchResult> = profiles
        .into_iter()
        .filter(|profile| criteria.matches(profile))
        .map(|profile| SearchResult {
            is_connected: connections.contains(&profile.id),
            profile,
        })
        .collect();

    debug!(total, matched = results.len(), "Search complete");
    Ok(results)
}

/// Collects distinct facet values across the whole directory.
pub(crate) fn facet_values(storage: &dyn StorageEngine) -> Result<FacetValues> {
    let profiles = storage.list_profiles()?;
    Ok(FacetValues::collect(&profiles))
}
