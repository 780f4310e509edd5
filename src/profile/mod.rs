//! User directory module.
//!
//! A **profile** is the directory record of one student. The directory
//! keeps profiles in insertion order and never rewrites the casing of what
//! users typed.
//!
//! # Operations
//!
//! All profile operations are available on [`CampusDB`](crate::CampusDB):
//!
//! - [`create_profile(new)`](crate::CampusDB::create_profile)
//! - [`get_profile(id)`](crate::CampusDB::get_profile)
//! - [`list_profiles()`](crate::CampusDB::list_profiles)
//! - [`update_profile(id, update)`](crate::CampusDB::update_profile)
//! - [`add_facet_value(id, kind, value)`](crate::CampusDB::add_facet_value)
//! - [`remove_facet_value(id, kind, value)`](crate::CampusDB::remove_facet_value)
//! - [`delete_profile(id)`](crate::CampusDB::delete_profile)
//!
//! # Constraints
//!
//! - `name` and `course` are non-empty after trimming
//! - Facet entries are non-empty and unique ignoring case
//! - Each facet holds at most `Config::max_facet_entries` entries

pub mod types;

pub use types::{FacetKind, NewUserProfile, ProfileUpdate, StudyYear, UserProfile};

use crate::error::{CampusError, ValidationError};
use crate::storage::schema::{
    MAX_BIO_SIZE, MAX_COURSE_LENGTH, MAX_FACET_VALUE_LENGTH, MAX_NAME_LENGTH,
};

/// Validates a [`NewUserProfile`] before storage.
///
/// # Rules
///
/// | Field | Constraint |
/// |-------|------------|
/// | `name` | Non-blank, max 100 bytes |
/// | `course` | Non-blank, max 200 bytes |
/// | `bio` | Max 10 KB |
/// | facets | Max `max_facet_entries` entries, each non-blank, max 100 bytes, no case-insensitive duplicates |
///
/// Does NOT check id uniqueness; that needs the store and happens in the
/// same write transaction that inserts the profile.
pub(crate) fn validate_new_profile(
    new: &NewUserProfile,
    max_facet_entries: usize,
) -> Result<(), CampusError> {
    validate_text("name", &new.name, MAX_NAME_LENGTH)?;
    validate_text("course", &new.course, MAX_COURSE_LENGTH)?;
    validate_bio(&new.bio)?;

    for kind in FacetKind::ALL {
        validate_facet_list(kind, new.facet(kind), max_facet_entries)?;
    }

    Ok(())
}

/// Validates a [`ProfileUpdate`] before applying.
///
/// Only validates fields that are `Some(...)`.
pub(crate) fn validate_profile_update(
    update: &ProfileUpdate,
    max_facet_entries: usize,
) -> Result<(), CampusError> {
    if let Some(ref name) = update.name {
        validate_text("name", name, MAX_NAME_LENGTH)?;
    }
    if let Some(ref course) = update.course {
        validate_text("course", course, MAX_COURSE_LENGTH)?;
    }
    if let Some(ref bio) = update.bio {
        validate_bio(bio)?;
    }

    for kind in FacetKind::ALL {
        if let Some(values) = update.facet_values(kind) {
            validate_facet_list(kind, values, max_facet_entries)?;
        }
    }

    Ok(())
}

/// Computes a facet list with `value` added.
///
/// The value is trimmed first. Returns `None` when nothing would change:
/// the trimmed value is empty, or an entry equal to it ignoring case is
/// already present.
pub(crate) fn facet_with_value(
    profile: &UserProfile,
    kind: FacetKind,
    value: &str,
) -> Option<Vec<String>> {
    let value = value.trim();
    if value.is_empty() || profile.has_facet_value(kind, value) {
        return None;
    }

    let mut values = profile.facet(kind).to_vec();
    values.push(value.to_string());
    Some(values)
}

/// Computes a facet list with every entry equal to `value` (ignoring case)
/// removed. Returns `None` when no entry matches.
pub(crate) fn facet_without_value(
    profile: &UserProfile,
    kind: FacetKind,
    value: &str,
) -> Option<Vec<String>> {
    let needle = value.trim().to_lowercase();
    let current = profile.facet(kind);
    let kept: Vec<String> = current
        .iter()
        .filter(|entry| entry.to_lowercase() != needle)
        .cloned()
        .collect();

    (kept.len() != current.len()).then_some(kept)
}

fn validate_text(field: &str, value: &str, max: usize) -> Result<(), CampusError> {
    if value.trim().is_empty() {
        return Err(ValidationError::required_field(field).into());
    }
    if value.len() > max {
        return Err(ValidationError::content_too_large(field, value.len(), max).into());
    }
    Ok(())
}

fn validate_bio(bio: &str) -> Result<(), CampusError> {
    if bio.len() > MAX_BIO_SIZE {
        return Err(ValidationError::content_too_large("bio", bio.len(), MAX_BIO_SIZE).into());
    }
    Ok(())
}

fn validate_facet_list(
    kind: FacetKind,
    values: &[String],
    max_entries: usize,
) -> Result<(), CampusError> {
    let field = kind.field_name();

    if values.len() > max_entries {
        return Err(ValidationError::too_many_items(field, values.len(), max_entries).into());
    }

    let mut seen = std::collections::HashSet::with_capacity(values.len());
    for (i, value) in values.iter().enumerate() {
        if value.trim().is_empty() {
            return Err(ValidationError::invalid_field(
                field,
                format!("entry at index {} is empty", i),
            )
            .into());
        }
        if value.len() > MAX_FACET_VALUE_LENGTH {
            return Err(ValidationError::invalid_field(
                field,
                format!(
                    "entry at index {} exceeds max length of {} bytes (got {})",
                    i,
                    MAX_FACET_VALUE_LENGTH,
                    value.len()
                ),
            )
            .into());
        }
        if !seen.insert(value.to_lowercase()) {
            return Err(ValidationError::duplicate_value(field, value.as_str()).into());
        }
    }

    Ok(())
}
