//! Search criteria for the collaborator directory.
//!
//! [`SearchCriteria`] holds a free-text query and up to four facet filters.
//! Active parts combine with logical AND. Matching rules differ on purpose:
//!
//! | Part | Rule |
//! |------|------|
//! | `query` | lower-cased substring of the name or of any facet entry |
//! | `study_year` | exact match |
//! | `skill` / `hobby` / `interest` | case-insensitive equality with an entry of that facet |

use crate::profile::{FacetKind, StudyYear, UserProfile};

/// Filter value meaning "no filter", as sent by the filter drop-downs.
pub const ANY_FILTER: &str = "any";

/// Search criteria for [`CampusDB::search_profiles`](crate::CampusDB::search_profiles).
///
/// `None`, the empty string and [`ANY_FILTER`] all leave a part inactive.
/// The default value matches every profile.
///
/// # Example
///
/// ```rust
/// use campuslink::{SearchCriteria, StudyYear};
///
/// let criteria = SearchCriteria::query("react")
///     .with_study_year(StudyYear::Third)
///     .with_interest("any");
/// assert!(criteria.interest.is_none());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    /// Free-text query.
    pub query: Option<String>,

    /// Only profiles in this study year.
    pub study_year: Option<StudyYear>,

    /// Only profiles with this skill (case-insensitive).
    pub skill: Option<String>,

    /// Only profiles with this hobby (case-insensitive).
    pub hobby: Option<String>,

    /// Only profiles with this interest (case-insensitive).
    pub interest: Option<String>,
}

impl SearchCriteria {
    /// Criteria with only a free-text query.
    pub fn query(query: impl Into<String>) -> Self {
        Self {
            query: active_value(query.into()),
            ..Self::default()
        }
    }

    /// Sets the study-year filter.
    pub fn with_study_year(mut self, year: impl Into<Option<StudyYear>>) -> Self {
        self.study_year = year.into();
        self
    }

    /// Sets the skill filter. `""` and `"any"` clear it.
    pub fn with_skill(self, skill: impl Into<String>) -> Self {
        self.with_facet(FacetKind::Skill, skill)
    }

    /// Sets the hobby filter. `""` and `"any"` clear it.
    pub fn with_hobby(self, hobby: impl Into<String>) -> Self {
        self.with_facet(FacetKind::Hobby, hobby)
    }

    /// Sets the interest filter. `""` and `"any"` clear it.
    pub fn with_interest(self, interest: impl Into<String>) -> Self {
        self.with_facet(FacetKind::Interest, interest)
    }

    /// Sets the filter for one facet kind. `""` and `"any"` clear it.
    pub fn with_facet(mut self, kind: FacetKind, value: impl Into<String>) -> Self {
        let value = active_value(value.into());
        match kind {
            FacetKind::Skill => self.skill = value,
            FacetKind::Hobby => self.hobby = value,
            FacetKind::Interest => self.interest = value,
        }
        self
    }

    /// Returns the active filter value for one facet kind.
    pub fn facet_filter(&self, kind: FacetKind) -> Option<&str> {
        let value = match kind {
            FacetKind::Skill => self.skill.as_deref(),
            FacetKind::Hobby => self.hobby.as_deref(),
            FacetKind::Interest => self.interest.as_deref(),
        };
        value.filter(|v| is_active(v))
    }

    /// Returns the active free-text query.
    pub fn active_query(&self) -> Option<&str> {
        self.query.as_deref().filter(|q| !q.is_empty())
    }

    /// Returns true if no part of the criteria is active.
    pub fn is_unfiltered(&self) -> bool {
        self.active_query().is_none()
            && self.study_year.is_none()
            && FacetKind::ALL
                .iter()
                .all(|kind| self.facet_filter(*kind).is_none())
    }

    /// Returns `true` if the profile passes every active part.
    pub fn matches(&self, profile: &UserProfile) -> bool {
        if let Some(query) = self.active_query() {
            if !matches_query(profile, &query.to_lowercase()) {
                return false;
            }
        }

        if let Some(year) = self.study_year {
            if profile.study_year != year {
                return false;
            }
        }

        FacetKind::ALL.iter().all(|kind| match self.facet_filter(*kind) {
            Some(value) => profile.has_facet_value(*kind, value),
            None => true,
        })
    }
}

/// Substring match of a lower-cased query against the name and every facet
/// entry.
fn matches_query(profile: &UserProfile, lowercase_query: &str) -> bool {
    if profile.name.to_lowercase().contains(lowercase_query) {
        return true;
    }

    FacetKind::ALL.iter().any(|kind| {
        profile
            .facet(*kind)
            .iter()
            .any(|entry| entry.to_lowercase().contains(lowercase_query))
    })
}

fn is_active(value: &str) -> bool {
    !value.is_empty() && value != ANY_FILTER
}

fn active_value(value: String) -> Option<String> {
    is_active(&value).then_some(value)
}
