//! Type definitions for user profiles.
//!
//! A profile is the directory record for one student: who they are, what
//! they study, and the three facet lists (skills, hobbies, interests) that
//! the "Find Collaborators" search filters on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::types::{Timestamp, UserId};

// ============================================================================
// StudyYear
// ============================================================================

/// Year of study, drawn from a closed set of labels.
///
/// Labels are compared exactly (case-sensitive): `"3rd Year"` parses,
/// `"3rd year"` does not.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum StudyYear {
    /// "1st Year"
    #[default]
    First,
    /// "2nd Year"
    Second,
    /// "3rd Year"
    Third,
    /// "4th Year"
    Fourth,
    /// "5th Year"
    Fifth,
}

impl StudyYear {
    /// Every study year, in the order the filter drop-down lists them.
    pub const ALL: [StudyYear; 5] = [
        StudyYear::First,
        StudyYear::Second,
        StudyYear::Third,
        StudyYear::Fourth,
        StudyYear::Fifth,
    ];

    /// Returns the display label, e.g. `"2nd Year"`.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::First => "1st Year",
            Self::Second => "2nd Year",
            Self::Third => "3rd Year",
            Self::Fourth => "4th Year",
            Self::Fifth => "5th Year",
        }
    }

    /// Parses a study-year filter value coming from a drop-down.
    ///
    /// The empty string and the `"any"` sentinel mean "no filter" and
    /// return `Ok(None)`.
    ///
    /// # Example
    /// ```
    /// use campuslink::StudyYear;
    ///
    /// assert_eq!(StudyYear::parse_filter("any").unwrap(), None);
    /// assert_eq!(StudyYear::parse_filter("4th Year").unwrap(), Some(StudyYear::Fourth));
    /// assert!(StudyYear::parse_filter("4TH YEAR").is_err());
    /// ```
    pub fn parse_filter(value: &str) -> Result<Option<Self>, ValidationError> {
        if value.is_empty() || value == crate::search::ANY_FILTER {
            return Ok(None);
        }
        value.parse().map(Some)
    }
}

impl fmt::Display for StudyYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StudyYear {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|year| year.label() == s)
            .ok_or_else(|| {
                ValidationError::invalid_field("study_year", format!("unknown study year '{}'", s))
            })
    }
}

// ============================================================================
// FacetKind
// ============================================================================

/// One of the three user-authored tag categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FacetKind {
    /// Technical or creative skills ("React", "Figma").
    Skill,
    /// Hobbies ("Chess", "Hiking").
    Hobby,
    /// Areas of interest ("Machine Learning").
    Interest,
}

impl FacetKind {
    /// All facet kinds.
    pub const ALL: [FacetKind; 3] = [FacetKind::Skill, FacetKind::Hobby, FacetKind::Interest];

    /// Field name used in validation messages.
    pub const fn field_name(&self) -> &'static str {
        match self {
            Self::Skill => "skills",
            Self::Hobby => "hobbies",
            Self::Interest => "interests",
        }
    }
}

impl fmt::Display for FacetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

// ============================================================================
// UserProfile
// ============================================================================

/// A stored user profile.
///
/// Facet entries keep the casing the user typed. Case-insensitive matching
/// happens at comparison time only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Unique identifier. Immutable once assigned.
    pub id: UserId,

    /// Display name.
    pub name: String,

    /// Course or programme, e.g. "B.Tech CSE".
    pub course: String,

    /// Year of study.
    pub study_year: StudyYear,

    /// Skills, unique under case-insensitive comparison.
    pub skills: Vec<String>,

    /// Hobbies, unique under case-insensitive comparison.
    pub hobbies: Vec<String>,

    /// Interests, unique under case-insensitive comparison.
    pub interests: Vec<String>,

    /// Free-text bio.
    pub bio: String,

    /// When this profile was created.
    pub created_at: Timestamp,

    /// When this profile was last modified.
    pub updated_at: Timestamp,
}

impl UserProfile {
    /// Builds a stored profile from a creation request and an assigned id.
    pub(crate) fn from_new(id: UserId, new: &NewUserProfile, now: Timestamp) -> Self {
        Self {
            id,
            name: new.name.clone(),
            course: new.course.clone(),
            study_year: new.study_year,
            skills: new.skills.clone(),
            hobbies: new.hobbies.clone(),
            interests: new.interests.clone(),
            bio: new.bio.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the entries of one facet.
    pub fn facet(&self, kind: FacetKind) -> &[String] {
        match kind {
            FacetKind::Skill => &self.skills,
            FacetKind::Hobby => &self.hobbies,
            FacetKind::Interest => &self.interests,
        }
    }

    pub(crate) fn facet_mut(&mut self, kind: FacetKind) -> &mut Vec<String> {
        match kind {
            FacetKind::Skill => &mut self.skills,
            FacetKind::Hobby => &mut self.hobbies,
            FacetKind::Interest => &mut self.interests,
        }
    }

    /// Returns true if the facet holds an entry equal to `value` ignoring case.
    pub fn has_facet_value(&self, kind: FacetKind, value: &str) -> bool {
        let needle = value.to_lowercase();
        self.facet(kind)
            .iter()
            .any(|entry| entry.to_lowercase() == needle)
    }
}

/// Input for creating a new profile.
///
/// Leave `id` as `None` to let the directory assign one.
///
/// # Example
///
/// ```rust,ignore
/// use campuslink::{NewUserProfile, StudyYear};
///
/// let id = db.create_profile(NewUserProfile {
///     name: "Rahul Sharma".into(),
///     course: "B.Tech CSE".into(),
///     study_year: StudyYear::Third,
///     skills: vec!["React".into(), "Node.js".into()],
///     ..Default::default()
/// })?;
/// ```
#[derive(Clone, Debug, Default)]
pub struct NewUserProfile {
    /// Explicit id. Creation fails with `DuplicateIdentity` if it is taken.
    pub id: Option<UserId>,

    /// Display name (required).
    pub name: String,

    /// Course or programme (required).
    pub course: String,

    /// Year of study.
    pub study_year: StudyYear,

    /// Skills.
    pub skills: Vec<String>,

    /// Hobbies.
    pub hobbies: Vec<String>,

    /// Interests.
    pub interests: Vec<String>,

    /// Free-text bio.
    pub bio: String,
}

impl NewUserProfile {
    /// Returns the entries of one facet.
    pub fn facet(&self, kind: FacetKind) -> &[String] {
        match kind {
            FacetKind::Skill => &self.skills,
            FacetKind::Hobby => &self.hobbies,
            FacetKind::Interest => &self.interests,
        }
    }
}

/// Partial update for a profile.
///
/// `Some` fields overwrite the stored value. Facet lists are replaced
/// wholesale, never unioned with the stored list.
#[derive(Clone, Debug, Default)]
pub struct ProfileUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New course.
    pub course: Option<String>,
    /// New study year.
    pub study_year: Option<StudyYear>,
    /// Replacement skills list.
    pub skills: Option<Vec<String>>,
    /// Replacement hobbies list.
    pub hobbies: Option<Vec<String>>,
    /// Replacement interests list.
    pub interests: Option<Vec<String>>,
    /// New bio.
    pub bio: Option<String>,
}

impl ProfileUpdate {
    /// Builds an update that replaces a single facet list.
    pub fn facet(kind: FacetKind, values: Vec<String>) -> Self {
        let mut update = Self::default();
        match kind {
            FacetKind::Skill => update.skills = Some(values),
            FacetKind::Hobby => update.hobbies = Some(values),
            FacetKind::Interest => update.interests = Some(values),
        }
        update
    }

    /// Returns the replacement list for one facet, if any.
    pub fn facet_values(&self, kind: FacetKind) -> Option<&[String]> {
        match kind {
            FacetKind::Skill => self.skills.as_deref(),
            FacetKind::Hobby => self.hobbies.as_deref(),
            FacetKind::Interest => self.interests.as_deref(),
        }
    }

    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.course.is_none()
            && self.study_year.is_none()
            && self.skills.is_none()
            && self.hobbies.is_none()
            && self.interests.is_none()
            && self.bio.is_none()
    }

    /// Merges the set fields into `profile` and bumps `updated_at`.
    pub(crate) fn apply_to(&self, profile: &mut UserProfile, now: Timestamp) {
        if let Some(ref name) = self.name {
            profile.name = name.clone();
        }
        if let Some(ref course) = self.course {
            profile.course = course.clone();
        }
        if let Some(year) = self.study_year {
            profile.study_year = year;
        }
        for kind in FacetKind::ALL {
            if let Some(values) = self.facet_values(kind) {
                *profile.facet_mut(kind) = values.to_vec();
            }
        }
        if let Some(ref bio) = self.bio {
            profile.bio = bio.clone();
        }
        profile.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_profile() -> UserProfile {
        let new = NewUserProfile {
            name: "Priya Patel".into(),
            course: "B.Tech CSE".into(),
            study_year: StudyYear::Third,
            skills: vec!["Figma".into(), "HTML/CSS".into()],
            hobbies: vec!["Painting".into()],
            interests: vec!["UI Design".into()],
            ..Default::default()
        };
        UserProfile::from_new(UserId::new(2), &new, Timestamp::from_millis(1_000))
    }

    #[test]
    fn test_study_year_labels_roundtrip() {
        for year in StudyYear::ALL {
            assert_eq!(year.label().parse::<StudyYear>().unwrap(), year);
            assert_eq!(year.to_string(), year.label());
        }
    }

    #[test]
    fn test_study_year_parse_is_case_sensitive() {
        assert!("3rd year".parse::<StudyYear>().is_err());
        assert!("3RD YEAR".parse::<StudyYear>().is_err());
        assert!("6th Year".parse::<StudyYear>().is_err());
    }

    #[test]
    fn test_study_year_parse_filter_sentinels() {
        assert_eq!(StudyYear::parse_filter("").unwrap(), None);
        assert_eq!(StudyYear::parse_filter("any").unwrap(), None);
        assert_eq!(
            StudyYear::parse_filter("1st Year").unwrap(),
            Some(StudyYear::First)
        );
    }

    #[test]
    fn test_facet_accessor_per_kind() {
        let profile = sample_profile();
        assert_eq!(profile.facet(FacetKind::Skill), ["Figma", "HTML/CSS"]);
        assert_eq!(profile.facet(FacetKind::Hobby), ["Painting"]);
        assert_eq!(profile.facet(FacetKind::Interest), ["UI Design"]);
    }

    #[test]
    fn test_has_facet_value_ignores_case() {
        let profile = sample_profile();
        assert!(profile.has_facet_value(FacetKind::Skill, "figma"));
        assert!(profile.has_facet_value(FacetKind::Skill, "FIGMA"));
        assert!(!profile.has_facet_value(FacetKind::Skill, "Fig"));
        assert!(!profile.has_facet_value(FacetKind::Hobby, "figma"));
    }

    #[test]
    fn test_update_replaces_facets_wholesale() {
        let mut profile = sample_profile();
        let update = ProfileUpdate {
            skills: Some(vec!["Sketch".into()]),
            bio: Some("Designer".into()),
            ..Default::default()
        };
        update.apply_to(&mut profile, Timestamp::from_millis(2_000));

        assert_eq!(profile.skills, vec!["Sketch".to_string()]);
        assert_eq!(profile.hobbies, vec!["Painting".to_string()]);
        assert_eq!(profile.bio, "Designer");
        assert_eq!(profile.name, "Priya Patel");
        assert_eq!(profile.updated_at, Timestamp::from_millis(2_000));
        assert_eq!(profile.created_at, Timestamp::from_millis(1_000));
    }

    #[test]
    fn test_update_facet_constructor() {
        let update = ProfileUpdate::facet(FacetKind::Hobby, vec!["Chess".into()]);
        assert!(update.skills.is_none());
        assert_eq!(update.facet_values(FacetKind::Hobby).unwrap(), ["Chess"]);
        assert!(!update.is_empty());
        assert!(ProfileUpdate::default().is_empty());
    }

    #[test]
    fn test_profile_bincode_roundtrip() {
        let profile = sample_profile();
        let bytes = bincode::serialize(&profile).unwrap();
        let restored: UserProfile = bincode::deserialize(&bytes).unwrap();
        assert_eq!(profile, restored);
    }
}
