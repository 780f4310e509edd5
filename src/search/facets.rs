//! Distinct facet values across the directory, used to populate the
//! filter drop-downs.

use std::collections::HashSet;

use crate::profile::{FacetKind, UserProfile};

/// Distinct skill, hobby and interest strings across a set of profiles.
///
/// Values are deduplicated by exact string identity, so `"React"` and
/// `"react"` are both listed. Order is first-seen order over the profiles
/// as given.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FacetValues {
    /// Distinct skills.
    pub skills: Vec<String>,
    /// Distinct hobbies.
    pub hobbies: Vec<String>,
    /// Distinct interests.
    pub interests: Vec<String>,
}

impl FacetValues {
    /// Collects distinct facet values from `profiles`.
    pub fn collect<'a>(profiles: impl IntoIterator<Item = &'a UserProfile>) -> Self {
        let mut values = Self::default();
        let mut seen: [HashSet<String>; 3] = Default::default();

        for profile in profiles {
            for (slot, kind) in FacetKind::ALL.into_iter().enumerate() {
                for entry in profile.facet(kind) {
                    if seen[slot].insert(entry.clone()) {
                        values.get_mut(kind).push(entry.clone());
                    }
                }
            }
        }

        values
    }

    /// Returns the distinct values of one facet.
    pub fn get(&self, kind: FacetKind) -> &[String] {
        match kind {
            FacetKind::Skill => &self.skills,
            FacetKind::Hobby => &self.hobbies,
            FacetKind::Interest => &self.interests,
        }
    }

    fn get_mut(&mut self, kind: FacetKind) -> &mut Vec<String> {
        match kind {
            FacetKind::Skill => &mut self.skills,
            FacetKind::Hobby => &mut self.hobbies,
            FacetKind::Interest => &mut self.interests,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::NewUserProfile;
    use crate::types::{Timestamp, UserId};

    fn profile(id: u64, skills: &[&str], hobbies: &[&str]) -> UserProfile {
        let new = NewUserProfile {
            name: format!("user-{}", id),
            course: "BCA".into(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            hobbies: hobbies.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        };
        UserProfile::from_new(UserId::new(id), &new, Timestamp::now())
    }

    #[test]
    fn test_empty_directory() {
        let values = FacetValues::collect(&[]);
        assert_eq!(values, FacetValues::default());
    }

    #[test]
    fn test_dedup_is_case_sensitive_and_first_seen() {
        let profiles = vec![
            profile(1, &["Python", "SQL"], &["Chess"]),
            profile(2, &["python", "Python", "Tableau"], &["Chess", "Reading"]),
        ];

        let values = FacetValues::collect(&profiles);
        assert_eq!(values.skills, vec!["Python", "SQL", "python", "Tableau"]);
        assert_eq!(values.hobbies, vec!["Chess", "Reading"]);
        assert!(values.get(FacetKind::Interest).is_empty());
    }
}
