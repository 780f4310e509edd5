//! Integration tests for the user directory.
//!
//! Covers creation (assigned and explicit ids), lookup, listing order,
//! partial updates, facet editing and deletion.

use campuslink::{
    CampusDB, CampusError, Config, FacetKind, NewUserProfile, NotFoundError, ProfileUpdate,
    StudyYear, UserId, ValidationError,
};
use tempfile::tempdir;

fn open_db() -> CampusDB {
    CampusDB::open_in_memory(Config::default()).unwrap()
}

fn student(name: &str) -> NewUserProfile {
    NewUserProfile {
        name: name.into(),
        course: "B.Com".into(),
        study_year: StudyYear::First,
        ..Default::default()
    }
}

fn names(db: &CampusDB) -> Vec<String> {
    db.list_profiles()
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect()
}

// ============================================================================
// Create / Get / List
// ============================================================================

#[test]
fn test_create_and_get_profile() {
    let db = open_db();

    let id = db
        .create_profile(NewUserProfile {
            name: "Ananya Iyer".into(),
            course: "M.Sc Data Science".into(),
            study_year: StudyYear::Fifth,
            skills: vec!["Python".into(), "SQL".into()],
            hobbies: vec!["Painting".into()],
            interests: vec!["Data Visualization".into()],
            bio: "Dashboards and maps.".into(),
            ..Default::default()
        })
        .unwrap();

    let profile = db.get_profile(id).unwrap();
    assert_eq!(profile.id, id);
    assert_eq!(profile.name, "Ananya Iyer");
    assert_eq!(profile.study_year, StudyYear::Fifth);
    assert_eq!(profile.skills, vec!["Python", "SQL"]);
    assert_eq!(profile.bio, "Dashboards and maps.");
    assert_eq!(profile.created_at, profile.updated_at);
}

#[test]
fn test_get_missing_profile() {
    let db = open_db();
    let err = db.get_profile(UserId::new(404)).unwrap_err();
    assert!(matches!(
        err,
        CampusError::NotFound(NotFoundError::Profile(ref id)) if id == "404"
    ));
}

#[test]
fn test_list_profiles_in_creation_order() {
    let db = open_db();
    assert!(db.list_profiles().unwrap().is_empty());

    for name in ["Zoya", "Aman", "Kabir"] {
        db.create_profile(student(name)).unwrap();
    }

    assert_eq!(names(&db), vec!["Zoya", "Aman", "Kabir"]);
    // Listing twice without mutation yields the same order.
    assert_eq!(names(&db), vec!["Zoya", "Aman", "Kabir"]);
    assert_eq!(db.profile_count().unwrap(), 3);
}

#[test]
fn test_stored_casing_is_preserved() {
    let db = open_db();
    let id = db
        .create_profile(NewUserProfile {
            skills: vec!["reactJS".into(), "NODE".into()],
            ..student("Dev")
        })
        .unwrap();

    assert_eq!(db.get_profile(id).unwrap().skills, vec!["reactJS", "NODE"]);
}

// ============================================================================
// Explicit ids
// ============================================================================

#[test]
fn test_explicit_id_is_honoured() {
    let db = open_db();
    let id = db
        .create_profile(NewUserProfile {
            id: Some(UserId::new(1001)),
            ..student("Explicit")
        })
        .unwrap();
    assert_eq!(id, UserId::new(1001));

    // Store-assigned ids continue past it.
    let next = db.create_profile(student("Assigned")).unwrap();
    assert!(next > id);
}

#[test]
fn test_duplicate_explicit_id_rejected() {
    let db = open_db();
    let first = db.create_profile(student("First")).unwrap();

    let err = db
        .create_profile(NewUserProfile {
            id: Some(first),
            ..student("Impostor")
        })
        .unwrap_err();

    assert!(err.is_duplicate_identity());
    assert_eq!(db.profile_count().unwrap(), 1);
    assert_eq!(db.get_profile(first).unwrap().name, "First");
}

#[test]
fn test_explicit_max_id_is_accepted() {
    let db = open_db();
    let max = UserId::new(u64::MAX);

    let id = db
        .create_profile(NewUserProfile {
            id: Some(max),
            ..student("Ceiling")
        })
        .unwrap();
    assert_eq!(id, max);
    assert_eq!(db.get_profile(max).unwrap().name, "Ceiling");

    let err = db
        .create_profile(NewUserProfile {
            id: Some(max),
            ..student("Again")
        })
        .unwrap_err();
    assert!(err.is_duplicate_identity());

    // Nothing is left above the ceiling to assign.
    let err = db.create_profile(student("Assigned")).unwrap_err();
    assert!(err.is_validation());

    // Lower explicit ids still work.
    let low = db
        .create_profile(NewUserProfile {
            id: Some(UserId::new(7)),
            ..student("Low")
        })
        .unwrap();
    assert_eq!(low, UserId::new(7));
    assert_eq!(names(&db), vec!["Ceiling", "Low"]);
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_blank_name_rejected() {
    let db = open_db();
    let err = db.create_profile(student("   ")).unwrap_err();
    assert!(matches!(
        err,
        CampusError::Validation(ValidationError::RequiredField { ref field }) if field == "name"
    ));
}

#[test]
fn test_blank_course_rejected() {
    let db = open_db();
    let err = db
        .create_profile(NewUserProfile {
            course: String::new(),
            ..student("Nisha")
        })
        .unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn test_oversized_bio_rejected() {
    let db = open_db();
    let err = db
        .create_profile(NewUserProfile {
            bio: "x".repeat(10 * 1024 + 1),
            ..student("Verbose")
        })
        .unwrap_err();
    assert!(matches!(
        err,
        CampusError::Validation(ValidationError::ContentTooLarge { ref field, .. }) if field == "bio"
    ));
}

#[test]
fn test_case_insensitive_duplicate_facet_rejected() {
    let db = open_db();
    let err = db
        .create_profile(NewUserProfile {
            hobbies: vec!["Chess".into(), "chess".into()],
            ..student("Twice")
        })
        .unwrap_err();
    assert!(matches!(
        err,
        CampusError::Validation(ValidationError::DuplicateValue { ref field, .. }) if field == "hobbies"
    ));
    assert_eq!(db.profile_count().unwrap(), 0);
}

// ============================================================================
// Update
// ============================================================================

#[test]
fn test_update_merges_fields_and_replaces_facets() {
    let db = open_db();
    let id = db
        .create_profile(NewUserProfile {
            skills: vec!["C".into(), "C++".into()],
            hobbies: vec!["Cricket".into()],
            ..student("Arjun")
        })
        .unwrap();
    let before = db.get_profile(id).unwrap();

    std::thread::sleep(std::time::Duration::from_millis(2));

    let updated = db
        .update_profile(
            id,
            ProfileUpdate {
                study_year: Some(StudyYear::Second),
                skills: Some(vec!["Rust".into()]),
                ..Default::default()
            },
        )
        .unwrap();

    assert_eq!(updated.name, "Arjun");
    assert_eq!(updated.study_year, StudyYear::Second);
    assert_eq!(updated.skills, vec!["Rust"]);
    assert_eq!(updated.hobbies, vec!["Cricket"]);
    assert_eq!(updated.created_at, before.created_at);
    assert!(updated.updated_at > before.updated_at);

    assert_eq!(db.get_profile(id).unwrap(), updated);
}

#[test]
fn test_update_missing_profile_is_not_found() {
    let db = open_db();
    let err = db
        .update_profile(
            UserId::new(5),
            ProfileUpdate {
                name: Some("Nobody".into()),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_update_does_not_change_order() {
    let db = open_db();
    let a = db.create_profile(student("A")).unwrap();
    db.create_profile(student("B")).unwrap();

    db.update_profile(
        a,
        ProfileUpdate {
            name: Some("A2".into()),
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(names(&db), vec!["A2", "B"]);
}

#[test]
fn test_invalid_update_leaves_profile_untouched() {
    let db = open_db();
    let id = db.create_profile(student("Stable")).unwrap();

    let err = db
        .update_profile(
            id,
            ProfileUpdate::facet(FacetKind::Interest, vec!["".into()]),
        )
        .unwrap_err();
    assert!(err.is_validation());
    assert!(db.get_profile(id).unwrap().interests.is_empty());
}

// ============================================================================
// Facet editing
// ============================================================================

#[test]
fn test_add_and_remove_facet_values() {
    let db = open_db();
    let id = db.create_profile(student("Farah")).unwrap();

    for kind in FacetKind::ALL {
        let p = db.add_facet_value(id, kind, "Robotics").unwrap();
        assert_eq!(p.facet(kind), ["Robotics".to_string()]);

        let p = db.add_facet_value(id, kind, "ROBOTICS").unwrap();
        assert_eq!(p.facet(kind).len(), 1, "{} add should be idempotent", kind);

        let p = db.remove_facet_value(id, kind, "robotics").unwrap();
        assert!(p.facet(kind).is_empty());
    }
}

#[test]
fn test_add_facet_value_respects_limit() {
    let db = CampusDB::open_in_memory(Config {
        max_facet_entries: 1,
        ..Default::default()
    })
    .unwrap();
    let id = db.create_profile(student("Limited")).unwrap();

    db.add_facet_value(id, FacetKind::Skill, "Go").unwrap();
    let err = db.add_facet_value(id, FacetKind::Skill, "Rust").unwrap_err();
    assert!(matches!(
        err,
        CampusError::Validation(ValidationError::TooManyItems { .. })
    ));
}

#[test]
fn test_facet_edit_on_missing_profile() {
    let db = open_db();
    let err = db
        .add_facet_value(UserId::new(9), FacetKind::Hobby, "Chess")
        .unwrap_err();
    assert!(err.is_not_found());
}

// ============================================================================
// Delete
// ============================================================================

#[test]
fn test_delete_profile() {
    let db = open_db();
    let a = db.create_profile(student("A")).unwrap();
    let b = db.create_profile(student("B")).unwrap();

    assert!(db.delete_profile(a).unwrap());
    assert!(!db.delete_profile(a).unwrap());

    assert!(db.get_profile(a).unwrap_err().is_not_found());
    assert_eq!(names(&db), vec!["B"]);

    // Deleted ids are not handed out again.
    let c = db.create_profile(student("C")).unwrap();
    assert!(c > b);
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn test_profiles_and_order_survive_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("directory.db");

    let db = CampusDB::open(&path, Config::default()).unwrap();
    db.create_profile(NewUserProfile {
        id: Some(UserId::new(90)),
        ..student("Late id, first in line")
    })
    .unwrap();
    let assigned = db.create_profile(student("Second")).unwrap();
    db.close().unwrap();

    let db = CampusDB::open(&path, Config::default()).unwrap();
    assert_eq!(names(&db), vec!["Late id, first in line", "Second"]);

    let next = db.create_profile(student("Third")).unwrap();
    assert!(next > assigned);
    db.close().unwrap();
}
