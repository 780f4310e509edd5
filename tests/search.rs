//! Integration tests for directory search and facet enumeration.

use campuslink::{
    CampusDB, Config, FacetKind, NewUserProfile, SearchCriteria, StudyYear, UserId, ANY_FILTER,
};

struct Directory {
    db: CampusDB,
    rahul: UserId,
    priya: UserId,
    arjun: UserId,
}

/// Three students with overlapping facets.
fn directory() -> Directory {
    let db = CampusDB::open_in_memory(Config::default()).unwrap();

    let rahul = db
        .create_profile(NewUserProfile {
            name: "Rahul Sharma".into(),
            course: "B.Tech CSE".into(),
            study_year: StudyYear::Third,
            skills: vec!["React".into(), "Node.js".into()],
            hobbies: vec!["Gaming".into(), "Hiking".into()],
            interests: vec!["Web Development".into(), "AI".into()],
            bio: "Building things for the web".into(),
            ..Default::default()
        })
        .unwrap();

    let priya = db
        .create_profile(NewUserProfile {
            name: "Priya Patel".into(),
            course: "B.Des".into(),
            study_year: StudyYear::Second,
            skills: vec!["UI/UX".into(), "Figma".into()],
            hobbies: vec!["Sketching".into()],
            interests: vec!["Design Systems".into()],
            ..Default::default()
        })
        .unwrap();

    let arjun = db
        .create_profile(NewUserProfile {
            name: "Arjun Mehta".into(),
            course: "BBA".into(),
            study_year: StudyYear::Third,
            skills: vec!["react".into(), "Marketing".into()],
            hobbies: vec!["Gaming".into()],
            interests: vec!["Startups".into(), "AI".into()],
            ..Default::default()
        })
        .unwrap();

    Directory {
        db,
        rahul,
        priya,
        arjun,
    }
}

fn ids(db: &CampusDB, viewer: UserId, criteria: &SearchCriteria) -> Vec<UserId> {
    db.search_profiles(viewer, criteria)
        .unwrap()
        .into_iter()
        .map(|r| r.profile.id)
        .collect()
}

// ============================================================================
// Basic scenarios
// ============================================================================

#[test]
fn test_query_by_name() {
    let d = directory();
    let viewer = UserId::new(500);

    assert_eq!(ids(&d.db, viewer, &SearchCriteria::query("rahul")), vec![d.rahul]);
    assert_eq!(
        ids(&d.db, viewer, &SearchCriteria::default().with_skill("Figma")),
        vec![d.priya]
    );
    assert!(ids(&d.db, viewer, &SearchCriteria::query("zzz")).is_empty());
}

#[test]
fn test_connection_flags() {
    let d = directory();
    let viewer = d.arjun;

    d.db.add_connection(viewer, d.priya).unwrap();

    let results = d.db.search_profiles(viewer, &SearchCriteria::default()).unwrap();
    let flags: Vec<(UserId, bool)> = results
        .iter()
        .map(|r| (r.profile.id, r.is_connected))
        .collect();
    assert_eq!(
        flags,
        vec![(d.rahul, false), (d.priya, true), (d.arjun, false)]
    );
}

#[test]
fn test_unfiltered_search_is_full_listing() {
    let d = directory();

    let all: Vec<UserId> = d.db.list_profiles().unwrap().iter().map(|p| p.id).collect();

    let sentinels = SearchCriteria::query("")
        .with_study_year(StudyYear::parse_filter(ANY_FILTER).unwrap())
        .with_skill(ANY_FILTER)
        .with_hobby("")
        .with_interest(ANY_FILTER);

    assert_eq!(ids(&d.db, d.rahul, &sentinels), all);
    assert_eq!(ids(&d.db, d.rahul, &SearchCriteria::default()), all);
}

#[test]
fn test_empty_directory_returns_empty() {
    let db = CampusDB::open_in_memory(Config::default()).unwrap();
    let results = db
        .search_profiles(UserId::new(1), &SearchCriteria::query("anything"))
        .unwrap();
    assert!(results.is_empty());
}

#[test]
fn test_unknown_viewer_sees_no_connections() {
    let d = directory();
    let results = d
        .db
        .search_profiles(UserId::new(424242), &SearchCriteria::default())
        .unwrap();
    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|r| !r.is_connected));
}

// ============================================================================
// Matching rules
// ============================================================================

#[test]
fn test_query_matches_facet_substrings_case_insensitively() {
    let d = directory();
    let v = UserId::new(500);

    // "react" appears as a skill of Rahul ("React") and Arjun ("react").
    assert_eq!(ids(&d.db, v, &SearchCriteria::query("REAC")), vec![d.rahul, d.arjun]);
    // Hobby substring.
    assert_eq!(ids(&d.db, v, &SearchCriteria::query("sketch")), vec![d.priya]);
    // Interest substring shared by two profiles.
    assert_eq!(ids(&d.db, v, &SearchCriteria::query("ai")), vec![d.rahul, d.arjun]);
}

#[test]
fn test_query_ignores_course_and_bio() {
    let d = directory();
    let v = UserId::new(500);
    assert!(ids(&d.db, v, &SearchCriteria::query("b.tech")).is_empty());
    assert!(ids(&d.db, v, &SearchCriteria::query("for the web")).is_empty());
}

#[test]
fn test_skill_filter_is_case_insensitive_equality() {
    let d = directory();
    let v = UserId::new(500);

    let react = SearchCriteria::default().with_skill("REACT");
    assert_eq!(ids(&d.db, v, &react), vec![d.rahul, d.arjun]);

    let partial = SearchCriteria::default().with_skill("Rea");
    assert!(ids(&d.db, v, &partial).is_empty());
}

#[test]
fn test_study_year_filter() {
    let d = directory();
    let v = UserId::new(500);

    let third = SearchCriteria::default().with_study_year(StudyYear::Third);
    assert_eq!(ids(&d.db, v, &third), vec![d.rahul, d.arjun]);

    let first = SearchCriteria::default().with_study_year(StudyYear::First);
    assert!(ids(&d.db, v, &first).is_empty());
}

#[test]
fn test_study_year_filter_text_is_case_sensitive() {
    assert_eq!(
        StudyYear::parse_filter("3rd Year").unwrap(),
        Some(StudyYear::Third)
    );
    assert!(StudyYear::parse_filter("3RD YEAR").is_err());
    assert_eq!(StudyYear::parse_filter("").unwrap(), None);
}

#[test]
fn test_filters_combine_with_and() {
    let d = directory();
    let v = UserId::new(500);

    let criteria = SearchCriteria::default()
        .with_study_year(StudyYear::Third)
        .with_hobby("gaming")
        .with_interest("startups");
    assert_eq!(ids(&d.db, v, &criteria), vec![d.arjun]);

    let none = SearchCriteria::query("priya").with_study_year(StudyYear::Third);
    assert!(ids(&d.db, v, &none).is_empty());
}

#[test]
fn test_search_reflects_facet_edits() {
    let d = directory();
    let v = UserId::new(500);

    d.db.add_facet_value(d.priya, FacetKind::Skill, "React").unwrap();
    let react = SearchCriteria::default().with_skill("react");
    assert_eq!(ids(&d.db, v, &react), vec![d.rahul, d.priya, d.arjun]);

    d.db.remove_facet_value(d.rahul, FacetKind::Skill, "react").unwrap();
    assert_eq!(ids(&d.db, v, &react), vec![d.priya, d.arjun]);
}

// ============================================================================
// Facet values
// ============================================================================

#[test]
fn test_facet_values_are_distinct_case_sensitive_first_seen() {
    let d = directory();
    let values = d.db.facet_values().unwrap();

    assert_eq!(
        values.skills,
        vec!["React", "Node.js", "UI/UX", "Figma", "react", "Marketing"]
    );
    assert_eq!(values.hobbies, vec!["Gaming", "Hiking", "Sketching"]);
    assert_eq!(
        values.get(FacetKind::Interest),
        ["Web Development", "AI", "Design Systems", "Startups"]
    );
}

#[test]
fn test_study_year_options() {
    let labels: Vec<&str> = StudyYear::ALL.iter().map(|y| y.label()).collect();
    assert_eq!(
        labels,
        vec!["1st Year", "2nd Year", "3rd Year", "4th Year", "5th Year"]
    );
}
