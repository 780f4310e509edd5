//! Fuzz search criteria against a small fixed directory.

#![no_main]

use campuslink::{CampusDB, Config, NewUserProfile, SearchCriteria, StudyYear, UserId};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let mut parts = text.split('\n');

    let db = CampusDB::open_in_memory(Config::default()).unwrap();
    for (name, skill) in [("Rahul Sharma", "React"), ("Priya Patel", "Figma")] {
        db.create_profile(NewUserProfile {
            name: name.into(),
            course: "B.Tech".into(),
            skills: vec![skill.into()],
            ..Default::default()
        })
        .unwrap();
    }

    let year = parts
        .next()
        .and_then(|raw| StudyYear::parse_filter(raw).ok())
        .flatten();
    let criteria = SearchCriteria::query(parts.next().unwrap_or_default())
        .with_study_year(year)
        .with_skill(parts.next().unwrap_or_default())
        .with_hobby(parts.next().unwrap_or_default())
        .with_interest(parts.next().unwrap_or_default());

    let results = db.search_profiles(UserId::new(1), &criteria).unwrap();
    assert!(results.len() <= 2);
    if criteria.is_unfiltered() {
        assert_eq!(results.len(), 2);
    }
});
