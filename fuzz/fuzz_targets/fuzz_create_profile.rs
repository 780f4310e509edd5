//! Fuzz profile creation and facet editing with arbitrary text.
//!
//! Every input must either be stored or rejected with a typed error;
//! nothing may panic.

#![no_main]

use campuslink::{CampusDB, Config, FacetKind, NewUserProfile, StudyYear};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let mut fields = text.split('\n');

    let name = fields.next().unwrap_or_default().to_string();
    let course = fields.next().unwrap_or_default().to_string();
    let rest: Vec<String> = fields.map(str::to_string).collect();
    let year = StudyYear::ALL[data.first().copied().unwrap_or(0) as usize % StudyYear::ALL.len()];

    let db = CampusDB::open_in_memory(Config::default()).unwrap();
    let created = db.create_profile(NewUserProfile {
        name: name.clone(),
        course,
        study_year: year,
        skills: rest.clone(),
        bio: name,
        ..Default::default()
    });

    if let Ok(id) = created {
        let profile = db.get_profile(id).unwrap();
        assert_eq!(profile.skills, rest);

        for value in &rest {
            let _ = db.add_facet_value(id, FacetKind::Hobby, value);
            let _ = db.remove_facet_value(id, FacetKind::Skill, value);
        }
    }
});
