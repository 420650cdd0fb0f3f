use super::common::*;
use serde_json::json;
use std::sync::Arc;

use crate::records::domain::{
    Achievement, Collection, EnrichmentEvent, LeadershipPosition, ParticipationUpdate,
    ProfileUpdate, RecordId, ServiceEvent, StudentProfile,
};
use crate::records::repository::{PublishError, RepositoryError};
use crate::records::{ActivityService, ActivityServiceError, InvalidRecord};
use crate::rules::{
    AttainmentState, Domain, Level, ParticipationError, Representation, ServiceType,
};

#[test]
fn adding_leadership_recomputes_and_publishes() {
    let (service, _, publisher) = build_service();
    let user = student();

    let mutation = service
        .add_record::<LeadershipPosition>(&user, leadership("SC President"))
        .expect("position stored");

    let record = mutation.record.expect("record returned");
    assert_eq!(record.level, Level::of(5));
    let update = mutation.update.expect("leadership feeds a domain");
    assert_eq!(update.domain, Domain::Leadership);
    assert_eq!(update.domain_level, Level::of(5));

    let events = publisher.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0], update);
}

#[test]
fn stored_level_is_ignored_on_read() {
    let (service, store, _) = build_service();
    let user = student();
    store.put_raw(
        &user,
        Collection::Leadership,
        "leadership-tampered",
        json!({ "name": "Class Chairperson", "year": 2024, "level": 5 }),
    );

    let positions = service
        .records::<LeadershipPosition>(&user)
        .expect("positions listed");
    assert_eq!(positions.len(), 1);
    assert_eq!(positions[0].level, Level::of(3));
}

#[test]
fn leadership_round_trip_is_stable() {
    let (service, store, _) = build_service();
    let user = student();
    service
        .add_record::<LeadershipPosition>(&user, leadership("Senior House Captain"))
        .expect("stored");

    let first = service
        .records::<LeadershipPosition>(&user)
        .expect("first read");
    let second = service
        .records::<LeadershipPosition>(&user)
        .expect("second read");
    assert_eq!(first, second);

    let raw = store.raw(&user, Collection::Leadership);
    assert_eq!(raw[0].body["level"], json!(4));
}

#[test]
fn malformed_documents_are_skipped() {
    let (service, store, _) = build_service();
    let user = student();
    store.put_raw(
        &user,
        Collection::ServiceEvents,
        "serviceEvents-broken",
        json!({ "name": "Food drive", "hours": "six" }),
    );
    service
        .add_record::<ServiceEvent>(&user, service_event(6, ServiceType::Via))
        .expect("stored");

    let events = service.records::<ServiceEvent>(&user).expect("listed");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, ServiceType::Via);
}

#[test]
fn blank_names_are_rejected_before_writing() {
    let (service, store, publisher) = build_service();
    let user = student();

    match service.add_record::<LeadershipPosition>(&user, leadership("   ")) {
        Err(ActivityServiceError::InvalidRecord(InvalidRecord::Blank("name"))) => {}
        other => panic!("expected blank name rejection, got {other:?}"),
    }
    assert!(store.raw(&user, Collection::Leadership).is_empty());
    assert!(publisher.events().is_empty());
}

#[test]
fn current_leadership_prefers_first_of_equal_levels() {
    let (service, _, _) = build_service();
    let user = student();
    for name in ["Class Exco", "Senior SC", "Senior DC"] {
        service
            .add_record::<LeadershipPosition>(&user, leadership(name))
            .expect("stored");
    }

    let report = service.report(&user).expect("report builds");
    assert_eq!(report.leadership.position, "Senior SC");
    assert_eq!(report.leadership.level, Level::of(4));
}

#[test]
fn deleting_the_only_position_resets_leadership() {
    let (service, _, publisher) = build_service();
    let user = student();
    let added = service
        .add_record::<LeadershipPosition>(&user, leadership("SC President"))
        .expect("stored")
        .record
        .expect("record returned");

    let removed = service
        .remove_record::<LeadershipPosition>(&user, &added.id)
        .expect("removed");
    assert!(removed.record.is_none());
    assert_eq!(
        removed.update.expect("recomputed").domain_level,
        Level::ZERO
    );
    assert_eq!(publisher.events().len(), 2);

    let report = service.report(&user).expect("report builds");
    assert_eq!(report.leadership.position, "No role");
}

#[test]
fn updating_unknown_record_is_not_found() {
    let (service, _, publisher) = build_service();
    let user = student();

    match service.update_record::<ServiceEvent>(
        &user,
        &RecordId("serviceEvents-missing".to_string()),
        service_event(10, ServiceType::Others),
    ) {
        Err(ActivityServiceError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
    assert!(publisher.events().is_empty());
}

#[test]
fn updating_a_record_replaces_it() {
    let (service, _, _) = build_service();
    let user = student();
    let added = service
        .add_record::<Achievement>(&user, achievement(Representation::IntraSchool, "1 year"))
        .expect("stored")
        .record
        .expect("record returned");

    let mutation = service
        .update_record::<Achievement>(
            &user,
            &added.id,
            achievement(Representation::SchoolExternal, "1 year"),
        )
        .expect("replaced");
    assert_eq!(mutation.update.expect("recomputed").domain_level, Level::of(2));

    let achievements = service.records::<Achievement>(&user).expect("listed");
    assert_eq!(achievements.len(), 1);
    assert_eq!(achievements[0].level, Level::of(3));
}

#[test]
fn achievements_list_highest_level_first() {
    let (service, _, _) = build_service();
    let user = student();
    for representation in [
        Representation::IntraSchool,
        Representation::National,
        Representation::SchoolExternal,
    ] {
        service
            .add_record::<Achievement>(&user, achievement(representation, "1 year"))
            .expect("stored");
    }

    let levels: Vec<u8> = service
        .records::<Achievement>(&user)
        .expect("listed")
        .iter()
        .map(|achievement| achievement.level.value())
        .collect();
    assert_eq!(levels, [5, 3, 1]);
}

#[test]
fn enrichment_changes_do_not_publish() {
    let (service, _, publisher) = build_service();
    let user = student();

    let mutation = service
        .add_record::<EnrichmentEvent>(&user, enrichment("Museum visit"))
        .expect("stored");
    assert!(mutation.update.is_none());
    assert!(publisher.events().is_empty());

    let report = service.report(&user).expect("report builds");
    assert_eq!(report.enrichment_count, 1);
}

#[test]
fn participation_defaults_when_nothing_stored() {
    let (service, _, _) = build_service();
    let record = service.participation(&student()).expect("read");
    assert_eq!(record.attendance_percent, 0);
    assert_eq!(record.years_in_cca, 1);
    assert_eq!(record.level, Level::ZERO);
}

#[test]
fn participation_update_recomputes_level() {
    let (service, _, publisher) = build_service();
    let user = student();

    let mutation = service
        .update_participation(
            &user,
            ParticipationUpdate {
                attendance_percent: 90,
                years_in_cca: 4,
            },
        )
        .expect("stored");
    assert_eq!(mutation.record.expect("record").level, Level::of(3));

    let events = publisher.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].domain, Domain::Participation);
    assert_eq!(
        service.participation(&user).expect("read").level,
        Level::of(3)
    );
}

#[test]
fn out_of_range_participation_writes_nothing() {
    let (service, _, publisher) = build_service();
    let user = student();

    match service.update_participation(
        &user,
        ParticipationUpdate {
            attendance_percent: 120,
            years_in_cca: 3,
        },
    ) {
        Err(ActivityServiceError::Participation(ParticipationError::OutOfRange {
            field, ..
        })) => assert_eq!(field, "attendance_percent"),
        other => panic!("expected range error, got {other:?}"),
    }

    assert_eq!(
        service.participation(&user).expect("read").attendance_percent,
        0
    );
    assert!(publisher.events().is_empty());
}

#[test]
fn profile_updates_merge_with_defaults() {
    let (service, _, _) = build_service();
    let user = student();
    assert_eq!(service.profile(&user).expect("read"), StudentProfile::default());

    let profile = service
        .update_profile(
            &user,
            ProfileUpdate {
                name: Some("Tan Wei Ling".to_string()),
                house: Some("Red".to_string()),
                ..ProfileUpdate::default()
            },
        )
        .expect("updated");
    assert_eq!(profile.name, "Tan Wei Ling");
    assert_eq!(profile.house, "Red");
    assert_eq!(profile.cca, "My CCA");
    assert_eq!(profile.year, 2025);

    let again = service
        .update_profile(
            &user,
            ProfileUpdate {
                cca: Some("Robotics".to_string()),
                ..ProfileUpdate::default()
            },
        )
        .expect("updated");
    assert_eq!(again.name, "Tan Wei Ling");
    assert_eq!(again.cca, "Robotics");
}

#[test]
fn profile_edits_keep_participation_fields() {
    let (service, _, _) = build_service();
    let user = student();
    service
        .update_participation(
            &user,
            ParticipationUpdate {
                attendance_percent: 80,
                years_in_cca: 2,
            },
        )
        .expect("stored");
    service
        .update_profile(
            &user,
            ProfileUpdate {
                name: Some("Lim".to_string()),
                ..ProfileUpdate::default()
            },
        )
        .expect("updated");

    let record = service.participation(&user).expect("read");
    assert_eq!(record.attendance_percent, 80);
    assert_eq!(record.level, Level::of(1));
}

#[test]
fn report_combines_all_domains() {
    let (service, _, _) = build_service();
    let user = student();
    service
        .add_record::<LeadershipPosition>(&user, leadership("Class Vice-Chairperson"))
        .expect("stored");
    for year in ["1 year", "2 years"] {
        service
            .add_record::<Achievement>(&user, achievement(Representation::National, year))
            .expect("stored");
    }
    service
        .add_record::<ServiceEvent>(&user, service_event(30, ServiceType::Via))
        .expect("stored");
    service
        .add_record::<ServiceEvent>(&user, service_event(10, ServiceType::Via))
        .expect("stored");
    service
        .update_participation(
            &user,
            ParticipationUpdate {
                attendance_percent: 95,
                years_in_cca: 6,
            },
        )
        .expect("stored");

    let report = service.report(&user).expect("report builds");
    assert_eq!(report.levels.leadership, Level::of(3));
    assert_eq!(report.levels.achievement, Level::of(5));
    assert_eq!(report.levels.service, Level::of(4));
    assert_eq!(report.levels.participation, Level::of(5));
    assert_eq!(report.rating.state, AttainmentState::Excellent);
    assert_eq!(report.rating.points, 2);
    assert_eq!(report.service.total_hours, 40);
    assert_eq!(report.achievements.national, 2);
    assert_eq!(report.distribution.level_five, 2);
    assert_eq!(report.distribution.level_four, 1);
    assert_eq!(report.distribution.level_three, 1);
}

#[test]
fn publish_failures_surface_after_the_write() {
    let store = Arc::new(MemoryStore::default());
    let service = ActivityService::new(store.clone(), Arc::new(OfflinePublisher));
    let user = student();

    match service.add_record::<LeadershipPosition>(&user, leadership("Junior SC")) {
        Err(ActivityServiceError::Publish(PublishError::Transport(_))) => {}
        other => panic!("expected publish error, got {other:?}"),
    }
    assert_eq!(store.raw(&user, Collection::Leadership).len(), 1);
}

#[test]
fn unavailable_store_propagates() {
    let service = ActivityService::new(
        Arc::new(UnavailableStore),
        Arc::new(RecordingPublisher::default()),
    );

    match service.report(&student()) {
        Err(ActivityServiceError::Repository(RepositoryError::Unavailable(_))) => {}
        other => panic!("expected unavailable, got {other:?}"),
    }
}
