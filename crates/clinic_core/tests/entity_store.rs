mod common;

use clinic_core::{
    Appointment, AppointmentStatus, AppointmentStore, ClinicStores, ConsultationNote,
    ConsultationNoteStore, Entity, PatientStore, RecordStore, SyncOutcome,
};
use common::{appointment, patient, psychologist, sqlite_store, FlakyStore, GatedStore};
use std::time::Duration;

async fn seeded_appointments(ids_and_dates: &[(&str, &str)]) -> AppointmentStore {
    let store = AppointmentStore::new(sqlite_store());
    for (id, date) in ids_and_dates {
        assert_eq!(store.add(&appointment(id, date)).await, SyncOutcome::Applied);
    }
    store
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..1_000 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    panic!("condition not reached in time");
}

#[tokio::test]
async fn add_appends_the_record_returned_by_the_remote() {
    let store = AppointmentStore::new(sqlite_store());
    assert!(store.is_empty());

    let outcome = store.add(&appointment("", "2024-03-10")).await;

    assert_eq!(outcome, SyncOutcome::Applied);
    let snapshot = store.snapshot();
    assert_eq!(snapshot.collection.len(), 1);
    assert!(!snapshot.is_loading);
    assert_eq!(snapshot.error, None);

    let stored = &snapshot.collection[0];
    assert!(!stored.id.is_empty(), "remote assigns an id");
    assert_eq!(stored.date, "2024-03-10");
    assert_eq!(store.get(&stored.id).as_ref(), Some(stored));
}

#[tokio::test]
async fn add_assigns_created_at_to_notes() {
    let store = ConsultationNoteStore::new(sqlite_store());
    let note = ConsultationNote::new("note-1", "appt-1", "psy-1", "2024-03-10", "Primeira sessão");

    assert_eq!(store.add(&note).await, SyncOutcome::Applied);

    let stored = store.get("note-1").unwrap();
    assert!(stored.created_at.is_some());
    assert_eq!(stored.content, "Primeira sessão");
}

#[tokio::test]
async fn failed_add_keeps_collection_and_reports_error() {
    let remote = FlakyStore::new();
    let store = AppointmentStore::new(remote.clone());
    assert_eq!(store.add(&appointment("1", "2024-03-10")).await, SyncOutcome::Applied);
    let before = store.collection();

    remote.set_failing(true);
    let outcome = store.add(&appointment("2", "2024-03-11")).await;

    assert!(outcome.is_failed());
    assert_eq!(store.collection(), before);
    let error = store.error().expect("error is recorded");
    assert!(error.contains("connection reset by peer"), "{error}");
    assert!(!store.is_loading());
    assert_eq!(remote.calls(), 2);
}

#[tokio::test]
async fn next_operation_clears_previous_error() {
    let remote = FlakyStore::new();
    let store = AppointmentStore::new(remote.clone());

    remote.set_failing(true);
    assert!(store.fetch().await.is_failed());
    assert!(store.error().is_some());

    remote.set_failing(false);
    assert_eq!(store.fetch().await, SyncOutcome::Applied);
    assert_eq!(store.error(), None);

    remote.set_failing(true);
    assert!(store.fetch().await.is_failed());
    store.clear_error();
    assert_eq!(store.error(), None);
}

#[tokio::test]
async fn failed_fetch_keeps_stale_collection_readable() {
    let remote = FlakyStore::new();
    let store = AppointmentStore::new(remote.clone());
    assert_eq!(store.add(&appointment("1", "2024-03-10")).await, SyncOutcome::Applied);
    assert_eq!(store.fetch().await, SyncOutcome::Applied);
    assert_eq!(store.len(), 1);

    remote.set_failing(true);
    assert!(store.fetch().await.is_failed());

    assert_eq!(store.len(), 1);
    assert_eq!(store.collection()[0].id, "1");
    assert!(store.error().is_some());
}

#[tokio::test]
async fn fetch_returns_collection_in_canonical_order() {
    let remote = sqlite_store();
    let writer = AppointmentStore::new(remote.clone());
    for (id, date) in [("c", "2024-03-12"), ("a", "2024-03-10"), ("b", "2024-03-11")] {
        assert_eq!(writer.add(&appointment(id, date)).await, SyncOutcome::Applied);
    }

    let reader = AppointmentStore::new(remote);
    assert_eq!(reader.fetch().await, SyncOutcome::Applied);

    let ids: Vec<String> = reader.collection().into_iter().map(|item| item.id).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn update_replaces_record_in_place() {
    let store = seeded_appointments(&[("1", "2024-03-10"), ("2", "2024-03-11"), ("3", "2024-03-12")])
        .await;

    let mut changed = store.get("2").unwrap();
    changed.status = AppointmentStatus::Completed;
    changed.date = "2024-03-30".to_string();
    assert_eq!(store.update(&changed).await, SyncOutcome::Applied);

    let collection = store.collection();
    let ids: Vec<&str> = collection.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"], "mutations never re-sort");
    assert_eq!(collection[1].status, AppointmentStatus::Completed);
    assert_eq!(collection[1].date, "2024-03-30");
}

#[tokio::test]
async fn update_of_locally_missing_id_still_writes_remote() {
    let remote = sqlite_store();
    remote
        .insert(
            Appointment::TABLE,
            serde_json::to_value(appointment("ghost", "2024-03-10")).unwrap(),
        )
        .await
        .unwrap();
    let store = AppointmentStore::new(remote.clone());

    let mut changed = appointment("ghost", "2024-03-10");
    changed.notes = Some("remarcado".to_string());
    let outcome = store.update(&changed).await;

    assert_eq!(outcome, SyncOutcome::MissingLocally);
    assert!(store.is_empty());
    assert_eq!(store.error(), None);

    assert_eq!(store.fetch().await, SyncOutcome::Applied);
    assert_eq!(store.get("ghost").unwrap().notes.as_deref(), Some("remarcado"));
}

#[tokio::test]
async fn update_of_unknown_remote_id_fails() {
    let store = seeded_appointments(&[("1", "2024-03-10")]).await;
    let before = store.collection();

    let outcome = store.update(&appointment("nope", "2024-03-10")).await;

    assert!(outcome.is_failed());
    assert_eq!(store.collection(), before);
    assert!(store.error().unwrap().contains("nope"));
}

#[tokio::test]
async fn delete_removes_record_and_tolerates_missing_ids() {
    let store = seeded_appointments(&[("1", "2024-03-10"), ("2", "2024-03-11")]).await;

    assert_eq!(store.delete("1").await, SyncOutcome::Applied);
    assert_eq!(store.get("1"), None);
    assert_eq!(store.len(), 1);

    assert_eq!(store.delete("1").await, SyncOutcome::MissingLocally);
    assert_eq!(store.len(), 1);
    assert_eq!(store.error(), None);

    assert_eq!(store.fetch().await, SyncOutcome::Applied);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn failed_delete_keeps_record() {
    let remote = FlakyStore::new();
    let store = AppointmentStore::new(remote.clone());
    assert_eq!(store.add(&appointment("1", "2024-03-10")).await, SyncOutcome::Applied);

    remote.set_failing(true);
    assert!(store.delete("1").await.is_failed());
    assert!(store.get("1").is_some());
}

#[tokio::test]
async fn date_queries_read_the_local_collection() {
    let store = seeded_appointments(&[
        ("1", "2024-03-09"),
        ("2", "2024-03-10"),
        ("3", "2024-03-10"),
        ("4", "2024-03-16"),
        ("5", "2024-03-17"),
    ])
    .await;

    let ids = |items: Vec<Appointment>| items.into_iter().map(|item| item.id).collect::<Vec<_>>();
    assert_eq!(ids(store.by_date("2024-03-10")), vec!["2", "3"]);
    assert_eq!(
        ids(store.on_day(chrono::NaiveDate::from_ymd_opt(2024, 3, 9).unwrap())),
        vec!["1"]
    );
    assert_eq!(
        ids(store.by_date_range("2024-03-10", "2024-03-16")),
        vec!["2", "3", "4"]
    );
    assert!(store.by_date("2024-04-01").is_empty());
}

#[tokio::test]
async fn notes_fetch_is_filtered_and_newest_first() {
    let remote = sqlite_store();
    let writer = ConsultationNoteStore::new(remote.clone());
    for (id, appointment_id) in [("n1", "appt-1"), ("n2", "appt-2"), ("n3", "appt-1")] {
        let note = ConsultationNote::new(id, appointment_id, "psy-1", "2024-03-10", "evolução");
        assert_eq!(writer.add(&note).await, SyncOutcome::Applied);
        tokio::time::sleep(Duration::from_millis(2)).await;
    }

    let reader = ConsultationNoteStore::new(remote);
    assert_eq!(reader.fetch_for_appointment("appt-1").await, SyncOutcome::Applied);

    let ids: Vec<String> = reader.collection().into_iter().map(|note| note.id).collect();
    assert_eq!(ids, vec!["n3", "n1"]);
    assert_eq!(reader.for_appointment("appt-2"), Vec::new());
    assert_eq!(writer.for_appointment("appt-2").len(), 1);
}

#[tokio::test]
async fn clinic_stores_fetch_calendar_collections() {
    let remote = sqlite_store();
    let stores = ClinicStores::new(remote.clone());
    assert_eq!(stores.patients.add(&patient("pat-1", "Ana Souza")).await, SyncOutcome::Applied);
    assert_eq!(
        stores.psychologists.add(&psychologist("psy-1", "Dr. Lima")).await,
        SyncOutcome::Applied
    );
    assert_eq!(
        stores.appointments.add(&appointment("1", "2024-03-10")).await,
        SyncOutcome::Applied
    );

    let fresh = ClinicStores::new(remote);
    let outcomes = fresh.fetch_calendar_data().await;

    assert_eq!(outcomes, [SyncOutcome::Applied; 3]);
    assert_eq!(fresh.appointments.len(), 1);
    assert_eq!(fresh.patients.len(), 1);
    assert_eq!(fresh.psychologists.len(), 1);
    assert!(fresh.notes.is_empty());
}

#[tokio::test]
async fn patient_store_orders_by_name() {
    let store = PatientStore::new(sqlite_store());
    for (id, name) in [("p1", "Carla"), ("p2", "Ana"), ("p3", "Bruno")] {
        assert_eq!(store.add(&patient(id, name)).await, SyncOutcome::Applied);
    }
    assert_eq!(store.fetch().await, SyncOutcome::Applied);

    let names: Vec<String> = store.collection().into_iter().map(|p| p.name).collect();
    assert_eq!(names, vec!["Ana", "Bruno", "Carla"]);
}

#[tokio::test]
async fn stale_failure_does_not_overwrite_newer_request() {
    let remote = GatedStore::new();
    let store = AppointmentStore::new(remote.clone());
    let release_first = remote.gate("first");
    let release_second = remote.gate("second");

    let first = appointment("first", "2024-03-10");
    let second = appointment("second", "2024-03-11");
    let (first_outcome, second_outcome, ()) = tokio::join!(
        store.add(&first),
        store.add(&second),
        async {
            wait_until(|| store.is_loading()).await;
            release_second.send(Ok(())).unwrap();
            wait_until(|| store.len() == 1).await;
            assert!(store.is_loading(), "first request is still in flight");
            release_first.send(Err("timeout".to_string())).unwrap();
        }
    );

    assert!(first_outcome.is_failed());
    assert_eq!(second_outcome, SyncOutcome::Applied);
    assert_eq!(store.error(), None, "older failure is suppressed");
    assert!(!store.is_loading());
    assert_eq!(store.collection()[0].id, "second");
}

#[tokio::test]
async fn latest_failure_sets_error_even_if_older_request_succeeds_later() {
    let remote = GatedStore::new();
    let store = AppointmentStore::new(remote.clone());
    let release_first = remote.gate("first");
    let release_second = remote.gate("second");

    let first = appointment("first", "2024-03-10");
    let second = appointment("second", "2024-03-11");
    let (first_outcome, second_outcome, ()) = tokio::join!(
        store.add(&first),
        store.add(&second),
        async {
            wait_until(|| store.is_loading()).await;
            release_second.send(Err("unavailable".to_string())).unwrap();
            wait_until(|| store.error().is_some()).await;
            release_first.send(Ok(())).unwrap();
        }
    );

    assert_eq!(first_outcome, SyncOutcome::Applied);
    assert!(second_outcome.is_failed());
    assert_eq!(store.len(), 1);
    assert!(store.error().unwrap().contains("unavailable"));
    assert!(!store.is_loading());
}

#[tokio::test]
async fn cancelled_operation_releases_loading_flag() {
    let remote = GatedStore::new();
    let store = AppointmentStore::new(remote.clone());
    let _held = remote.gate("select");

    let timed_out = tokio::time::timeout(Duration::from_millis(20), store.fetch()).await;

    assert!(timed_out.is_err());
    assert!(!store.is_loading());
    assert_eq!(store.error(), None);
    assert!(store.is_empty());
}
