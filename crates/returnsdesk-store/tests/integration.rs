use chrono::{NaiveDate, NaiveDateTime};
use parking_lot::Mutex;
use proptest::prelude::*;
use rand::rngs::mock::StepRng;
use regex::Regex;
use returnsdesk_model::{FixedClock, IdGenerator, Report, ReportDraft, ReportFields};
use returnsdesk_store::{
    load_list, ActivityLog, Confirmation, DurableStore, FileStore, MemoryStore, RecordStore,
    StoreError, ARCHIVE_BLOB, REPORTS_BLOB,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

fn open_memory() -> (Arc<MemoryStore>, FixedClock, RecordStore) {
    let backend = Arc::new(MemoryStore::new());
    let clock = FixedClock::new(start());
    let store = RecordStore::open_default(backend.clone(), Arc::new(clock.clone())).unwrap();
    (backend, clock, store)
}

fn draft(id: &str, client: &str) -> ReportDraft {
    ReportDraft {
        id: Some(id.to_string()),
        fields: ReportFields {
            client: client.to_string(),
            ..Default::default()
        },
        timestamp: None,
    }
}

/// Backend whose writes can be switched to fail, either at once or after
/// a number of successful writes.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    failing: AtomicBool,
    write_budget: Mutex<Option<usize>>,
}

impl DurableStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let exhausted = {
            let mut budget = self.write_budget.lock();
            match budget.as_mut() {
                Some(0) => true,
                Some(left) => {
                    *left -= 1;
                    false
                }
                None => false,
            }
        };
        if exhausted || self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk full",
            )));
        }
        self.inner.set(key, value)
    }
}

#[test]
fn test_save_appends_and_stamps_now() {
    let (_, clock, mut store) = open_memory();
    let mut first = draft("R-1", "Acme");
    first.timestamp = Some("1999-01-01 00:00:00".into());
    store.save_report(first).unwrap();
    clock.advance_secs(1);
    store.save_report(draft("R-2", "Beta")).unwrap();

    let ids: Vec<&str> = store.snapshot().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["R-1", "R-2"]);
    assert_eq!(store.snapshot()[0].timestamp, "2024-06-01 09:00:00");
    assert_eq!(store.snapshot()[1].timestamp, "2024-06-01 09:00:01");
}

#[test]
fn test_save_existing_id_replaces_in_place() {
    let (_, clock, mut store) = open_memory();
    store.save_report(draft("R-1", "Acme")).unwrap();
    store.save_report(draft("R-2", "Beta")).unwrap();
    store.save_report(draft("R-3", "Gamma")).unwrap();

    clock.advance_secs(30);
    store.save_report(draft("R-2", "Beta Updated")).unwrap();

    assert_eq!(store.snapshot().len(), 3);
    let updated = &store.snapshot()[1];
    assert_eq!(updated.id, "R-2");
    assert_eq!(updated.fields.client, "Beta Updated");
    assert_eq!(updated.timestamp, "2024-06-01 09:00:30");
    assert!(store.activity_entries()[0].ends_with("Report updated: R-2"));
}

#[test]
fn test_save_blank_id_generates_brand_seeded_id() {
    let (_, _, mut store) = open_memory();
    let report = store
        .save_report(ReportDraft {
            id: Some(String::new()),
            fields: ReportFields {
                client: "Acme".into(),
                brand: "Bosch".into(),
                ..Default::default()
            },
            timestamp: None,
        })
        .unwrap();

    let pattern = Regex::new(r"^R-\d{8}-\d{6}(-Bosch)?$").unwrap();
    assert!(pattern.is_match(&report.id), "unexpected id {}", report.id);
    assert!(!report.timestamp.is_empty());
    assert_eq!(store.snapshot().len(), 1);
}

#[test]
fn test_generate_id_twice_in_same_second_differs() {
    let (_, _, mut store) = open_memory();
    let first = store.save_report(draft("", "a")).unwrap();
    let second = store.generate_id("");
    assert_ne!(first.id, second);
    assert!(second.starts_with("R-20240601-090000-"));
}

#[test]
fn test_generate_id_exhaustion_returns_colliding_id() {
    let backend = Arc::new(MemoryStore::new());
    let clock: Arc<FixedClock> = Arc::new(FixedClock::new(start()));
    let log = ActivityLog::open(backend.clone(), clock.clone()).unwrap();
    let mut store = RecordStore::open(
        backend,
        log,
        clock,
        IdGenerator::with_rng(StepRng::new(0, 0)),
    )
    .unwrap();

    store.save_report(draft("R-20240601-090000", "a")).unwrap();
    store.save_report(draft("R-20240601-090000-000", "b")).unwrap();

    // Known limitation: after the retry cap the colliding candidate comes back.
    assert_eq!(store.generate_id(""), "R-20240601-090000-000");
}

#[test]
fn test_delete_absent_id_is_a_logged_no_op() {
    let (backend, _, mut store) = open_memory();
    store.save_report(draft("R-1", "Acme")).unwrap();
    let before = store.snapshot().to_vec();
    let writes_before = backend.writes();

    assert!(!store.delete_report("R-404").unwrap());
    assert_eq!(store.snapshot(), before.as_slice());
    // Only the activity log was written.
    assert_eq!(backend.writes(), writes_before + 1);
    let persisted: Vec<Report> = load_list(backend.as_ref(), REPORTS_BLOB).unwrap();
    assert_eq!(persisted, before);
    assert!(store.activity_entries()[0].contains("R-404"));
}

#[test]
fn test_delete_removes_and_persists() {
    let (backend, _, mut store) = open_memory();
    store.save_report(draft("R-1", "Acme")).unwrap();
    store.save_report(draft("R-2", "Beta")).unwrap();

    assert!(store.delete_report("R-1").unwrap());

    let persisted: Vec<Report> = load_list(backend.as_ref(), REPORTS_BLOB).unwrap();
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0].id, "R-2");
}

#[test]
fn test_clear_all_requires_confirmation() {
    let (_, _, mut store) = open_memory();
    store.save_report(draft("R-1", "Acme")).unwrap();

    assert!(!store.clear_all(Confirmation::Declined).unwrap());
    assert_eq!(store.snapshot().len(), 1);

    assert!(store.clear_all(Confirmation::Confirmed).unwrap());
    assert!(store.snapshot().is_empty());
    assert!(store.activity_entries()[0].ends_with("All reports deleted"));
}

#[test]
fn test_auto_archive_keeps_newest_threshold() {
    let (backend, clock, mut store) = open_memory();
    // Insert out of age order: R-c is oldest.
    for (id, offset) in [("R-a", 30), ("R-b", 40), ("R-c", 10), ("R-d", 50), ("R-e", 20)] {
        clock.set(start() + chrono::Duration::seconds(offset));
        store.save_report(draft(id, id)).unwrap();
    }

    let moved = store.auto_archive(2, Confirmation::Declined).unwrap();

    assert_eq!(moved, 3);
    let active: Vec<&str> = store.snapshot().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(active, vec!["R-b", "R-d"]);
    let archived: Vec<&str> = store.archive().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(archived, vec!["R-c", "R-e", "R-a"]);

    let persisted: Vec<Report> = load_list(backend.as_ref(), ARCHIVE_BLOB).unwrap();
    assert_eq!(persisted.len(), 3);
    assert!(store.activity_entries()[0].contains("3 reports moved"));
}

#[test]
fn test_auto_archive_below_threshold_is_no_op() {
    let (backend, _, mut store) = open_memory();
    store.save_report(draft("R-1", "a")).unwrap();
    store.save_report(draft("R-2", "b")).unwrap();
    let writes = backend.writes();

    assert_eq!(store.auto_archive(2, Confirmation::Confirmed).unwrap(), 0);
    assert_eq!(backend.writes(), writes);
    assert_eq!(store.snapshot().len(), 2);
}

#[test]
fn test_manual_archive_moves_everything_when_confirmed() {
    let (_, _, mut store) = open_memory();
    store.save_report(draft("R-1", "a")).unwrap();
    store.save_report(draft("R-2", "b")).unwrap();

    assert_eq!(store.auto_archive(0, Confirmation::Declined).unwrap(), 0);
    assert_eq!(store.snapshot().len(), 2);

    assert_eq!(store.auto_archive(0, Confirmation::Confirmed).unwrap(), 2);
    assert!(store.snapshot().is_empty());
    assert_eq!(store.archive().len(), 2);

    // Archive is appended to, never deduplicated.
    store.save_report(draft("R-1", "again")).unwrap();
    store.auto_archive(0, Confirmation::Confirmed).unwrap();
    assert_eq!(store.archive().len(), 3);
    assert_eq!(store.archive()[2].fields.client, "again");
}

#[test]
fn test_failed_write_keeps_last_good_state() {
    let backend = Arc::new(FlakyStore::default());
    let clock = FixedClock::new(start());
    let mut store = RecordStore::open_default(backend.clone(), Arc::new(clock)).unwrap();
    store.save_report(draft("R-1", "Acme")).unwrap();

    backend.failing.store(true, Ordering::SeqCst);
    let err = store.save_report(draft("R-2", "Beta")).unwrap_err();
    assert!(matches!(err, StoreError::Io(_)));
    assert!(store.delete_report("R-1").is_err());

    assert_eq!(store.snapshot().len(), 1);
    assert_eq!(store.snapshot()[0].id, "R-1");
}

#[test]
fn test_auto_archive_failed_active_write_keeps_lists_disjoint() {
    let backend = Arc::new(FlakyStore::default());
    let clock = FixedClock::new(start());
    let mut store = RecordStore::open_default(backend.clone(), Arc::new(clock)).unwrap();
    store.save_report(draft("R-1", "Acme")).unwrap();
    store.save_report(draft("R-2", "Beta")).unwrap();

    // The archive write succeeds, the active write fails.
    *backend.write_budget.lock() = Some(1);
    assert!(store.auto_archive(0, Confirmation::Confirmed).is_err());

    let active: Vec<&str> = store.snapshot().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(active, vec!["R-1", "R-2"]);
    assert!(store.archive().is_empty());

    *backend.write_budget.lock() = None;
    assert_eq!(store.auto_archive(0, Confirmation::Confirmed).unwrap(), 2);
    assert!(store.snapshot().is_empty());
    let archived: Vec<&str> = store.archive().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(archived, vec!["R-1", "R-2"]);

    let persisted: Vec<Report> = load_list(&backend.inner, ARCHIVE_BLOB).unwrap();
    assert_eq!(persisted.len(), 2);
}

#[test]
fn test_subscribers_receive_active_list() {
    let (_, _, mut store) = open_memory();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let sub = store.subscribe(move |reports: &[Report]| sink.lock().push(reports.len()));

    store.save_report(draft("R-1", "a")).unwrap();
    store.save_report(draft("R-2", "b")).unwrap();
    store.delete_report("R-1").unwrap();
    assert!(store.unsubscribe(sub));
    store.save_report(draft("R-3", "c")).unwrap();

    assert_eq!(*seen.lock(), vec![1, 2, 1]);
}

#[test]
fn test_file_store_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let clock = FixedClock::new(start());
    {
        let backend = Arc::new(FileStore::open(dir.path()).unwrap());
        let mut store = RecordStore::open_default(backend, Arc::new(clock.clone())).unwrap();
        store.save_report(draft("R-1", "Acme")).unwrap();
        store.save_report(draft("R-2", "Beta")).unwrap();
        store.auto_archive(1, Confirmation::Declined).unwrap();
    }

    let backend = Arc::new(FileStore::open(dir.path()).unwrap());
    let store = RecordStore::open_default(backend, Arc::new(clock)).unwrap();
    assert_eq!(store.snapshot().len(), 1);
    assert_eq!(store.archive().len(), 1);
    assert!(!store.activity_entries().is_empty());

    let raw = std::fs::read_to_string(dir.path().join("reports.json")).unwrap();
    assert!(raw.contains("\"orderNumber\""));
}

#[test]
fn test_corrupt_blob_fails_open() {
    let backend = Arc::new(MemoryStore::new());
    backend.set(REPORTS_BLOB, b"not json").unwrap();
    let err = RecordStore::open_default(backend, Arc::new(FixedClock::new(start()))).unwrap_err();
    assert!(matches!(err, StoreError::Corrupt { .. }));
}

proptest! {
    #[test]
    fn prop_distinct_ids_give_matching_length(ids in proptest::collection::vec("[A-Z]{1,4}", 0..20)) {
        let (_, _, mut store) = open_memory();
        for id in &ids {
            store.save_report(draft(id, "x")).unwrap();
        }
        let distinct: HashSet<&String> = ids.iter().collect();
        prop_assert_eq!(store.snapshot().len(), distinct.len());
    }
}
