//! 存储故障测试 - 读操作重试一次，写操作从不重试
//!
//! `FlakyStore` 包装内存存储：前 N 次调用返回 `LockTimeout`，并按方法计数。

use kiosk_engine::store::{AppendOutcome, StoreError, StoreResult, StoreSnapshot};
use kiosk_engine::{
    EngineError, ManualClock, MemoryStore, OccupancyAggregator, StatusClassifier, VenueStore,
    VenueTime, VisitLedger, Waitlist,
};
use parking_lot::Mutex;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    EntryId, HourlyHistogram, Visit, VisitDraft, WaitlistDraft, WaitlistEntry,
    WaitlistEntryCreate,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    failures_left: AtomicUsize,
    calls: Mutex<HashMap<&'static str, usize>>,
}

impl FlakyStore {
    fn failing(times: usize) -> Arc<Self> {
        let store = Self::default();
        store.failures_left.store(times, Ordering::SeqCst);
        Arc::new(store)
    }

    fn calls(&self, method: &str) -> usize {
        self.calls.lock().get(method).copied().unwrap_or(0)
    }

    fn enter(&self, method: &'static str) -> StoreResult<()> {
        *self.calls.lock().entry(method).or_insert(0) += 1;
        let failed = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            Err(StoreError::LockTimeout(Duration::from_millis(1)))
        } else {
            Ok(())
        }
    }
}

impl VenueStore for FlakyStore {
    fn append_visit(&self, draft: VisitDraft, debounce_ms: i64) -> StoreResult<AppendOutcome> {
        self.enter("append_visit")?;
        self.inner.append_visit(draft, debounce_ms)
    }

    fn count_visits_after(&self, threshold_ms: i64) -> StoreResult<u64> {
        self.enter("count_visits_after")?;
        self.inner.count_visits_after(threshold_ms)
    }

    fn hourly_counts(&self) -> StoreResult<HourlyHistogram> {
        self.enter("hourly_counts")?;
        self.inner.hourly_counts()
    }

    fn visits_between(&self, start_ms: i64, end_ms: i64) -> StoreResult<Vec<Visit>> {
        self.enter("visits_between")?;
        self.inner.visits_between(start_ms, end_ms)
    }

    fn visit_count(&self) -> StoreResult<u64> {
        self.enter("visit_count")?;
        self.inner.visit_count()
    }

    fn insert_entry(&self, draft: WaitlistDraft) -> StoreResult<WaitlistEntry> {
        self.enter("insert_entry")?;
        self.inner.insert_entry(draft)
    }

    fn remove_entries_named(&self, name: &str) -> StoreResult<usize> {
        self.enter("remove_entries_named")?;
        self.inner.remove_entries_named(name)
    }

    fn remove_entry(&self, id: EntryId) -> StoreResult<Option<WaitlistEntry>> {
        self.enter("remove_entry")?;
        self.inner.remove_entry(id)
    }

    fn list_entries(&self) -> StoreResult<Vec<WaitlistEntry>> {
        self.enter("list_entries")?;
        self.inner.list_entries()
    }

    fn total_party_size(&self) -> StoreResult<u64> {
        self.enter("total_party_size")?;
        self.inner.total_party_size()
    }

    fn snapshot(&self, recent_after_ms: i64) -> StoreResult<StoreSnapshot> {
        self.enter("snapshot")?;
        self.inner.snapshot(recent_after_ms)
    }
}

fn ledger_on(store: Arc<FlakyStore>) -> VisitLedger {
    VisitLedger::new(
        store,
        Arc::new(ManualClock::new(0)),
        VenueTime::new(0).unwrap(),
        1_200,
    )
}

fn waitlist_on(store: Arc<FlakyStore>) -> Waitlist {
    Waitlist::new(store, Arc::new(ManualClock::new(0)))
}

#[test]
fn failed_scan_is_not_retried() {
    // One failure only: a retry would have succeeded and appended a visit
    let store = FlakyStore::failing(1);
    let ledger = ledger_on(store.clone());

    let err = ledger.record_scan(5_000).unwrap_err();
    assert!(matches!(err, EngineError::LedgerUnavailable(_)));
    assert!(err.is_retryable());
    assert_eq!(store.calls("append_visit"), 1);
    assert_eq!(ledger.total_visits().unwrap(), 0);

    let app: AppError = err.into();
    assert_eq!(app.code, ErrorCode::VisitLedgerUnavailable);
    assert_eq!(app.http_status().as_u16(), 503);
}

#[test]
fn failed_add_is_not_retried() {
    let store = FlakyStore::failing(1);
    let waitlist = waitlist_on(store.clone());

    let err = waitlist
        .add(WaitlistEntryCreate::new("Alice", 2, 10))
        .unwrap_err();
    assert!(matches!(err, EngineError::StoreUnavailable(_)));
    assert_eq!(store.calls("insert_entry"), 1);
    assert!(waitlist.list().unwrap().is_empty());

    let app: AppError = err.into();
    assert_eq!(app.code, ErrorCode::StoreUnavailable);
}

#[test]
fn recent_count_succeeds_on_second_attempt() {
    let store = FlakyStore::failing(0);
    let ledger = ledger_on(store.clone());
    ledger.record_scan(1_000).unwrap();

    store.failures_left.store(1, Ordering::SeqCst);
    let recent = ledger
        .recent_count(Duration::from_millis(10_000), 2_000)
        .unwrap();
    assert_eq!(recent, 1);
    assert_eq!(store.calls("count_visits_after"), 2);
}

#[test]
fn list_succeeds_on_second_attempt() {
    let store = FlakyStore::failing(0);
    let waitlist = waitlist_on(store.clone());
    waitlist.add(WaitlistEntryCreate::new("Bob", 4, 15)).unwrap();

    store.failures_left.store(1, Ordering::SeqCst);
    let entries = waitlist.list().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(store.calls("list_entries"), 2);
}

#[test]
fn snapshot_gives_up_after_two_attempts() {
    let store = FlakyStore::failing(5);
    let aggregator =
        OccupancyAggregator::new(store.clone(), 600_000, StatusClassifier::default(), 11..=21);

    let err = aggregator.snapshot(1_000).unwrap_err();
    assert!(matches!(err, EngineError::StoreUnavailable(_)));
    assert_eq!(store.calls("snapshot"), 2);
    // Budget left untouched beyond the two attempts
    assert_eq!(store.failures_left.load(Ordering::SeqCst), 3);
}
