//! In-memory venue store
//!
//! One `RwLock` guards visits, hour counts and the waitlist together, so every
//! trait method is a single critical section. Locks are taken with a timeout
//! and report [`StoreError::LockTimeout`] instead of blocking a request
//! forever.

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use shared::models::{
    EntryId, HOURS_PER_DAY, HourlyHistogram, Visit, VisitDraft, WaitlistDraft, WaitlistEntry,
};
use std::time::Duration;

use super::{AppendOutcome, StoreError, StoreResult, StoreSnapshot, VenueStore, is_within_debounce};

/// Default lock acquisition timeout
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug)]
struct Inner {
    visits: Vec<Visit>,
    hour_counts: HourlyHistogram,
    waitlist: Vec<WaitlistEntry>,
    next_entry_id: u64,
}

impl Inner {
    fn count_after(&self, threshold_ms: i64) -> u64 {
        self.visits
            .iter()
            .rev()
            .take_while(|v| v.timestamp_millis > threshold_ms)
            .count() as u64
    }

    fn total_party_size(&self) -> u64 {
        self.waitlist.iter().map(|e| u64::from(e.party_size)).sum()
    }
}

/// Venue store kept entirely in process memory
#[derive(Debug)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
    lock_timeout: Duration,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_lock_timeout(DEFAULT_LOCK_TIMEOUT)
    }

    pub fn with_lock_timeout(lock_timeout: Duration) -> Self {
        Self {
            inner: RwLock::new(Inner {
                visits: Vec::new(),
                hour_counts: [0; HOURS_PER_DAY],
                waitlist: Vec::new(),
                next_entry_id: 1,
            }),
            lock_timeout,
        }
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Inner>> {
        self.inner
            .try_read_for(self.lock_timeout)
            .ok_or(StoreError::LockTimeout(self.lock_timeout))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Inner>> {
        self.inner
            .try_write_for(self.lock_timeout)
            .ok_or(StoreError::LockTimeout(self.lock_timeout))
    }
}

impl VenueStore for MemoryStore {
    fn append_visit(&self, draft: VisitDraft, debounce_ms: i64) -> StoreResult<AppendOutcome> {
        let mut inner = self.write()?;

        let last = inner.visits.last().map(|v| (v.sequence, v.timestamp_millis));
        if let Some((_, last_ms)) = last
            && is_within_debounce(last_ms, draft.timestamp_millis, debounce_ms)
        {
            return Ok(AppendOutcome::Suppressed {
                last_visit_timestamp: last_ms,
            });
        }

        let (sequence, previous_visit_timestamp) = match last {
            Some((seq, ts)) => (seq + 1, ts),
            None => (1, 0),
        };
        let visit = Visit {
            sequence,
            timestamp_millis: draft.timestamp_millis,
            hour_of_day: draft.hour_of_day,
            previous_visit_timestamp,
            source: draft.source,
        };

        if let Some(slot) = inner.hour_counts.get_mut(usize::from(visit.hour_of_day)) {
            *slot += 1;
        }
        inner.visits.push(visit.clone());
        Ok(AppendOutcome::Appended(visit))
    }

    fn count_visits_after(&self, threshold_ms: i64) -> StoreResult<u64> {
        Ok(self.read()?.count_after(threshold_ms))
    }

    fn hourly_counts(&self) -> StoreResult<HourlyHistogram> {
        Ok(self.read()?.hour_counts)
    }

    fn visits_between(&self, start_ms: i64, end_ms: i64) -> StoreResult<Vec<Visit>> {
        Ok(self
            .read()?
            .visits
            .iter()
            .filter(|v| v.timestamp_millis >= start_ms && v.timestamp_millis < end_ms)
            .cloned()
            .collect())
    }

    fn visit_count(&self) -> StoreResult<u64> {
        Ok(self.read()?.visits.len() as u64)
    }

    fn insert_entry(&self, draft: WaitlistDraft) -> StoreResult<WaitlistEntry> {
        let mut inner = self.write()?;
        let id = EntryId(inner.next_entry_id);
        inner.next_entry_id += 1;

        let entry = WaitlistEntry {
            id,
            name: draft.name,
            party_size: draft.party_size,
            estimated_wait_minutes: draft.estimated_wait_minutes,
            time_added: draft.time_added,
        };
        inner.waitlist.push(entry.clone());
        Ok(entry)
    }

    fn remove_entries_named(&self, name: &str) -> StoreResult<usize> {
        let mut inner = self.write()?;
        let before = inner.waitlist.len();
        inner.waitlist.retain(|e| e.name != name);
        Ok(before - inner.waitlist.len())
    }

    fn remove_entry(&self, id: EntryId) -> StoreResult<Option<WaitlistEntry>> {
        let mut inner = self.write()?;
        let position = inner.waitlist.iter().position(|e| e.id == id);
        Ok(position.map(|idx| inner.waitlist.remove(idx)))
    }

    fn list_entries(&self) -> StoreResult<Vec<WaitlistEntry>> {
        Ok(self.read()?.waitlist.clone())
    }

    fn total_party_size(&self) -> StoreResult<u64> {
        Ok(self.read()?.total_party_size())
    }

    fn snapshot(&self, recent_after_ms: i64) -> StoreResult<StoreSnapshot> {
        let inner = self.read()?;
        Ok(StoreSnapshot {
            recent_count: inner.count_after(recent_after_ms),
            histogram: inner.hour_counts,
            total_waiting: inner.total_party_size(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(ts: i64, hour: u8) -> VisitDraft {
        VisitDraft {
            timestamp_millis: ts,
            hour_of_day: hour,
            source: Some("T1".to_string()),
        }
    }

    #[test]
    fn test_append_and_histogram() {
        let store = MemoryStore::new();
        store.append_visit(draft(0, 9), 1_200).unwrap();
        store.append_visit(draft(2_000, 9), 1_200).unwrap();
        store.append_visit(draft(4_000, 10), 1_200).unwrap();

        let histogram = store.hourly_counts().unwrap();
        assert_eq!(histogram[9], 2);
        assert_eq!(histogram[10], 1);
        assert_eq!(histogram.iter().sum::<u64>(), 3);
    }

    #[test]
    fn test_first_visit_at_time_zero_is_accepted() {
        let store = MemoryStore::new();
        let outcome = store.append_visit(draft(0, 0), 1_200).unwrap();
        assert!(matches!(outcome, AppendOutcome::Appended(ref v) if v.previous_visit_timestamp == 0));
    }

    #[test]
    fn test_write_lock_times_out() {
        let store = MemoryStore::with_lock_timeout(Duration::from_millis(10));
        let _held = store.inner.write();

        let err = store.append_visit(draft(0, 0), 1_200).unwrap_err();
        assert!(matches!(err, StoreError::LockTimeout(_)));
    }

    #[test]
    fn test_remove_entry_by_id() {
        let store = MemoryStore::new();
        let entry = store
            .insert_entry(WaitlistDraft {
                name: "Alice".to_string(),
                party_size: 2,
                estimated_wait_minutes: 10,
                time_added: 0,
            })
            .unwrap();

        let removed = store.remove_entry(entry.id).unwrap();
        assert_eq!(removed.map(|e| e.name), Some("Alice".to_string()));
        assert!(store.list_entries().unwrap().is_empty());
        assert_eq!(store.total_party_size().unwrap(), 0);
    }
}
