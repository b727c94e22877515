//! redb-based venue store
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `visits` | `sequence` | `Visit` (JSON) | Visit ledger (append-only) |
//! | `hour_counts` | `hour_of_day` | `u64` | Group-by-hour counter, updated with each append |
//! | `waitlist` | `entry_id` | `WaitlistEntry` (JSON) | Active parties, key order = insertion order |
//! | `counters` | name | `u64` | Entry id allocator |
//!
//! # Atomicity
//!
//! redb serializes write transactions, so the debounce check and the append
//! in [`RedbStore::append_visit`] cannot interleave with another scan. Read
//! transactions see a fixed MVCC snapshot, which is what
//! [`VenueStore::snapshot`] relies on.

use redb::{
    Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition,
};
use shared::models::{
    EntryId, HOURS_PER_DAY, HourlyHistogram, Visit, VisitDraft, WaitlistDraft, WaitlistEntry,
};
use std::path::Path;
use std::sync::Arc;

use super::{AppendOutcome, StoreResult, StoreSnapshot, VenueStore, is_within_debounce};

/// Visit ledger: key = sequence, value = JSON-serialized Visit
const VISITS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("visits");

/// Per-hour visit counter: key = hour_of_day
const HOUR_COUNTS_TABLE: TableDefinition<u8, u64> = TableDefinition::new("hour_counts");

/// Waitlist: key = entry id, value = JSON-serialized WaitlistEntry
const WAITLIST_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("waitlist");

/// Counters: key = counter name
const COUNTERS_TABLE: TableDefinition<&str, u64> = TableDefinition::new("counters");

const NEXT_ENTRY_ID_KEY: &str = "next_entry_id";

/// Venue store backed by redb
#[derive(Clone)]
pub struct RedbStore {
    db: Arc<Database>,
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore").finish_non_exhaustive()
    }
}

impl RedbStore {
    /// Open or create the database at the given path
    ///
    /// Commits use redb's default `Durability::Immediate`: once `commit()`
    /// returns the visit or entry survives a power loss.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db = Database::create(path.as_ref())?;
        Self::init(db)
    }

    /// Open an in-memory database (tests, ephemeral kiosks)
    pub fn open_in_memory() -> StoreResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StoreResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(VISITS_TABLE)?;
            let _ = write_txn.open_table(HOUR_COUNTS_TABLE)?;
            let _ = write_txn.open_table(WAITLIST_TABLE)?;

            let mut counters = write_txn.open_table(COUNTERS_TABLE)?;
            if counters.get(NEXT_ENTRY_ID_KEY)?.is_none() {
                counters.insert(NEXT_ENTRY_ID_KEY, 1u64)?;
            }
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }
}

impl VenueStore for RedbStore {
    fn append_visit(&self, draft: VisitDraft, debounce_ms: i64) -> StoreResult<AppendOutcome> {
        let txn = self.db.begin_write()?;
        let outcome = {
            let mut visits = txn.open_table(VISITS_TABLE)?;

            let last: Option<(u64, Visit)> = match visits.last()? {
                Some((key, value)) => Some((key.value(), serde_json::from_slice(value.value())?)),
                None => None,
            };

            if let Some((_, last_visit)) = &last
                && is_within_debounce(last_visit.timestamp_millis, draft.timestamp_millis, debounce_ms)
            {
                AppendOutcome::Suppressed {
                    last_visit_timestamp: last_visit.timestamp_millis,
                }
            } else {
                let (sequence, previous_visit_timestamp) = match &last {
                    Some((seq, visit)) => (seq + 1, visit.timestamp_millis),
                    None => (1, 0),
                };
                let visit = Visit {
                    sequence,
                    timestamp_millis: draft.timestamp_millis,
                    hour_of_day: draft.hour_of_day,
                    previous_visit_timestamp,
                    source: draft.source,
                };
                let value = serde_json::to_vec(&visit)?;
                visits.insert(sequence, value.as_slice())?;

                let mut hours = txn.open_table(HOUR_COUNTS_TABLE)?;
                let current = hours
                    .get(visit.hour_of_day)?
                    .map(|guard| guard.value())
                    .unwrap_or(0);
                hours.insert(visit.hour_of_day, current + 1)?;

                AppendOutcome::Appended(visit)
            }
        };

        match outcome {
            AppendOutcome::Appended(_) => txn.commit()?,
            // Nothing written
            AppendOutcome::Suppressed { .. } => txn.abort()?,
        }
        Ok(outcome)
    }

    fn count_visits_after(&self, threshold_ms: i64) -> StoreResult<u64> {
        let read_txn = self.db.begin_read()?;
        let visits = read_txn.open_table(VISITS_TABLE)?;
        count_after(&visits, threshold_ms)
    }

    fn hourly_counts(&self) -> StoreResult<HourlyHistogram> {
        let read_txn = self.db.begin_read()?;
        let hours = read_txn.open_table(HOUR_COUNTS_TABLE)?;
        read_histogram(&hours)
    }

    fn visits_between(&self, start_ms: i64, end_ms: i64) -> StoreResult<Vec<Visit>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(VISITS_TABLE)?;

        let mut visits = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let visit: Visit = serde_json::from_slice(value.value())?;
            if visit.timestamp_millis >= start_ms && visit.timestamp_millis < end_ms {
                visits.push(visit);
            }
        }
        Ok(visits)
    }

    fn visit_count(&self) -> StoreResult<u64> {
        let read_txn = self.db.begin_read()?;
        let visits = read_txn.open_table(VISITS_TABLE)?;
        Ok(visits.len()?)
    }

    fn insert_entry(&self, draft: WaitlistDraft) -> StoreResult<WaitlistEntry> {
        let txn = self.db.begin_write()?;
        let entry = {
            let mut counters = txn.open_table(COUNTERS_TABLE)?;
            let id = counters
                .get(NEXT_ENTRY_ID_KEY)?
                .map(|guard| guard.value())
                .unwrap_or(1);
            counters.insert(NEXT_ENTRY_ID_KEY, id + 1)?;

            let entry = WaitlistEntry {
                id: EntryId(id),
                name: draft.name,
                party_size: draft.party_size,
                estimated_wait_minutes: draft.estimated_wait_minutes,
                time_added: draft.time_added,
            };
            let mut waitlist = txn.open_table(WAITLIST_TABLE)?;
            let value = serde_json::to_vec(&entry)?;
            waitlist.insert(id, value.as_slice())?;
            entry
        };
        txn.commit()?;
        Ok(entry)
    }

    fn remove_entries_named(&self, name: &str) -> StoreResult<usize> {
        let txn = self.db.begin_write()?;
        let removed = {
            let mut waitlist = txn.open_table(WAITLIST_TABLE)?;

            let mut matching = Vec::new();
            for result in waitlist.iter()? {
                let (key, value) = result?;
                let entry: WaitlistEntry = serde_json::from_slice(value.value())?;
                if entry.name == name {
                    matching.push(key.value());
                }
            }

            for key in &matching {
                waitlist.remove(*key)?;
            }
            matching.len()
        };

        if removed > 0 {
            txn.commit()?;
        } else {
            txn.abort()?;
        }
        Ok(removed)
    }

    fn remove_entry(&self, id: EntryId) -> StoreResult<Option<WaitlistEntry>> {
        let txn = self.db.begin_write()?;
        let removed: Option<WaitlistEntry> = {
            let mut waitlist = txn.open_table(WAITLIST_TABLE)?;
            match waitlist.remove(id.0)? {
                Some(value) => Some(serde_json::from_slice(value.value())?),
                None => None,
            }
        };

        if removed.is_some() {
            txn.commit()?;
        } else {
            txn.abort()?;
        }
        Ok(removed)
    }

    fn list_entries(&self) -> StoreResult<Vec<WaitlistEntry>> {
        let read_txn = self.db.begin_read()?;
        let waitlist = read_txn.open_table(WAITLIST_TABLE)?;
        read_entries(&waitlist)
    }

    fn total_party_size(&self) -> StoreResult<u64> {
        let read_txn = self.db.begin_read()?;
        let waitlist = read_txn.open_table(WAITLIST_TABLE)?;
        Ok(party_size_sum(&read_entries(&waitlist)?))
    }

    fn snapshot(&self, recent_after_ms: i64) -> StoreResult<StoreSnapshot> {
        let read_txn = self.db.begin_read()?;
        let visits = read_txn.open_table(VISITS_TABLE)?;
        let hours = read_txn.open_table(HOUR_COUNTS_TABLE)?;
        let waitlist = read_txn.open_table(WAITLIST_TABLE)?;

        Ok(StoreSnapshot {
            recent_count: count_after(&visits, recent_after_ms)?,
            histogram: read_histogram(&hours)?,
            total_waiting: party_size_sum(&read_entries(&waitlist)?),
        })
    }
}

// ========== Read helpers (shared by single reads and the snapshot) ==========

/// Scans newest-first and stops at the first visit at or before the threshold.
/// Valid because visits are appended in non-decreasing timestamp order.
fn count_after(visits: &impl ReadableTable<u64, &'static [u8]>, threshold_ms: i64) -> StoreResult<u64> {
    let mut count = 0;
    for result in visits.iter()?.rev() {
        let (_key, value) = result?;
        let visit: Visit = serde_json::from_slice(value.value())?;
        if visit.timestamp_millis <= threshold_ms {
            break;
        }
        count += 1;
    }
    Ok(count)
}

fn read_histogram(hours: &impl ReadableTable<u8, u64>) -> StoreResult<HourlyHistogram> {
    let mut histogram = [0u64; HOURS_PER_DAY];
    for result in hours.iter()? {
        let (hour, count) = result?;
        let hour = usize::from(hour.value());
        match histogram.get_mut(hour) {
            Some(slot) => *slot = count.value(),
            None => tracing::warn!(hour, "Ignoring out-of-range hour bucket"),
        }
    }
    Ok(histogram)
}

fn read_entries(
    waitlist: &impl ReadableTable<u64, &'static [u8]>,
) -> StoreResult<Vec<WaitlistEntry>> {
    let mut entries = Vec::new();
    for result in waitlist.iter()? {
        let (_key, value) = result?;
        entries.push(serde_json::from_slice(value.value())?);
    }
    Ok(entries)
}

fn party_size_sum(entries: &[WaitlistEntry]) -> u64 {
    entries.iter().map(|e| u64::from(e.party_size)).sum()
}
