//! Venue store - persistence collaborator for visits and the waitlist
//!
//! # Backends
//!
//! | Backend | Type | Use |
//! |---------|------|-----|
//! | redb | [`RedbStore`] | Kiosk deployments (file-backed, transactional) |
//! | memory | [`MemoryStore`] | Tests and throwaway kiosks |
//!
//! Every method that combines a read with a write runs inside one
//! transaction (redb) or one lock critical section (memory), so callers never
//! observe a half-applied operation.

mod memory;
mod redb_store;

pub use memory::MemoryStore;
pub use redb_store::RedbStore;

use shared::models::{
    EntryId, HourlyHistogram, Visit, VisitDraft, WaitlistDraft, WaitlistEntry,
};
use std::time::Duration;
use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store lock not acquired within {0:?}")]
    LockTimeout(Duration),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Result of a conditional visit append
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppendOutcome {
    Appended(Visit),
    /// A visit newer than `now - debounce` already exists
    Suppressed { last_visit_timestamp: i64 },
}

/// Aggregates read in a single transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSnapshot {
    pub recent_count: u64,
    pub histogram: HourlyHistogram,
    pub total_waiting: u64,
}

/// Persistence contract consumed by the engine components.
///
/// Implementations hand out consistent reads and atomic conditional writes;
/// the components never hold a transaction of their own.
pub trait VenueStore: Send + Sync {
    // ========== Visits ==========

    /// Append `draft` unless the latest visit is less than `debounce_ms` older
    /// than it. Read, compare and append happen atomically.
    fn append_visit(&self, draft: VisitDraft, debounce_ms: i64) -> StoreResult<AppendOutcome>;

    /// Number of visits with `timestamp_millis > threshold_ms`
    fn count_visits_after(&self, threshold_ms: i64) -> StoreResult<u64>;

    /// All-time visit counts grouped by `hour_of_day`
    fn hourly_counts(&self) -> StoreResult<HourlyHistogram>;

    /// Visits with `start_ms <= timestamp_millis < end_ms`, in append order
    fn visits_between(&self, start_ms: i64, end_ms: i64) -> StoreResult<Vec<Visit>>;

    fn visit_count(&self) -> StoreResult<u64>;

    // ========== Waitlist ==========

    /// Append an already validated entry, assigning the next [`EntryId`]
    fn insert_entry(&self, draft: WaitlistDraft) -> StoreResult<WaitlistEntry>;

    /// Delete every entry whose name equals `name`; returns how many went
    fn remove_entries_named(&self, name: &str) -> StoreResult<usize>;

    fn remove_entry(&self, id: EntryId) -> StoreResult<Option<WaitlistEntry>>;

    /// Entries in insertion order
    fn list_entries(&self) -> StoreResult<Vec<WaitlistEntry>>;

    fn total_party_size(&self) -> StoreResult<u64>;

    // ========== Combined ==========

    /// Recent count, cumulative histogram and total waiting from one read
    fn snapshot(&self, recent_after_ms: i64) -> StoreResult<StoreSnapshot>;
}

/// Debounce rule shared by both backends
pub(crate) fn is_within_debounce(last_ms: i64, now_ms: i64, debounce_ms: i64) -> bool {
    now_ms.saturating_sub(last_ms) < debounce_ms
}
