//! Visit ledger - debounced, append-only record of arrival scans
//!
//! # Scan Flow
//!
//! ```text
//! record_scan(now)
//!     ├─ 1. hour_of_day = local_hour(now)
//!     ├─ 2. store.append_visit(draft, debounce)   (one write transaction)
//!     │      ├─ last visit newer than now - debounce → Suppressed
//!     │      └─ otherwise append, bump hour counter
//!     └─ 3. Accepted(visit) | Debounced
//! ```

use chrono::NaiveDate;
use shared::models::{HOURS_PER_DAY, HourlyHistogram, ScanOutcome, VisitDraft};
use std::sync::Arc;
use std::time::Duration;

use crate::clock::{Clock, VenueTime};
use crate::core::{EngineError, EngineResult};
use crate::store::{AppendOutcome, VenueStore};
use crate::utils::retry::retry_read;
use crate::utils::validation::normalize_source;

#[derive(Clone)]
pub struct VisitLedger {
    store: Arc<dyn VenueStore>,
    clock: Arc<dyn Clock>,
    venue_time: VenueTime,
    debounce_window_ms: i64,
}

impl VisitLedger {
    pub fn new(
        store: Arc<dyn VenueStore>,
        clock: Arc<dyn Clock>,
        venue_time: VenueTime,
        debounce_window_ms: i64,
    ) -> Self {
        Self {
            store,
            clock,
            venue_time,
            debounce_window_ms,
        }
    }

    /// Record a scan at `now_ms`
    pub fn record_scan(&self, now_ms: i64) -> EngineResult<ScanOutcome> {
        self.record_scan_from(now_ms, None)
    }

    /// Record a scan at the clock's current time
    pub fn record_scan_now(&self, source: Option<&str>) -> EngineResult<ScanOutcome> {
        self.record_scan_from(self.clock.now_millis(), source)
    }

    /// Record a scan carrying the scanned table / kiosk code.
    ///
    /// Store failures surface as [`EngineError::LedgerUnavailable`] and are
    /// never retried: a retried append could land twice.
    pub fn record_scan_from(&self, now_ms: i64, source: Option<&str>) -> EngineResult<ScanOutcome> {
        let draft = VisitDraft {
            timestamp_millis: now_ms,
            hour_of_day: self.venue_time.local_hour(now_ms),
            source: normalize_source(source),
        };

        let outcome = self
            .store
            .append_visit(draft, self.debounce_window_ms)
            .map_err(EngineError::LedgerUnavailable)?;

        match outcome {
            AppendOutcome::Appended(visit) => {
                tracing::info!(
                    sequence = visit.sequence,
                    hour = visit.hour_of_day,
                    source = visit.source.as_deref().unwrap_or("-"),
                    "Scan accepted"
                );
                Ok(ScanOutcome::Accepted(visit))
            }
            AppendOutcome::Suppressed {
                last_visit_timestamp,
            } => {
                tracing::debug!(
                    now_ms,
                    last_visit_timestamp,
                    "Scan debounced as duplicate tap"
                );
                Ok(ScanOutcome::Debounced {
                    last_visit_timestamp,
                })
            }
        }
    }

    /// Visits with `timestamp > now - window`
    pub fn recent_count(&self, window: Duration, now_ms: i64) -> EngineResult<u64> {
        let window_ms = i64::try_from(window.as_millis()).unwrap_or(i64::MAX);
        let threshold = now_ms.saturating_sub(window_ms);
        retry_read("recent_count", || self.store.count_visits_after(threshold))
            .map_err(EngineError::LedgerUnavailable)
    }

    /// All-time visits per local hour. Never resets and mixes all days.
    pub fn hourly_histogram(&self) -> EngineResult<HourlyHistogram> {
        retry_read("hourly_histogram", || self.store.hourly_counts())
            .map_err(EngineError::LedgerUnavailable)
    }

    /// Visits per local hour for one local calendar day
    pub fn daily_histogram(&self, date: NaiveDate) -> EngineResult<HourlyHistogram> {
        let (start, end) = self.venue_time.local_day_bounds(date);
        let visits = retry_read("daily_histogram", || self.store.visits_between(start, end))
            .map_err(EngineError::LedgerUnavailable)?;

        let mut histogram = [0u64; HOURS_PER_DAY];
        for visit in &visits {
            let slot = histogram
                .get_mut(usize::from(visit.hour_of_day))
                .ok_or_else(|| {
                    EngineError::InvariantViolation(format!(
                        "visit {} has hour_of_day {}",
                        visit.sequence, visit.hour_of_day
                    ))
                })?;
            *slot += 1;
        }
        Ok(histogram)
    }

    /// Histogram for the local day containing `now_ms`
    pub fn today_histogram(&self, now_ms: i64) -> EngineResult<HourlyHistogram> {
        let date = self.venue_time.local_date(now_ms).ok_or_else(|| {
            EngineError::InvariantViolation(format!("timestamp {now_ms} has no calendar date"))
        })?;
        self.daily_histogram(date)
    }

    pub fn total_visits(&self) -> EngineResult<u64> {
        retry_read("total_visits", || self.store.visit_count())
            .map_err(EngineError::LedgerUnavailable)
    }
}
