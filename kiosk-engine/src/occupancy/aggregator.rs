//! Occupancy aggregator - kiosk read model
//!
//! Nothing is cached: every call recomputes from the store, and the three
//! aggregates of a snapshot come from one store read.

use shared::models::{HourRow, HourlyHistogram, KioskStatus, OccupancySnapshot};
use std::ops::RangeInclusive;
use std::sync::Arc;

use super::classifier::StatusClassifier;
use crate::core::EngineResult;
use crate::store::VenueStore;
use crate::utils::retry::retry_read;

#[derive(Clone)]
pub struct OccupancyAggregator {
    store: Arc<dyn VenueStore>,
    recency_window_ms: i64,
    classifier: StatusClassifier,
    display_hours: RangeInclusive<u8>,
}

impl OccupancyAggregator {
    pub fn new(
        store: Arc<dyn VenueStore>,
        recency_window_ms: i64,
        classifier: StatusClassifier,
        display_hours: RangeInclusive<u8>,
    ) -> Self {
        Self {
            store,
            recency_window_ms,
            classifier,
            display_hours,
        }
    }

    /// Open count, cumulative histogram and total waiting as of `now_ms`
    pub fn snapshot(&self, now_ms: i64) -> EngineResult<OccupancySnapshot> {
        let threshold = now_ms.saturating_sub(self.recency_window_ms);
        let raw = retry_read("snapshot", || self.store.snapshot(threshold))?;

        Ok(OccupancySnapshot {
            open_count: raw.recent_count,
            histogram: raw.histogram,
            total_waiting: raw.total_waiting,
        })
    }

    /// Snapshot plus tier, colour and the hourly table for the kiosk page
    pub fn kiosk_status(&self, now_ms: i64) -> EngineResult<KioskStatus> {
        let snapshot = self.snapshot(now_ms)?;
        let tier = self.classifier.tier_for(snapshot.open_count);
        let rows = self.display_rows(&snapshot.histogram);

        tracing::debug!(
            open_count = snapshot.open_count,
            total_waiting = snapshot.total_waiting,
            tier = tier.name(),
            "Kiosk status computed"
        );

        Ok(KioskStatus {
            color: tier.color().to_string(),
            tier,
            rows,
            snapshot,
            generated_at: now_ms,
        })
    }

    /// Histogram rows for the configured opening hours
    pub fn display_rows(&self, histogram: &HourlyHistogram) -> Vec<HourRow> {
        self.display_hours
            .clone()
            .filter_map(|hour| {
                histogram.get(usize::from(hour)).map(|&count| HourRow {
                    hour,
                    label: hour_label(hour),
                    count,
                })
            })
            .collect()
    }
}

/// Kiosk table label. The AM/PM suffix follows the starting hour, so 11
/// renders as `"11:00 - 12:00 AM"`.
pub fn hour_label(hour: u8) -> String {
    let display = match hour {
        0 => 12,
        h if h > 12 => h - 12,
        h => h,
    };
    let next = if display == 12 { 1 } else { display + 1 };
    let suffix = if hour >= 12 { "PM" } else { "AM" };
    format!("{display}:00 - {next}:00 {suffix}")
}
