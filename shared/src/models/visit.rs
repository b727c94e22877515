//! Visit Model (到店扫码记录)

use serde::{Deserialize, Serialize};

/// Number of hour buckets in a day
pub const HOURS_PER_DAY: usize = 24;

/// Per-hour visit counts, index = local hour of day
pub type HourlyHistogram = [u64; HOURS_PER_DAY];

/// A recorded arrival scan. Append-only, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    /// Append order within the ledger, starting at 1
    pub sequence: u64,
    /// Wall-clock Unix millis at scan time
    pub timestamp_millis: i64,
    /// Local hour bucket (0..=23) derived from `timestamp_millis`
    pub hour_of_day: u8,
    /// Timestamp of the visit recorded before this one, 0 for the first
    pub previous_visit_timestamp: i64,
    /// Scanned table / kiosk code, when the scan carried one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Visit fields known before the store assigns sequence and predecessor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitDraft {
    pub timestamp_millis: i64,
    pub hour_of_day: u8,
    pub source: Option<String>,
}

/// Result of a scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ScanOutcome {
    /// A new visit was appended
    Accepted(Visit),
    /// Duplicate tap inside the debounce window, nothing appended
    Debounced {
        /// Timestamp of the visit that suppressed this scan
        last_visit_timestamp: i64,
    },
}

impl ScanOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    pub fn visit(&self) -> Option<&Visit> {
        match self {
            Self::Accepted(visit) => Some(visit),
            Self::Debounced { .. } => None,
        }
    }
}
