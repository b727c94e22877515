//! Occupancy Model (实时客流)

use serde::{Deserialize, Serialize};

use super::visit::HourlyHistogram;

/// Display severity derived from the current open count.
///
/// Variants are declared in increasing severity, so `Ord` follows severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Normal,
    Elevated,
    High,
    Critical,
}

impl Tier {
    /// Kiosk background colour
    pub const fn color(&self) -> &'static str {
        match self {
            Tier::Normal => "#00a979",
            Tier::Elevated => "#f89920",
            Tier::High => "#f15a25",
            Tier::Critical => "#ef2626",
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Tier::Normal => "normal",
            Tier::Elevated => "elevated",
            Tier::High => "high",
            Tier::Critical => "critical",
        }
    }
}

/// Aggregates read from one consistent point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancySnapshot {
    /// Visits inside the recency window ("open menus")
    pub open_count: u64,
    /// Cumulative all-time visits per local hour
    pub histogram: HourlyHistogram,
    /// Sum of party sizes on the waitlist
    pub total_waiting: u64,
}

/// One row of the kiosk's hourly table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourRow {
    pub hour: u8,
    /// e.g. `"11:00 - 12:00 AM"`
    pub label: String,
    pub count: u64,
}

/// Everything the kiosk page needs for one render
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KioskStatus {
    pub snapshot: OccupancySnapshot,
    pub tier: Tier,
    pub color: String,
    pub rows: Vec<HourRow>,
    /// Unix millis the status was computed at
    pub generated_at: i64,
}
