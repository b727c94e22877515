//! Time source and fixed-offset local time
//!
//! The venue runs on one fixed UTC offset (no DST). All conversions here are
//! pure functions of the timestamp and that offset.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use shared::util::MILLIS_PER_HOUR;
use std::sync::atomic::{AtomicI64, Ordering};

const HOURS_PER_DAY: i64 = 24;

/// Supplies the current instant as Unix millis
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        shared::util::now_millis()
    }
}

/// Clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start_millis: i64) -> Self {
        Self {
            now: AtomicI64::new(start_millis),
        }
    }

    pub fn set(&self, millis: i64) {
        self.now.store(millis, Ordering::SeqCst);
    }

    pub fn advance(&self, millis: i64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Local-time conversions at the venue's fixed offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VenueTime {
    offset_hours: i32,
    offset: FixedOffset,
}

impl VenueTime {
    /// `None` when the offset is outside -23..=23 hours
    pub fn new(offset_hours: i32) -> Option<Self> {
        if !(-23..=23).contains(&offset_hours) {
            return None;
        }
        let offset = FixedOffset::east_opt(offset_hours * 3600)?;
        Some(Self {
            offset_hours,
            offset,
        })
    }

    pub fn offset_hours(&self) -> i32 {
        self.offset_hours
    }

    /// Local hour bucket (0..=23) of a Unix millis timestamp.
    ///
    /// Euclidean division keeps pre-epoch timestamps and negative offsets in
    /// range.
    pub fn local_hour(&self, ts_millis: i64) -> u8 {
        let utc_hours = ts_millis.div_euclid(MILLIS_PER_HOUR);
        (utc_hours + i64::from(self.offset_hours)).rem_euclid(HOURS_PER_DAY) as u8
    }

    /// Local calendar date, `None` only for timestamps chrono cannot represent
    pub fn local_date(&self, ts_millis: i64) -> Option<NaiveDate> {
        DateTime::from_timestamp_millis(ts_millis)
            .map(|dt| dt.with_timezone(&self.offset).date_naive())
    }

    /// Half-open `[start, end)` millis range covering one local day
    pub fn local_day_bounds(&self, date: NaiveDate) -> (i64, i64) {
        let offset_millis = i64::from(self.offset_hours) * MILLIS_PER_HOUR;
        let start = date.and_time(NaiveTime::MIN).and_utc().timestamp_millis() - offset_millis;
        (start, start + HOURS_PER_DAY * MILLIS_PER_HOUR)
    }

    /// 12-hour clock rendering, e.g. `"09:42 PM"`
    pub fn format_local_time(&self, ts_millis: i64) -> Option<String> {
        DateTime::from_timestamp_millis(ts_millis)
            .map(|dt| dt.with_timezone(&self.offset).format("%I:%M %p").to_string())
    }
}
