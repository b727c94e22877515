//! Shared types for the venue kiosk
//!
//! Models and error types used by the engine and by the presentation layer
//! that renders the kiosk and waitlist pages.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCode};
pub use models::{
    EntryId, HourlyHistogram, KioskStatus, OccupancySnapshot, ScanOutcome, Tier, Visit,
    WaitlistEntry, WaitlistEntryCreate,
};
