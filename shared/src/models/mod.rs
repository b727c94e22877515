//! Data models
//!
//! Shared between the engine and whatever presentation layer renders it.
//! Timestamps are `i64` Unix millis.

pub mod occupancy;
pub mod visit;
pub mod waitlist;

// Re-exports
pub use occupancy::*;
pub use visit::*;
pub use waitlist::*;
