//! Occupancy read side
//!
//! - [`OccupancyAggregator`] - snapshot of open count / histogram / waiting
//! - [`StatusClassifier`] - open count → [`Tier`](shared::models::Tier)

pub mod aggregator;
pub mod classifier;

pub use aggregator::{OccupancyAggregator, hour_label};
pub use classifier::{StatusClassifier, TierThresholds};
