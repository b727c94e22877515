//! Status classifier - open count → display tier

use serde::{Deserialize, Serialize};
use shared::models::Tier;

use crate::core::{EngineError, EngineResult};

/// Minimum open count for each tier above [`Tier::Normal`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierThresholds {
    pub elevated: u64,
    pub high: u64,
    pub critical: u64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            elevated: 1,
            high: 12,
            critical: 20,
        }
    }
}

impl TierThresholds {
    /// `0 < elevated < high < critical`, so zero always maps to Normal
    pub fn is_ordered(&self) -> bool {
        0 < self.elevated && self.elevated < self.high && self.high < self.critical
    }
}

/// Maps an open count to a [`Tier`], highest threshold first
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusClassifier {
    thresholds: TierThresholds,
}

impl StatusClassifier {
    pub fn new(thresholds: TierThresholds) -> Self {
        Self { thresholds }
    }

    /// Classify a signed count. Negative counts cannot come out of the ledger
    /// and are reported as [`EngineError::InvariantViolation`].
    pub fn classify(&self, open_count: i64) -> EngineResult<Tier> {
        match u64::try_from(open_count) {
            Ok(count) => Ok(self.tier_for(count)),
            Err(_) => {
                tracing::error!(open_count, "Negative open count reached the classifier");
                Err(EngineError::InvariantViolation(format!(
                    "open count must be non-negative, got {open_count}"
                )))
            }
        }
    }

    /// Total over all counts
    pub fn tier_for(&self, open_count: u64) -> Tier {
        let t = &self.thresholds;
        if open_count >= t.critical {
            Tier::Critical
        } else if open_count >= t.high {
            Tier::High
        } else if open_count >= t.elevated {
            Tier::Elevated
        } else {
            Tier::Normal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let classifier = StatusClassifier::default();
        assert_eq!(classifier.classify(0).unwrap(), Tier::Normal);
        assert_eq!(classifier.classify(1).unwrap(), Tier::Elevated);
        assert_eq!(classifier.classify(11).unwrap(), Tier::Elevated);
        assert_eq!(classifier.classify(12).unwrap(), Tier::High);
        assert_eq!(classifier.classify(19).unwrap(), Tier::High);
        assert_eq!(classifier.classify(20).unwrap(), Tier::Critical);
        assert_eq!(classifier.classify(25).unwrap(), Tier::Critical);
        assert_eq!(classifier.classify(i64::MAX).unwrap(), Tier::Critical);
    }

    #[test]
    fn test_negative_count_is_invariant_violation() {
        let classifier = StatusClassifier::default();
        let err = classifier.classify(-1).unwrap_err();
        assert!(matches!(err, EngineError::InvariantViolation(_)));
    }

    #[test]
    fn test_severity_is_monotonic() {
        let classifier = StatusClassifier::default();
        let mut previous = Tier::Normal;
        for count in 0..200 {
            let tier = classifier.classify(count).unwrap();
            assert!(tier >= previous, "tier dropped at count {count}");
            previous = tier;
        }
    }

    #[test]
    fn test_custom_thresholds() {
        let classifier = StatusClassifier::new(TierThresholds {
            elevated: 5,
            high: 10,
            critical: 15,
        });
        assert_eq!(classifier.tier_for(4), Tier::Normal);
        assert_eq!(classifier.tier_for(5), Tier::Elevated);
        assert_eq!(classifier.tier_for(15), Tier::Critical);
    }

    #[test]
    fn test_threshold_ordering() {
        assert!(TierThresholds::default().is_ordered());
        assert!(
            !TierThresholds {
                elevated: 0,
                high: 12,
                critical: 20
            }
            .is_ordered()
        );
    }
}
