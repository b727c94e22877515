//! Unified error codes for the kiosk engine
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Visit / scan errors
//! - 4xxx: Waitlist errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the presentation layer
/// can forward them as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Validation failed on a field without a dedicated code
    ValidationFailed = 2,

    // ==================== 1xxx: Visits ====================
    /// Visit ledger store failed during a scan or a ledger read
    VisitLedgerUnavailable = 1001,

    // ==================== 4xxx: Waitlist ====================
    /// No waitlist entry matched
    WaitlistEntryNotFound = 4001,
    /// Party name is empty or too long
    PartyNameInvalid = 4002,
    /// Party size must be at least 1
    PartySizeInvalid = 4003,
    /// Estimated wait is out of range
    EstimatedWaitInvalid = 4004,

    // ==================== 9xxx: System ====================
    /// Persistent store temporarily unavailable
    StoreUnavailable = 9003,
    /// Engine invariant was broken
    InvariantViolation = 9004,
    /// Configuration is invalid
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::ValidationFailed => "Validation failed",

            // Visits
            ErrorCode::VisitLedgerUnavailable => "Visit ledger is unavailable",

            // Waitlist
            ErrorCode::WaitlistEntryNotFound => "Waitlist entry not found",
            ErrorCode::PartyNameInvalid => "Party name is invalid",
            ErrorCode::PartySizeInvalid => "Party size must be at least 1",
            ErrorCode::EstimatedWaitInvalid => "Estimated wait is out of range",

            // System
            ErrorCode::StoreUnavailable => "Store is temporarily unavailable",
            ErrorCode::InvariantViolation => "Internal invariant violated",
            ErrorCode::ConfigError => "Configuration error",
        }
    }

    /// Whether a caller may retry the same request unchanged
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorCode::StoreUnavailable | ErrorCode::VisitLedgerUnavailable
        )
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            2 => Ok(ErrorCode::ValidationFailed),

            // Visits
            1001 => Ok(ErrorCode::VisitLedgerUnavailable),

            // Waitlist
            4001 => Ok(ErrorCode::WaitlistEntryNotFound),
            4002 => Ok(ErrorCode::PartyNameInvalid),
            4003 => Ok(ErrorCode::PartySizeInvalid),
            4004 => Ok(ErrorCode::EstimatedWaitInvalid),

            // System
            9003 => Ok(ErrorCode::StoreUnavailable),
            9004 => Ok(ErrorCode::InvariantViolation),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
