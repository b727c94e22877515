//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::WaitlistEntryNotFound => StatusCode::NOT_FOUND,

            Self::ValidationFailed
            | Self::PartyNameInvalid
            | Self::PartySizeInvalid
            | Self::EstimatedWaitInvalid => StatusCode::BAD_REQUEST,

            Self::StoreUnavailable | Self::VisitLedgerUnavailable => {
                StatusCode::SERVICE_UNAVAILABLE
            }

            Self::InvariantViolation | Self::ConfigError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
