use shared::error::{AppError, ErrorCode};
use thiserror::Error;

use super::config::ConfigError;
use crate::store::StoreError;

/// Engine-level errors surfaced to the presentation layer
#[derive(Error, Debug)]
pub enum EngineError {
    /// User-correctable validation failure
    #[error("Invalid {field}: {message}")]
    InvalidInput {
        field: &'static str,
        message: String,
    },

    /// Lookup or removal matched nothing
    #[error("Not found: {0}")]
    NotFound(String),

    /// Persistence collaborator failed; the same request may be retried
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    /// Store failed while recording a scan or reading the visit ledger
    #[error("Visit ledger unavailable: {0}")]
    LedgerUnavailable(#[source] StoreError),

    /// Programming error inside the engine; never mapped to a default value
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl EngineError {
    pub fn invalid_input(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            message: message.into(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_) | Self::LedgerUnavailable(_))
    }

    /// Error code handed to the presentation layer
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidInput { field, .. } => match *field {
                "name" => ErrorCode::PartyNameInvalid,
                "party_size" => ErrorCode::PartySizeInvalid,
                "estimated_wait_minutes" => ErrorCode::EstimatedWaitInvalid,
                _ => ErrorCode::ValidationFailed,
            },
            Self::NotFound(_) => ErrorCode::WaitlistEntryNotFound,
            Self::StoreUnavailable(_) => ErrorCode::StoreUnavailable,
            Self::LedgerUnavailable(_) => ErrorCode::VisitLedgerUnavailable,
            Self::InvariantViolation(_) => ErrorCode::InvariantViolation,
            Self::Config(_) => ErrorCode::ConfigError,
        }
    }
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        let code = err.code();
        match &err {
            EngineError::InvalidInput { field, message } => {
                AppError::with_message(code, message.clone()).with_detail("field", *field)
            }
            EngineError::NotFound(what) => {
                AppError::with_message(code, err.to_string()).with_detail("resource", what.clone())
            }
            EngineError::StoreUnavailable(source) | EngineError::LedgerUnavailable(source) => {
                // 记录存储错误但不暴露详细信息
                tracing::error!(error = %source, "Store unavailable");
                AppError::new(code).with_detail("retryable", true)
            }
            EngineError::InvariantViolation(_) | EngineError::Config(_) => {
                tracing::error!(error = %err, "Engine error");
                AppError::new(code)
            }
        }
    }
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;
