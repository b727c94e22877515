//! Unified error system for the kiosk engine
//!
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`AppError`]: Rich error type with codes, messages, and details
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Visit errors
//! - 4xxx: Waitlist errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::StoreUnavailable);
//! assert!(err.code.is_retryable());
//!
//! let err = AppError::with_message(ErrorCode::PartySizeInvalid, "party_size must be at least 1")
//!     .with_detail("field", "party_size");
//! assert_eq!(err.http_status().as_u16(), 400);
//! ```

mod codes;
mod http;
mod types;

pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult};
