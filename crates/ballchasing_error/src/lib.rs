//! Error types for the ballchasing client.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use ballchasing_error::{BallchasingResult, HttpError};
//!
//! fn fetch_data() -> BallchasingResult<String> {
//!     Err(HttpError::new("Connection refused"))?
//! }
//!
//! assert!(fetch_data().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod http;
mod json;
mod rate_limit;
mod validation;

pub use config::ConfigError;
pub use error::{BallchasingError, BallchasingErrorKind, BallchasingResult};
pub use http::HttpError;
pub use json::JsonError;
pub use rate_limit::{RateLimitError, RateLimitErrorKind};
pub use validation::{ValidationError, ValidationErrorKind};
