//! Result type alias for Quay
//!
//! This module provides a convenient Result type alias that uses QuayError
//! as the error type.

use super::errors::QuayError;

/// Result type alias for Quay operations
///
/// This is a convenience type alias that uses `QuayError` as the error type.
/// Use this throughout the codebase for fallible operations.
///
/// # Examples
///
/// ```
/// use quay::domain::result::Result;
/// use quay::domain::errors::QuayError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(QuayError::Configuration("missing database urls".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, QuayError>;
