//! Domain error types
//!
//! This module defines the error hierarchy for Quay.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Quay error type
///
/// Everything that can go wrong while resolving options or bootstrapping
/// the document store falls into one of two kinds: configuration problems
/// detected before any network activity, and initialization failures
/// reported by the client handle itself.
#[derive(Debug, Error)]
pub enum QuayError {
    /// Configuration-related errors
    ///
    /// Missing or invalid database name, empty URL list, missing or
    /// unparsable certificate file, and settings-binding failures. These
    /// are fatal to the current construction attempt and are never
    /// retried automatically.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Client initialization errors
    ///
    /// The client handle's `initialize()` failed. Surfaced to the caller
    /// unchanged; no internal retry or backoff. A failed attempt does not
    /// poison the singleton slot.
    #[error("Client initialization error: {0}")]
    ClientInitialization(String),
}

// Conversion from config binding errors
impl From<config::ConfigError> for QuayError {
    fn from(err: config::ConfigError) -> Self {
        QuayError::Configuration(err.to_string())
    }
}
