//! Error types for Nexus
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Nexus operations
///
/// This enum encompasses all possible errors that can occur during
/// configuration loading, attachment encoding, credential resolution,
/// and provider interactions.
///
/// Note that provider failures never escape the message-sending boundary:
/// [`crate::providers::send_message`] converts every error on the network
/// path into an error-flagged chat message. `NexusError::Provider` values
/// therefore only travel between the provider internals and that boundary.
#[derive(Error, Debug)]
pub enum NexusError {
    /// Configuration-related errors (invalid file, out-of-range values)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Attachment encoding errors (unreadable file, oversize, not an image)
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Provider-related errors (API calls, malformed responses, etc.)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Missing credentials for the provider
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Keyring/credential storage errors
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),
}

/// Result type alias for Nexus operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
