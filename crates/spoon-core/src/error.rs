//! Core error types for spoon-core.
//!
//! Validation failures are the only errors a ledger operation can produce.
//! The remaining variants belong to the collaborators around the ledger
//! (configuration, telemetry delivery, health probing).

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for spoon-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Ledger input validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Telemetry delivery errors
    #[error("Telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),

    /// Health probe errors
    #[error("Health check error: {0}")]
    Health(#[from] HealthError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rejected activity input. The ledger is left untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Activity name is empty after trimming
    #[error("Please enter an activity name")]
    EmptyName,

    /// Activity cost outside the accepted range
    #[error("Cost must be between {min} and {max} spoons (got {cost})")]
    CostOutOfRange { cost: i64, min: u32, max: u32 },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Home/data directory could not be prepared
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Telemetry sink errors. Never fatal for the ledger.
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// Writing to a local event log failed
    #[error("Failed to write telemetry event: {0}")]
    Io(#[from] std::io::Error),

    /// Event could not be serialized
    #[error("Failed to encode telemetry event: {0}")]
    Encode(#[from] serde_json::Error),

    /// The delivery queue has shut down
    #[error("Telemetry channel closed for sink '{sink}'")]
    ChannelClosed { sink: String },

    /// Sink misconfigured (bad endpoint, etc.)
    #[error("Invalid telemetry configuration: {0}")]
    InvalidConfig(String),
}

/// Health probe errors.
///
/// Request failures are not errors here: they become FAIL results in the
/// report. These cover setup and artifact writing.
#[derive(Error, Debug)]
pub enum HealthError {
    /// Base URL cannot be parsed or is not http(s)
    #[error("Invalid health check URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    /// HTTP client could not be built
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    /// Writing the JUnit artifact failed
    #[error("Failed to write JUnit report to {path}: {source}")]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
