mod config;

pub use config::{Config, HealthConfig, SessionConfig, SinkKind, TelemetryConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Overrides the data directory entirely (used by tests and portable installs).
pub const DIR_OVERRIDE_ENV: &str = "SPOON_TRACKER_DIR";

/// Returns `~/.config/spoon-tracker[-dev]/` based on SPOON_TRACKER_ENV.
///
/// Set SPOON_TRACKER_ENV=dev to use the development directory, or
/// SPOON_TRACKER_DIR to point somewhere else altogether.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os(DIR_OVERRIDE_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env =
                std::env::var("SPOON_TRACKER_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("spoon-tracker-dev")
            } else {
                base_dir.join("spoon-tracker")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
