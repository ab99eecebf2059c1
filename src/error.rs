//! Error types
//!
//! The simulation itself never fails; only loading configuration can.

use thiserror::Error;

/// Errors raised while loading or validating [`crate::GameConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// The config file is not valid JSON for `GameConfig`.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A field holds a value the simulation cannot run with.
    #[error("invalid config value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}
