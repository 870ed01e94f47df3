//! Error types for configuration parsing and validation.

use std::path::PathBuf;

use thiserror::Error;

use crate::network::ParseFlagError;

/// Error type for configuration operations.
///
/// Covers errors from parsing, validation, and file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read config file '{}': {source}", path.display())]
    FileRead {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to write configuration file (for init command).
    #[error("Failed to write config file '{}': {source}", path.display())]
    FileWrite {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Invalid address family value.
    #[error("Invalid address family '{value}': expected ipv4, ipv6, or both")]
    InvalidFamily {
        /// The invalid value provided
        value: String,
    },

    /// Invalid interface flag name in an include/exclude list.
    #[error("Invalid {field} flag: {source}")]
    InvalidFlag {
        /// Which list the flag came from (`include` or `exclude`)
        field: &'static str,
        /// Underlying parse error
        #[source]
        source: ParseFlagError,
    },
}
