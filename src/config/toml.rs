//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Watch command configuration
    #[serde(default)]
    pub watch: WatchSection,

    /// List command configuration
    #[serde(default)]
    pub list: ListSection,
}

/// Watch command configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchSection {
    /// Address family to watch: "ipv4", "ipv6", or "both"
    pub family: Option<String>,

    /// Request an initial notification after registering
    #[serde(default)]
    pub initial_notification: bool,

    /// Print JSON lines instead of text
    #[serde(default)]
    pub json: bool,
}

/// List command configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListSection {
    /// Flags an interface must have to be listed
    pub include: Option<Vec<String>>,

    /// Flags that hide an interface
    pub exclude: Option<Vec<String>>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# netwatch Configuration File

[watch]
# Address family to watch (default: ipv4)
# Accepted values: "ipv4"/"v4"/"4", "ipv6"/"v6"/"6", or "both"/"all"/"dual"
family = "ipv4"

# Emit an initial notification right after registering
# initial_notification = false

# Print one JSON object per line instead of text
# json = false

[list]
# Flags an interface must have to be listed (all must match)
# Known flags: up, broadcast, loopback, pointtopoint, multicast, running
# Note: CLI --include REPLACES this list entirely (not merged)
include = ["running"]

# Flags that hide an interface (any match hides it)
# Note: CLI --exclude REPLACES this list entirely (not merged)
exclude = ["loopback"]
"#
    .to_string()
}
