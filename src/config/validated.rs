//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::Path;

use crate::monitor::AddressFamily;
use crate::network::InterfaceFlags;

use super::cli::{Cli, Command};
use super::defaults;
use super::error::ConfigError;
use super::toml::TomlConfig;

/// Interface filter used by the `list` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListFilter {
    /// Flags an interface must carry (all of them).
    pub include: InterfaceFlags,
    /// Flags that hide an interface (any of them).
    pub exclude: InterfaceFlags,
    /// Show every interface regardless of flags.
    pub all: bool,
}

impl Default for ListFilter {
    fn default() -> Self {
        Self {
            include: defaults::LIST_INCLUDE,
            exclude: defaults::LIST_EXCLUDE,
            all: false,
        }
    }
}

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The function validates all inputs and returns errors for invalid configurations.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Address family passed to both subscriptions
    pub family: AddressFamily,

    /// Whether the host should emit an initial notification on registration
    pub initial_notification: bool,

    /// Print JSON lines instead of text
    pub json: bool,

    /// Filter applied by the list command
    pub list: ListFilter,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config {{ family: {}, initial_notification: {}, json: {}, \
             list: include={} exclude={} all={} }}",
            self.family,
            self.initial_notification,
            self.json,
            self.list.include,
            self.list.exclude,
            self.list.all,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The address family string is not recognised
    /// - An include/exclude flag name is not recognised
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let family = Self::resolve_family(cli, toml)?;

        // Boolean flags: true in either source wins
        let initial_notification =
            cli.initial || toml.is_some_and(|t| t.watch.initial_notification);
        let json = cli.json || toml.is_some_and(|t| t.watch.json);

        let list = Self::build_list_filter(cli, toml)?;

        Ok(Self {
            family,
            initial_notification,
            json,
            list,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_family(cli: &Cli, toml: Option<&TomlConfig>) -> Result<AddressFamily, ConfigError> {
        // CLI takes precedence
        if let Some(family) = cli.family {
            return Ok(family.into());
        }

        match toml.and_then(|t| t.watch.family.as_deref()) {
            Some(value) => parse_family(value),
            None => Ok(defaults::FAMILY),
        }
    }

    fn build_list_filter(cli: &Cli, toml: Option<&TomlConfig>) -> Result<ListFilter, ConfigError> {
        let (all, cli_include, cli_exclude) = match &cli.command {
            Some(Command::List {
                all,
                include,
                exclude,
            }) => (*all, include.as_slice(), exclude.as_slice()),
            _ => (false, NO_FLAGS, NO_FLAGS),
        };
        let section = toml.map(|t| &t.list);

        // CLI lists replace TOML lists; each side is resolved independently
        let include = if cli_include.is_empty() {
            section
                .and_then(|s| s.include.as_deref())
                .map_or(Ok(defaults::LIST_INCLUDE), |names| {
                    parse_flags("include", names)
                })?
        } else {
            parse_flags("include", cli_include)?
        };

        let exclude = if cli_exclude.is_empty() {
            section
                .and_then(|s| s.exclude.as_deref())
                .map_or(Ok(defaults::LIST_EXCLUDE), |names| {
                    parse_flags("exclude", names)
                })?
        } else {
            parse_flags("exclude", cli_exclude)?
        };

        Ok(ListFilter {
            include,
            exclude,
            all,
        })
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

// Helper functions

const NO_FLAGS: &[String] = &[];

fn parse_family(s: &str) -> Result<AddressFamily, ConfigError> {
    match s.to_lowercase().as_str() {
        "ipv4" | "v4" | "4" => Ok(AddressFamily::Ipv4),
        "ipv6" | "v6" | "6" => Ok(AddressFamily::Ipv6),
        "both" | "all" | "dual" => Ok(AddressFamily::Unspecified),
        _ => Err(ConfigError::InvalidFamily {
            value: s.to_string(),
        }),
    }
}

fn parse_flags(field: &'static str, names: &[String]) -> Result<InterfaceFlags, ConfigError> {
    names
        .iter()
        .map(|name| {
            name.parse::<InterfaceFlags>()
                .map_err(|source| ConfigError::InvalidFlag { field, source })
        })
        .collect()
}
