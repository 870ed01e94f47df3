//! Configuration layer for netwatch.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values explicitly passed via command line
//! 2. **TOML config file** - Values from the configuration file
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! For the list filters (`list.include`, `list.exclude`), CLI flags **replace**
//! the TOML list entirely (not merged). Include and exclude are resolved
//! independently: `--include` replaces only the TOML includes.
//!
//! # Boolean Flag Semantics
//!
//! Boolean flags (`--initial`, `--json`) use OR semantics:
//! - If set `true` in either CLI or TOML, the result is `true`.
//! - Once set `true` in TOML, CLI cannot override to `false` (flags only enable, not disable).

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod cli_tests;
#[cfg(test)]
mod validated_tests;

pub use cli::{Cli, Command, FamilyArg};
pub use error::ConfigError;
pub use toml::{ListSection, TomlConfig, WatchSection, default_config_template};
pub use validated::{ListFilter, ValidatedConfig, write_default_config};
