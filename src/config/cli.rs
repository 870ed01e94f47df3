//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::monitor::AddressFamily;

/// netwatch: Network Change Watcher
///
/// Watches network interfaces and unicast IP addresses for changes
/// and prints each notification as it arrives.
#[derive(Debug, Parser)]
#[command(name = "netwatch")]
#[command(version, about, long_about = None)]
#[allow(clippy::struct_excessive_bools)] // CLI flags are naturally boolean
pub struct Cli {
    /// Subcommand to run (default: watch)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Address family to watch
    #[arg(long, value_enum, global = true)]
    pub family: Option<FamilyArg>,

    /// Request an initial notification right after registering
    #[arg(long, global = true)]
    pub initial: bool,

    /// Print one JSON object per line instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for netwatch
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Watch for interface and address changes until interrupted
    Watch,

    /// List host interfaces with their primary IPv4 address
    List {
        /// Show every interface, ignoring include/exclude flags
        #[arg(long)]
        all: bool,

        /// Only show interfaces that have all of these flags (can be specified multiple times)
        #[arg(long = "include", value_name = "FLAG")]
        include: Vec<String>,

        /// Hide interfaces that have any of these flags (can be specified multiple times)
        #[arg(long = "exclude", value_name = "FLAG")]
        exclude: Vec<String>,
    },

    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "netwatch.toml")]
        output: PathBuf,
    },
}

/// Address family argument for CLI parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FamilyArg {
    /// Watch IPv4 only
    #[value(name = "ipv4")]
    V4,
    /// Watch IPv6 only
    #[value(name = "ipv6")]
    V6,
    /// Watch both IPv4 and IPv6
    #[value(name = "both")]
    Both,
}

impl From<FamilyArg> for AddressFamily {
    fn from(arg: FamilyArg) -> Self {
        match arg {
            FamilyArg::V4 => Self::Ipv4,
            FamilyArg::V6 => Self::Ipv6,
            FamilyArg::Both => Self::Unspecified,
        }
    }
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns the template output path if this is the init command.
    #[must_use]
    pub fn init_output(&self) -> Option<&std::path::Path> {
        match &self.command {
            Some(Command::Init { output }) => Some(output),
            _ => None,
        }
    }

    /// Returns true if this is the list command.
    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self.command, Some(Command::List { .. }))
    }
}
