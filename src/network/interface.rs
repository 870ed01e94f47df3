//! Core network types for interface representation.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use bitflags::bitflags;
use serde::Serialize;
use thiserror::Error;

use super::DirectoryError;

bitflags! {
    /// Operational flags of a network interface.
    ///
    /// Parsed from and displayed as lowercase names without underscores,
    /// e.g. `pointtopoint`.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct InterfaceFlags: u32 {
        /// Interface is administratively up.
        const UP = 1 << 0;
        /// Interface supports broadcast.
        const BROADCAST = 1 << 1;
        /// Interface is a loopback interface.
        const LOOPBACK = 1 << 2;
        /// Interface is a point-to-point link.
        const POINT_TO_POINT = 1 << 3;
        /// Interface supports multicast.
        const MULTICAST = 1 << 4;
        /// Interface is operationally running.
        const RUNNING = 1 << 5;
    }
}

/// Lowercase user-facing form of a flag's constant name.
fn flag_name(name: &str) -> String {
    name.replace('_', "").to_lowercase()
}

impl fmt::Display for InterfaceFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "0");
        }
        for (position, (name, _)) in self.iter_names().enumerate() {
            if position > 0 {
                write!(f, "|")?;
            }
            write!(f, "{}", flag_name(name))?;
        }
        Ok(())
    }
}

/// Error returned when parsing an unknown flag name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown interface flag '{name}'")]
pub struct ParseFlagError {
    /// The unrecognised name.
    pub name: String,
}

impl FromStr for InterfaceFlags {
    type Err = ParseFlagError;

    /// Parses a single flag name such as `"up"` or `"loopback"`, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::all()
            .iter_names()
            .find_map(|(name, flag)| (flag_name(name) == wanted).then_some(flag))
            .ok_or_else(|| ParseFlagError {
                name: s.to_string(),
            })
    }
}

/// One row of the host interface table, before address resolution.
#[derive(Debug)]
pub struct InterfaceEntry {
    /// Interface index assigned by the host.
    pub index: u32,
    /// Interface name.
    pub name: String,
    /// Operational flags.
    pub flags: InterfaceFlags,
    /// Addresses bound to the interface, or the per-interface query failure.
    pub addresses: Result<Vec<IpAddr>, DirectoryError>,
}

impl InterfaceEntry {
    /// Creates an entry with successfully queried addresses.
    #[must_use]
    pub fn new(
        index: u32,
        name: impl Into<String>,
        flags: InterfaceFlags,
        addresses: Vec<IpAddr>,
    ) -> Self {
        Self {
            index,
            name: name.into(),
            flags,
            addresses: Ok(addresses),
        }
    }
}

/// A network interface with its resolved IPv4 address.
///
/// `ipv4` is [`Ipv4Addr::UNSPECIFIED`] when the address could not be
/// resolved and the caller asked for a substitute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkInterface {
    /// Interface index assigned by the host.
    pub index: u32,
    /// Interface name.
    pub name: String,
    /// First IPv4 address of the interface.
    pub ipv4: Ipv4Addr,
}

impl NetworkInterface {
    /// Creates a new interface descriptor.
    #[must_use]
    pub fn new(index: u32, name: impl Into<String>, ipv4: Ipv4Addr) -> Self {
        Self {
            index,
            name: name.into(),
            ipv4,
        }
    }

    /// Returns true if the address is the unspecified sentinel.
    #[must_use]
    pub const fn is_unresolved(&self) -> bool {
        self.ipv4.is_unspecified()
    }
}

impl fmt::Display for NetworkInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} {}", self.index, self.name, self.ipv4)
    }
}
