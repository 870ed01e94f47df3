//! Typed change notifications and the raw-to-typed mapping.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use serde::Serialize;

/// `AF_INET` as it appears in the host's socket-address family tag.
pub const AF_INET: u16 = 2;

/// `AF_INET6` as it appears in the host's socket-address family tag.
pub const AF_INET6: u16 = 23;

/// Which registration produced a notification.
///
/// Each subscription call carries its origin as the caller context, so a
/// shared callback path can tell the two registrations apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Interface-level change (`NotifyIpInterfaceChange`).
    Interface,
    /// Unicast address-level change (`NotifyUnicastIpAddressChange`).
    Address,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interface => write!(f, "IP Interface change"),
            Self::Address => write!(f, "Unicast IP Address change"),
        }
    }
}

/// What happened to the MIB instance named by a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// A parameter of the instance changed.
    ParameterChanged,
    /// A new instance was added.
    Added,
    /// An instance was deleted.
    Deleted,
    /// Synthetic confirmation sent right after registration; not a real change.
    Initial,
    /// Unrecognised notification type, preserving the raw code for debugging.
    Other(i32),
}

impl ChangeKind {
    /// Maps a raw `MIB_NOTIFICATION_TYPE` value.
    #[must_use]
    pub const fn from_raw(raw: i32) -> Self {
        match raw {
            0 => Self::ParameterChanged,
            1 => Self::Added,
            2 => Self::Deleted,
            3 => Self::Initial,
            other => Self::Other(other),
        }
    }

    /// Returns true for the synthetic registration confirmation.
    #[must_use]
    pub const fn is_initial(self) -> bool {
        matches!(self, Self::Initial)
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParameterChanged => write!(f, "Parameter Notification"),
            Self::Added => write!(f, "Add Instance"),
            Self::Deleted => write!(f, "Delete Instance"),
            Self::Initial => write!(f, "Initial Notification"),
            Self::Other(code) => write!(f, "Unknown Notification ({code})"),
        }
    }
}

/// Byte image of a host `SOCKADDR_INET` union.
///
/// Layout: `u16` family tag (native endian), then either a `SOCKADDR_IN`
/// body (port, 4 address bytes at offset 4) or a `SOCKADDR_IN6` body
/// (port, flow info, 16 address bytes at offset 8).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSocketAddress {
    bytes: [u8; Self::LEN],
}

impl RawSocketAddress {
    /// Size of `SOCKADDR_INET`.
    pub const LEN: usize = 28;

    /// Wraps a raw byte image.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; Self::LEN]) -> Self {
        Self { bytes }
    }

    /// Builds the image of an IPv4 socket address.
    #[must_use]
    pub fn v4(addr: Ipv4Addr) -> Self {
        let mut bytes = [0u8; Self::LEN];
        bytes[..2].copy_from_slice(&AF_INET.to_ne_bytes());
        bytes[4..8].copy_from_slice(&addr.octets());
        Self { bytes }
    }

    /// Builds the image of an IPv6 socket address.
    #[must_use]
    pub fn v6(addr: Ipv6Addr) -> Self {
        let mut bytes = [0u8; Self::LEN];
        bytes[..2].copy_from_slice(&AF_INET6.to_ne_bytes());
        bytes[8..24].copy_from_slice(&addr.octets());
        Self { bytes }
    }

    /// The family tag embedded in the structure.
    #[must_use]
    pub const fn family(&self) -> u16 {
        u16::from_ne_bytes([self.bytes[0], self.bytes[1]])
    }

    /// Decodes the address, or `None` for an unknown family.
    #[must_use]
    pub fn decode(&self) -> Option<IpAddr> {
        match self.family() {
            AF_INET => {
                let mut octets = [0u8; 4];
                octets.copy_from_slice(&self.bytes[4..8]);
                Some(IpAddr::V4(Ipv4Addr::from(octets)))
            }
            AF_INET6 => {
                let mut octets = [0u8; 16];
                octets.copy_from_slice(&self.bytes[8..24]);
                Some(IpAddr::V6(Ipv6Addr::from(octets)))
            }
            _ => None,
        }
    }
}

/// A single interface or address change, as delivered to consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Which registration fired.
    pub origin: Origin,
    /// What kind of change occurred.
    pub kind: ChangeKind,
    /// Index of the interface the change concerns.
    pub interface_index: u32,
    /// The changed address; only present for address-level changes.
    pub address: Option<IpAddr>,
}

impl Notification {
    /// Creates an interface-level notification.
    #[must_use]
    pub const fn interface(kind: ChangeKind, interface_index: u32) -> Self {
        Self {
            origin: Origin::Interface,
            kind,
            interface_index,
            address: None,
        }
    }

    /// Creates an address-level notification.
    #[must_use]
    pub const fn address(kind: ChangeKind, interface_index: u32, address: Option<IpAddr>) -> Self {
        Self {
            origin: Origin::Address,
            kind,
            interface_index,
            address,
        }
    }

    /// Maps one raw callback invocation into a notification.
    ///
    /// The raw address is only decoded for [`Origin::Address`]; interface-level
    /// records never carry an address even if one is supplied.
    #[must_use]
    pub fn from_raw(
        origin: Origin,
        raw_kind: i32,
        interface_index: u32,
        raw_address: Option<&RawSocketAddress>,
    ) -> Self {
        let kind = ChangeKind::from_raw(raw_kind);
        match origin {
            Origin::Interface => Self::interface(kind, interface_index),
            Origin::Address => Self::address(
                kind,
                interface_index,
                raw_address.and_then(RawSocketAddress::decode),
            ),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} (interface {})",
            self.origin, self.kind, self.interface_index
        )?;
        if let Some(address) = self.address {
            write!(f, " {address}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "notification_tests.rs"]
mod tests;
