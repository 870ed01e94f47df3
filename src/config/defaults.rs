//! Default values for configuration options.
//!
//! Centralized constants to avoid magic strings scattered across the codebase.

use crate::monitor::AddressFamily;
use crate::network::InterfaceFlags;

/// Default address family for `watch`.
pub const FAMILY: AddressFamily = AddressFamily::Ipv4;

/// Default output file for `init`.
pub const CONFIG_FILE: &str = "netwatch.toml";

/// Flags an interface must have to be listed by default.
pub const LIST_INCLUDE: InterfaceFlags = InterfaceFlags::RUNNING;

/// Flags that hide an interface from the default listing.
pub const LIST_EXCLUDE: InterfaceFlags = InterfaceFlags::LOOPBACK;
