//! Interface directory: listing, filtering, and counting host interfaces.

use std::net::{IpAddr, Ipv4Addr};

use thiserror::Error;

use super::{InterfaceEntry, InterfaceFlags, NetworkInterface};

/// Error type for interface table queries.
///
/// Describes what went wrong without dictating recovery strategy.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Windows API call failed.
    #[cfg(windows)]
    #[error("Windows API error: {0}")]
    WindowsApi(#[from] windows::core::Error),

    /// Unix system call failed.
    #[cfg(unix)]
    #[error("System call failed: {0}")]
    Unix(#[from] nix::errno::Errno),

    /// The interface has no IPv4 address.
    #[error("Interface {name} has no IPv4 address")]
    NoIpv4Address {
        /// Name of the interface.
        name: String,
    },

    /// Platform-specific error with a generic message.
    #[error("Platform error: {message}")]
    Platform {
        /// Error message describing the platform-specific failure.
        message: String,
    },
}

/// Trait for reading the host interface table.
///
/// # Design
///
/// - Platform-specific implementations live in [`super::platform`]
/// - Enables dependency injection for testing with mock tables
/// - Implementations return every interface, unfiltered and unresolved
pub trait InterfaceTable: Send + Sync {
    /// Reads every interface currently known to the host.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError`] if the host table cannot be queried.
    fn interfaces(&self) -> Result<Vec<InterfaceEntry>, DirectoryError>;
}

/// Synchronous queries over the host interface table.
///
/// Every call reads the table afresh; nothing is cached.
#[derive(Debug, Clone, Default)]
pub struct InterfaceDirectory<T> {
    table: T,
}

impl<T> InterfaceDirectory<T> {
    /// Creates a directory over the given table.
    #[must_use]
    pub const fn new(table: T) -> Self {
        Self { table }
    }

    #[cfg(test)]
    pub(crate) const fn table(&self) -> &T {
        &self.table
    }
}

impl InterfaceDirectory<super::platform::PlatformInterfaceTable> {
    /// Creates a directory over this platform's interface table.
    #[must_use]
    pub const fn platform() -> Self {
        Self::new(super::platform::PlatformInterfaceTable::new())
    }
}

impl<T: InterfaceTable> InterfaceDirectory<T> {
    /// Lists every interface, including loopback and down interfaces.
    ///
    /// Interfaces whose IPv4 address cannot be resolved are logged and listed
    /// with [`Ipv4Addr::UNSPECIFIED`].
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError`] if the host table cannot be queried.
    pub fn list_all(&self) -> Result<Vec<NetworkInterface>, DirectoryError> {
        let interfaces = self
            .sorted_entries()?
            .into_iter()
            .map(|entry| {
                let ipv4 = resolve_ipv4(&entry.name, entry.addresses).unwrap_or_else(|e| {
                    tracing::warn!("Error getting address for interface: {e}");
                    Ipv4Addr::UNSPECIFIED
                });
                NetworkInterface::new(entry.index, entry.name, ipv4)
            })
            .collect();

        Ok(interfaces)
    }

    /// Lists interfaces that have every `include` flag and no `exclude` flag.
    ///
    /// Interfaces whose IPv4 address cannot be resolved are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError`] if the host table cannot be queried.
    pub fn list_filtered(
        &self,
        include: InterfaceFlags,
        exclude: InterfaceFlags,
    ) -> Result<Vec<NetworkInterface>, DirectoryError> {
        let interfaces = self
            .sorted_entries()?
            .into_iter()
            .filter(|entry| entry.flags.contains(include) && !entry.flags.intersects(exclude))
            .filter_map(|entry| match resolve_ipv4(&entry.name, entry.addresses) {
                Ok(ipv4) => Some(NetworkInterface::new(entry.index, entry.name, ipv4)),
                Err(e) => {
                    tracing::debug!("Skipping interface: {e}");
                    None
                }
            })
            .collect();

        Ok(interfaces)
    }

    /// Number of interfaces currently known to the host.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError`] if the host table cannot be queried.
    pub fn count(&self) -> Result<usize, DirectoryError> {
        Ok(self.table.interfaces()?.len())
    }

    fn sorted_entries(&self) -> Result<Vec<InterfaceEntry>, DirectoryError> {
        let mut entries = self.table.interfaces()?;
        entries.sort_by_key(|entry| entry.index);
        Ok(entries)
    }
}

/// Picks the first IPv4 address of an interface.
fn resolve_ipv4(
    name: &str,
    addresses: Result<Vec<IpAddr>, DirectoryError>,
) -> Result<Ipv4Addr, DirectoryError> {
    addresses?
        .into_iter()
        .find_map(|address| match address {
            IpAddr::V4(v4) => Some(v4),
            IpAddr::V6(_) => None,
        })
        .ok_or_else(|| DirectoryError::NoIpv4Address {
            name: name.to_string(),
        })
}

#[cfg(test)]
#[path = "directory_tests.rs"]
mod tests;
