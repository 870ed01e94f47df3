//! Unix interface table using `getifaddrs`.

use std::net::IpAddr;

use nix::ifaddrs::getifaddrs;
use nix::net::if_::{InterfaceFlags as IfFlags, if_nametoindex};
use nix::sys::socket::SockaddrStorage;

use crate::network::{DirectoryError, InterfaceEntry, InterfaceFlags, InterfaceTable};

/// Unix implementation of [`InterfaceTable`] using `getifaddrs`.
///
/// `getifaddrs` yields one record per address; records are grouped by
/// interface name in first-seen order. An interface whose index cannot be
/// looked up (it vanished mid-query) is left out.
///
/// # Example
///
/// ```no_run
/// use netwatch::network::{InterfaceDirectory, platform::UnixInterfaceTable};
///
/// let directory = InterfaceDirectory::new(UnixInterfaceTable::new());
/// for iface in directory.list_all().expect("Failed to list interfaces") {
///     println!("{iface}");
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct UnixInterfaceTable {
    _private: (),
}

impl UnixInterfaceTable {
    /// Creates a new Unix interface table.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

impl InterfaceTable for UnixInterfaceTable {
    fn interfaces(&self) -> Result<Vec<InterfaceEntry>, DirectoryError> {
        let records = getifaddrs()?.map(|record| AddressRecord {
            address: record.address.as_ref().and_then(ip_address),
            flags: record.flags,
            name: record.interface_name,
        });

        Ok(group_records(records, if_nametoindex::<str>))
    }
}

/// The parts of a `getifaddrs` record the table keeps.
struct AddressRecord {
    name: String,
    flags: IfFlags,
    address: Option<IpAddr>,
}

/// Groups per-address records into one entry per interface name.
fn group_records<I, F>(records: I, index_of: F) -> Vec<InterfaceEntry>
where
    I: IntoIterator<Item = AddressRecord>,
    F: Fn(&str) -> nix::Result<u32>,
{
    let mut entries: Vec<InterfaceEntry> = Vec::new();
    let mut skipped: Vec<String> = Vec::new();

    for record in records {
        if skipped.contains(&record.name) {
            continue;
        }

        let position = entries.iter().position(|entry| entry.name == record.name);
        let entry = if let Some(position) = position {
            &mut entries[position]
        } else {
            let index = match index_of(&record.name) {
                Ok(index) => index,
                Err(e) => {
                    tracing::warn!(
                        "Skipping interface {}: index lookup failed: {e}",
                        record.name
                    );
                    skipped.push(record.name);
                    continue;
                }
            };
            entries.push(InterfaceEntry::new(
                index,
                record.name,
                map_flags(record.flags),
                Vec::new(),
            ));
            let last = entries.len() - 1;
            &mut entries[last]
        };

        if let (Some(address), Ok(addresses)) = (record.address, &mut entry.addresses) {
            addresses.push(address);
        }
    }

    entries
}

/// Maps `IFF_*` flags to [`InterfaceFlags`].
fn map_flags(flags: IfFlags) -> InterfaceFlags {
    let mut mapped = InterfaceFlags::empty();
    mapped.set(InterfaceFlags::UP, flags.contains(IfFlags::IFF_UP));
    mapped.set(InterfaceFlags::BROADCAST, flags.contains(IfFlags::IFF_BROADCAST));
    mapped.set(InterfaceFlags::LOOPBACK, flags.contains(IfFlags::IFF_LOOPBACK));
    mapped.set(
        InterfaceFlags::POINT_TO_POINT,
        flags.contains(IfFlags::IFF_POINTOPOINT),
    );
    mapped.set(InterfaceFlags::MULTICAST, flags.contains(IfFlags::IFF_MULTICAST));
    mapped.set(InterfaceFlags::RUNNING, flags.contains(IfFlags::IFF_RUNNING));
    mapped
}

/// Extracts an IP address; link-layer and other families yield `None`.
fn ip_address(storage: &SockaddrStorage) -> Option<IpAddr> {
    if let Some(sin) = storage.as_sockaddr_in() {
        return Some(IpAddr::V4(sin.ip()));
    }
    storage
        .as_sockaddr_in6()
        .map(|sin6| IpAddr::V6(sin6.ip()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::InterfaceDirectory;
    use std::net::Ipv4Addr;

    #[test]
    fn map_flags_translates_each_flag() {
        let flags = map_flags(IfFlags::IFF_UP | IfFlags::IFF_LOOPBACK | IfFlags::IFF_RUNNING);

        assert_eq!(
            flags,
            InterfaceFlags::UP | InterfaceFlags::LOOPBACK | InterfaceFlags::RUNNING
        );
    }

    #[test]
    fn map_flags_empty() {
        assert!(map_flags(IfFlags::empty()).is_empty());
    }

    fn record(name: &str, address: Option<IpAddr>) -> AddressRecord {
        AddressRecord {
            name: name.to_string(),
            flags: IfFlags::IFF_UP | IfFlags::IFF_RUNNING,
            address,
        }
    }

    #[test]
    fn records_are_grouped_by_name() {
        let records = vec![
            record("eth0", None),
            record("lo", Some(IpAddr::V4(Ipv4Addr::LOCALHOST))),
            record("eth0", Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2)))),
        ];

        let entries = group_records(records, |name| Ok(if name == "lo" { 1 } else { 2 }));

        assert_eq!(entries.len(), 2);
        assert_eq!((entries[0].index, entries[0].name.as_str()), (2, "eth0"));
        assert_eq!(
            entries[0].addresses.as_ref().unwrap(),
            &vec![IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2))]
        );
        assert_eq!(entries[1].flags, InterfaceFlags::UP | InterfaceFlags::RUNNING);
    }

    #[test]
    fn failed_index_lookup_skips_only_that_interface() {
        let records = vec![
            record("gone0", Some(IpAddr::V4(Ipv4Addr::new(10, 9, 9, 9)))),
            record("eth0", Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2)))),
            record("gone0", None),
        ];
        let lookups = std::cell::Cell::new(0);

        let entries = group_records(records, |name| {
            lookups.set(lookups.get() + 1);
            if name == "gone0" {
                Err(nix::errno::Errno::ENXIO)
            } else {
                Ok(4)
            }
        });

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "eth0");
        // The vanished interface is looked up once, not per record
        assert_eq!(lookups.get(), 2);
    }

    // Integration test: reads the real interface table
    #[test]
    fn list_all_includes_loopback() {
        let directory = InterfaceDirectory::new(UnixInterfaceTable::new());

        let interfaces = directory.list_all().expect("list_all failed");

        assert!(
            interfaces.iter().any(|i| i.ipv4 == Ipv4Addr::LOCALHOST),
            "Expected a loopback interface, got: {interfaces:?}"
        );
        assert_eq!(interfaces.len(), directory.count().unwrap());
    }

    #[test]
    fn entries_have_names_and_indices() {
        let entries = UnixInterfaceTable::new().interfaces().expect("query failed");

        for entry in &entries {
            assert!(!entry.name.is_empty());
            assert!(entry.index > 0, "index missing for {}", entry.name);
        }
    }
}
