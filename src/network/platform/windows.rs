//! Windows interface table using `GetAdaptersAddresses`.

use crate::network::{DirectoryError, InterfaceEntry, InterfaceFlags, InterfaceTable};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use windows::Win32::Foundation::WIN32_ERROR;
use windows::Win32::NetworkManagement::IpHelper::{
    GAA_FLAG_SKIP_ANYCAST, GAA_FLAG_SKIP_DNS_SERVER, GAA_FLAG_SKIP_MULTICAST, GetAdaptersAddresses,
    IF_TYPE_ETHERNET_CSMACD, IF_TYPE_IEEE80211, IF_TYPE_SOFTWARE_LOOPBACK, IP_ADAPTER_ADDRESSES_LH,
};
use windows::Win32::NetworkManagement::Ndis::IfOperStatusUp;
use windows::Win32::Networking::WinSock::{
    AF_INET, AF_INET6, AF_UNSPEC, SOCKADDR_IN, SOCKADDR_IN6,
};

/// Interface type for PPP (Point-to-Point Protocol) adapters.
/// Value from Windows SDK `iptypes.h` - not exported by the `windows` crate.
const IF_TYPE_PPP: u32 = 23;

/// Interface type for tunnel adapters (VPN, etc.).
/// Value from Windows SDK `iptypes.h` - not exported by the `windows` crate.
const IF_TYPE_TUNNEL: u32 = 131;

/// `IP_ADAPTER_NO_MULTICAST` adapter flag from `iptypes.h`.
const IP_ADAPTER_NO_MULTICAST: u32 = 0x0010;

/// Buffer size hint for `GetAdaptersAddresses`.
/// The API will tell us the actual required size if this is insufficient.
const INITIAL_BUFFER_SIZE: u32 = 16384;

/// Windows implementation of [`InterfaceTable`] using `GetAdaptersAddresses`.
///
/// # Example
///
/// ```no_run
/// use netwatch::network::{InterfaceDirectory, platform::WindowsInterfaceTable};
///
/// let directory = InterfaceDirectory::new(WindowsInterfaceTable::new());
/// for iface in directory.list_all().expect("Failed to list interfaces") {
///     println!("{iface}");
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct WindowsInterfaceTable {
    // Currently no configuration needed, but struct allows future extension
    _private: (),
}

impl WindowsInterfaceTable {
    /// Creates a new Windows interface table.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

impl InterfaceTable for WindowsInterfaceTable {
    fn interfaces(&self) -> Result<Vec<InterfaceEntry>, DirectoryError> {
        read_adapters()
    }
}

/// Reads every adapter returned by `GetAdaptersAddresses`.
fn read_adapters() -> Result<Vec<InterfaceEntry>, DirectoryError> {
    let raw_adapters = get_adapter_addresses()?;

    let mut entries = Vec::new();
    // SAFETY: GetAdaptersAddresses returns a properly aligned buffer for IP_ADAPTER_ADDRESSES_LH.
    #[allow(clippy::cast_ptr_alignment)]
    let mut current = raw_adapters.as_ptr().cast::<IP_ADAPTER_ADDRESSES_LH>();

    // SAFETY: We iterate through a linked list returned by GetAdaptersAddresses.
    // The list is valid as long as the buffer (`raw_adapters`) is alive.
    while !current.is_null() {
        let adapter = unsafe { &*current };

        if let Some(entry) = parse_adapter(adapter) {
            entries.push(entry);
        }

        current = adapter.Next;
    }

    Ok(entries)
}

/// Calls `GetAdaptersAddresses` and returns the raw buffer containing adapter data.
///
/// Handles the two-call pattern: first with an estimated buffer size, then
/// once more with the exact size if the buffer was too small.
fn get_adapter_addresses() -> Result<Vec<u8>, DirectoryError> {
    use windows::Win32::Foundation::{ERROR_BUFFER_OVERFLOW, NO_ERROR};

    let flags = GAA_FLAG_SKIP_ANYCAST | GAA_FLAG_SKIP_MULTICAST | GAA_FLAG_SKIP_DNS_SERVER;
    let family = u32::from(AF_UNSPEC.0);

    let mut buffer: Vec<u8> = vec![0u8; INITIAL_BUFFER_SIZE as usize];
    let mut size = INITIAL_BUFFER_SIZE;

    for _ in 0..2 {
        // SAFETY: We provide a valid buffer and size. The function writes adapter
        // information to the buffer and updates `size` with the required length.
        let result = unsafe {
            GetAdaptersAddresses(
                family,
                flags,
                None,
                Some(buffer.as_mut_ptr().cast()),
                &raw mut size,
            )
        };

        if result == NO_ERROR.0 {
            return Ok(buffer);
        }
        if result != ERROR_BUFFER_OVERFLOW.0 {
            return Err(windows::core::Error::from(WIN32_ERROR(result)).into());
        }

        buffer.resize(size as usize, 0);
    }

    Err(windows::core::Error::from(ERROR_BUFFER_OVERFLOW).into())
}

/// Parses a single `IP_ADAPTER_ADDRESSES_LH` structure into an [`InterfaceEntry`].
///
/// Returns `None` if the adapter name cannot be read.
fn parse_adapter(adapter: &IP_ADAPTER_ADDRESSES_LH) -> Option<InterfaceEntry> {
    let name = unsafe { adapter.FriendlyName.to_string().ok()? };
    // SAFETY: Both union views expose the same leading IfIndex/Flags fields.
    let (index, adapter_flags) = unsafe {
        (
            adapter.Anonymous1.Anonymous.IfIndex,
            adapter.Anonymous2.Flags,
        )
    };

    let flags = map_flags(
        adapter.IfType,
        adapter.OperStatus == IfOperStatusUp,
        adapter_flags & IP_ADAPTER_NO_MULTICAST == 0,
    );

    Some(InterfaceEntry::new(index, name, flags, collect_addresses(adapter)))
}

/// Derives [`InterfaceFlags`] from the adapter type and status.
fn map_flags(if_type: u32, oper_up: bool, multicast: bool) -> InterfaceFlags {
    let mut flags = InterfaceFlags::empty();
    flags.set(InterfaceFlags::UP | InterfaceFlags::RUNNING, oper_up);
    flags.set(InterfaceFlags::LOOPBACK, if_type == IF_TYPE_SOFTWARE_LOOPBACK);
    flags.set(
        InterfaceFlags::BROADCAST,
        matches!(if_type, IF_TYPE_ETHERNET_CSMACD | IF_TYPE_IEEE80211),
    );
    flags.set(
        InterfaceFlags::POINT_TO_POINT,
        matches!(if_type, IF_TYPE_TUNNEL | IF_TYPE_PPP),
    );
    flags.set(InterfaceFlags::MULTICAST, multicast);
    flags
}

/// Collects unicast addresses from an adapter.
///
/// # Safety Note
///
/// The pointer casts to `SOCKADDR_IN` and `SOCKADDR_IN6` are allowed despite alignment
/// concerns because Windows guarantees proper alignment of these structures when returned
/// from the networking APIs.
#[allow(clippy::cast_ptr_alignment)]
fn collect_addresses(adapter: &IP_ADAPTER_ADDRESSES_LH) -> Vec<IpAddr> {
    let mut addresses = Vec::new();

    let mut unicast = adapter.FirstUnicastAddress;

    // SAFETY: Each address is valid as long as the parent adapter buffer is alive.
    while !unicast.is_null() {
        let addr_entry = unsafe { &*unicast };

        if let Some(sockaddr) = unsafe { addr_entry.Address.lpSockaddr.as_ref() } {
            match sockaddr.sa_family {
                f if f == AF_INET => {
                    // SAFETY: We verified the family is AF_INET, so this is a valid cast.
                    let sockaddr_in =
                        unsafe { &*(std::ptr::from_ref(sockaddr).cast::<SOCKADDR_IN>()) };
                    let octets = unsafe { sockaddr_in.sin_addr.S_un.S_un_b };
                    addresses.push(IpAddr::V4(Ipv4Addr::new(
                        octets.s_b1,
                        octets.s_b2,
                        octets.s_b3,
                        octets.s_b4,
                    )));
                }
                f if f == AF_INET6 => {
                    // SAFETY: We verified the family is AF_INET6, so this is a valid cast.
                    let sockaddr_in6 =
                        unsafe { &*(std::ptr::from_ref(sockaddr).cast::<SOCKADDR_IN6>()) };
                    let octets = unsafe { sockaddr_in6.sin6_addr.u.Byte };
                    addresses.push(IpAddr::V6(Ipv6Addr::from(octets)));
                }
                _ => {}
            }
        }

        unicast = addr_entry.Next;
    }

    addresses
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::InterfaceDirectory;

    #[test]
    fn map_flags_loopback() {
        let flags = map_flags(IF_TYPE_SOFTWARE_LOOPBACK, true, true);
        assert!(flags.contains(InterfaceFlags::LOOPBACK | InterfaceFlags::UP));
        assert!(!flags.intersects(InterfaceFlags::BROADCAST));
    }

    #[test]
    fn map_flags_ethernet_down() {
        let flags = map_flags(IF_TYPE_ETHERNET_CSMACD, false, true);
        assert!(flags.contains(InterfaceFlags::BROADCAST | InterfaceFlags::MULTICAST));
        assert!(!flags.intersects(InterfaceFlags::UP | InterfaceFlags::RUNNING));
    }

    #[test]
    fn map_flags_tunnel_is_point_to_point() {
        assert!(map_flags(IF_TYPE_TUNNEL, true, false).contains(InterfaceFlags::POINT_TO_POINT));
        assert!(map_flags(IF_TYPE_PPP, true, false).contains(InterfaceFlags::POINT_TO_POINT));
    }

    // Integration test: actually reads adapters from the system
    #[test]
    fn list_all_returns_at_least_loopback() {
        let directory = InterfaceDirectory::new(WindowsInterfaceTable::new());

        let interfaces = directory.list_all().expect("list_all failed");

        assert!(
            interfaces.iter().any(|i| i.ipv4 == Ipv4Addr::LOCALHOST),
            "Expected loopback interface, got: {interfaces:?}"
        );
        assert_eq!(interfaces.len(), directory.count().unwrap());
    }
}
