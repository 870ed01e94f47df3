//! Windows notification host using the IP Helper change-notification API.

use crate::monitor::{
    AddressFamily, CallbackContext, HostError, NotifyHost, Origin, RawSocketAddress,
};
use std::ffi::c_void;
use std::sync::Arc;
use windows::Win32::Foundation::{HANDLE, NO_ERROR, WIN32_ERROR};
use windows::Win32::NetworkManagement::IpHelper::{
    CancelMibChangeNotify2, MIB_IPINTERFACE_ROW, MIB_NOTIFICATION_TYPE, MIB_UNICASTIPADDRESS_ROW,
    NotifyIpInterfaceChange, NotifyUnicastIpAddressChange,
};
use windows::Win32::Networking::WinSock::{
    ADDRESS_FAMILY, AF_INET, AF_INET6, AF_UNSPEC, SOCKADDR_INET,
};

/// Windows implementation of [`NotifyHost`].
///
/// Interface-level registrations use `NotifyIpInterfaceChange`, address-level
/// ones `NotifyUnicastIpAddressChange`; both are cancelled with
/// `CancelMibChangeNotify2`. The entry points come from the `windows` crate's
/// import bindings, so they are resolved once per process and shared by every
/// host instance.
///
/// # Example
///
/// ```no_run
/// use netwatch::monitor::Subscription;
/// use netwatch::monitor::platform::WindowsNotifyHost;
///
/// let mut subscription = Subscription::new(WindowsNotifyHost::new());
/// let _stream = subscription.take_stream();
/// subscription.register(true).expect("Failed to register");
/// subscription.unregister().expect("Failed to unregister");
/// ```
#[derive(Debug, Clone, Default)]
pub struct WindowsNotifyHost {
    // Currently no configuration needed, but struct allows future extension
    _private: (),
}

impl WindowsNotifyHost {
    /// Creates a new Windows notification host.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

/// An active Windows registration.
///
/// Carries the context pointer leaked into the registration so it can be
/// reclaimed once the registration is cancelled.
#[derive(Debug)]
pub struct WindowsHandle {
    handle: HANDLE,
    context: *const CallbackContext,
}

// SAFETY: The HANDLE is only used for CancelMibChangeNotify2, which may be
// called from any thread, and the context pointer targets a Send + Sync type.
unsafe impl Send for WindowsHandle {}

impl NotifyHost for WindowsNotifyHost {
    type Handle = WindowsHandle;

    fn subscribe(
        &self,
        origin: Origin,
        family: AddressFamily,
        context: &Arc<CallbackContext>,
        initial: bool,
    ) -> Result<WindowsHandle, HostError> {
        // The host keeps its own strong reference until the handle is cancelled
        let context_ptr = Arc::into_raw(Arc::clone(context));
        let void_ptr = context_ptr.cast_mut().cast::<c_void>();

        let mut handle = HANDLE::default();

        // SAFETY: We provide valid callbacks and a context that stays alive
        // until CancelMibChangeNotify2 succeeds for this handle.
        let result = unsafe {
            match origin {
                Origin::Interface => NotifyIpInterfaceChange(
                    address_family(family),
                    Some(ip_interface_change_callback),
                    Some(void_ptr),
                    initial,
                    &raw mut handle,
                ),
                Origin::Address => NotifyUnicastIpAddressChange(
                    address_family(family),
                    Some(unicast_address_change_callback),
                    Some(void_ptr),
                    initial,
                    &raw mut handle,
                ),
            }
        };

        if result != NO_ERROR {
            // SAFETY: Registration failed, so Windows won't call the callback
            drop(unsafe { Arc::from_raw(context_ptr) });
            return Err(windows::core::Error::from(WIN32_ERROR(result.0)).into());
        }

        Ok(WindowsHandle {
            handle,
            context: context_ptr,
        })
    }

    fn cancel(&self, handle: WindowsHandle) -> Result<(), HostError> {
        // SAFETY: The handle was returned by a Notify* call and, being taken
        // by value, is cancelled at most once.
        let result = unsafe { CancelMibChangeNotify2(handle.handle) };

        if result != NO_ERROR {
            // The callback may still fire; leaking the context is the only safe option
            tracing::warn!("Leaking callback context after failed cancel");
            return Err(windows::core::Error::from(WIN32_ERROR(result.0)).into());
        }

        // SAFETY: After CancelMibChangeNotify2 returns, Windows guarantees the
        // callback won't fire again, so we can safely reclaim the context.
        drop(unsafe { Arc::from_raw(handle.context) });
        Ok(())
    }
}

const fn address_family(family: AddressFamily) -> ADDRESS_FAMILY {
    match family {
        AddressFamily::Ipv4 => AF_INET,
        AddressFamily::Ipv6 => AF_INET6,
        AddressFamily::Unspecified => AF_UNSPEC,
    }
}

/// Copies a `SOCKADDR_INET` into its portable byte image.
fn raw_socket_address(address: &SOCKADDR_INET) -> RawSocketAddress {
    let mut bytes = [0u8; RawSocketAddress::LEN];
    let len = std::mem::size_of::<SOCKADDR_INET>().min(RawSocketAddress::LEN);

    // SAFETY: SOCKADDR_INET is a plain C union of at least `len` bytes.
    let source =
        unsafe { std::slice::from_raw_parts(std::ptr::from_ref(address).cast::<u8>(), len) };
    bytes[..len].copy_from_slice(source);

    RawSocketAddress::from_bytes(bytes)
}

/// Callback for `NotifyIpInterfaceChange`.
///
/// # Safety
///
/// - `caller_context` must be the pointer passed at registration
/// - `row` is null for initial notifications
unsafe extern "system" fn ip_interface_change_callback(
    caller_context: *const c_void,
    row: *const MIB_IPINTERFACE_ROW,
    notification_type: MIB_NOTIFICATION_TYPE,
) {
    if caller_context.is_null() {
        return;
    }

    // SAFETY: caller_context was set by us in subscribe and is kept alive
    // until the registration is cancelled.
    let context = unsafe { &*(caller_context.cast::<CallbackContext>()) };
    // SAFETY: When non-null, row points to a row valid for this call.
    let interface_index = unsafe { row.as_ref() }.map_or(0, |row| row.InterfaceIndex);

    context.on_interface_change(notification_type.0, interface_index);
}

/// Callback for `NotifyUnicastIpAddressChange`.
///
/// # Safety
///
/// Same contract as [`ip_interface_change_callback`].
unsafe extern "system" fn unicast_address_change_callback(
    caller_context: *const c_void,
    row: *const MIB_UNICASTIPADDRESS_ROW,
    notification_type: MIB_NOTIFICATION_TYPE,
) {
    if caller_context.is_null() {
        return;
    }

    // SAFETY: See ip_interface_change_callback.
    let context = unsafe { &*(caller_context.cast::<CallbackContext>()) };

    // SAFETY: When non-null, row points to a row valid for this call.
    match unsafe { row.as_ref() } {
        Some(row) => {
            let raw = raw_socket_address(&row.Address);
            context.on_address_change(notification_type.0, row.InterfaceIndex, Some(&raw));
        }
        None => context.on_address_change(notification_type.0, 0, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    #[test]
    fn address_family_mapping() {
        assert_eq!(address_family(AddressFamily::Ipv4), AF_INET);
        assert_eq!(address_family(AddressFamily::Ipv6), AF_INET6);
        assert_eq!(address_family(AddressFamily::Unspecified), AF_UNSPEC);
    }

    #[test]
    fn raw_socket_address_decodes_ipv4_row() {
        // SAFETY: SOCKADDR_INET is plain old data; all-zero is a valid value.
        let mut address: SOCKADDR_INET = unsafe { std::mem::zeroed() };
        // SAFETY: Writing Copy fields of the IPv4 variant.
        unsafe {
            address.Ipv4.sin_family = AF_INET;
            address.Ipv4.sin_addr.S_un.S_addr = u32::from_ne_bytes([192, 168, 7, 1]);
        }

        let raw = raw_socket_address(&address);

        assert_eq!(raw.decode(), Some(IpAddr::V4(Ipv4Addr::new(192, 168, 7, 1))));
    }

    #[test]
    fn raw_socket_address_unspecified_family_has_no_address() {
        // SAFETY: SOCKADDR_INET is plain old data; all-zero is a valid value.
        let address: SOCKADDR_INET = unsafe { std::mem::zeroed() };
        assert_eq!(raw_socket_address(&address).decode(), None);
    }
}
