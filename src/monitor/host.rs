//! Host notification primitives.
//!
//! This module provides the [`NotifyHost`] trait that abstracts the host's
//! callback-based subscribe/cancel primitives, so the subscription state
//! machine can be driven by a fake host in tests.

use std::fmt;
use std::sync::Arc;

use super::{CallbackContext, HostError, Origin};

/// Address family passed to both subscribe calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    /// IPv4 only (`AF_INET`).
    #[default]
    Ipv4,
    /// IPv6 only (`AF_INET6`).
    Ipv6,
    /// Both families (`AF_UNSPEC`).
    Unspecified,
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ipv4 => write!(f, "IPv4"),
            Self::Ipv6 => write!(f, "IPv6"),
            Self::Unspecified => write!(f, "Both"),
        }
    }
}

/// Trait for a host's change-notification primitives.
///
/// Implementations wrap APIs like Windows `NotifyIpInterfaceChange` and
/// invoke the matching [`CallbackContext`] entry point from whatever thread
/// the host delivers on.
///
/// # Handles
///
/// `cancel` takes the handle by value, so a handle can never be cancelled
/// twice or used after cancellation.
///
/// # Cancellation
///
/// After `cancel` returns `Ok`, the host must not invoke the callback for
/// that handle again, and any in-flight invocation must have completed.
pub trait NotifyHost: Send + Sync {
    /// Opaque token for one active registration.
    type Handle: Send;

    /// Subscribes to changes of the given origin.
    ///
    /// `context` must be kept alive by the host until the handle is cancelled.
    /// If `initial` is true the host should deliver a synthetic
    /// initial-confirmation notification right after registering.
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] if the host rejects the registration.
    fn subscribe(
        &self,
        origin: Origin,
        family: AddressFamily,
        context: &Arc<CallbackContext>,
        initial: bool,
    ) -> Result<Self::Handle, HostError>;

    /// Cancels a registration.
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] if the host fails to cancel.
    fn cancel(&self, handle: Self::Handle) -> Result<(), HostError>;
}

impl<H: NotifyHost + ?Sized> NotifyHost for Arc<H> {
    type Handle = H::Handle;

    fn subscribe(
        &self,
        origin: Origin,
        family: AddressFamily,
        context: &Arc<CallbackContext>,
        initial: bool,
    ) -> Result<Self::Handle, HostError> {
        (**self).subscribe(origin, family, context, initial)
    }

    fn cancel(&self, handle: Self::Handle) -> Result<(), HostError> {
        (**self).cancel(handle)
    }
}
