//! Notification host for platforms without a change-notification backend.

use std::sync::Arc;

use crate::monitor::{AddressFamily, CallbackContext, HostError, NotifyHost, Origin};

/// Host that rejects every registration.
///
/// Lets the rest of the crate build everywhere while only Windows delivers
/// real notifications.
#[derive(Debug, Clone, Default)]
pub struct UnsupportedNotifyHost {
    _private: (),
}

impl UnsupportedNotifyHost {
    /// Creates the host.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

impl NotifyHost for UnsupportedNotifyHost {
    type Handle = std::convert::Infallible;

    fn subscribe(
        &self,
        _origin: Origin,
        _family: AddressFamily,
        _context: &Arc<CallbackContext>,
        _initial: bool,
    ) -> Result<Self::Handle, HostError> {
        Err(HostError::Unsupported)
    }

    fn cancel(&self, handle: Self::Handle) -> Result<(), HostError> {
        match handle {}
    }
}
