//! Change subscription lifecycle.
//!
//! A [`Subscription`] owns two registrations with the host (interface-level
//! and unicast address-level) and the channel both of them write into.
//!
//! # State Machine
//!
//! - **Unregistered** (initial and terminal): no active registration.
//! - **Registered**: at least one registration is active.
//!
//! `register` moves Unregistered → Registered, `unregister` moves back.
//! A partially failed `register` still counts as Registered, so callers must
//! call `unregister` regardless of the outcome.

use std::sync::Arc;

use tokio::sync::mpsc;

use super::{
    AddressFamily, CallbackContext, HandleFailures, Notification, NotificationStream, NotifyHost,
    Origin, SubscriptionError,
};

/// Origins in the order they are registered and cancelled.
const ORIGINS: [Origin; 2] = [Origin::Interface, Origin::Address];

/// One active host registration and the context it was handed.
struct Registration<T> {
    handle: T,
    context: Arc<CallbackContext>,
}

/// Subscription to host interface and address change notifications.
///
/// # Example
///
/// ```ignore
/// use netwatch::monitor::Subscription;
/// use netwatch::monitor::platform::PlatformNotifyHost;
/// use tokio_stream::StreamExt;
///
/// let mut subscription = Subscription::new(PlatformNotifyHost::new());
/// let mut stream = subscription.take_stream().unwrap();
///
/// subscription.register(true)?;
/// while let Some(notification) = stream.next().await {
///     println!("{notification}");
/// }
/// subscription.unregister()?;
/// ```
pub struct Subscription<H: NotifyHost> {
    host: H,
    family: AddressFamily,
    /// Kept for the subscription's whole lifetime so every registration
    /// context can clone it; the stream ends when this is dropped.
    sender: mpsc::UnboundedSender<Notification>,
    stream: Option<NotificationStream>,
    interface: Option<Registration<H::Handle>>,
    address: Option<Registration<H::Handle>>,
}

impl<H: NotifyHost> Subscription<H> {
    /// Creates an unregistered subscription with a fresh, empty stream.
    ///
    /// Does not interact with the host.
    #[must_use]
    pub fn new(host: H) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            host,
            family: AddressFamily::default(),
            sender,
            stream: Some(NotificationStream::new(receiver)),
            interface: None,
            address: None,
        }
    }

    /// Sets the address family passed to both subscribe calls.
    #[must_use]
    pub fn with_family(mut self, family: AddressFamily) -> Self {
        self.family = family;
        self
    }

    /// Returns the configured address family.
    #[must_use]
    pub const fn family(&self) -> AddressFamily {
        self.family
    }

    /// Takes the consumer side of the notification stream.
    ///
    /// Returns `None` if the stream has already been taken.
    pub const fn take_stream(&mut self) -> Option<NotificationStream> {
        self.stream.take()
    }

    /// Returns true while at least one registration is active.
    #[must_use]
    pub const fn is_registered(&self) -> bool {
        self.interface.is_some() || self.address.is_some()
    }

    /// Returns true if the registration for `origin` is active.
    #[must_use]
    pub const fn is_active(&self, origin: Origin) -> bool {
        match origin {
            Origin::Interface => self.interface.is_some(),
            Origin::Address => self.address.is_some(),
        }
    }

    /// Registers for interface-level and address-level change notifications.
    ///
    /// Both subscribe calls are always issued. Registrations that succeed stay
    /// active even if the other one fails.
    ///
    /// If `initial` is true, the host is asked to send an initial-confirmation
    /// notification for each registration.
    ///
    /// # Errors
    ///
    /// - [`SubscriptionError::AlreadyRegistered`] if a registration is still
    ///   active; the subscription is left untouched.
    /// - [`SubscriptionError::Register`] with every subscribe failure.
    pub fn register(&mut self, initial: bool) -> Result<(), SubscriptionError> {
        if self.is_registered() {
            return Err(SubscriptionError::AlreadyRegistered);
        }

        let mut failures = HandleFailures::default();

        for origin in ORIGINS {
            let context = Arc::new(CallbackContext::new(origin, self.sender.clone()));

            match self.host.subscribe(origin, self.family, &context, initial) {
                Ok(handle) => {
                    tracing::debug!(?origin, family = %self.family, "Registered change notification");
                    *self.slot_mut(origin) = Some(Registration { handle, context });
                }
                Err(e) => {
                    tracing::warn!(?origin, "Failed to register change notification: {e}");
                    failures.push(origin, e);
                }
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(SubscriptionError::Register(failures))
        }
    }

    /// Cancels every active registration.
    ///
    /// Registrations that were never set are skipped. Each slot is cleared
    /// before its cancel call, so the subscription is Unregistered afterwards
    /// whatever the host returns, and a second call is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`SubscriptionError::Unregister`] with every cancel failure.
    pub fn unregister(&mut self) -> Result<(), SubscriptionError> {
        let mut failures = HandleFailures::default();

        for origin in ORIGINS {
            let Some(registration) = self.slot_mut(origin).take() else {
                continue;
            };

            registration.context.close();

            match self.host.cancel(registration.handle) {
                Ok(()) => tracing::debug!(?origin, "Cancelled change notification"),
                Err(e) => {
                    tracing::warn!(?origin, "Failed to cancel change notification: {e}");
                    failures.push(origin, e);
                }
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(SubscriptionError::Unregister(failures))
        }
    }

    const fn slot_mut(&mut self, origin: Origin) -> &mut Option<Registration<H::Handle>> {
        match origin {
            Origin::Interface => &mut self.interface,
            Origin::Address => &mut self.address,
        }
    }
}

impl<H: NotifyHost> Drop for Subscription<H> {
    fn drop(&mut self) {
        if !self.is_registered() {
            return;
        }

        if let Err(e) = self.unregister() {
            tracing::warn!("Subscription dropped with failed cleanup: {e}");
        }
    }
}

impl<H: NotifyHost> std::fmt::Debug for Subscription<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("family", &self.family)
            .field("interface_active", &self.interface.is_some())
            .field("address_active", &self.address.is_some())
            .field("stream_taken", &self.stream.is_none())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "subscription_tests.rs"]
mod tests;
