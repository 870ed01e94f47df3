//! Callback entry points invoked on host-owned threads.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use tokio::sync::mpsc;

use super::{Notification, Origin, RawSocketAddress};

/// Context handed to the host with each registration.
///
/// Holds the sending half of the subscription's stream and the origin tag of
/// the registration it belongs to. The entry points only build a record and
/// enqueue it; nothing else runs on the host's thread.
///
/// Closing releases the sender, so a context the host never gives back
/// does not keep the stream open.
#[derive(Debug)]
pub struct CallbackContext {
    origin: Origin,
    sender: Mutex<Option<mpsc::UnboundedSender<Notification>>>,
    /// Cleared before the registration is cancelled; late invocations are dropped.
    open: AtomicBool,
}

impl CallbackContext {
    pub(crate) const fn new(origin: Origin, sender: mpsc::UnboundedSender<Notification>) -> Self {
        Self {
            origin,
            sender: Mutex::new(Some(sender)),
            open: AtomicBool::new(true),
        }
    }

    /// The origin tag this context was registered with.
    #[must_use]
    pub const fn origin(&self) -> Origin {
        self.origin
    }

    /// Returns true until the owning registration starts cancelling.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    pub(crate) fn close(&self) {
        self.open.store(false, Ordering::Release);
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    /// Entry point for interface-level changes.
    ///
    /// A `None` raw address is the common case; interface rows carry no address.
    pub fn on_interface_change(&self, raw_kind: i32, interface_index: u32) {
        self.deliver(raw_kind, interface_index, None);
    }

    /// Entry point for unicast address-level changes.
    ///
    /// `raw_address` is `None` when the host supplied no row (initial notification).
    pub fn on_address_change(
        &self,
        raw_kind: i32,
        interface_index: u32,
        raw_address: Option<&RawSocketAddress>,
    ) {
        self.deliver(raw_kind, interface_index, raw_address);
    }

    fn deliver(&self, raw_kind: i32, interface_index: u32, raw_address: Option<&RawSocketAddress>) {
        if !self.is_open() {
            tracing::trace!(origin = ?self.origin, "Dropping notification after cancel");
            return;
        }

        let notification =
            Notification::from_raw(self.origin, raw_kind, interface_index, raw_address);

        // Held across the send so a concurrent close cannot slip in between
        let sender = self.sender.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(sender) = sender.as_ref() else {
            tracing::trace!(origin = ?self.origin, "Dropping notification after cancel");
            return;
        };

        // Receiver may be gone; the host thread must never fail here
        if sender.send(notification).is_err() {
            tracing::trace!(origin = ?self.origin, "Notification receiver dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::ChangeKind;
    use std::net::{IpAddr, Ipv4Addr};

    fn make_context(origin: Origin) -> (CallbackContext, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (CallbackContext::new(origin, tx), rx)
    }

    #[test]
    fn interface_entry_point_enqueues_record() {
        let (context, mut rx) = make_context(Origin::Interface);

        context.on_interface_change(1, 7);

        assert_eq!(
            rx.try_recv().unwrap(),
            Notification::interface(ChangeKind::Added, 7)
        );
    }

    #[test]
    fn address_entry_point_decodes_address() {
        let (context, mut rx) = make_context(Origin::Address);
        let raw = RawSocketAddress::v4(Ipv4Addr::new(10, 9, 8, 7));

        context.on_address_change(0, 3, Some(&raw));

        let notification = rx.try_recv().unwrap();
        assert_eq!(notification.origin, Origin::Address);
        assert_eq!(
            notification.address,
            Some(IpAddr::V4(Ipv4Addr::new(10, 9, 8, 7)))
        );
    }

    #[test]
    fn origin_comes_from_context_not_entry_point() {
        let (context, mut rx) = make_context(Origin::Interface);
        let raw = RawSocketAddress::v4(Ipv4Addr::LOCALHOST);

        context.on_address_change(1, 2, Some(&raw));

        let notification = rx.try_recv().unwrap();
        assert_eq!(notification.origin, Origin::Interface);
        assert_eq!(notification.address, None);
    }

    #[test]
    fn closed_context_drops_invocations() {
        let (context, mut rx) = make_context(Origin::Interface);

        context.close();
        context.on_interface_change(1, 1);

        assert!(!context.is_open());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn close_releases_sender() {
        let (context, mut rx) = make_context(Origin::Address);

        context.close();

        // The context is still alive, yet the channel reports disconnection
        assert_eq!(
            rx.try_recv(),
            Err(mpsc::error::TryRecvError::Disconnected)
        );
    }

    #[test]
    fn dropped_receiver_does_not_panic() {
        let (context, rx) = make_context(Origin::Address);
        drop(rx);

        context.on_address_change(2, 1, None);
    }

    #[test]
    fn preserves_delivery_order() {
        let (context, mut rx) = make_context(Origin::Interface);

        for index in 1..=3 {
            context.on_interface_change(0, index);
        }

        let indices: Vec<u32> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|n| n.interface_index)
            .collect();
        assert_eq!(indices, vec![1, 2, 3]);
    }

    #[test]
    fn context_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CallbackContext>();
    }
}
