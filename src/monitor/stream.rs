//! Consumer side of a subscription's notification channel.

use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::mpsc;
use tokio_stream::Stream;

use super::Notification;

/// Stream of change notifications produced by a [`super::Subscription`].
///
/// Read-only: the only writers are the subscription's callback entry
/// points. The stream ends once the subscription has been dropped and
/// every queued notification has been read.
pub struct NotificationStream {
    receiver: mpsc::UnboundedReceiver<Notification>,
}

impl NotificationStream {
    pub(super) const fn new(receiver: mpsc::UnboundedReceiver<Notification>) -> Self {
        Self { receiver }
    }

    /// Returns the next queued notification without waiting.
    ///
    /// Returns `None` if nothing is queued right now or the stream has ended.
    pub fn try_next(&mut self) -> Option<Notification> {
        self.receiver.try_recv().ok()
    }

    /// Number of notifications queued and not yet read.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }
}

impl std::fmt::Debug for NotificationStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationStream")
            .field("pending", &self.receiver.len())
            .field("closed", &self.receiver.is_closed())
            .finish()
    }
}

impl Stream for NotificationStream {
    type Item = Notification;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}
