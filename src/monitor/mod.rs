//! Monitor layer for host network change notifications.
//!
//! This module provides types and functions for:
//! - Representing change events ([`Notification`], [`Origin`], [`ChangeKind`])
//! - Decoding raw host records ([`RawSocketAddress`])
//! - Host notification primitives ([`NotifyHost`], [`platform`])
//! - Callback entry points invoked on host threads ([`CallbackContext`])
//! - The subscription lifecycle ([`Subscription`], [`NotificationStream`])
//! - Error handling ([`HostError`], [`SubscriptionError`])

mod context;
mod error;
mod host;
mod notification;
pub mod platform;
mod stream;
mod subscription;

pub use context::CallbackContext;
pub use error::{HandleFailures, HostError, SubscriptionError};
pub use host::{AddressFamily, NotifyHost};
pub use notification::{AF_INET, AF_INET6, ChangeKind, Notification, Origin, RawSocketAddress};
pub use stream::NotificationStream;
pub use subscription::Subscription;
