//! Error types for the monitor layer.

use std::fmt;

use thiserror::Error;

use super::Origin;

/// Failure reported by a host notification primitive.
#[derive(Debug, Error)]
pub enum HostError {
    /// Windows API call failed.
    #[cfg(windows)]
    #[error("Windows API error: {0}")]
    WindowsApi(#[from] windows::core::Error),

    /// The host call returned a nonzero status code.
    #[error("Host call failed with status {code}")]
    Status {
        /// Raw status code returned by the host.
        code: u32,
    },

    /// No change-notification backend exists for this platform.
    #[error("Change notifications are not supported on this platform")]
    Unsupported,
}

/// Per-registration failures collected by a register or unregister call.
///
/// Both registrations are always attempted, so a single call can fail for
/// one origin, the other, or both.
#[derive(Debug, Default)]
pub struct HandleFailures(Vec<(Origin, HostError)>);

impl HandleFailures {
    pub(crate) fn push(&mut self, origin: Origin, error: HostError) {
        self.0.push((origin, error));
    }

    /// Returns true if no failure was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of registrations that failed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the failure recorded for `origin`, if any.
    #[must_use]
    pub fn get(&self, origin: Origin) -> Option<&HostError> {
        self.0
            .iter()
            .find_map(|(o, e)| (*o == origin).then_some(e))
    }

    /// Iterates over the recorded failures in call order.
    pub fn iter(&self) -> impl Iterator<Item = &(Origin, HostError)> {
        self.0.iter()
    }
}

impl fmt::Display for HandleFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (origin, error)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            let label = match origin {
                Origin::Interface => "interface-level",
                Origin::Address => "address-level",
            };
            write!(f, "{label}: {error}")?;
        }
        Ok(())
    }
}

/// Error type for subscription lifecycle operations.
///
/// A failed `register` can leave one registration active; callers must
/// still call `unregister` to clean it up.
#[derive(Debug, Error)]
pub enum SubscriptionError {
    /// `register` was called while a registration is still active.
    #[error("Subscription is already registered")]
    AlreadyRegistered,

    /// One or both subscribe calls failed.
    #[error("Failed to register change notifications: {0}")]
    Register(HandleFailures),

    /// One or both cancel calls failed.
    #[error("Failed to cancel change notifications: {0}")]
    Unregister(HandleFailures),
}
