//! Platform-specific notification hosts.
//!
//! This module provides conditional compilation for platform-specific
//! implementations of the [`NotifyHost`](super::NotifyHost) trait.
//!
//! # Platform Support
//!
//! - **Windows**: Uses `NotifyIpInterfaceChange` and
//!   `NotifyUnicastIpAddressChange` via the `windows` crate.
//! - **Other platforms**: [`UnsupportedNotifyHost`], which rejects every
//!   registration with [`HostError::Unsupported`](super::HostError::Unsupported).

#[cfg(windows)]
mod windows;


#[cfg(not(windows))]
mod unsupported;

#[cfg(windows)]
pub use windows::{WindowsHandle, WindowsNotifyHost};

// Re-export platform-specific host as PlatformNotifyHost for convenience
#[cfg(windows)]
pub use windows::WindowsNotifyHost as PlatformNotifyHost;

#[cfg(not(windows))]
pub use unsupported::UnsupportedNotifyHost;

#[cfg(not(windows))]
pub use unsupported::UnsupportedNotifyHost as PlatformNotifyHost;
