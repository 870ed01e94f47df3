//! Platform-specific interface table implementations.
//!
//! This module provides conditional compilation for platform-specific
//! implementations of the [`InterfaceTable`](super::InterfaceTable) trait.
//!
//! # Platform Support
//!
//! - **Windows**: Uses `GetAdaptersAddresses` via the `windows` crate.
//! - **Unix**: Uses `getifaddrs` via the `nix` crate.

#[cfg(windows)]
mod windows;

#[cfg(unix)]
mod unix;

#[cfg(windows)]
pub use windows::WindowsInterfaceTable;

#[cfg(unix)]
pub use unix::UnixInterfaceTable;

// Re-export platform-specific table as PlatformInterfaceTable for convenience
#[cfg(windows)]
pub use windows::WindowsInterfaceTable as PlatformInterfaceTable;

#[cfg(unix)]
pub use unix::UnixInterfaceTable as PlatformInterfaceTable;
