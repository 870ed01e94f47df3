//! Network layer for listing host interfaces.
//!
//! This module provides types and traits for:
//! - Representing interfaces ([`NetworkInterface`], [`InterfaceFlags`])
//! - Reading the host interface table ([`InterfaceTable`], [`InterfaceEntry`])
//! - Listing, filtering, and counting interfaces ([`InterfaceDirectory`])
//! - Platform-specific implementations ([`platform`])

mod directory;
mod interface;
pub mod platform;

pub use directory::{DirectoryError, InterfaceDirectory, InterfaceTable};
pub use interface::{InterfaceEntry, InterfaceFlags, NetworkInterface, ParseFlagError};
