//! netwatch: Network Change Watcher
//!
//! A library for registering with the host networking stack for
//! interface and unicast address change callbacks, surfaced as a typed
//! async stream, plus a directory of host interfaces.

pub mod config;
pub mod monitor;
pub mod network;
