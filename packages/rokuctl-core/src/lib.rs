//! rokuctl Core - discovery and control of Roku devices.
//!
//! This crate finds Roku players on the local network and drives them through
//! the External Control Protocol (ECP). It is used by the `rokuctl` command
//! line tool but has no dependency on it.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`ecp`]: SSDP discovery, app list parsing, fuzzy name resolution and the
//!   per-device HTTP client
//! - [`aliases`]: Flat-file store of friendly device names
//! - [`events`]: Observability events for discovery and control
//! - [`error`]: Centralized error types
//!
//! # Abstraction Traits
//!
//! - [`EventEmitter`](events::EventEmitter): Receiving domain events
//! - [`InterfaceSelector`](ecp::discovery::InterfaceSelector): Choosing the
//!   local interface discovery probes from
//!
//! Each trait has default implementations suitable for the command line tool.

#![warn(clippy::all)]

pub mod aliases;
pub mod ecp;
pub mod error;
pub mod events;
pub mod protocol_constants;
pub mod utils;

// Re-export commonly used types at the crate root
pub use aliases::{dedupe, Alias, AliasError, AliasStore};
pub use ecp::discovery::{
    BroadcastInterfaceSelector, DeviceDescriptor, DiscoveryFlow, DiscoverySummary,
    FixedInterfaceSelector, InterfaceSelector, SsdpConfig, SsdpDiscovery,
};
pub use ecp::{AppRecord, Catalog, DeviceClient, Launched};
pub use error::{
    AliasResult, CatalogResult, ControlResult, DiscoveryResult, RokuError, RokuResult,
};
pub use events::{
    ControlEvent, DiscoveryEvent, EventEmitter, LoggingEventEmitter, NoopEventEmitter,
};
pub use utils::now_millis;
