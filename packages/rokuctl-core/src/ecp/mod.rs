//! Roku External Control Protocol (ECP).
//!
//! - `discovery` - Finding devices on the local network via SSDP
//! - `apps` - Parsing the XML app lists devices return
//! - `fuzzy` - Resolving typed names against an app catalog
//! - `client` - HTTP control of a single device

pub mod apps;
pub mod client;
pub mod discovery;
pub mod fuzzy;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use apps::{parse_apps, AppRecord, CatalogError, CatalogResult};
pub use client::{Catalog, ControlError, ControlResult, DeviceClient, Launched};
pub use discovery::{
    DeviceDescriptor, DiscoveryError, DiscoveryFlow, DiscoveryResult, DiscoverySummary,
    FixedInterfaceSelector, InterfaceSelector, SsdpConfig, SsdpDiscovery,
};
