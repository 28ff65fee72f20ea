//! Roku device discovery over SSDP.
//!
//! - `types` - Descriptor, flow-control and error types
//! - `response` - Parsing of one SSDP response datagram
//! - `interfaces` - Choosing the local interface to probe from
//! - `ssdp` - The probe-and-collect discovery engine

mod interfaces;
mod response;
mod ssdp;
mod types;

pub use interfaces::{
    BroadcastInterfaceSelector, FixedInterfaceSelector, InterfaceInfo, InterfaceSelector,
};
pub use response::{parse_cache_control, parse_ssdp_response};
pub use ssdp::{build_msearch_message, SsdpConfig, SsdpDiscovery};
pub use types::{
    DeviceDescriptor, DiscoveryError, DiscoveryFlow, DiscoveryResult, DiscoverySummary,
    RejectReason, ResponseError, ResponseOutcome,
};
