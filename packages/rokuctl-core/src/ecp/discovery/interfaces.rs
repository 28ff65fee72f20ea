//! Local interface selection for SSDP discovery.
//!
//! Discovery sends from a single interface. The selector is a trait so the
//! CLI can pin an address and tests can use loopback.

use std::net::Ipv4Addr;

use get_if_addrs::{IfAddr, Interface};

use super::types::{DiscoveryError, DiscoveryResult};

/// Network interface information for discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceInfo {
    /// Interface name (e.g., "en0", "eth0").
    pub name: String,
    /// IPv4 address bound to this interface.
    pub ip: Ipv4Addr,
}

/// Strategy for choosing the interface discovery sends from.
pub trait InterfaceSelector: Send + Sync {
    /// Returns the interface to bind, or [`DiscoveryError::NoInterfaces`].
    fn select(&self) -> DiscoveryResult<InterfaceInfo>;
}

/// Picks the first non-loopback IPv4 interface that has a broadcast address.
///
/// `getifaddrs` only reports addresses on configured interfaces, and a
/// broadcast address is only present when the interface supports broadcast.
#[derive(Debug, Clone, Copy, Default)]
pub struct BroadcastInterfaceSelector;

impl InterfaceSelector for BroadcastInterfaceSelector {
    fn select(&self) -> DiscoveryResult<InterfaceInfo> {
        let interfaces = get_if_addrs::get_if_addrs().map_err(DiscoveryError::Interfaces)?;
        pick_broadcast_interface(interfaces).ok_or(DiscoveryError::NoInterfaces)
    }
}

/// Always returns the same address. Used for `--interface` and in tests.
#[derive(Debug, Clone)]
pub struct FixedInterfaceSelector {
    info: InterfaceInfo,
}

impl FixedInterfaceSelector {
    /// Creates a selector pinned to `ip`.
    pub fn new(ip: Ipv4Addr) -> Self {
        Self {
            info: InterfaceInfo {
                name: "fixed".to_string(),
                ip,
            },
        }
    }
}

impl InterfaceSelector for FixedInterfaceSelector {
    fn select(&self) -> DiscoveryResult<InterfaceInfo> {
        Ok(self.info.clone())
    }
}

fn pick_broadcast_interface(interfaces: impl IntoIterator<Item = Interface>) -> Option<InterfaceInfo> {
    interfaces.into_iter().find_map(|iface| {
        if iface.is_loopback() {
            log::debug!("[SSDP] Skipping interface {}: loopback", iface.name);
            return None;
        }
        match iface.addr {
            IfAddr::V4(ref v4) if v4.broadcast.is_some() => {
                log::debug!("[SSDP] Using interface {} ({})", iface.name, v4.ip);
                Some(InterfaceInfo {
                    name: iface.name.clone(),
                    ip: v4.ip,
                })
            }
            IfAddr::V4(_) => {
                log::debug!("[SSDP] Skipping interface {}: not broadcast enabled", iface.name);
                None
            }
            IfAddr::V6(_) => None,
        }
    })
}
