//! Fixed protocol constants that should NOT be changed.
//!
//! These values are defined by SSDP and the Roku External Control Protocol
//! (ECP). Changing them breaks interoperability with real devices.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

// ─────────────────────────────────────────────────────────────────────────────
// SSDP
// ─────────────────────────────────────────────────────────────────────────────

/// Standard SSDP multicast group.
pub const SSDP_MULTICAST_IP: Ipv4Addr = Ipv4Addr::new(239, 255, 255, 250);

/// Standard SSDP port.
pub const SSDP_PORT: u16 = 1900;

/// Multicast destination for M-SEARCH probes.
pub const SSDP_MULTICAST_ADDR: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(SSDP_MULTICAST_IP, SSDP_PORT));

/// SSDP search target identifying Roku ECP devices.
///
/// Responses with any other `ST` value come from unrelated UPnP devices.
pub const ROKU_SEARCH_TARGET: &str = "roku:ecp";

/// Vendor prefix carried by the `USN` header of Roku responses.
pub const ROKU_USN_PREFIX: &str = "uuid:roku:ecp:";

/// Optional header carrying the Roku device group.
pub const ROKU_DEVICE_GROUP_HEADER: &str = "device-group.roku.com";

/// UPnP 1.0 recommends a multicast TTL of 4 for SSDP.
pub const SSDP_MULTICAST_TTL: u32 = 4;

// ─────────────────────────────────────────────────────────────────────────────
// ECP (HTTP control)
// ─────────────────────────────────────────────────────────────────────────────

/// Application id that Roku uses for the home screen.
///
/// Launching it is translated into a `keypress/home` request.
pub const HOME_APP_ID: &str = "0";

/// Name that is always resolved to the home screen, matched case-insensitively.
pub const HOME_APP_NAME: &str = "home";

/// Timeout for a single ECP HTTP request (seconds).
///
/// 10 seconds is generous for LAN operations.
pub const CONTROL_TIMEOUT_SECS: u64 = 10;

// ─────────────────────────────────────────────────────────────────────────────
// Application Identity
// ─────────────────────────────────────────────────────────────────────────────

/// Directory name used under the user's config directory.
pub const APP_DIR_NAME: &str = "rokuctl";

/// File name of the alias store inside [`APP_DIR_NAME`].
pub const ALIASES_FILE: &str = "aliases";
