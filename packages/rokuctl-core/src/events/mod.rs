//! Observability events emitted by discovery and device control.
//!
//! Core components never reach for a global logger handle for these; they
//! receive an [`EventEmitter`] at construction and report through it. Plain
//! diagnostic logging still goes through the `log` macros.

mod emitter;

pub use emitter::{EventEmitter, LoggingEventEmitter, NoopEventEmitter};

use std::net::SocketAddr;

/// Events produced during one SSDP discovery run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryEvent {
    /// The M-SEARCH probe left the socket.
    ProbeSent {
        /// Local address the probe was sent from.
        from: SocketAddr,
        /// Destination (normally the SSDP multicast group).
        to: SocketAddr,
        /// Bytes written.
        bytes: usize,
        /// Unix timestamp in milliseconds.
        timestamp: u64,
    },
    /// A response from another device class was skipped.
    DatagramRejected {
        /// Sender of the datagram.
        source: SocketAddr,
        /// Human-readable rejection reason.
        reason: String,
        /// Unix timestamp in milliseconds.
        timestamp: u64,
    },
    /// A Roku device answered.
    DeviceFound {
        /// Device USN without the vendor prefix.
        unique_id: String,
        /// Control base URL.
        location: String,
        /// Time since the receive loop started, in milliseconds.
        elapsed_ms: u64,
        /// Unix timestamp in milliseconds.
        timestamp: u64,
    },
    /// The receive loop finished.
    WindowClosed {
        /// Devices accepted during the run.
        accepted: usize,
        /// Datagrams rejected during the run.
        rejected: usize,
        /// True when the caller stopped the loop before the deadline.
        stopped_early: bool,
        /// Unix timestamp in milliseconds.
        timestamp: u64,
    },
}

/// Events produced by [`DeviceClient`](crate::ecp::DeviceClient) calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlEvent {
    /// The app catalog was fetched from a device.
    CatalogFetched {
        /// Device base URL.
        device: String,
        /// Number of apps in the catalog.
        apps: usize,
        /// Unix timestamp in milliseconds.
        timestamp: u64,
    },
    /// An app was launched (or was already active).
    AppLaunched {
        /// Device base URL.
        device: String,
        /// Launched app id.
        app_id: String,
        /// True when the device answered 204 (app already active).
        already_active: bool,
        /// Unix timestamp in milliseconds.
        timestamp: u64,
    },
    /// The home key was pressed.
    HomePressed {
        /// Device base URL.
        device: String,
        /// Unix timestamp in milliseconds.
        timestamp: u64,
    },
}
