//! Shared types for Roku device discovery.
//!
//! Holds the descriptor produced for every accepted SSDP response, the
//! callback flow-control enum, and the error types of the discovery engine
//! and the response parser.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// One Roku device discovered via SSDP.
///
/// Built exactly once per accepted discovery response and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescriptor {
    /// Root URL for ECP control calls (from the `location` header).
    pub base_endpoint: Url,
    /// USN with the `uuid:roku:ecp:` prefix removed. Empty if the header was absent.
    pub unique_id: String,
    /// Value of the `device-group.roku.com` header, if any.
    pub group_tag: Option<String>,
    /// Lifetime advertised through `Cache-Control: max-age`.
    ///
    /// Informational only; nothing re-discovers when it expires.
    pub advertised_lifetime: Duration,
    /// Address the response datagram came from.
    pub source: SocketAddr,
}

impl std::fmt::Display for DeviceDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.unique_id, self.base_endpoint)
    }
}

/// Why a discovery response was skipped.
///
/// Rejections are the normal outcome for most SSDP traffic on a shared
/// network and are never surfaced as errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// Status code other than 200.
    Status(u16),
    /// `ST` header missing or naming another device class.
    SearchTarget(Option<String>),
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Status(code) => write!(f, "status {}", code),
            Self::SearchTarget(Some(st)) => write!(f, "search target '{}'", st),
            Self::SearchTarget(None) => write!(f, "no search target"),
        }
    }
}

/// Result of parsing one discovery datagram that was structurally sound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseOutcome {
    /// A Roku ECP device.
    Accepted(DeviceDescriptor),
    /// Some other SSDP responder.
    Rejected(RejectReason),
}

/// Structural problems in a discovery response.
///
/// Distinct from [`ResponseOutcome::Rejected`]: these indicate a broken
/// responder and abort discovery.
#[derive(Debug, Error)]
pub enum ResponseError {
    /// The datagram is not an HTTP response.
    #[error("malformed SSDP response: {0}")]
    Malformed(String),

    /// The `location` header is missing or is not a valid URL.
    #[error("failed to parse location '{value}': {reason}")]
    InvalidLocation {
        /// Raw header value (empty if missing).
        value: String,
        /// Parser message.
        reason: String,
    },

    /// The `Cache-Control` header is not `max-age=<seconds>`.
    #[error("cannot parse cache-control '{0}' as max-age")]
    InvalidCacheControl(String),
}

/// What the discovery engine should do after handing a device to the caller.
#[derive(Debug)]
pub enum DiscoveryFlow {
    /// Keep listening until the window closes.
    Continue,
    /// Stop listening now; discovery completes successfully.
    Stop,
    /// Abort discovery and report the reason to the caller.
    Fail(Box<dyn std::error::Error + Send + Sync>),
}

impl DiscoveryFlow {
    /// Convenience constructor for a failure carrying a plain message.
    pub fn fail(reason: impl Into<String>) -> Self {
        Self::Fail(reason.into().into())
    }
}

/// Counters reported by a completed discovery run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiscoverySummary {
    /// Datagrams received within the window.
    pub received: usize,
    /// Datagrams accepted as Roku devices.
    pub accepted: usize,
    /// Datagrams rejected as other device classes.
    pub rejected: usize,
    /// The callback returned [`DiscoveryFlow::Stop`].
    pub stopped_early: bool,
}

/// Errors that can occur during discovery.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Failed to enumerate local network interfaces.
    #[error("failed to list network interfaces: {0}")]
    Interfaces(#[source] std::io::Error),

    /// No usable network interfaces found.
    #[error("no usable network interfaces found")]
    NoInterfaces,

    /// Failed to create or bind the UDP socket.
    #[error("failed to bind UDP socket: {0}")]
    SocketBind(#[source] std::io::Error),

    /// Failed to send the M-SEARCH probe.
    #[error("failed to send SSDP search: {0}")]
    SendSearch(#[source] std::io::Error),

    /// A receive failed for a reason other than the window closing.
    #[error("failed SSDP read: {0}")]
    Receive(#[source] std::io::Error),

    /// A response was structurally broken.
    #[error("failed to get device from SSDP response: {0}")]
    Response(#[from] ResponseError),

    /// The caller's callback asked to abort.
    #[error("SSDP callback failed: {0}")]
    Callback(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Convenient Result alias for discovery operations.
pub type DiscoveryResult<T> = Result<T, DiscoveryError>;
