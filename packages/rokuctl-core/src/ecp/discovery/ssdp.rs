//! SSDP-based Roku device discovery.
//!
//! Sends one M-SEARCH for `roku:ecp` to 239.255.255.250:1900 and listens on
//! the same socket for unicast replies until a fixed deadline. The number of
//! devices is unknown in advance, so the loop always runs until the window
//! closes unless the caller stops it.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;
use tokio::time::timeout_at;

use super::interfaces::{BroadcastInterfaceSelector, InterfaceSelector};
use super::response::parse_ssdp_response;
use super::types::{
    DeviceDescriptor, DiscoveryError, DiscoveryFlow, DiscoveryResult, DiscoverySummary,
    ResponseOutcome,
};
use crate::events::{DiscoveryEvent, EventEmitter};
use crate::protocol_constants::{
    ROKU_SEARCH_TARGET, SSDP_MULTICAST_ADDR, SSDP_MULTICAST_IP, SSDP_MULTICAST_TTL, SSDP_PORT,
};
use crate::utils::now_millis;

/// Build the M-SEARCH message.
///
/// HOST always names the multicast group, even if the probe is redirected
/// elsewhere through [`SsdpConfig::target`].
pub fn build_msearch_message() -> String {
    format!(
        "M-SEARCH * HTTP/1.1\r\n\
         Host: {}:{}\r\n\
         Man: \"ssdp:discover\"\r\n\
         ST: {}\r\n\r\n",
        SSDP_MULTICAST_IP, SSDP_PORT, ROKU_SEARCH_TARGET
    )
}

/// Configuration for SSDP discovery.
#[derive(Debug, Clone)]
pub struct SsdpConfig {
    /// How long to collect responses, measured from just before the first receive.
    pub discovery_window: Duration,
    /// Where the probe is sent.
    pub target: SocketAddr,
    /// Size of the receive buffer (one datagram).
    pub recv_buffer_size: usize,
}

impl Default for SsdpConfig {
    fn default() -> Self {
        Self {
            discovery_window: Duration::from_secs(2),
            target: SSDP_MULTICAST_ADDR,
            recv_buffer_size: 64 * 1024,
        }
    }
}

/// Creates a UDP socket bound to an ephemeral port on `iface_ip`.
///
/// Sets up socket options for SSDP discovery:
/// - SO_REUSEADDR for rapid restarts
/// - Multicast TTL of 4, as UPnP recommends
fn create_socket(iface_ip: Ipv4Addr) -> Result<UdpSocket, DiscoveryError> {
    let bind_addr = SocketAddr::new(IpAddr::V4(iface_ip), 0);

    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))
        .map_err(DiscoveryError::SocketBind)?;

    if let Err(e) = socket.set_reuse_address(true) {
        log::warn!("[SSDP] Failed to set SO_REUSEADDR on {}: {}", iface_ip, e);
    }

    if let Err(e) = socket.set_multicast_ttl_v4(SSDP_MULTICAST_TTL) {
        log::warn!("[SSDP] Failed to set multicast TTL on {}: {}", iface_ip, e);
    }

    // Set non-blocking before converting to tokio socket
    socket
        .set_nonblocking(true)
        .map_err(DiscoveryError::SocketBind)?;

    socket
        .bind(&bind_addr.into())
        .map_err(DiscoveryError::SocketBind)?;

    let std_socket: std::net::UdpSocket = socket.into();
    UdpSocket::from_std(std_socket).map_err(DiscoveryError::SocketBind)
}

/// Discovers Roku devices with a single SSDP probe.
pub struct SsdpDiscovery {
    config: SsdpConfig,
    selector: Arc<dyn InterfaceSelector>,
    emitter: Arc<dyn EventEmitter>,
}

impl SsdpDiscovery {
    /// Creates a discovery engine that sends from the first broadcast-capable interface.
    pub fn new(config: SsdpConfig, emitter: Arc<dyn EventEmitter>) -> Self {
        Self::with_selector(config, Arc::new(BroadcastInterfaceSelector), emitter)
    }

    /// Creates a discovery engine with an explicit interface selector.
    pub fn with_selector(
        config: SsdpConfig,
        selector: Arc<dyn InterfaceSelector>,
        emitter: Arc<dyn EventEmitter>,
    ) -> Self {
        Self {
            config,
            selector,
            emitter,
        }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &SsdpConfig {
        &self.config
    }

    /// Runs one discovery window.
    ///
    /// `on_found` is called once per accepted device, in arrival order. Its
    /// [`DiscoveryFlow`] decides whether to keep listening, stop successfully,
    /// or abort with an error. Reaching the deadline is the normal way for
    /// this to return `Ok`.
    ///
    /// The socket lives only for the duration of this call.
    pub async fn discover<F>(&self, mut on_found: F) -> DiscoveryResult<DiscoverySummary>
    where
        F: FnMut(DeviceDescriptor) -> DiscoveryFlow,
    {
        let iface = self.selector.select()?;
        let socket = create_socket(iface.ip)?;
        let local = socket.local_addr().map_err(DiscoveryError::SocketBind)?;

        let msg = build_msearch_message();
        let sent = socket
            .send_to(msg.as_bytes(), self.config.target)
            .await
            .map_err(DiscoveryError::SendSearch)?;

        log::debug!(
            "[SSDP] Sent M-SEARCH ({} bytes) from {} ({}) to {}",
            sent,
            local,
            iface.name,
            self.config.target
        );
        self.emitter.emit_discovery(DiscoveryEvent::ProbeSent {
            from: local,
            to: self.config.target,
            bytes: sent,
            timestamp: now_millis(),
        });

        let mut summary = DiscoverySummary::default();
        let mut buf = vec![0u8; self.config.recv_buffer_size];
        let start = Instant::now();
        let deadline = tokio::time::Instant::now() + self.config.discovery_window;

        loop {
            let (amt, src) = match timeout_at(deadline, socket.recv_from(&mut buf)).await {
                Ok(Ok(received)) => received,
                Ok(Err(e)) => return Err(DiscoveryError::Receive(e)),
                Err(_) => break, // Window closed
            };
            summary.received += 1;

            log::trace!(
                "[SSDP] Read {} bytes from {} after {}ms",
                amt,
                src,
                start.elapsed().as_millis()
            );

            let device = match parse_ssdp_response(&buf[..amt], src)? {
                ResponseOutcome::Accepted(device) => device,
                ResponseOutcome::Rejected(reason) => {
                    summary.rejected += 1;
                    log::trace!("[SSDP] Skipping response from {}: {}", src, reason);
                    self.emitter.emit_discovery(DiscoveryEvent::DatagramRejected {
                        source: src,
                        reason: reason.to_string(),
                        timestamp: now_millis(),
                    });
                    continue;
                }
            };

            summary.accepted += 1;
            log::debug!(
                "[SSDP] Discovered device: usn={}, location={}",
                device.unique_id,
                device.base_endpoint
            );
            self.emitter.emit_discovery(DiscoveryEvent::DeviceFound {
                unique_id: device.unique_id.clone(),
                location: device.base_endpoint.to_string(),
                elapsed_ms: start.elapsed().as_millis() as u64,
                timestamp: now_millis(),
            });

            match on_found(device) {
                DiscoveryFlow::Continue => {}
                DiscoveryFlow::Stop => {
                    summary.stopped_early = true;
                    break;
                }
                DiscoveryFlow::Fail(reason) => return Err(DiscoveryError::Callback(reason)),
            }
        }

        log::debug!(
            "[SSDP] Discovery complete after {}ms: {} device(s), {} rejected",
            start.elapsed().as_millis(),
            summary.accepted,
            summary.rejected
        );
        self.emitter.emit_discovery(DiscoveryEvent::WindowClosed {
            accepted: summary.accepted,
            rejected: summary.rejected,
            stopped_early: summary.stopped_early,
            timestamp: now_millis(),
        });

        Ok(summary)
    }
}
