//! Event emitter abstraction for decoupling core components from observability.
//!
//! Discovery and device control depend on the [`EventEmitter`] trait rather
//! than on a logger reached through ambient context, so callers decide where
//! events go (nowhere, the log, a test recorder).

use super::{ControlEvent, DiscoveryEvent};

/// Trait for emitting domain events without knowledge of where they end up.
///
/// # Example
///
/// ```ignore
/// let discovery = SsdpDiscovery::new(SsdpConfig::default(), Arc::new(LoggingEventEmitter));
/// ```
pub trait EventEmitter: Send + Sync {
    /// Emits a discovery event.
    fn emit_discovery(&self, event: DiscoveryEvent);

    /// Emits a device control event.
    fn emit_control(&self, event: ControlEvent);
}

/// No-op emitter for library users that don't care about events.
pub struct NoopEventEmitter;

impl EventEmitter for NoopEventEmitter {
    fn emit_discovery(&self, _event: DiscoveryEvent) {}

    fn emit_control(&self, _event: ControlEvent) {}
}

/// Logging emitter for debugging and development.
///
/// Logs all events at debug level.
pub struct LoggingEventEmitter;

impl EventEmitter for LoggingEventEmitter {
    fn emit_discovery(&self, event: DiscoveryEvent) {
        tracing::debug!(?event, "discovery_event");
    }

    fn emit_control(&self, event: ControlEvent) {
        tracing::debug!(?event, "control_event");
    }
}

