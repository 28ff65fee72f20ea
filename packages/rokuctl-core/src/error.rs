//! Centralized error types for the rokuctl core library.
//!
//! Each subsystem defines its own `thiserror` enum next to the code that
//! raises it. [`RokuError`] covers picking one device out of a discovery
//! run, which needs discovery and the alias store together.

use thiserror::Error;

use crate::aliases::AliasError;
use crate::ecp::discovery::DiscoveryError;

/// Errors from selecting a single device.
#[derive(Debug, Error)]
pub enum RokuError {
    /// Device discovery failed.
    #[error("discovery failed: {0}")]
    Discovery(#[from] DiscoveryError),

    /// The alias file could not be read.
    #[error(transparent)]
    Alias(#[from] AliasError),

    /// Several devices answered and no selector was given.
    #[error("more than one roku device found. device name is required")]
    AmbiguousDevice,

    /// No device answered that matches the selector.
    #[error("no matching roku found")]
    DeviceNotFound,
}

// ─────────────────────────────────────────────────────────────────────────────
// Result Type Aliases
// ─────────────────────────────────────────────────────────────────────────────

// Re-export Result type aliases from their defining modules
pub use crate::aliases::AliasResult;
pub use crate::ecp::apps::CatalogResult;
pub use crate::ecp::client::ControlResult;
pub use crate::ecp::discovery::DiscoveryResult;

/// Convenient Result alias for device selection.
pub type RokuResult<T> = Result<T, RokuError>;
