//! CLI configuration.
//!
//! Supports loading from YAML files with environment variable overrides.
//! Command line flags are applied on top in `main.rs`.

use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use rokuctl_core::protocol_constants::CONTROL_TIMEOUT_SECS;
use rokuctl_core::SsdpConfig;
use serde::Deserialize;

/// CLI configuration loaded from YAML with environment overrides.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RokuctlConfig {
    /// How long to wait for SSDP responses, in milliseconds.
    /// Override: `ROKUCTL_DISCOVERY_WINDOW_MS`
    pub discovery_window_ms: u64,

    /// Local IPv4 address to send discovery probes from.
    /// If not specified, the first broadcast-capable interface is used.
    /// Override: `ROKUCTL_INTERFACE`
    pub interface_ip: Option<Ipv4Addr>,

    /// Per-request timeout for device control, in seconds.
    /// Override: `ROKUCTL_REQUEST_TIMEOUT_SECS`
    pub request_timeout_secs: u64,

    /// Alias file location. Defaults to the user config directory.
    pub alias_file: Option<PathBuf>,
}

impl Default for RokuctlConfig {
    fn default() -> Self {
        Self {
            discovery_window_ms: 2000,
            interface_ip: None,
            request_timeout_secs: CONTROL_TIMEOUT_SECS,
            alias_file: None,
        }
    }
}

impl RokuctlConfig {
    /// Loads configuration from a YAML file, then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = if let Some(path) = path {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            Self::parse(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    fn parse(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Applies environment variable overrides to the configuration.
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("ROKUCTL_DISCOVERY_WINDOW_MS") {
            if let Ok(ms) = val.parse() {
                self.discovery_window_ms = ms;
            }
        }

        if let Ok(val) = std::env::var("ROKUCTL_INTERFACE") {
            if let Ok(ip) = val.parse() {
                self.interface_ip = Some(ip);
            }
        }

        if let Ok(val) = std::env::var("ROKUCTL_REQUEST_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                self.request_timeout_secs = secs;
            }
        }

        // Note: ROKUCTL_ALIAS_FILE is handled by clap via #[arg(env = ...)] in main.rs
    }

    /// Converts to rokuctl-core's discovery configuration.
    pub fn to_ssdp_config(&self) -> SsdpConfig {
        SsdpConfig {
            discovery_window: Duration::from_millis(self.discovery_window_ms),
            ..Default::default()
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
