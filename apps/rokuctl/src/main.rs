//! rokuctl - discover and control Roku devices from the command line.
//!
//! Devices are found with a single SSDP probe per invocation and driven over
//! the External Control Protocol on port 8060.

mod commands;
mod config;

use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use rokuctl_core::{
    AliasStore, EventEmitter, FixedInterfaceSelector, LoggingEventEmitter, NoopEventEmitter,
    SsdpDiscovery,
};

use crate::commands::{Ctx, DeviceSelector};
use crate::config::RokuctlConfig;

/// rokuctl - Roku discovery and remote control.
#[derive(Parser, Debug)]
#[command(name = "rokuctl")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file (YAML).
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(short, long, default_value = "warn", env = "ROKUCTL_LOG_LEVEL", global = true)]
    log_level: log::LevelFilter,

    /// Verbose logging (same as --log-level debug).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Alias file (overrides config file).
    #[arg(long, value_name = "FILE", env = "ROKUCTL_ALIAS_FILE", global = true)]
    alias_file: Option<PathBuf>,

    /// Discovery window in milliseconds (overrides config file).
    #[arg(long, value_name = "MS", global = true)]
    discovery_window_ms: Option<u64>,

    /// Local IPv4 address to probe from (overrides config file).
    #[arg(long, value_name = "IP", global = true)]
    interface: Option<Ipv4Addr>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Discover and manage Roku devices.
    Device {
        #[command(subcommand)]
        command: DeviceCommand,
    },
    /// Get or set the channel.
    Channel {
        #[command(subcommand)]
        command: ChannelCommand,
    },
}

#[derive(Subcommand, Debug)]
enum DeviceCommand {
    /// Show all local Roku devices.
    List,
    /// Add an alias for a Roku device.
    Alias {
        /// Device USN.
        usn: String,
        /// Friendly name.
        name: String,
    },
    /// Remove an alias for a Roku device.
    Unalias {
        /// USN or alias name.
        usn_or_name: String,
    },
}

#[derive(Subcommand, Debug)]
enum ChannelCommand {
    /// List installed channels.
    List(SelectorArgs),
    /// Get the current channel.
    Get(SelectorArgs),
    /// Set the current channel by name or number.
    Set {
        #[command(flatten)]
        selector: SelectorArgs,
        /// Channel name (fuzzy) or numeric id.
        name_or_id: String,
    },
}

#[derive(ClapArgs, Debug)]
struct SelectorArgs {
    /// Select the first device found on the network.
    #[arg(short = '1', long)]
    first: bool,

    /// Select device by name or USN (required if more than one device on the network).
    #[arg(short, long)]
    device: Option<String>,
}

impl From<SelectorArgs> for DeviceSelector {
    fn from(args: SelectorArgs) -> Self {
        Self {
            device: args.device,
            first: args.first,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        args.log_level
    };

    // Initialize logging
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp_millis()
        .init();

    log::debug!("rokuctl v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config =
        RokuctlConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    // Apply CLI overrides
    if let Some(ms) = args.discovery_window_ms {
        config.discovery_window_ms = ms;
    }
    if let Some(ip) = args.interface {
        config.interface_ip = Some(ip);
    }
    if let Some(path) = args.alias_file {
        config.alias_file = Some(path);
    }

    log::debug!(
        "Configuration: discovery_window_ms={}, interface={}, request_timeout_secs={}",
        config.discovery_window_ms,
        config
            .interface_ip
            .map_or_else(|| "auto".to_string(), |ip| ip.to_string()),
        config.request_timeout_secs
    );

    let emitter: Arc<dyn EventEmitter> = if level >= log::LevelFilter::Debug {
        Arc::new(LoggingEventEmitter)
    } else {
        Arc::new(NoopEventEmitter)
    };

    let discovery = match config.interface_ip {
        Some(ip) => SsdpDiscovery::with_selector(
            config.to_ssdp_config(),
            Arc::new(FixedInterfaceSelector::new(ip)),
            emitter.clone(),
        ),
        None => SsdpDiscovery::new(config.to_ssdp_config(), emitter.clone()),
    };

    let aliases = match config.alias_file.clone() {
        Some(path) => AliasStore::new(path),
        None => AliasStore::default_location().context("Failed to locate alias file")?,
    };

    let ctx = Ctx {
        discovery,
        aliases,
        http: reqwest::Client::new(),
        request_timeout: config.request_timeout(),
        emitter,
    };

    match args.command {
        Command::Device { command } => match command {
            DeviceCommand::List => commands::device_list(&ctx).await,
            DeviceCommand::Alias { usn, name } => commands::device_alias(&ctx, &usn, &name),
            DeviceCommand::Unalias { usn_or_name } => {
                commands::device_unalias(&ctx, &usn_or_name)
            }
        },
        Command::Channel { command } => match command {
            ChannelCommand::List(selector) => {
                commands::channel_list(&ctx, &selector.into()).await
            }
            ChannelCommand::Get(selector) => commands::channel_get(&ctx, &selector.into()).await,
            ChannelCommand::Set {
                selector,
                name_or_id,
            } => commands::channel_set(&ctx, &selector.into(), &name_or_id).await,
        },
    }
}
