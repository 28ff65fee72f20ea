//! Subcommand implementations.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use rokuctl_core::protocol_constants::{HOME_APP_ID, HOME_APP_NAME};
use rokuctl_core::{
    AliasStore, DeviceClient, DeviceDescriptor, DiscoveryFlow, EventEmitter, Launched,
    RokuError, RokuResult, SsdpDiscovery,
};

/// Shared state for one CLI invocation.
pub struct Ctx {
    pub discovery: SsdpDiscovery,
    pub aliases: AliasStore,
    pub http: reqwest::Client,
    pub request_timeout: Duration,
    pub emitter: Arc<dyn EventEmitter>,
}

/// How the user picked a device.
#[derive(Debug, Clone, Default)]
pub struct DeviceSelector {
    /// USN or alias name.
    pub device: Option<String>,
    /// Take the first device that answers.
    pub first: bool,
}

/// True if `usn` is the device the user asked for.
fn matches_selector(usn: &str, aliases: &HashMap<String, String>, wanted: Option<&str>) -> bool {
    match wanted {
        None => true,
        Some(wanted) => usn == wanted || aliases.get(usn).map(String::as_str) == Some(wanted),
    }
}

/// Runs discovery and returns the single device the selector identifies.
///
/// With `--device` or `--first` discovery stops at the first match. Without
/// either, the whole window runs and a second device is an error.
pub async fn select_device(
    ctx: &Ctx,
    selector: &DeviceSelector,
) -> RokuResult<DeviceDescriptor> {
    let aliases = if selector.device.is_some() {
        ctx.aliases.lookup()?
    } else {
        HashMap::new()
    };
    let wanted = selector.device.as_deref();
    let stop_at_first = selector.first || wanted.is_some();

    let mut target: Option<DeviceDescriptor> = None;
    let mut ambiguous = false;

    let result = ctx
        .discovery
        .discover(|dev| {
            if !matches_selector(&dev.unique_id, &aliases, wanted) {
                log::debug!("Skipping device {}", dev.unique_id);
                return DiscoveryFlow::Continue;
            }
            if target.is_some() {
                ambiguous = true;
                return DiscoveryFlow::fail(RokuError::AmbiguousDevice.to_string());
            }
            target = Some(dev);
            if stop_at_first {
                DiscoveryFlow::Stop
            } else {
                DiscoveryFlow::Continue
            }
        })
        .await;

    if ambiguous {
        return Err(RokuError::AmbiguousDevice);
    }
    result?;

    let device = target.ok_or(RokuError::DeviceNotFound)?;
    log::info!("Using device {} at {}", device.unique_id, device.base_endpoint);
    Ok(device)
}

fn client_for(ctx: &Ctx, device: &DeviceDescriptor) -> DeviceClient {
    DeviceClient::for_device(ctx.http.clone(), device, ctx.emitter.clone())
        .with_timeout(ctx.request_timeout)
}

/// `device list`: prints `usn location [alias]` for every device.
pub async fn device_list(ctx: &Ctx) -> Result<()> {
    let aliases = ctx.aliases.lookup().context("failed to load aliases")?;

    ctx.discovery
        .discover(|dev| {
            match aliases.get(&dev.unique_id) {
                Some(alias) => println!("{} {} {}", dev.unique_id, dev.base_endpoint, alias),
                None => println!("{} {}", dev.unique_id, dev.base_endpoint),
            }
            DiscoveryFlow::Continue
        })
        .await
        .context("failed to discover rokus")?;
    Ok(())
}

/// `device alias <USN> <NAME>`
pub fn device_alias(ctx: &Ctx, usn: &str, name: &str) -> Result<()> {
    let saved = ctx.aliases.add(usn, name)?;
    log::info!(
        "Saved {} alias(es) to {}",
        saved.len(),
        ctx.aliases.path().display()
    );
    Ok(())
}

/// `device unalias <USN_OR_NAME>`
pub fn device_unalias(ctx: &Ctx, key: &str) -> Result<()> {
    let removed = ctx.aliases.remove(key)?;
    if removed == 0 {
        log::warn!("No alias matches '{}'", key);
    }
    Ok(())
}

/// `channel list`: home first, then every installed app.
pub async fn channel_list(ctx: &Ctx, selector: &DeviceSelector) -> Result<()> {
    let device = select_device(ctx, selector).await?;
    let apps = client_for(ctx, &device).query_apps().await?;

    println!("{} ({})", HOME_APP_NAME, HOME_APP_ID);
    for app in apps {
        println!("{} ({})", app.name, app.id);
    }
    Ok(())
}

/// `channel get`: the app in the foreground.
pub async fn channel_get(ctx: &Ctx, selector: &DeviceSelector) -> Result<()> {
    let device = select_device(ctx, selector).await?;
    let app = client_for(ctx, &device).active_app().await?;
    println!("{} ({})", app.name, app.id);
    Ok(())
}

fn is_app_id(arg: &str) -> bool {
    !arg.is_empty() && arg.bytes().all(|b| b.is_ascii_digit())
}

/// `channel set <NAME_OR_ID>`: numeric arguments are ids, anything else a name.
pub async fn channel_set(ctx: &Ctx, selector: &DeviceSelector, target: &str) -> Result<()> {
    let device = select_device(ctx, selector).await?;
    let mut client = client_for(ctx, &device);

    if is_app_id(target) {
        client.launch(target).await?;
        log::info!("Launched app {}", target);
        return Ok(());
    }

    match client.launch_by_name(target).await? {
        Launched::Home => log::info!("Returned to home screen"),
        Launched::App(app) => log::info!("Launched {} ({})", app.name, app.id),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aliases() -> HashMap<String, String> {
        HashMap::from([("ABC123".to_string(), "den".to_string())])
    }

    #[test]
    fn no_selector_matches_everything() {
        assert!(matches_selector("ABC123", &aliases(), None));
        assert!(matches_selector("ZZZ999", &aliases(), None));
    }

    #[test]
    fn selector_matches_usn_or_alias() {
        assert!(matches_selector("ABC123", &aliases(), Some("ABC123")));
        assert!(matches_selector("ABC123", &aliases(), Some("den")));
        assert!(!matches_selector("ABC123", &aliases(), Some("kitchen")));
        assert!(!matches_selector("ZZZ999", &aliases(), Some("den")));
    }

    #[test]
    fn numeric_arguments_are_ids() {
        assert!(is_app_id("12"));
        assert!(is_app_id("0"));
        assert!(!is_app_id("netflix"));
        assert!(!is_app_id("4k"));
        assert!(!is_app_id(""));
    }
}
