//! High-level ECP client for one Roku device.
//!
//! Every operation is exactly one HTTP request against the device's base
//! URL. Nothing is retried: a transport failure is returned immediately.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, Response};
use thiserror::Error;
use url::Url;

use super::apps::{parse_apps, AppRecord, CatalogError};
use super::discovery::DeviceDescriptor;
use super::fuzzy;
use crate::events::{ControlEvent, EventEmitter};
use crate::protocol_constants::{CONTROL_TIMEOUT_SECS, HOME_APP_ID, HOME_APP_NAME};
use crate::utils::now_millis;

// ─────────────────────────────────────────────────────────────────────────────
// Error Types
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur while controlling a device.
#[derive(Debug, Error)]
pub enum ControlError {
    /// The base URL cannot have path segments appended (e.g. `mailto:`).
    #[error("device endpoint '{0}' cannot be used as a base URL")]
    InvalidEndpoint(String),

    /// HTTP request to the device failed.
    #[error("failed to {operation} {target}: {source}")]
    Http {
        /// Attempted operation.
        operation: &'static str,
        /// App id or device URL the operation targeted.
        target: String,
        /// Transport error.
        #[source]
        source: reqwest::Error,
    },

    /// Device answered with an unexpected status.
    #[error("failed to {operation} {target}: HTTP {status}")]
    HttpStatus {
        /// Attempted operation.
        operation: &'static str,
        /// App id or device URL the operation targeted.
        target: String,
        /// Status code returned by the device.
        status: u16,
    },

    /// The app list body could not be parsed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// `query/active-app` did not contain exactly one app.
    #[error("active-app response contained {0} apps")]
    UnexpectedAppCount(usize),

    /// No installed app resembles the requested name.
    #[error("no applications found with a name like '{0}'")]
    AppNotFound(String),
}

/// Convenient Result alias for control operations.
pub type ControlResult<T> = Result<T, ControlError>;

// ─────────────────────────────────────────────────────────────────────────────
// Catalog
// ─────────────────────────────────────────────────────────────────────────────

/// Apps fetched from one device, plus their names for fuzzy lookup.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    apps: Vec<AppRecord>,
    names: Vec<String>,
}

impl Catalog {
    /// Builds a catalog, preserving app order.
    pub fn new(apps: Vec<AppRecord>) -> Self {
        let names = apps.iter().map(|a| a.name.clone()).collect();
        Self { apps, names }
    }

    /// Apps in device order.
    pub fn apps(&self) -> &[AppRecord] {
        &self.apps
    }

    /// Returns the app whose name best matches `name`.
    pub fn find(&self, name: &str) -> Option<&AppRecord> {
        fuzzy::resolve(name, &self.names).map(|i| &self.apps[i])
    }

    /// Number of apps.
    pub fn len(&self) -> usize {
        self.apps.len()
    }

    /// True if the device reported no apps.
    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }
}

/// What [`DeviceClient::launch_by_name`] ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Launched {
    /// The name meant the home screen.
    Home,
    /// The resolved app was launched.
    App(AppRecord),
}

// ─────────────────────────────────────────────────────────────────────────────
// Client
// ─────────────────────────────────────────────────────────────────────────────

/// ECP client bound to one device.
///
/// The catalog cache is private to the instance and only changes through
/// `&mut self`; share the client read-only once the catalog is loaded.
pub struct DeviceClient {
    http: Client,
    base: Url,
    timeout: Duration,
    emitter: Arc<dyn EventEmitter>,
    catalog: Option<Catalog>,
}

impl DeviceClient {
    /// Creates a client for the device at `base`.
    pub fn new(http: Client, base: Url, emitter: Arc<dyn EventEmitter>) -> Self {
        Self {
            http,
            base,
            timeout: Duration::from_secs(CONTROL_TIMEOUT_SECS),
            emitter,
            catalog: None,
        }
    }

    /// Creates a client for a discovered device.
    pub fn for_device(
        http: Client,
        device: &DeviceDescriptor,
        emitter: Arc<dyn EventEmitter>,
    ) -> Self {
        Self::new(http, device.base_endpoint.clone(), emitter)
    }

    /// Overrides the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The device base URL.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Appends path segments to the base URL, keeping any base path.
    fn endpoint(&self, segments: &[&str]) -> ControlResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ControlError::InvalidEndpoint(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends one request and returns the response, whatever its status.
    async fn send(
        &self,
        method: Method,
        segments: &[&str],
        operation: &'static str,
        target: &str,
    ) -> ControlResult<Response> {
        let url = self.endpoint(segments)?;
        log::debug!("[ECP] {} {}", method, url);

        let start = std::time::Instant::now();
        let mut request = self.http.request(method.clone(), url).timeout(self.timeout);
        if method == Method::POST {
            request = request.body("");
        }
        let res = request.send().await;

        log::debug!(
            "[ECP] {} completed in {:?}: {:?}",
            operation,
            start.elapsed(),
            res.as_ref().map(|r| r.status())
        );

        res.map_err(|source| ControlError::Http {
            operation,
            target: target.to_string(),
            source,
        })
    }

    /// GETs an app list document and parses it.
    async fn get_apps(&self, segments: &[&str], operation: &'static str) -> ControlResult<Vec<AppRecord>> {
        let target = self.base.to_string();
        let res = self.send(Method::GET, segments, operation, &target).await?;

        let status = res.status().as_u16();
        if status != 200 {
            return Err(ControlError::HttpStatus {
                operation,
                target,
                status,
            });
        }

        let body = res.text().await.map_err(|source| ControlError::Http {
            operation,
            target: target.clone(),
            source,
        })?;
        Ok(parse_apps(&body)?)
    }

    /// Lists installed apps (`GET query/apps`).
    pub async fn query_apps(&self) -> ControlResult<Vec<AppRecord>> {
        let apps = self.get_apps(&["query", "apps"], "get apps from").await?;
        log::debug!("[ECP] Got {} app(s) from {}", apps.len(), self.base);
        self.emitter.emit_control(ControlEvent::CatalogFetched {
            device: self.base.to_string(),
            apps: apps.len(),
            timestamp: now_millis(),
        });
        Ok(apps)
    }

    /// Returns the app currently in the foreground (`GET query/active-app`).
    pub async fn active_app(&self) -> ControlResult<AppRecord> {
        let mut apps = self
            .get_apps(&["query", "active-app"], "get active app from")
            .await?;
        if apps.len() != 1 {
            return Err(ControlError::UnexpectedAppCount(apps.len()));
        }
        Ok(apps.remove(0))
    }

    /// Launches an app by id (`POST launch/{id}`).
    ///
    /// Id `"0"` is the home screen and is sent as a home keypress instead.
    /// 200 (launched) and 204 (already running) both count as success.
    pub async fn launch(&self, id: &str) -> ControlResult<()> {
        if id == HOME_APP_ID {
            return self.home().await;
        }

        log::debug!("[ECP] Setting channel {}", id);
        let res = self
            .send(Method::POST, &["launch", id], "launch app", id)
            .await?;

        let status = res.status().as_u16();
        if status != 200 && status != 204 {
            return Err(ControlError::HttpStatus {
                operation: "launch app",
                target: id.to_string(),
                status,
            });
        }

        self.emitter.emit_control(ControlEvent::AppLaunched {
            device: self.base.to_string(),
            app_id: id.to_string(),
            already_active: status == 204,
            timestamp: now_millis(),
        });
        Ok(())
    }

    /// Launches the app whose name best matches `name`.
    ///
    /// `"home"` (any case) goes straight to the home screen. Otherwise the
    /// catalog is fetched on first use and reused afterwards.
    pub async fn launch_by_name(&mut self, name: &str) -> ControlResult<Launched> {
        if name.eq_ignore_ascii_case(HOME_APP_NAME) {
            self.home().await?;
            return Ok(Launched::Home);
        }

        log::debug!("[ECP] Setting channel by name '{}'", name);
        if self.catalog.is_none() {
            self.refresh_catalog().await?;
        }

        let app = self
            .catalog
            .as_ref()
            .and_then(|c| c.find(name))
            .cloned()
            .ok_or_else(|| ControlError::AppNotFound(name.to_string()))?;

        log::debug!("[ECP] Resolved '{}' to {} ({})", name, app.name, app.id);
        self.launch(&app.id).await?;
        Ok(Launched::App(app))
    }

    /// Presses the home key (`POST keypress/home`).
    pub async fn home(&self) -> ControlResult<()> {
        let target = self.base.to_string();
        let res = self
            .send(Method::POST, &["keypress", "home"], "send 'home' keypress to", &target)
            .await?;

        let status = res.status().as_u16();
        if status != 200 {
            return Err(ControlError::HttpStatus {
                operation: "send 'home' keypress to",
                target,
                status,
            });
        }

        self.emitter.emit_control(ControlEvent::HomePressed {
            device: target,
            timestamp: now_millis(),
        });
        Ok(())
    }

    /// The cached catalog, if one has been loaded.
    pub fn catalog(&self) -> Option<&Catalog> {
        self.catalog.as_ref()
    }

    /// Fetches the catalog again and caches it.
    pub async fn refresh_catalog(&mut self) -> ControlResult<&Catalog> {
        let apps = self.query_apps().await?;
        Ok(self.catalog.insert(Catalog::new(apps)))
    }

    /// Installs a catalog without contacting the device.
    pub fn set_catalog(&mut self, apps: Vec<AppRecord>) {
        self.catalog = Some(Catalog::new(apps));
    }

    /// Drops the cached catalog; the next name lookup refetches.
    pub fn clear_catalog(&mut self) {
        self.catalog = None;
    }
}
