// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Intent dispatch.
//!
//! The [`Dispatcher`] is the entry point for the voice front end. Each call
//! takes a [`DeviceRequest`], resolves it to a registered device, runs one
//! device operation and returns a [`DispatchResponse`]. Nothing here returns
//! an error: every outcome is a response value.
//!
//! # Snapshots
//!
//! The connector, registry and settings form one immutable snapshot behind a
//! single `Arc`. Dispatch calls clone the `Arc` and release the lock before
//! doing any I/O, so a concurrent [`rebuild`](Dispatcher::rebuild) never
//! shows them a half-built registry. Every write to the snapshot goes through
//! one gate, so a rebuild that started before a
//! [`clear`](Dispatcher::clear) cannot publish after it.
//!
//! Writes to the same device from concurrent calls are not coordinated and
//! race at the remote API.
//!
//! # Examples
//!
//! ```no_run
//! use hass_voice::{ClientConfig, DeviceRequest, Dispatcher, RestConnector};
//!
//! #[tokio::main]
//! async fn main() -> hass_voice::Result<()> {
//!     let dispatcher: Dispatcher<RestConnector> = Dispatcher::new();
//!     dispatcher
//!         .reconfigure(&ClientConfig::new("http://homeassistant.local:8123", "token"))
//!         .await?;
//!
//!     let response = dispatcher.turn_on(&DeviceRequest::named("kitchen light")).await;
//!     if response.is_failure() {
//!         eprintln!("{}", serde_json::to_string(&response).unwrap_or_default());
//!     }
//!     Ok(())
//! }
//! ```

mod request;
mod response;

pub use request::DeviceRequest;
pub use response::{DispatchResponse, FailureReason, ResponseBody};

use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use crate::config::DispatchSettings;
use crate::device::{Device, DisplayModel};
use crate::error::DeviceError;
use crate::protocol::{Connector, DEFAULT_LANGUAGE};
use crate::registry::{DeviceRegistry, Resolver};
use crate::types::{Attributes, Brightness, LightColor, Percentage};

#[cfg(feature = "http")]
use crate::{ClientConfig, error::Error, protocol::RestConnector};

/// One configured Home Assistant instance.
#[derive(Debug)]
struct Instance<C> {
    connector: Arc<C>,
    registry: DeviceRegistry<C>,
    settings: DispatchSettings,
}

impl<C: Connector> Instance<C> {
    async fn build(connector: Arc<C>, settings: DispatchSettings) -> Self {
        let entities = connector.fetch_all().await;
        let registry =
            DeviceRegistry::from_entities(Arc::clone(&connector), &entities, settings.toggle_automations);
        Self {
            connector,
            registry,
            settings,
        }
    }
}

/// Routes intents to registered devices.
#[derive(Debug)]
pub struct Dispatcher<C> {
    current: RwLock<Option<Arc<Instance<C>>>>,
    rebuild_gate: tokio::sync::Mutex<()>,
}

impl<C> Default for Dispatcher<C> {
    fn default() -> Self {
        Self {
            current: RwLock::new(None),
            rebuild_gate: tokio::sync::Mutex::new(()),
        }
    }
}

impl<C: Connector> Dispatcher<C> {
    /// Creates an unconfigured dispatcher with an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Lifecycle ==========

    /// Adopts a connector, builds its registry and publishes it.
    ///
    /// Returns the number of registered devices.
    pub async fn install(&self, connector: Arc<C>, settings: DispatchSettings) -> usize {
        let _gate = self.rebuild_gate.lock().await;
        let instance = Instance::build(connector, settings).await;
        let count = instance.registry.len();
        *self.current.write() = Some(Arc::new(instance));
        tracing::info!(devices = count, "Device registry installed");
        count
    }

    /// Rebuilds the registry from a fresh entity snapshot.
    ///
    /// Returns the new device count, or `None` when unconfigured.
    pub async fn rebuild(&self) -> Option<usize> {
        let _gate = self.rebuild_gate.lock().await;
        let (connector, settings) = {
            let current = self.current.read();
            let instance = current.as_ref()?;
            (Arc::clone(&instance.connector), instance.settings)
        };
        let instance = Instance::build(connector, settings).await;
        let count = instance.registry.len();
        *self.current.write() = Some(Arc::new(instance));
        tracing::info!(devices = count, "Device registry rebuilt");
        Some(count)
    }

    /// Drops the current instance, leaving an empty registry.
    ///
    /// Waits for an in-flight install or rebuild to finish first.
    pub async fn clear(&self) {
        let _gate = self.rebuild_gate.lock().await;
        *self.current.write() = None;
        tracing::debug!("Device registry cleared");
    }

    /// Returns whether an instance is configured.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.current.read().is_some()
    }

    /// Returns the settings in use, if configured.
    #[must_use]
    pub fn settings(&self) -> Option<DispatchSettings> {
        self.current.read().as_ref().map(|instance| instance.settings)
    }

    /// Returns the number of registered devices.
    #[must_use]
    pub fn device_count(&self) -> usize {
        self.snapshot().map_or(0, |instance| instance.registry.len())
    }

    fn snapshot(&self) -> Option<Arc<Instance<C>>> {
        self.current.read().clone()
    }

    // ========== Queries ==========

    /// Lists every registered device in registry order.
    #[must_use]
    pub fn list_devices(&self) -> Vec<DisplayModel> {
        self.snapshot()
            .map(|instance| instance.registry.list_display_models())
            .unwrap_or_default()
    }

    /// Returns the display projection of one device.
    pub async fn get_device(&self, request: &DeviceRequest) -> DispatchResponse {
        self.dispatch(request, "get_device", |device, _| async move {
            Ok::<_, DeviceError>(ResponseBody::Device(device.display_model()))
        })
        .await
    }

    // ========== Power ==========

    /// Turns a device on.
    pub async fn turn_on(&self, request: &DeviceRequest) -> DispatchResponse {
        self.dispatch(request, "turn_on", |device, _| async move {
            device.turn_on().await.map(|_| ResponseBody::Done {})
        })
        .await
    }

    /// Turns a device off.
    pub async fn turn_off(&self, request: &DeviceRequest) -> DispatchResponse {
        self.dispatch(request, "turn_off", |device, _| async move {
            device.turn_off().await.map(|_| ResponseBody::Done {})
        })
        .await
    }

    // ========== Generic ==========

    /// Calls a service of the device's domain.
    ///
    /// A blank `name` fails with [`FailureReason::MissingArgument`].
    pub async fn call_function(
        &self,
        request: &DeviceRequest,
        name: &str,
        args: Option<&Attributes>,
    ) -> DispatchResponse {
        if name.trim().is_empty() {
            return reject(request, FailureReason::MissingArgument);
        }
        self.dispatch(request, name, |device, _| async move {
            device
                .call_function(name, args)
                .await
                .map(|result| ResponseBody::Result { result })
        })
        .await
    }

    // ========== Brightness ==========

    /// Returns the brightness as a percentage.
    ///
    /// A light reporting no brightness (usually because it is off) reads as 0.
    pub async fn get_brightness(&self, request: &DeviceRequest) -> DispatchResponse {
        self.dispatch(request, "get_brightness", |device, _| async move {
            device
                .get_brightness()
                .await
                .map(|raw| brightness_body(raw.unwrap_or(Brightness::MIN)))
        })
        .await
    }

    /// Sets the brightness from a percentage (0-100).
    ///
    /// The response echoes the percentage of the raw value actually sent.
    pub async fn set_brightness(&self, request: &DeviceRequest, percent: u8) -> DispatchResponse {
        let percent = match Percentage::new(percent) {
            Ok(percent) => percent,
            Err(err) => {
                tracing::warn!(error = %err, "Rejected brightness");
                return reject(request, FailureReason::InvalidArgument);
            }
        };
        self.dispatch(request, "set_brightness", |device, _| async move {
            let raw = Brightness::from_percentage(percent);
            device
                .set_brightness(raw)
                .await
                .map(|_| brightness_body(raw))
        })
        .await
    }

    /// Raises the brightness by the configured step.
    pub async fn increase_brightness(&self, request: &DeviceRequest) -> DispatchResponse {
        self.dispatch(request, "increase_brightness", |device, settings| async move {
            device
                .increase_brightness(settings.brightness_increment)
                .await
                .map(|raw| brightness_body(raw))
        })
        .await
    }

    /// Lowers the brightness by the configured step.
    pub async fn decrease_brightness(&self, request: &DeviceRequest) -> DispatchResponse {
        self.dispatch(request, "decrease_brightness", |device, settings| async move {
            device
                .decrease_brightness(settings.brightness_increment)
                .await
                .map(|raw| brightness_body(raw))
        })
        .await
    }

    // ========== Color ==========

    /// Returns the light color as a spoken name.
    pub async fn get_color(&self, request: &DeviceRequest) -> DispatchResponse {
        self.dispatch(request, "get_color", |device, _| async move {
            device
                .get_spoken_color()
                .await
                .map(|color| ResponseBody::Color { color })
        })
        .await
    }

    /// Sets the light color from a name, `#rrggbb` or `r,g,b`.
    ///
    /// The response echoes the requested color.
    pub async fn set_color(&self, request: &DeviceRequest, color: &str) -> DispatchResponse {
        if color.trim().is_empty() {
            return reject(request, FailureReason::MissingArgument);
        }
        self.dispatch(request, "set_color", |device, _| async move {
            device
                .set_color(&LightColor::parse(color))
                .await
                .map(|_| ResponseBody::Color {
                    color: Some(color.to_string()),
                })
        })
        .await
    }

    // ========== Assist ==========

    /// Forwards free text to the conversation endpoint.
    ///
    /// `language` defaults to English. Returns `None` when unconfigured or
    /// when the call fails.
    pub async fn assist(&self, text: &str, language: Option<&str>) -> Option<Value> {
        let instance = self.snapshot()?;
        let language = language.unwrap_or(DEFAULT_LANGUAGE);
        tracing::debug!(text, language, "Forwarding to Assist");
        instance.connector.send_freeform(text, language).await
    }

    // ========== Helpers ==========

    async fn dispatch<F, Fut>(
        &self,
        request: &DeviceRequest,
        operation: &str,
        op: F,
    ) -> DispatchResponse
    where
        F: FnOnce(Device<C>, DispatchSettings) -> Fut,
        Fut: Future<Output = Result<ResponseBody, DeviceError>>,
    {
        let spoken = request.spoken_name();
        let (device, settings) = match self.locate(request) {
            Ok(target) => target,
            Err(reason) => return reject(request, reason),
        };

        let entity_id = device.id().to_string();
        match op(device, settings).await {
            Ok(body) => {
                tracing::debug!(%entity_id, operation, "Dispatch succeeded");
                DispatchResponse::new(spoken, body)
            }
            Err(err) => {
                tracing::warn!(%entity_id, operation, error = %err, "Dispatch failed");
                DispatchResponse::failure(spoken, FailureReason::from(&err))
            }
        }
    }

    fn locate(&self, request: &DeviceRequest) -> Result<(Device<C>, DispatchSettings), FailureReason> {
        if request.device_id().is_none() && request.name().is_none() {
            return Err(FailureReason::MissingDevice);
        }
        let instance = self.snapshot().ok_or(FailureReason::NotFound)?;
        let registry = &instance.registry;

        let id = match request.device_id() {
            Some(id) => id.to_string(),
            None => {
                let name = request.name().unwrap_or_default();
                Resolver::new(instance.settings.confidence_threshold)
                    .resolve(registry, name)
                    .ok_or(FailureReason::NotFound)?
            }
        };

        let device = registry.find_by_id(&id).cloned().ok_or_else(|| {
            tracing::debug!(entity_id = %id, "No registered device with this id");
            FailureReason::NotFound
        })?;
        Ok((device, instance.settings))
    }
}

#[cfg(feature = "http")]
impl Dispatcher<RestConnector> {
    /// Applies a new configuration.
    ///
    /// With a usable host and key, builds a fresh connector and registry and
    /// returns the device count. Otherwise the dispatcher becomes
    /// unavailable.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotConfigured` if host or key is empty, or
    /// `Error::Protocol` if the connector cannot be built. The dispatcher is
    /// unavailable afterwards in both cases.
    pub async fn reconfigure(&self, config: &ClientConfig) -> Result<usize, Error> {
        if !config.is_usable() {
            tracing::info!("Host or access token missing, dispatcher disabled");
            self.clear().await;
            return Err(Error::NotConfigured);
        }
        let connector = match RestConnector::from_config(config) {
            Ok(connector) => connector,
            Err(err) => {
                self.clear().await;
                return Err(err.into());
            }
        };
        tracing::info!(host = connector.base_url(), "Reconfiguring");
        Ok(self
            .install(Arc::new(connector), config.dispatch_settings())
            .await)
    }

    /// Validates a configuration against the server before adopting it.
    ///
    /// Returns `true` if the connection check passed and the configuration
    /// was applied. A failed check leaves the current state untouched.
    pub async fn setup(&self, config: &ClientConfig) -> bool {
        if !config.is_usable() {
            tracing::warn!("Host or access token missing");
            return false;
        }
        let connector = match RestConnector::from_config(config) {
            Ok(connector) => connector,
            Err(err) => {
                tracing::warn!(error = %err, "Invalid configuration");
                return false;
            }
        };
        if let Err(err) = connector.check_connection().await {
            tracing::warn!(host = connector.base_url(), error = %err, "Connection check failed");
            return false;
        }
        self.install(Arc::new(connector), config.dispatch_settings())
            .await;
        true
    }
}

fn reject(request: &DeviceRequest, reason: FailureReason) -> DispatchResponse {
    tracing::debug!(device = request.spoken_name(), %reason, "Request rejected");
    DispatchResponse::failure(request.spoken_name(), reason)
}

fn brightness_body(brightness: Brightness) -> ResponseBody {
    ResponseBody::Brightness {
        brightness: brightness.percentage().value(),
    }
}
