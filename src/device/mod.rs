// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed device wrapper around a Home Assistant entity.
//!
//! A [`Device`] is created by the registry for every supported entity. It
//! caches the entity state and exposes operations grouped by capability:
//!
//! - **Switchable**: [`turn_on`](Device::turn_on), [`turn_off`](Device::turn_off)
//! - **Dimmable**: [`get_brightness`](Device::get_brightness),
//!   [`set_brightness`](Device::set_brightness),
//!   [`increase_brightness`](Device::increase_brightness),
//!   [`decrease_brightness`](Device::decrease_brightness)
//! - **Colorable**: [`get_spoken_color`](Device::get_spoken_color),
//!   [`set_color`](Device::set_color)
//! - **Generic**: [`call_function`](Device::call_function)
//!
//! Calling an operation outside the device's [`Capabilities`] fails with
//! [`DeviceError::UnsupportedCapability`] before any request is made.
//!
//! Brightness here is always on the 0-255 service scale; converting from and
//! to percentages is the dispatcher's job.

mod display;

pub use display::DisplayModel;

use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use crate::capabilities::Capabilities;
use crate::error::DeviceError;
use crate::protocol::Connector;
use crate::state::DeviceState;
use crate::types::{Attributes, Brightness, DeviceCategory, LightColor, RawEntity};

/// A registered Home Assistant device.
///
/// Cloning is cheap: clones share the connector and the state cache.
#[derive(Debug)]
pub struct Device<C> {
    connector: Arc<C>,
    id: String,
    name: String,
    category: DeviceCategory,
    capabilities: Capabilities,
    state: Arc<RwLock<DeviceState>>,
}

impl<C> Clone for Device<C> {
    fn clone(&self) -> Self {
        Self {
            connector: Arc::clone(&self.connector),
            id: self.id.clone(),
            name: self.name.clone(),
            category: self.category,
            capabilities: self.capabilities,
            state: Arc::clone(&self.state),
        }
    }
}

impl<C: Connector> Device<C> {
    /// Creates a device for an entity of a known category.
    pub(crate) fn new(
        connector: Arc<C>,
        entity: &RawEntity,
        category: DeviceCategory,
        capabilities: Capabilities,
    ) -> Self {
        let name = entity
            .friendly_name()
            .map_or_else(|| entity.entity_id.clone(), str::to_string);
        Self {
            connector,
            id: entity.entity_id.clone(),
            name,
            category,
            capabilities,
            state: Arc::new(RwLock::new(DeviceState::from_entity(entity))),
        }
    }

    /// Returns the entity identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the device category.
    #[must_use]
    pub fn category(&self) -> DeviceCategory {
        self.category
    }

    /// Returns the icon token.
    #[must_use]
    pub fn icon(&self) -> String {
        self.category.icon()
    }

    /// Returns the device capabilities.
    #[must_use]
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Returns a snapshot of the cached state.
    #[must_use]
    pub fn state(&self) -> DeviceState {
        self.state.read().clone()
    }

    /// Returns the display projection of this device.
    #[must_use]
    pub fn display_model(&self) -> DisplayModel {
        let state = self.state.read();
        DisplayModel {
            id: self.id.clone(),
            name: self.name.clone(),
            category: self.category,
            icon: self.icon(),
            state: state.state().map(str::to_string),
            attributes: state.attributes().clone(),
            area: state.area().map(str::to_string),
        }
    }

    // ========== State ==========

    /// Re-reads the entity and updates the cache.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::StateUnavailable` if the entity cannot be read.
    pub async fn refresh(&self) -> Result<DeviceState, DeviceError> {
        let entity = self
            .connector
            .fetch_one(&self.id)
            .await
            .ok_or_else(|| DeviceError::StateUnavailable(self.id.clone()))?;
        let mut state = self.state.write();
        state.apply(&entity);
        Ok(state.clone())
    }

    /// Writes the entity state directly, bypassing services.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::StateUnavailable` if the write fails.
    pub async fn set_state(
        &self,
        state: &str,
        attributes: Option<&Attributes>,
    ) -> Result<DeviceState, DeviceError> {
        let entity = self
            .connector
            .write_state(&self.id, state, attributes)
            .await
            .ok_or_else(|| DeviceError::StateUnavailable(self.id.clone()))?;
        let mut cached = self.state.write();
        cached.apply(&entity);
        Ok(cached.clone())
    }

    // ========== Power Control ==========

    /// Turns the device on.
    ///
    /// # Errors
    ///
    /// Returns error if the device is not switchable or the call fails.
    pub async fn turn_on(&self) -> Result<Value, DeviceError> {
        self.check_capability("power control", self.capabilities.supports_power_control())?;
        self.call_service("turn_on", None).await
    }

    /// Turns the device off.
    ///
    /// # Errors
    ///
    /// Returns error if the device is not switchable or the call fails.
    pub async fn turn_off(&self) -> Result<Value, DeviceError> {
        self.check_capability("power control", self.capabilities.supports_power_control())?;
        self.call_service("turn_off", None).await
    }

    // ========== Brightness ==========

    /// Returns the current brightness.
    ///
    /// Refreshes the entity first and falls back to the cache if the read
    /// fails. `None` means the light reports no brightness (usually off).
    ///
    /// # Errors
    ///
    /// Returns error if the device is not dimmable.
    pub async fn get_brightness(&self) -> Result<Option<Brightness>, DeviceError> {
        self.check_capability("brightness", self.capabilities.supports_brightness_control())?;
        self.refresh_or_cached().await;
        Ok(self.state.read().brightness())
    }

    /// Sets the brightness on the 0-255 scale.
    ///
    /// # Errors
    ///
    /// Returns error if the device is not dimmable or the call fails.
    pub async fn set_brightness(&self, value: Brightness) -> Result<Value, DeviceError> {
        self.check_capability("brightness", self.capabilities.supports_brightness_control())?;
        let mut extra = Attributes::new();
        extra.insert("brightness".to_string(), Value::from(value.value()));
        let response = self.call_service("turn_on", Some(&extra)).await?;
        self.state.write().set_attribute("brightness", value.value());
        Ok(response)
    }

    /// Raises the brightness by `step`, saturating at 255.
    ///
    /// Returns the brightness that was set.
    ///
    /// # Errors
    ///
    /// Returns error if the device is not dimmable or the call fails.
    pub async fn increase_brightness(&self, step: u8) -> Result<Brightness, DeviceError> {
        let current = self.get_brightness().await?.unwrap_or(Brightness::MIN);
        let target = current.step_up(step);
        self.set_brightness(target).await?;
        Ok(target)
    }

    /// Lowers the brightness by `step`, saturating at 0.
    ///
    /// Returns the brightness that was set.
    ///
    /// # Errors
    ///
    /// Returns error if the device is not dimmable or the call fails.
    pub async fn decrease_brightness(&self, step: u8) -> Result<Brightness, DeviceError> {
        let current = self.get_brightness().await?.unwrap_or(Brightness::MIN);
        let target = current.step_down(step);
        self.set_brightness(target).await?;
        Ok(target)
    }

    // ========== Color ==========

    /// Returns the current color as a spoken name.
    ///
    /// Uses the `color_name` attribute when present, otherwise the nearest
    /// palette name to `rgb_color`.
    ///
    /// # Errors
    ///
    /// Returns error if the device is not colorable.
    pub async fn get_spoken_color(&self) -> Result<Option<String>, DeviceError> {
        self.check_capability("color", self.capabilities.supports_color_control())?;
        self.refresh_or_cached().await;
        let state = self.state.read();
        Ok(state.color_name().map(str::to_string).or_else(|| {
            state
                .rgb_color()
                .map(|rgb| rgb.nearest_name().to_string())
        }))
    }

    /// Sets the light color.
    ///
    /// # Errors
    ///
    /// Returns error if the device is not colorable or the call fails.
    pub async fn set_color(&self, color: &LightColor) -> Result<Value, DeviceError> {
        self.check_capability("color", self.capabilities.supports_color_control())?;
        let (field, value) = color.service_field();
        let mut extra = Attributes::new();
        extra.insert(field.to_string(), value);
        self.call_service("turn_on", Some(&extra)).await
    }

    // ========== Generic ==========

    /// Calls any service of the device's domain on this entity.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::ServiceFailed` if the call fails.
    pub async fn call_function(
        &self,
        name: &str,
        args: Option<&Attributes>,
    ) -> Result<Value, DeviceError> {
        self.call_service(name, args).await
    }

    // ========== Helpers ==========

    async fn call_service(
        &self,
        service: &str,
        extra: Option<&Attributes>,
    ) -> Result<Value, DeviceError> {
        let domain = self.category.as_str();
        self.connector
            .invoke_service(domain, service, &self.id, extra)
            .await
            .ok_or_else(|| DeviceError::ServiceFailed {
                domain: domain.to_string(),
                service: service.to_string(),
                entity_id: self.id.clone(),
            })
    }

    async fn refresh_or_cached(&self) {
        if let Err(err) = self.refresh().await {
            tracing::warn!(entity_id = %self.id, error = %err, "Using cached state");
        }
    }

    fn check_capability(&self, name: &str, supported: bool) -> Result<(), DeviceError> {
        if supported {
            Ok(())
        } else {
            Err(DeviceError::UnsupportedCapability {
                capability: name.to_string(),
                category: self.category.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::mock::{MockConnector, ServiceCall};
    use serde_json::json;

    fn kitchen() -> RawEntity {
        RawEntity::new("light.kitchen")
            .with_state("on")
            .with_attribute("friendly_name", "Kitchen Light")
            .with_attribute("brightness", 100)
            .with_area("kitchen")
    }

    fn device(connector: &Arc<MockConnector>, entity: &RawEntity) -> Device<MockConnector> {
        let category = entity.category().unwrap();
        Device::new(
            Arc::clone(connector),
            entity,
            category,
            Capabilities::for_category(category, false),
        )
    }

    fn extra(value: serde_json::Value) -> Option<Attributes> {
        value.as_object().cloned()
    }

    #[test]
    fn name_falls_back_to_id() {
        let connector = Arc::new(MockConnector::default());
        let named = device(&connector, &kitchen());
        let unnamed = device(&connector, &RawEntity::new("switch.fan"));
        assert_eq!(named.name(), "Kitchen Light");
        assert_eq!(unnamed.name(), "switch.fan");
    }

    #[test]
    fn display_model_projection() {
        let connector = Arc::new(MockConnector::default());
        let model = device(&connector, &kitchen()).display_model();

        assert_eq!(model.id, "light.kitchen");
        assert_eq!(model.name, "Kitchen Light");
        assert_eq!(model.category, DeviceCategory::Light);
        assert_eq!(model.icon, "mdi:light");
        assert_eq!(model.state.as_deref(), Some("on"));
        assert_eq!(model.area.as_deref(), Some("kitchen"));
        assert_eq!(model.attributes.get("brightness"), Some(&json!(100)));

        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(json["type"], "light");
    }

    #[tokio::test]
    async fn turn_on_calls_category_service() {
        let connector = Arc::new(MockConnector::default());
        let fan = device(&connector, &RawEntity::new("switch.fan"));

        fan.turn_on().await.unwrap();
        fan.turn_off().await.unwrap();

        assert_eq!(
            connector.calls(),
            vec![
                ServiceCall {
                    domain: "switch".into(),
                    service: "turn_on".into(),
                    entity_id: "switch.fan".into(),
                    extra: None,
                },
                ServiceCall {
                    domain: "switch".into(),
                    service: "turn_off".into(),
                    entity_id: "switch.fan".into(),
                    extra: None,
                },
            ]
        );
    }

    #[tokio::test]
    async fn failed_service_is_reported() {
        let connector = Arc::new(MockConnector::default().failing_services());
        let fan = device(&connector, &RawEntity::new("switch.fan"));

        let err = fan.turn_on().await.unwrap_err();
        assert!(matches!(err, DeviceError::ServiceFailed { .. }));
    }

    #[tokio::test]
    async fn unsupported_capability_makes_no_call() {
        let connector = Arc::new(MockConnector::default());
        let sensor = device(&connector, &RawEntity::new("sensor.temperature"));
        let fan = device(&connector, &RawEntity::new("switch.fan"));

        assert!(matches!(
            sensor.turn_on().await,
            Err(DeviceError::UnsupportedCapability { .. })
        ));
        assert!(matches!(
            fan.set_brightness(Brightness::MAX).await,
            Err(DeviceError::UnsupportedCapability { .. })
        ));
        assert!(matches!(
            fan.get_spoken_color().await,
            Err(DeviceError::UnsupportedCapability { .. })
        ));
        assert!(connector.calls().is_empty());
    }

    #[tokio::test]
    async fn set_brightness_sends_raw_value() {
        let connector = Arc::new(MockConnector::default());
        let light = device(&connector, &kitchen());

        light.set_brightness(Brightness::new(200)).await.unwrap();

        let calls = connector.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].domain, "light");
        assert_eq!(calls[0].service, "turn_on");
        assert_eq!(calls[0].extra, extra(json!({ "brightness": 200 })));
        assert_eq!(light.state().brightness(), Some(Brightness::new(200)));
    }

    #[tokio::test]
    async fn get_brightness_refreshes_state() {
        let connector = Arc::new(MockConnector::with_entities(vec![
            kitchen().with_attribute("brightness", 42),
        ]));
        let light = device(&connector, &kitchen());

        assert_eq!(light.get_brightness().await, Ok(Some(Brightness::new(42))));
    }

    #[tokio::test]
    async fn get_brightness_falls_back_to_cache() {
        let connector = Arc::new(MockConnector::default().failing_reads());
        let light = device(&connector, &kitchen());

        assert_eq!(light.get_brightness().await, Ok(Some(Brightness::new(100))));
    }

    #[tokio::test]
    async fn increase_and_decrease_clamp() {
        let connector = Arc::new(MockConnector::with_entities(vec![
            kitchen().with_attribute("brightness", 250),
        ]));
        let light = device(&connector, &kitchen());

        assert_eq!(light.increase_brightness(10).await, Ok(Brightness::MAX));

        connector.set_entities(vec![kitchen().with_attribute("brightness", 4)]);
        assert_eq!(light.decrease_brightness(10).await, Ok(Brightness::MIN));

        let sent: Vec<_> = connector
            .calls()
            .into_iter()
            .map(|c| c.extra.and_then(|e| e.get("brightness").cloned()))
            .collect();
        assert_eq!(sent, vec![Some(json!(255)), Some(json!(0))]);
    }

    #[tokio::test]
    async fn increase_from_off_starts_at_zero() {
        let off = RawEntity::new("light.kitchen").with_state("off");
        let connector = Arc::new(MockConnector::with_entities(vec![off.clone()]));
        let light = device(&connector, &off);

        assert_eq!(light.increase_brightness(30).await, Ok(Brightness::new(30)));
    }

    #[tokio::test]
    async fn spoken_color_prefers_name_then_rgb() {
        let named = kitchen().with_attribute("color_name", "teal");
        let connector = Arc::new(MockConnector::with_entities(vec![named.clone()]));
        let light = device(&connector, &named);
        assert_eq!(light.get_spoken_color().await, Ok(Some("teal".to_string())));

        connector.set_entities(vec![kitchen().with_attribute("rgb_color", json!([250, 0, 0]))]);
        assert_eq!(light.get_spoken_color().await, Ok(Some("red".to_string())));

        connector.set_entities(vec![kitchen()]);
        assert_eq!(light.get_spoken_color().await, Ok(None));
    }

    #[tokio::test]
    async fn set_color_picks_field() {
        let connector = Arc::new(MockConnector::default());
        let light = device(&connector, &kitchen());

        light.set_color(&LightColor::parse("blue")).await.unwrap();
        light.set_color(&LightColor::parse("#FF8000")).await.unwrap();

        let calls = connector.calls();
        assert_eq!(calls[0].extra, extra(json!({ "color_name": "blue" })));
        assert_eq!(calls[1].extra, extra(json!({ "rgb_color": [255, 128, 0] })));
    }

    #[tokio::test]
    async fn call_function_passes_arguments() {
        let connector = Arc::new(MockConnector::default());
        let thermostat = device(&connector, &RawEntity::new("climate.hall"));
        let args = extra(json!({ "temperature": 21.5 }));

        thermostat
            .call_function("set_temperature", args.as_ref())
            .await
            .unwrap();

        let calls = connector.calls();
        assert_eq!(calls[0].domain, "climate");
        assert_eq!(calls[0].service, "set_temperature");
        assert_eq!(calls[0].extra, args);
    }

    #[tokio::test]
    async fn set_state_updates_cache() {
        let connector = Arc::new(MockConnector::default());
        let sensor = device(&connector, &RawEntity::new("sensor.mode"));

        let state = sensor.set_state("away", None).await.unwrap();
        assert_eq!(state.state(), Some("away"));
        assert_eq!(sensor.state().state(), Some("away"));
    }

    #[tokio::test]
    async fn refresh_reports_unavailable() {
        let connector = Arc::new(MockConnector::default());
        let sensor = device(&connector, &RawEntity::new("sensor.gone"));
        assert_eq!(
            sensor.refresh().await,
            Err(DeviceError::StateUnavailable("sensor.gone".to_string()))
        );
    }
}
