// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device registry and spoken-name resolution.
//!
//! The [`DeviceRegistry`] turns a snapshot of raw entities into typed
//! [`Device`]s. Devices and their display names are kept in two
//! index-aligned sequences so the [`Resolver`] can map a spoken name back to
//! a device id.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use hass_voice::{DeviceRegistry, Resolver};
//! use hass_voice::protocol::RestConnector;
//! use hass_voice::types::RawEntity;
//!
//! let connector = Arc::new(RestConnector::new("http://ha:8123", "token").unwrap());
//! let registry = DeviceRegistry::from_entities(
//!     connector,
//!     &[
//!         RawEntity::new("light.kitchen").with_attribute("friendly_name", "Kitchen Light"),
//!         RawEntity::new("light.all").with_attribute("icon", "mdi:lightbulb-group"),
//!         RawEntity::new("person.alice"),
//!     ],
//!     false,
//! );
//!
//! assert_eq!(registry.len(), 1);
//! assert_eq!(
//!     Resolver::default().resolve(&registry, "kitchen light").as_deref(),
//!     Some("light.kitchen"),
//! );
//! ```

mod resolver;

pub use resolver::{NameMatch, Resolver};

use std::sync::Arc;

use crate::capabilities::Capabilities;
use crate::device::{Device, DisplayModel};
use crate::protocol::Connector;
use crate::types::{RawEntity, is_group};

/// Ordered collection of supported devices.
#[derive(Debug)]
pub struct DeviceRegistry<C> {
    connector: Arc<C>,
    toggle_automations: bool,
    devices: Vec<Device<C>>,
    names: Vec<String>,
}

impl<C> Clone for DeviceRegistry<C> {
    fn clone(&self) -> Self {
        Self {
            connector: Arc::clone(&self.connector),
            toggle_automations: self.toggle_automations,
            devices: self.devices.clone(),
            names: self.names.clone(),
        }
    }
}

impl<C: Connector> DeviceRegistry<C> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new(connector: Arc<C>, toggle_automations: bool) -> Self {
        Self {
            connector,
            toggle_automations,
            devices: Vec::new(),
            names: Vec::new(),
        }
    }

    /// Builds a registry from an entity snapshot.
    ///
    /// `toggle_automations` decides whether automations are switchable.
    #[must_use]
    pub fn from_entities(
        connector: Arc<C>,
        entities: &[RawEntity],
        toggle_automations: bool,
    ) -> Self {
        let mut registry = Self::new(connector, toggle_automations);
        registry.rebuild(entities);
        registry
    }

    /// Replaces every device with the ones built from `entities`.
    ///
    /// Entities are taken in input order. Unsupported domains and group
    /// entities are skipped.
    pub fn rebuild(&mut self, entities: &[RawEntity]) {
        let mut devices = Vec::with_capacity(entities.len());
        let mut names = Vec::with_capacity(entities.len());

        for entity in entities {
            let Some(category) = entity.category() else {
                tracing::warn!(entity_id = %entity.entity_id, "Unsupported device type, skipping");
                continue;
            };
            if is_group(&entity.attributes) {
                tracing::warn!(entity_id = %entity.entity_id, "Group entity, skipping");
                continue;
            }

            let capabilities = Capabilities::for_category(category, self.toggle_automations);
            let device = Device::new(Arc::clone(&self.connector), entity, category, capabilities);
            tracing::debug!(entity_id = %entity.entity_id, name = device.name(), %category, "Added device");

            names.push(device.name().to_string());
            devices.push(device);
        }

        self.devices = devices;
        self.names = names;
    }

    /// Finds a device by entity id.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<&Device<C>> {
        self.devices.iter().find(|device| device.id() == id)
    }

    /// Returns the display projection of every device, in registry order.
    #[must_use]
    pub fn list_display_models(&self) -> Vec<DisplayModel> {
        self.devices.iter().map(Device::display_model).collect()
    }

    /// Returns the display names, index-aligned with [`devices`](Self::devices).
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Returns the devices in registry order.
    #[must_use]
    pub fn devices(&self) -> &[Device<C>] {
        &self.devices
    }

    /// Returns the number of devices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Returns `true` if the registry holds no device.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Returns the connector the devices use.
    #[must_use]
    pub fn connector(&self) -> &Arc<C> {
        &self.connector
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::mock::MockConnector;
    use crate::types::DeviceCategory;

    fn registry(entities: &[RawEntity], toggle_automations: bool) -> DeviceRegistry<MockConnector> {
        DeviceRegistry::from_entities(
            Arc::new(MockConnector::default()),
            entities,
            toggle_automations,
        )
    }

    fn snapshot() -> Vec<RawEntity> {
        vec![
            RawEntity::new("light.kitchen").with_attribute("friendly_name", "Kitchen Light"),
            RawEntity::new("light.downstairs")
                .with_attribute("friendly_name", "Downstairs")
                .with_attribute("icon", "mdi:lightbulb-group"),
            RawEntity::new("person.alice").with_attribute("friendly_name", "Alice"),
            RawEntity::new("sensor.outdoor_temp"),
            RawEntity::new("automation.morning").with_attribute("friendly_name", "Morning"),
        ]
    }

    #[test]
    fn skips_groups_and_unsupported() {
        let registry = registry(&snapshot(), false);

        let ids: Vec<_> = registry.devices().iter().map(Device::id).collect();
        assert_eq!(ids, ["light.kitchen", "sensor.outdoor_temp", "automation.morning"]);
        assert_eq!(registry.names(), ["Kitchen Light", "sensor.outdoor_temp", "Morning"]);
    }

    #[test]
    fn single_kitchen_light() {
        let registry = registry(
            &[
                RawEntity::new("light.kitchen").with_attribute("friendly_name", "Kitchen Light"),
                RawEntity::new("light.all_lights").with_attribute("icon", "mdi:lightbulb-group"),
            ],
            false,
        );

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.names(), ["Kitchen Light"]);
    }

    #[test]
    fn rebuild_is_idempotent() {
        let entities = snapshot();
        let mut registry = registry(&entities, false);
        let first = registry.list_display_models();

        registry.rebuild(&entities);

        assert_eq!(registry.list_display_models(), first);
        assert_eq!(registry.names().len(), registry.len());
    }

    #[test]
    fn rebuild_replaces_everything() {
        let mut registry = registry(&snapshot(), false);
        registry.rebuild(&[RawEntity::new("switch.fan")]);

        assert_eq!(registry.len(), 1);
        assert!(registry.find_by_id("light.kitchen").is_none());
        assert!(registry.find_by_id("switch.fan").is_some());
    }

    #[test]
    fn empty_snapshot() {
        let registry = registry(&[], false);
        assert!(registry.is_empty());
        assert!(registry.list_display_models().is_empty());
    }

    #[test]
    fn automation_toggle_sets_capabilities() {
        let locked = registry(&snapshot(), false);
        let toggled = registry(&snapshot(), true);

        let switchable = |r: &DeviceRegistry<MockConnector>| {
            r.find_by_id("automation.morning")
                .map(|d| d.capabilities().supports_power_control())
        };
        assert_eq!(switchable(&locked), Some(false));
        assert_eq!(switchable(&toggled), Some(true));
    }

    #[test]
    fn display_models_in_order() {
        let models = registry(&snapshot(), false).list_display_models();
        let categories: Vec<_> = models.iter().map(|m| m.category).collect();
        assert_eq!(
            categories,
            [DeviceCategory::Light, DeviceCategory::Sensor, DeviceCategory::Automation]
        );
    }
}
