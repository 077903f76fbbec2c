// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cached entity state.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::types::{Attributes, Brightness, RawEntity, RgbColor};

/// Last known state of a registered device.
///
/// Filled from the registry snapshot and updated whenever the device reads
/// or writes its entity.
///
/// # Examples
///
/// ```
/// use hass_voice::state::DeviceState;
/// use hass_voice::types::RawEntity;
///
/// let entity = RawEntity::new("light.kitchen")
///     .with_state("on")
///     .with_attribute("brightness", 128);
/// let state = DeviceState::from_entity(&entity);
///
/// assert!(state.is_on());
/// assert_eq!(state.brightness().map(|b| b.value()), Some(128));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceState {
    state: Option<String>,
    attributes: Attributes,
    area: Option<String>,
    last_changed: Option<DateTime<Utc>>,
}

impl DeviceState {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a state from an entity record.
    #[must_use]
    pub fn from_entity(entity: &RawEntity) -> Self {
        Self {
            state: entity.state.clone(),
            attributes: entity.attributes.clone(),
            area: entity.area_id.clone(),
            last_changed: entity.last_changed,
        }
    }

    /// Replaces state and attributes with a fresh record.
    ///
    /// The area is kept when the record has none, since single-entity
    /// reads do not always include it.
    pub fn apply(&mut self, entity: &RawEntity) {
        self.state.clone_from(&entity.state);
        self.attributes.clone_from(&entity.attributes);
        if entity.area_id.is_some() {
            self.area.clone_from(&entity.area_id);
        }
        if entity.last_changed.is_some() {
            self.last_changed = entity.last_changed;
        }
    }

    /// Returns the state string.
    #[must_use]
    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    /// Returns the attributes.
    #[must_use]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Returns one attribute.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Sets one attribute.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Returns the area identifier.
    #[must_use]
    pub fn area(&self) -> Option<&str> {
        self.area.as_deref()
    }

    /// Returns when the state last changed.
    #[must_use]
    pub fn last_changed(&self) -> Option<DateTime<Utc>> {
        self.last_changed
    }

    /// Returns `true` if the state is `"on"`.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.state.as_deref() == Some("on")
    }

    // ========== Light ==========

    /// Returns the `brightness` attribute (0-255).
    ///
    /// Values outside 0-255 are clamped; non-numeric values read as unknown.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn brightness(&self) -> Option<Brightness> {
        let value = self.attributes.get("brightness")?;
        let raw = value
            .as_u64()
            .or_else(|| value.as_f64().map(|f| f.round().max(0.0) as u64))?;
        Some(Brightness::new(u8::try_from(raw).unwrap_or(u8::MAX)))
    }

    /// Returns the `color_name` attribute.
    #[must_use]
    pub fn color_name(&self) -> Option<&str> {
        self.attributes.get("color_name").and_then(Value::as_str)
    }

    /// Returns the `rgb_color` attribute.
    #[must_use]
    pub fn rgb_color(&self) -> Option<RgbColor> {
        self.attributes.get("rgb_color").and_then(RgbColor::from_json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_state() {
        let state = DeviceState::new();
        assert!(state.state().is_none());
        assert!(!state.is_on());
        assert!(state.brightness().is_none());
    }

    #[test]
    fn brightness_parsing() {
        let mut state = DeviceState::new();
        state.set_attribute("brightness", 200);
        assert_eq!(state.brightness(), Some(Brightness::new(200)));

        state.set_attribute("brightness", 127.6);
        assert_eq!(state.brightness(), Some(Brightness::new(128)));

        state.set_attribute("brightness", 999);
        assert_eq!(state.brightness(), Some(Brightness::MAX));

        state.set_attribute("brightness", "bright");
        assert_eq!(state.brightness(), None);

        state.set_attribute("brightness", Value::Null);
        assert_eq!(state.brightness(), None);
    }

    #[test]
    fn apply_keeps_area_when_missing() {
        let mut state = DeviceState::from_entity(
            &RawEntity::new("light.kitchen")
                .with_state("off")
                .with_area("kitchen"),
        );

        state.apply(&RawEntity::new("light.kitchen").with_state("on"));

        assert!(state.is_on());
        assert_eq!(state.area(), Some("kitchen"));
    }

    #[test]
    fn apply_replaces_attributes() {
        let mut state = DeviceState::from_entity(
            &RawEntity::new("light.kitchen").with_attribute("brightness", 10),
        );
        state.apply(&RawEntity::new("light.kitchen").with_attribute("color_name", "red"));

        assert!(state.brightness().is_none());
        assert_eq!(state.color_name(), Some("red"));
    }

    #[test]
    fn rgb_color_attribute() {
        let state = DeviceState::from_entity(
            &RawEntity::new("light.kitchen")
                .with_attribute("rgb_color", serde_json::json!([0, 0, 255])),
        );
        assert_eq!(state.rgb_color(), Some(RgbColor::new(0, 0, 255)));
    }
}
