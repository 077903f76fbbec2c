// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device categories and entity classification.
//!
//! Only the domain prefix of an entity identifier decides its category.
//! Both [`DeviceCategory::classify`] and [`is_group`] are pure, so the
//! registry rules can be tested without a server.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::entity::{Attributes, entity_domain};

/// Supported entity categories.
///
/// # Examples
///
/// ```
/// use hass_voice::types::DeviceCategory;
///
/// assert_eq!(DeviceCategory::classify("light.kitchen"), Some(DeviceCategory::Light));
/// assert_eq!(DeviceCategory::classify("person.alice"), None);
/// assert_eq!(DeviceCategory::Light.icon(), "mdi:light");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceCategory {
    /// Read-only sensor.
    Sensor,
    /// Read-only on/off sensor.
    BinarySensor,
    /// Light, possibly dimmable and colorable.
    Light,
    /// Media player.
    MediaPlayer,
    /// Robot vacuum.
    Vacuum,
    /// Switch or smart plug.
    Switch,
    /// Thermostat or HVAC unit.
    Climate,
    /// Camera.
    Camera,
    /// Scene.
    Scene,
    /// Automation.
    Automation,
}

impl DeviceCategory {
    /// Every supported category.
    pub const ALL: [Self; 10] = [
        Self::Sensor,
        Self::BinarySensor,
        Self::Light,
        Self::MediaPlayer,
        Self::Vacuum,
        Self::Switch,
        Self::Climate,
        Self::Camera,
        Self::Scene,
        Self::Automation,
    ];

    /// Classifies an entity identifier by its domain prefix.
    ///
    /// Returns `None` for domains outside the supported set.
    #[must_use]
    pub fn classify(entity_id: &str) -> Option<Self> {
        Self::from_domain(entity_domain(entity_id))
    }

    /// Maps a bare domain string to a category.
    #[must_use]
    pub fn from_domain(domain: &str) -> Option<Self> {
        match domain {
            "sensor" => Some(Self::Sensor),
            "binary_sensor" => Some(Self::BinarySensor),
            "light" => Some(Self::Light),
            "media_player" => Some(Self::MediaPlayer),
            "vacuum" => Some(Self::Vacuum),
            "switch" => Some(Self::Switch),
            "climate" => Some(Self::Climate),
            "camera" => Some(Self::Camera),
            "scene" => Some(Self::Scene),
            "automation" => Some(Self::Automation),
            _ => None,
        }
    }

    /// Returns the Home Assistant domain of this category.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sensor => "sensor",
            Self::BinarySensor => "binary_sensor",
            Self::Light => "light",
            Self::MediaPlayer => "media_player",
            Self::Vacuum => "vacuum",
            Self::Switch => "switch",
            Self::Climate => "climate",
            Self::Camera => "camera",
            Self::Scene => "scene",
            Self::Automation => "automation",
        }
    }

    /// Returns the icon token, `"mdi:<domain>"`.
    #[must_use]
    pub fn icon(&self) -> String {
        format!("mdi:{}", self.as_str())
    }
}

impl fmt::Display for DeviceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_domain(s).ok_or_else(|| format!("unsupported device category: {s}"))
    }
}

/// Returns whether the attributes describe a group entity.
///
/// Home Assistant marks groups with an icon containing `-group`
/// (e.g. `mdi:lightbulb-group`).
///
/// # Examples
///
/// ```
/// use hass_voice::types::is_group;
///
/// let mut attrs = serde_json::Map::new();
/// assert!(!is_group(&attrs));
/// attrs.insert("icon".into(), "mdi:lightbulb-group".into());
/// assert!(is_group(&attrs));
/// ```
#[must_use]
pub fn is_group(attributes: &Attributes) -> bool {
    attributes
        .get("icon")
        .and_then(Value::as_str)
        .is_some_and(|icon| icon.contains("-group"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(value: Value) -> Attributes {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn classify_every_supported_domain() {
        for category in DeviceCategory::ALL {
            let id = format!("{}.thing", category.as_str());
            assert_eq!(DeviceCategory::classify(&id), Some(category));
        }
    }

    #[test]
    fn classify_rejects_unknown_domains() {
        for id in ["person.alice", "sun.sun", "zone.home", "lights.kitchen", "", "."] {
            assert_eq!(DeviceCategory::classify(id), None, "{id}");
        }
    }

    #[test]
    fn classify_uses_exact_domain_not_prefix() {
        assert_eq!(DeviceCategory::classify("lightning.strike"), None);
        assert_eq!(
            DeviceCategory::classify("binary_sensor.door"),
            Some(DeviceCategory::BinarySensor)
        );
    }

    #[test]
    fn classify_bare_domain() {
        assert_eq!(DeviceCategory::classify("light"), Some(DeviceCategory::Light));
    }

    #[test]
    fn icon_token() {
        assert_eq!(DeviceCategory::MediaPlayer.icon(), "mdi:media_player");
    }

    #[test]
    fn from_str_roundtrip() {
        assert_eq!("climate".parse(), Ok(DeviceCategory::Climate));
        assert!("garage".parse::<DeviceCategory>().is_err());
    }

    #[test]
    fn serde_uses_domain_names() {
        let json = serde_json::to_value(DeviceCategory::BinarySensor).unwrap();
        assert_eq!(json, json!("binary_sensor"));
    }

    #[test]
    fn group_detection() {
        assert!(is_group(&attrs(json!({ "icon": "mdi:lightbulb-group" }))));
        assert!(is_group(&attrs(json!({ "icon": "-group" }))));
        assert!(!is_group(&attrs(json!({ "icon": "mdi:lightbulb" }))));
        assert!(!is_group(&attrs(json!({ "friendly_name": "Kitchen-group" }))));
        assert!(!is_group(&attrs(json!({ "icon": null }))));
        assert!(!is_group(&Attributes::new()));
    }
}
