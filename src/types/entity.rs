// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Raw entity records as returned by the Home Assistant states endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::DeviceCategory;

/// JSON attribute mapping attached to an entity.
pub type Attributes = Map<String, Value>;

/// Returns the domain part of an entity identifier.
///
/// The domain is everything before the first `.`. An identifier without a
/// dot is its own domain.
///
/// # Examples
///
/// ```
/// use hass_voice::types::entity_domain;
///
/// assert_eq!(entity_domain("light.kitchen"), "light");
/// assert_eq!(entity_domain("sensor.outdoor.temp"), "sensor");
/// assert_eq!(entity_domain("nodot"), "nodot");
/// ```
#[must_use]
pub fn entity_domain(entity_id: &str) -> &str {
    entity_id
        .split_once('.')
        .map_or(entity_id, |(domain, _)| domain)
}

/// A single entity snapshot from `/api/states`.
///
/// Immutable once fetched; a registry rebuild replaces every record.
///
/// # Examples
///
/// ```
/// use hass_voice::types::RawEntity;
///
/// let entity: RawEntity = serde_json::from_value(serde_json::json!({
///     "entity_id": "light.kitchen",
///     "state": "on",
///     "attributes": { "friendly_name": "Kitchen Light", "brightness": 128 }
/// })).unwrap();
///
/// assert_eq!(entity.domain(), "light");
/// assert_eq!(entity.friendly_name(), Some("Kitchen Light"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEntity {
    /// Entity identifier, `<domain>.<object_id>`.
    pub entity_id: String,
    /// Current state string, if reported.
    #[serde(default)]
    pub state: Option<String>,
    /// Entity attributes.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub attributes: Attributes,
    /// Area the entity is assigned to.
    #[serde(default)]
    pub area_id: Option<String>,
    /// When the state last changed.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub last_changed: Option<DateTime<Utc>>,
    /// When the state or attributes were last updated.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl RawEntity {
    /// Creates an entity with no state and no attributes.
    #[must_use]
    pub fn new(entity_id: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            state: None,
            attributes: Attributes::new(),
            area_id: None,
            last_changed: None,
            last_updated: None,
        }
    }

    /// Sets the state.
    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Adds one attribute.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Sets the area.
    #[must_use]
    pub fn with_area(mut self, area_id: impl Into<String>) -> Self {
        self.area_id = Some(area_id.into());
        self
    }

    /// Returns the domain part of the entity identifier.
    #[must_use]
    pub fn domain(&self) -> &str {
        entity_domain(&self.entity_id)
    }

    /// Returns the supported category of this entity, if any.
    #[must_use]
    pub fn category(&self) -> Option<DeviceCategory> {
        DeviceCategory::classify(&self.entity_id)
    }

    /// Returns the `friendly_name` attribute when it is a string.
    #[must_use]
    pub fn friendly_name(&self) -> Option<&str> {
        self.attributes.get("friendly_name").and_then(Value::as_str)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Attributes, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Attributes>::deserialize(deserializer)?.unwrap_or_default())
}

// Timestamps are informational; a malformed one must not drop the entity.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| DateTime::parse_from_rfc3339(&s).ok().map(|dt| dt.with_timezone(&Utc))))
}
