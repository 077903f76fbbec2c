// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde::Deserialize;

/// Reference to the device an intent targets.
///
/// Voice intents carry a spoken `device` name; GUI callers usually pass the
/// exact `device_id`. When both are present the id wins for lookup and the
/// name is echoed in the response.
///
/// # Examples
///
/// ```
/// use hass_voice::DeviceRequest;
///
/// let request: DeviceRequest = serde_json::from_str(r#"{"device": "kitchen light"}"#).unwrap();
/// assert_eq!(request.spoken_name(), "kitchen light");
/// assert!(request.device_id().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DeviceRequest {
    /// Spoken device name.
    #[serde(default)]
    pub device: Option<String>,
    /// Exact entity id.
    #[serde(default)]
    pub device_id: Option<String>,
}

impl DeviceRequest {
    /// Creates a request for a spoken name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            device: Some(name.into()),
            device_id: None,
        }
    }

    /// Creates a request for an exact entity id.
    #[must_use]
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            device: None,
            device_id: Some(id.into()),
        }
    }

    /// Returns the spoken name, ignoring blank values.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        non_blank(self.device.as_deref())
    }

    /// Returns the entity id, ignoring blank values.
    #[must_use]
    pub fn device_id(&self) -> Option<&str> {
        non_blank(self.device_id.as_deref())
    }

    /// Returns the name to echo back: the spoken name, else the id.
    #[must_use]
    pub fn spoken_name(&self) -> &str {
        self.name().or_else(|| self.device_id()).unwrap_or_default()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
