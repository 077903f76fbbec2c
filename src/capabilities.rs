// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device capabilities derived from the entity category.
//!
//! Every device accepts generic service calls. On top of that a category
//! grants some of three capability groups:
//!
//! | Category | Switchable | Dimmable | Colorable |
//! |----------|------------|----------|-----------|
//! | light | yes | yes | yes |
//! | switch, media_player, vacuum, scene, climate | yes | | |
//! | automation | when toggling is enabled | | |
//! | sensor, binary_sensor, camera | | | |

use serde::Serialize;

use crate::types::DeviceCategory;

/// Capability flags of a registered device.
///
/// # Examples
///
/// ```
/// use hass_voice::Capabilities;
/// use hass_voice::types::DeviceCategory;
///
/// let light = Capabilities::for_category(DeviceCategory::Light, false);
/// assert!(light.supports_brightness_control());
///
/// let automation = Capabilities::for_category(DeviceCategory::Automation, false);
/// assert!(!automation.supports_power_control());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Capabilities {
    /// Supports `turn_on` / `turn_off`.
    pub switchable: bool,

    /// Supports brightness read and write.
    pub dimmable: bool,

    /// Supports color read and write.
    pub colorable: bool,
}

impl Capabilities {
    /// Read-only device: generic calls only.
    #[must_use]
    pub const fn read_only() -> Self {
        Self {
            switchable: false,
            dimmable: false,
            colorable: false,
        }
    }

    /// On/off device.
    #[must_use]
    pub const fn switch() -> Self {
        Self {
            switchable: true,
            dimmable: false,
            colorable: false,
        }
    }

    /// Dimmable, colorable light.
    #[must_use]
    pub const fn light() -> Self {
        Self {
            switchable: true,
            dimmable: true,
            colorable: true,
        }
    }

    /// Returns the capabilities granted to a category.
    ///
    /// # Arguments
    ///
    /// * `category` - The device category
    /// * `toggle_automations` - Whether automations may be turned on and off
    #[must_use]
    pub const fn for_category(category: DeviceCategory, toggle_automations: bool) -> Self {
        match category {
            DeviceCategory::Light => Self::light(),
            DeviceCategory::Switch
            | DeviceCategory::MediaPlayer
            | DeviceCategory::Vacuum
            | DeviceCategory::Scene
            | DeviceCategory::Climate => Self::switch(),
            DeviceCategory::Automation if toggle_automations => Self::switch(),
            DeviceCategory::Automation
            | DeviceCategory::Sensor
            | DeviceCategory::BinarySensor
            | DeviceCategory::Camera => Self::read_only(),
        }
    }

    /// Returns whether the device can be turned on and off.
    #[must_use]
    pub const fn supports_power_control(&self) -> bool {
        self.switchable
    }

    /// Returns whether the device brightness can be read and set.
    #[must_use]
    pub const fn supports_brightness_control(&self) -> bool {
        self.dimmable
    }

    /// Returns whether the device color can be read and set.
    #[must_use]
    pub const fn supports_color_control(&self) -> bool {
        self.colorable
    }
}
