// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Read-only device projection used by listings.

use serde::Serialize;

use crate::types::{Attributes, DeviceCategory};

/// Stable, serializable view of a device.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayModel {
    /// Entity identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Device category.
    #[serde(rename = "type")]
    pub category: DeviceCategory,
    /// Icon token, `mdi:<category>`.
    pub icon: String,
    /// Cached state string.
    pub state: Option<String>,
    /// Cached attributes.
    pub attributes: Attributes,
    /// Area identifier.
    pub area: Option<String>,
}
