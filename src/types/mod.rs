// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types shared across the library.
//!
//! # Types
//!
//! - [`RawEntity`] - One record from the Home Assistant states endpoint
//! - [`DeviceCategory`] - Supported entity domains
//! - [`Brightness`] / [`Percentage`] - Service-scale and spoken brightness
//! - [`RgbColor`] / [`LightColor`] - Light colors

mod brightness;
mod category;
mod color;
mod entity;

pub use brightness::{Brightness, Percentage};
pub use category::{DeviceCategory, is_group};
pub use color::{LightColor, RgbColor};
pub use entity::{Attributes, RawEntity, entity_domain};
