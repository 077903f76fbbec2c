// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state tracking.
//!
//! Each [`Device`](crate::Device) keeps a [`DeviceState`] cache of its entity,
//! seeded from the registry snapshot and refreshed by reads and writes.

mod device_state;

pub use device_state::DeviceState;
