// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `hass_voice` - A voice front end for Home Assistant.
//!
//! This library maps spoken device names to Home Assistant entities and runs
//! commands against them over the REST API.
//!
//! # Components
//!
//! - **Connector**: the only component doing I/O. Failures are logged and
//!   turned into empty results.
//! - **Classifier**: maps an entity id to a [`DeviceCategory`](types::DeviceCategory)
//!   and filters out group entities.
//! - **Device**: a typed wrapper with capability-gated operations.
//! - **Registry**: the ordered list of supported devices and their names.
//! - **Resolver**: fuzzy matching of a spoken name to a device id.
//! - **Dispatcher**: the entry point taking intent requests and returning
//!   normalized responses.
//!
//! # Supported Operations
//!
//! - **Power**: turn on, turn off
//! - **Lights**: brightness get/set/step, color get/set
//! - **Generic**: any service of the device's domain
//! - **Assist**: free text passed to the conversation endpoint
//!
//! # Quick Start
//!
//! ```no_run
//! use hass_voice::{ClientConfig, DeviceRequest, Dispatcher, RestConnector};
//!
//! #[tokio::main]
//! async fn main() -> hass_voice::Result<()> {
//!     let config = ClientConfig::new("http://homeassistant.local:8123", "long-lived-token")
//!         .with_brightness_increment(25);
//!
//!     let dispatcher: Dispatcher<RestConnector> = Dispatcher::new();
//!     let devices = dispatcher.reconfigure(&config).await?;
//!     println!("{devices} devices registered");
//!
//!     let kitchen = DeviceRequest::named("kitchen light");
//!     dispatcher.turn_on(&kitchen).await;
//!     let response = dispatcher.set_brightness(&kitchen, 60).await;
//!     assert!(!response.is_failure());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Validating a Configuration First
//!
//! ```no_run
//! use hass_voice::{ClientConfig, Dispatcher, RestConnector};
//!
//! # async fn example() {
//! let dispatcher: Dispatcher<RestConnector> = Dispatcher::new();
//! let config = ClientConfig::new("https://ha.example.org", "token").with_verify_ssl(false);
//! if !dispatcher.setup(&config).await {
//!     eprintln!("Home Assistant is not reachable with these settings");
//! }
//! # }
//! ```
//!
//! # Logging
//!
//! The library logs through `tracing` and never installs a subscriber.

mod capabilities;
pub mod config;
mod device;
pub mod dispatch;
pub mod error;
pub mod protocol;
pub mod registry;
pub mod state;
pub mod types;

pub use capabilities::Capabilities;
pub use config::{ClientConfig, DispatchSettings};
pub use device::{Device, DisplayModel};
pub use dispatch::{DeviceRequest, DispatchResponse, Dispatcher, FailureReason, ResponseBody};
pub use error::{DeviceError, Error, ParseError, ProtocolError, Result, ValueError};
#[cfg(feature = "http")]
pub use protocol::RestConnector;
pub use protocol::{AttributeMatch, Connector};
pub use registry::{DeviceRegistry, NameMatch, Resolver};
