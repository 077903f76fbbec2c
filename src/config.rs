// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Client configuration.
//!
//! [`ClientConfig`] is owned by the host application. It can be built in code
//! or deserialized from the host's JSON settings; missing fields take their
//! defaults. Handing a new value to
//! [`Dispatcher::reconfigure`](crate::Dispatcher::reconfigure) rebuilds the
//! device registry.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Connection and tuning settings for a Home Assistant instance.
///
/// # Examples
///
/// ```
/// use hass_voice::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::new("http://homeassistant.local:8123", "token")
///     .with_timeout(Duration::from_secs(5))
///     .with_confidence_threshold(0.6);
/// assert!(config.is_usable());
///
/// let parsed: ClientConfig = serde_json::from_str(
///     r#"{"host": "http://ha:8123", "api_key": "t", "brightness_increment": 25}"#,
/// ).unwrap();
/// assert_eq!(parsed.brightness_increment, 25);
/// assert_eq!(parsed.timeout_duration(), Duration::from_secs(3));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the instance, e.g. `http://homeassistant.local:8123`.
    pub host: String,
    /// Long-lived access token.
    pub api_key: String,
    /// Only consider entities exposed to Assist.
    pub assist_only: bool,
    /// Per-request timeout in seconds. Values below 1 are treated as 1.
    pub timeout: u64,
    /// Verify TLS certificates.
    pub verify_ssl: bool,
    /// Raw (0-255) step used by brightness increase/decrease.
    pub brightness_increment: u8,
    /// Minimum fuzzy-match score (exclusive) for a spoken name to resolve.
    pub search_confidence_threshold: f64,
    /// Allow automations to be turned on and off.
    pub toggle_automations: bool,
}

impl ClientConfig {
    /// Default request timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 3;
    /// Default brightness step.
    pub const DEFAULT_BRIGHTNESS_INCREMENT: u8 = 10;
    /// Default confidence threshold.
    pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.5;

    /// Creates a configuration for the given host and access token.
    #[must_use]
    pub fn new(host: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Sets the request timeout (whole seconds, minimum 1).
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout.as_secs().max(1);
        self
    }

    /// Sets whether only Assist-exposed entities are considered.
    #[must_use]
    pub fn with_assist_only(mut self, assist_only: bool) -> Self {
        self.assist_only = assist_only;
        self
    }

    /// Sets TLS certificate verification.
    #[must_use]
    pub fn with_verify_ssl(mut self, verify_ssl: bool) -> Self {
        self.verify_ssl = verify_ssl;
        self
    }

    /// Sets the brightness step.
    #[must_use]
    pub fn with_brightness_increment(mut self, step: u8) -> Self {
        self.brightness_increment = step;
        self
    }

    /// Sets the fuzzy-match confidence threshold.
    #[must_use]
    pub fn with_confidence_threshold(mut self, threshold: f64) -> Self {
        self.search_confidence_threshold = threshold;
        self
    }

    /// Sets whether automations may be toggled.
    #[must_use]
    pub fn with_toggle_automations(mut self, toggle: bool) -> Self {
        self.toggle_automations = toggle;
        self
    }

    /// Returns whether both host and access token are set.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        !self.host.trim().is_empty() && !self.api_key.trim().is_empty()
    }

    /// Returns the request timeout as a [`Duration`], at least one second.
    #[must_use]
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout.max(1))
    }

    /// Returns the dispatcher settings derived from this configuration.
    #[must_use]
    pub fn dispatch_settings(&self) -> DispatchSettings {
        DispatchSettings {
            confidence_threshold: self.search_confidence_threshold,
            brightness_increment: self.brightness_increment,
            toggle_automations: self.toggle_automations,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            api_key: String::new(),
            assist_only: true,
            timeout: Self::DEFAULT_TIMEOUT_SECS,
            verify_ssl: true,
            brightness_increment: Self::DEFAULT_BRIGHTNESS_INCREMENT,
            search_confidence_threshold: Self::DEFAULT_CONFIDENCE_THRESHOLD,
            toggle_automations: false,
        }
    }
}

/// Tuning knobs the dispatcher applies to every request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DispatchSettings {
    /// Minimum fuzzy-match score (exclusive).
    pub confidence_threshold: f64,
    /// Raw brightness step.
    pub brightness_increment: u8,
    /// Whether automations are switchable.
    pub toggle_automations: bool,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        ClientConfig::default().dispatch_settings()
    }
}
