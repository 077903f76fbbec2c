// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `hass_voice` library.
//!
//! Remote failures are absorbed at the connector boundary and never reach
//! the dispatcher as errors. The types here cover what remains: value
//! validation, device capability checks, failed service calls, and the
//! explicit connection check performed before a configuration is adopted.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred during protocol communication.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while parsing a response.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Error occurred during device operations.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),

    /// No Home Assistant instance is configured.
    #[error("no Home Assistant instance configured")]
    NotConfigured,
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: u16,
        /// Maximum allowed value.
        max: u16,
        /// The actual value that was provided.
        actual: u16,
    },

    /// A color specification could not be understood.
    #[error("invalid color: {0}")]
    InvalidColor(String),
}

/// Errors related to HTTP communication with Home Assistant.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed.
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The access token was rejected.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The access token cannot be sent as a header value.
    #[error("access token contains invalid characters")]
    InvalidToken,

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// Errors related to parsing Home Assistant responses.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Unexpected response format.
    #[error("unexpected response format: {0}")]
    UnexpectedFormat(String),
}

/// Errors related to device operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// Device does not support the requested capability.
    #[error("{category} device does not support {capability}")]
    UnsupportedCapability {
        /// The capability that is not supported.
        capability: String,
        /// The category of the device the call was made on.
        category: String,
    },

    /// The remote service call returned nothing usable.
    #[error("service {domain}.{service} failed for {entity_id}")]
    ServiceFailed {
        /// Service domain.
        domain: String,
        /// Service name.
        service: String,
        /// Target entity.
        entity_id: String,
    },

    /// The entity state could not be read or written.
    #[error("state unavailable for {0}")]
    StateUnavailable(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
