// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Normalized dispatch responses.
//!
//! Every response serializes to a flat JSON object with a `device` field.
//! Failures also carry `response` (a human-readable marker) and `reason` (a
//! stable code); callers detect failure by the presence of `response`.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::device::DisplayModel;
use crate::error::DeviceError;

/// Why a dispatch did not complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// No device matched the name or id.
    NotFound,
    /// The request named no device at all.
    MissingDevice,
    /// The remote operation failed.
    OperationFailed,
    /// The device lacks the required capability.
    Unsupported,
    /// A required payload value was missing.
    MissingArgument,
    /// A payload value was out of range.
    InvalidArgument,
}

impl FailureReason {
    /// Returns the marker placed in the `response` field.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NotFound => "Device not found",
            Self::MissingDevice => "Device id not provided",
            Self::OperationFailed => "Operation failed",
            Self::Unsupported => "Operation not supported by device",
            Self::MissingArgument => "Required argument not provided",
            Self::InvalidArgument => "Argument out of range",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl From<&DeviceError> for FailureReason {
    fn from(err: &DeviceError) -> Self {
        match err {
            DeviceError::UnsupportedCapability { .. } => Self::Unsupported,
            DeviceError::ServiceFailed { .. } | DeviceError::StateUnavailable(_) => {
                Self::OperationFailed
            }
        }
    }
}

/// Operation-specific part of a [`DispatchResponse`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    /// The operation failed.
    Failure {
        /// Human-readable marker.
        response: &'static str,
        /// Stable reason code.
        reason: FailureReason,
    },
    /// Brightness as a percentage.
    Brightness {
        /// Percentage 0-100.
        brightness: u8,
    },
    /// Spoken color name.
    Color {
        /// Color name or the color that was set.
        color: Option<String>,
    },
    /// Raw result of a generic service call.
    Result {
        /// Service response.
        result: Value,
    },
    /// Display projection of the device.
    Device(DisplayModel),
    /// The operation succeeded with nothing to report.
    Done {},
}

/// Normalized response envelope.
///
/// # Examples
///
/// ```
/// use hass_voice::{DispatchResponse, FailureReason};
///
/// let ok = DispatchResponse::done("kitchen light");
/// assert_eq!(serde_json::to_value(&ok).unwrap(), serde_json::json!({"device": "kitchen light"}));
///
/// let failed = DispatchResponse::failure("garage", FailureReason::NotFound);
/// let json = serde_json::to_value(&failed).unwrap();
/// assert_eq!(json["reason"], "not_found");
/// assert!(json.get("response").is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchResponse {
    /// The device name used in the request.
    pub device: String,
    /// Operation-specific fields.
    #[serde(flatten)]
    pub body: ResponseBody,
}

impl DispatchResponse {
    /// Creates a response with the given body.
    #[must_use]
    pub fn new(device: impl Into<String>, body: ResponseBody) -> Self {
        Self {
            device: device.into(),
            body,
        }
    }

    /// Creates an empty success response.
    #[must_use]
    pub fn done(device: impl Into<String>) -> Self {
        Self::new(device, ResponseBody::Done {})
    }

    /// Creates a failure response.
    #[must_use]
    pub fn failure(device: impl Into<String>, reason: FailureReason) -> Self {
        Self::new(
            device,
            ResponseBody::Failure {
                response: reason.message(),
                reason,
            },
        )
    }

    /// Returns `true` if the operation failed.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self.body, ResponseBody::Failure { .. })
    }

    /// Returns the failure reason, if any.
    #[must_use]
    pub fn reason(&self) -> Option<FailureReason> {
        match self.body {
            ResponseBody::Failure { reason, .. } => Some(reason),
            _ => None,
        }
    }
}
