// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Brightness types and the percentage conversion.
//!
//! Home Assistant lights take brightness on a 0-255 scale, while spoken
//! requests use percentages. Both directions round to the nearest integer,
//! so the round trip is lossy for some inputs. It is exact for 0, 50 and 100.

use std::fmt;

use crate::error::ValueError;

/// Brightness on the service scale (0-255).
///
/// # Examples
///
/// ```
/// use hass_voice::types::{Brightness, Percentage};
///
/// let full = Brightness::from_percentage(Percentage::MAX);
/// assert_eq!(full.value(), 255);
/// assert_eq!(full.percentage().value(), 100);
///
/// assert_eq!(Brightness::new(128).percentage().value(), 50);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Brightness(u8);

impl Brightness {
    /// Lowest brightness.
    pub const MIN: Self = Self(0);

    /// Highest brightness.
    pub const MAX: Self = Self(255);

    /// Creates a brightness from a raw service value.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Returns the raw service value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Converts a percentage to the service scale: `round(p / 100 * 255)`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_percentage(percentage: Percentage) -> Self {
        // Safe: percentage is at most 100, so the result is at most 255
        Self((f64::from(percentage.value()) / 100.0 * 255.0).round() as u8)
    }

    /// Converts to a percentage: `round(raw / 255 * 100)`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn percentage(&self) -> Percentage {
        // Safe: raw is at most 255, so the result is at most 100
        Percentage((f64::from(self.0) / 255.0 * 100.0).round() as u8)
    }

    /// Adds a step, saturating at 255.
    #[must_use]
    pub const fn step_up(self, step: u8) -> Self {
        Self(self.0.saturating_add(step))
    }

    /// Subtracts a step, saturating at 0.
    #[must_use]
    pub const fn step_down(self, step: u8) -> Self {
        Self(self.0.saturating_sub(step))
    }
}

impl From<u8> for Brightness {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl fmt::Display for Brightness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Brightness as a percentage (0-100).
///
/// # Examples
///
/// ```
/// use hass_voice::types::Percentage;
///
/// assert_eq!(Percentage::new(75).unwrap().value(), 75);
/// assert!(Percentage::new(101).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Percentage(u8);

impl Percentage {
    /// 0%.
    pub const MIN: Self = Self(0);

    /// 100%.
    pub const MAX: Self = Self(100);

    /// Creates a percentage.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value exceeds 100.
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if value > 100 {
            return Err(ValueError::OutOfRange {
                min: 0,
                max: 100,
                actual: u16::from(value),
            });
        }
        Ok(Self(value))
    }

    /// Creates a percentage, clamping values above 100.
    #[must_use]
    pub const fn clamped(value: u8) -> Self {
        if value > 100 { Self(100) } else { Self(value) }
    }

    /// Returns the percentage value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Percentage {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}
