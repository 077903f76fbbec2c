// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Light colors: RGB values, spoken color requests, and nearest-name lookup.
//!
//! Color names are passed to Home Assistant untouched; whether a name is
//! valid is for the server to decide.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::ValueError;

/// RGB color with 8-bit channels (0-255).
///
/// # Examples
///
/// ```
/// use hass_voice::types::RgbColor;
///
/// let red = RgbColor::from_hex("#FF0000").unwrap();
/// assert_eq!(red.red(), 255);
/// assert_eq!(red.to_hex_with_hash(), "#FF0000");
///
/// let teal: RgbColor = "0, 128, 128".parse().unwrap();
/// assert_eq!(teal.green(), 128);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RgbColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl RgbColor {
    /// Creates a new RGB color.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Parses an RGB color from a hex string.
    ///
    /// Accepts formats: `#RRGGBB`, `RRGGBB`.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidColor` if the hex string is invalid.
    pub fn from_hex(hex: &str) -> Result<Self, ValueError> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(ValueError::InvalidColor(hex.to_string()));
        }
        let pair = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| ValueError::InvalidColor(hex.to_string()))
        };
        Ok(Self::new(pair(0..2)?, pair(2..4)?, pair(4..6)?))
    }

    /// Parses an `r,g,b` triple.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidColor` unless there are exactly three
    /// comma-separated components in 0-255.
    pub fn from_triple(text: &str) -> Result<Self, ValueError> {
        let parts: Vec<&str> = text.split(',').map(str::trim).collect();
        let [r, g, b] = parts.as_slice() else {
            return Err(ValueError::InvalidColor(text.to_string()));
        };
        let channel =
            |s: &str| s.parse::<u8>().map_err(|_| ValueError::InvalidColor(text.to_string()));
        Ok(Self::new(channel(r)?, channel(g)?, channel(b)?))
    }

    /// Reads an `[r, g, b]` JSON array, as found in the `rgb_color` attribute.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        let array = value.as_array()?;
        let [r, g, b] = array.as_slice() else {
            return None;
        };
        let channel = |v: &Value| v.as_u64().and_then(|n| u8::try_from(n).ok());
        Some(Self::new(channel(r)?, channel(g)?, channel(b)?))
    }

    /// Returns the red component.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Returns the green component.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Returns the blue component.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }

    /// Returns the color as a hex string with the hash prefix.
    #[must_use]
    pub fn to_hex_with_hash(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }

    /// Returns the `[r, g, b]` JSON array Home Assistant expects.
    #[must_use]
    pub fn to_json(&self) -> Value {
        json!([self.red, self.green, self.blue])
    }

    /// Returns the name of the closest palette color.
    ///
    /// Distance is squared Euclidean in RGB space; the earlier palette entry
    /// wins a tie.
    ///
    /// # Examples
    ///
    /// ```
    /// use hass_voice::types::RgbColor;
    ///
    /// assert_eq!(RgbColor::new(250, 10, 5).nearest_name(), "red");
    /// assert_eq!(RgbColor::new(255, 255, 250).nearest_name(), "white");
    /// ```
    #[must_use]
    pub fn nearest_name(&self) -> &'static str {
        let mut best = PALETTE[0];
        let mut best_distance = u32::MAX;
        for entry in PALETTE {
            let distance = self.distance_squared(&entry.1);
            if distance < best_distance {
                best = entry;
                best_distance = distance;
            }
        }
        best.0
    }

    fn distance_squared(&self, other: &Self) -> u32 {
        let d = |a: u8, b: u8| {
            let diff = u32::from(a.abs_diff(b));
            diff * diff
        };
        d(self.red, other.red) + d(self.green, other.green) + d(self.blue, other.blue)
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex_with_hash())
    }
}

impl FromStr for RgbColor {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.contains(',') {
            Self::from_triple(s)
        } else {
            Self::from_hex(s)
        }
    }
}

impl From<(u8, u8, u8)> for RgbColor {
    fn from((red, green, blue): (u8, u8, u8)) -> Self {
        Self::new(red, green, blue)
    }
}

const PALETTE: [(&str, RgbColor); 12] = [
    ("red", RgbColor::new(255, 0, 0)),
    ("orange", RgbColor::new(255, 165, 0)),
    ("yellow", RgbColor::new(255, 255, 0)),
    ("green", RgbColor::new(0, 255, 0)),
    ("cyan", RgbColor::new(0, 255, 255)),
    ("blue", RgbColor::new(0, 0, 255)),
    ("purple", RgbColor::new(128, 0, 128)),
    ("magenta", RgbColor::new(255, 0, 255)),
    ("pink", RgbColor::new(255, 192, 203)),
    ("white", RgbColor::new(255, 255, 255)),
    ("warm white", RgbColor::new(255, 200, 130)),
    ("black", RgbColor::new(0, 0, 0)),
];

/// A color requested for a light.
///
/// Hex (`#rrggbb`) and `r,g,b` strings become [`LightColor::Rgb`]; anything
/// else is kept as an opaque [`LightColor::Named`] value.
///
/// # Examples
///
/// ```
/// use hass_voice::types::{LightColor, RgbColor};
///
/// assert_eq!(LightColor::parse("#00ff00"), LightColor::Rgb(RgbColor::new(0, 255, 0)));
/// assert_eq!(LightColor::parse(" Blue "), LightColor::Named("Blue".into()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LightColor {
    /// A color name, forwarded as `color_name`.
    Named(String),
    /// An RGB value, forwarded as `rgb_color`.
    Rgb(RgbColor),
}

impl LightColor {
    /// Interprets a spoken or typed color.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        let looks_rgb = trimmed.starts_with('#') || trimmed.contains(',');
        match trimmed.parse::<RgbColor>() {
            Ok(rgb) if looks_rgb => Self::Rgb(rgb),
            _ => Self::Named(trimmed.to_string()),
        }
    }

    /// Returns the service-call field and value for this color.
    #[must_use]
    pub fn service_field(&self) -> (&'static str, Value) {
        match self {
            Self::Named(name) => ("color_name", Value::String(name.clone())),
            Self::Rgb(rgb) => ("rgb_color", rgb.to_json()),
        }
    }
}

impl fmt::Display for LightColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::Rgb(rgb) => write!(f, "{rgb}"),
        }
    }
}

impl From<&str> for LightColor {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}
