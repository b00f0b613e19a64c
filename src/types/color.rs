//! 8-bit RGB and hex color representations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::convert;
use crate::errors::Error;
use crate::types::Hsl;

/// An RGB color with red, green, and blue components (0-255 each).
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub(crate) red: u8,
    pub(crate) green: u8,
    pub(crate) blue: u8,
}

impl Rgb {
    /// Create a color with the given RGB values.
    pub fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Create a default color (black: 0,0,0).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn red(&self) -> u8 {
        self.red
    }

    pub fn green(&self) -> u8 {
        self.green
    }

    pub fn blue(&self) -> u8 {
        self.blue
    }

    /// Format as a 7-character lowercase hex color.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::Rgb;
    ///
    /// assert_eq!(Rgb::rgb(255, 128, 0).to_hex().as_str(), "#ff8000");
    /// ```
    pub fn to_hex(&self) -> HexColor {
        convert::rgb_to_hex(*self)
    }

    pub fn to_hsl(&self) -> Hsl {
        convert::rgb_to_hsl(*self)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((red, green, blue): (u8, u8, u8)) -> Self {
        Self::rgb(red, green, blue)
    }
}

/// A validated hex color, always stored as `#rrggbb` in lowercase.
///
/// Parsing accepts `#rgb` and `#rrggbb` in any letter case and rejects
/// everything else. Lenient conversions that degrade to black live in
/// [`crate::convert`].
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use hue_bridge_rs::HexColor;
///
/// let short = HexColor::from_str("#F0a").unwrap();
/// assert_eq!(short.as_str(), "#ff00aa");
/// assert!(HexColor::from_str("#ff00a").is_err());
/// assert!(HexColor::from_str("ff00aa").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct HexColor(String);

impl HexColor {
    pub(crate) fn from_rgb(rgb: Rgb) -> Self {
        HexColor(format!(
            "#{:02x}{:02x}{:02x}",
            rgb.red, rgb.green, rgb.blue
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_rgb(&self) -> Rgb {
        convert::hex_to_rgb(&self.0)
    }
}

impl FromStr for HexColor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        convert::try_hex_to_rgb(s).map(HexColor::from_rgb)
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        HexColor::from_str(&raw).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Rgb> for HexColor {
    fn from(rgb: Rgb) -> Self {
        HexColor::from_rgb(rgb)
    }
}

impl From<&HexColor> for Rgb {
    fn from(hex: &HexColor) -> Self {
        hex.to_rgb()
    }
}
