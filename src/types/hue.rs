//! Device-native hue.

use serde::{Deserialize, Serialize};

use super::HexColor;
use crate::convert;

/// Bridge-native 16-bit hue, covering a full color turn over `0..=65535`.
///
/// This is not the same thing as the [`crate::Hsl`] hue component, which is a
/// fraction of a turn.
#[derive(
    Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(transparent)]
pub struct Hue {
    pub(crate) value: u16,
}

impl Hue {
    pub const MAX: u16 = u16::MAX;

    pub fn new(value: u16) -> Self {
        Hue { value }
    }

    pub fn value(&self) -> u16 {
        self.value
    }

    /// The hue as a fraction of a turn. `Hue::MAX` maps to exactly `1.0`.
    pub fn normalized(&self) -> f64 {
        f64::from(self.value) / f64::from(Self::MAX)
    }

    /// Scale a fraction of a turn to the device range, rounding to nearest.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::Hue;
    ///
    /// assert_eq!(Hue::from_normalized(0.0).value(), 0);
    /// assert_eq!(Hue::from_normalized(1.0).value(), 65535);
    /// assert_eq!(Hue::from_normalized(2.0).value(), 65535);
    /// ```
    pub fn from_normalized(fraction: f64) -> Self {
        let scaled = (fraction * f64::from(Self::MAX)).round();
        Hue {
            value: scaled.clamp(0.0, f64::from(Self::MAX)) as u16,
        }
    }

    /// Representative swatch for this hue.
    pub fn to_hex(&self) -> HexColor {
        convert::hue_to_hex(*self)
    }
}

impl From<u16> for Hue {
    fn from(value: u16) -> Self {
        Hue::new(value)
    }
}
