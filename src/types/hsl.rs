//! Hue, saturation and lightness color representation.

use serde::{Deserialize, Serialize};

use super::Rgb;
use crate::convert;

/// Normalized HSL color.
///
/// Unlike the device [`crate::Hue`], every component here is a real number:
/// - Hue: the color angle as a fraction of a full turn, in `[0, 1)`
/// - Saturation: `[0, 1]`
/// - Lightness: `[0, 1]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub(crate) hue: f64,
    pub(crate) saturation: f64,
    pub(crate) lightness: f64,
}

impl Hsl {
    /// Saturation used for every rendered swatch.
    pub const SWATCH_SATURATION: f64 = 1.0;
    /// Lightness used for every rendered swatch.
    pub const SWATCH_LIGHTNESS: f64 = 0.5;

    /// Create a new HSL color with the given components.
    ///
    /// Returns `None` if any component is outside its range.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::Hsl;
    ///
    /// assert!(Hsl::create(0.0, 1.0, 0.5).is_some());
    /// assert!(Hsl::create(0.999, 0.0, 1.0).is_some());
    /// assert!(Hsl::create(1.0, 1.0, 0.5).is_none()); // hue is a half-open range
    /// assert!(Hsl::create(0.5, 1.1, 0.5).is_none());
    /// ```
    pub fn create(hue: f64, saturation: f64, lightness: f64) -> Option<Self> {
        let unit = 0.0..=1.0;
        if (0.0..1.0).contains(&hue) && unit.contains(&saturation) && unit.contains(&lightness) {
            Some(Hsl {
                hue,
                saturation,
                lightness,
            })
        } else {
            None
        }
    }

    /// A fully saturated, mid-lightness color at the given hue fraction.
    pub fn swatch(hue: f64) -> Self {
        Hsl {
            hue,
            saturation: Self::SWATCH_SATURATION,
            lightness: Self::SWATCH_LIGHTNESS,
        }
    }

    pub fn hue(&self) -> f64 {
        self.hue
    }

    pub fn saturation(&self) -> f64 {
        self.saturation
    }

    pub fn lightness(&self) -> f64 {
        self.lightness
    }

    /// Convert to an RGB color.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::Hsl;
    ///
    /// let color = Hsl::swatch(0.0).to_rgb();
    /// assert_eq!(color.red(), 255);
    /// assert_eq!(color.green(), 0);
    /// assert_eq!(color.blue(), 0);
    /// ```
    pub fn to_rgb(&self) -> Rgb {
        convert::hsl_to_rgb(self.hue, self.saturation, self.lightness)
    }
}

impl From<&Hsl> for Rgb {
    fn from(hsl: &Hsl) -> Self {
        hsl.to_rgb()
    }
}

impl From<Rgb> for Hsl {
    fn from(rgb: Rgb) -> Self {
        rgb.to_hsl()
    }
}
