//! Pure conversions between device hue, HSL, RGB and hex colors.
//!
//! Every function here is deterministic and side-effect free. Conversions are
//! lossy: a round trip through 8-bit RGB quantizes the hue, so callers should
//! only rely on approximate equality.
//!
//! Malformed hex input never fails in the lenient functions ([`hex_to_rgb`],
//! [`hex_to_hue`]); it degrades to black. Use [`try_hex_to_rgb`] or
//! [`try_hex_to_hue`] when the input must be validated.

use crate::errors::Error;
use crate::types::{HexColor, Hsl, Hue, Rgb};

type Result<T> = std::result::Result<T, Error>;

/// Render a device hue as a fully saturated, mid-lightness swatch.
///
/// # Examples
///
/// ```
/// use hue_bridge_rs::{Hue, convert};
///
/// assert_eq!(convert::hue_to_hex(Hue::new(0)).as_str(), "#ff0000");
/// assert_eq!(convert::hue_to_hex(Hue::new(32768)).as_str(), "#00ffff");
/// ```
pub fn hue_to_hex(hue: Hue) -> HexColor {
    let swatch = Hsl::swatch(hue.normalized());
    rgb_to_hex(hsl_to_rgb(swatch.hue, swatch.saturation, swatch.lightness))
}

/// Standard HSL to RGB conversion with `h` as a fraction of a turn.
///
/// A saturation of zero yields a gray of lightness `l` whatever the hue.
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> Rgb {
    if s == 0.0 {
        let gray = to_channel(l);
        return Rgb::rgb(gray, gray, gray);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    Rgb::rgb(
        to_channel(hue_to_channel(p, q, h + 1.0 / 3.0)),
        to_channel(hue_to_channel(p, q, h)),
        to_channel(hue_to_channel(p, q, h - 1.0 / 3.0)),
    )
}

/// Format as `#rrggbb`, two lowercase zero-padded digits per channel.
pub fn rgb_to_hex(rgb: Rgb) -> HexColor {
    HexColor::from_rgb(rgb)
}

/// Parse `#rgb` or `#rrggbb`, degrading to black on anything else.
///
/// # Examples
///
/// ```
/// use hue_bridge_rs::{Rgb, convert};
///
/// assert_eq!(convert::hex_to_rgb("#f00"), Rgb::rgb(255, 0, 0));
/// assert_eq!(convert::hex_to_rgb("#zzzzzz"), Rgb::rgb(0, 0, 0));
/// assert_eq!(convert::hex_to_rgb("red"), Rgb::rgb(0, 0, 0));
/// ```
pub fn hex_to_rgb(hex: &str) -> Rgb {
    parse_hex(hex).unwrap_or_default()
}

/// Parse `#rgb` or `#rrggbb`, rejecting anything else.
pub fn try_hex_to_rgb(hex: &str) -> Result<Rgb> {
    parse_hex(hex).ok_or_else(|| Error::InvalidHexColor(hex.to_string()))
}

/// Standard min/max-channel RGB to HSL conversion.
///
/// Grays (all channels equal) report a hue and saturation of zero.
pub fn rgb_to_hsl(rgb: Rgb) -> Hsl {
    let r = f64::from(rgb.red) / 255.0;
    let g = f64::from(rgb.green) / 255.0;
    let b = f64::from(rgb.blue) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let lightness = (max + min) / 2.0;

    if max == min {
        return Hsl {
            hue: 0.0,
            saturation: 0.0,
            lightness,
        };
    }

    let d = max - min;
    let saturation = if lightness > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    let sextant = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    Hsl {
        hue: sextant / 6.0,
        saturation,
        lightness,
    }
}

/// Derive the device hue of a hex color; malformed input maps to hue 0.
///
/// # Examples
///
/// ```
/// use hue_bridge_rs::convert;
///
/// assert_eq!(convert::hex_to_hue("#ff0000").value(), 0);
/// assert_eq!(convert::hex_to_hue("#00ffff").value(), 32768);
/// assert_eq!(convert::hex_to_hue("nope").value(), 0);
/// ```
pub fn hex_to_hue(hex: &str) -> Hue {
    Hue::from_normalized(rgb_to_hsl(hex_to_rgb(hex)).hue)
}

/// Derive the device hue of a hex color, rejecting malformed input.
pub fn try_hex_to_hue(hex: &str) -> Result<Hue> {
    try_hex_to_rgb(hex).map(|rgb| Hue::from_normalized(rgb_to_hsl(rgb).hue))
}

/// Piecewise channel helper of the HSL conversion; `t` is wrapped once.
fn hue_to_channel(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn to_channel(unit: f64) -> u8 {
    (unit * 255.0).round().clamp(0.0, 255.0) as u8
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    let nibble = |c: u8| -> Option<u8> {
        match c {
            b'0'..=b'9' => Some(c - b'0'),
            b'a'..=b'f' => Some(c - b'a' + 10),
            b'A'..=b'F' => Some(c - b'A' + 10),
            _ => None,
        }
    };

    let digits = hex.as_bytes().strip_prefix(b"#")?;
    match *digits {
        [r, g, b] => Some(Rgb::rgb(
            nibble(r)? * 17,
            nibble(g)? * 17,
            nibble(b)? * 17,
        )),
        [r1, r2, g1, g2, b1, b2] => Some(Rgb::rgb(
            (nibble(r1)? << 4) | nibble(r2)?,
            (nibble(g1)? << 4) | nibble(g2)?,
            (nibble(b1)? << 4) | nibble(b2)?,
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Worst-case hue drift of a round trip through 8-bit channels: half a
    // channel step within one sextant, plus the final rounding.
    const QUANTIZATION_TOLERANCE: i32 = 22;

    fn hue_drift(a: Hue, b: Hue) -> i32 {
        (i32::from(a.value()) - i32::from(b.value())).abs()
    }

    #[test]
    fn test_hue_to_hex_primaries() {
        assert_eq!(hue_to_hex(Hue::new(0)).as_str(), "#ff0000");
        assert_eq!(hue_to_hex(Hue::new(21845)).as_str(), "#00ff00");
        assert_eq!(hue_to_hex(Hue::new(43690)).as_str(), "#0000ff");
        assert_eq!(hue_to_hex(Hue::new(32768)).as_str(), "#00ffff");
    }

    #[test]
    fn test_hue_max_lands_on_red() {
        let top = hue_to_hex(Hue::new(Hue::MAX));
        assert_eq!(top.to_rgb().red(), 255);
        assert_eq!(top, hue_to_hex(Hue::new(0)));
    }

    #[test]
    fn test_hue_round_trip_at_sextant_boundaries() {
        for value in [0u16, 10923, 21845, 32768, 43690, 54613] {
            let hue = Hue::new(value);
            let back = hex_to_hue(hue_to_hex(hue).as_str());
            assert!(hue_drift(hue, back) <= 1, "{value} came back as {back:?}");
        }
    }

    #[test]
    fn test_hue_round_trip_within_quantization() {
        for value in (0..=u16::MAX).step_by(97) {
            let hue = Hue::new(value);
            let back = hex_to_hue(hue_to_hex(hue).as_str());
            // Hues just below the top wrap back to red.
            let drift = hue_drift(hue, back).min(65535 - hue_drift(hue, back));
            assert!(
                drift <= QUANTIZATION_TOLERANCE,
                "{value} came back as {back:?}"
            );
        }
    }

    #[test]
    fn test_hsl_to_rgb_gray_ignores_hue() {
        assert_eq!(hsl_to_rgb(0.0, 0.0, 0.5), Rgb::rgb(128, 128, 128));
        assert_eq!(hsl_to_rgb(0.7, 0.0, 0.5), Rgb::rgb(128, 128, 128));
        assert_eq!(hsl_to_rgb(0.3, 0.0, 1.0), Rgb::rgb(255, 255, 255));
    }

    #[test]
    fn test_hsl_to_rgb_light_and_dark() {
        assert_eq!(hsl_to_rgb(0.0, 1.0, 0.75), Rgb::rgb(255, 128, 128));
        assert_eq!(hsl_to_rgb(2.0 / 3.0, 1.0, 0.25), Rgb::rgb(0, 0, 128));
    }

    #[test]
    fn test_rgb_to_hsl_grays_are_achromatic() {
        for v in [0u8, 1, 77, 128, 200, 255] {
            let hsl = rgb_to_hsl(Rgb::rgb(v, v, v));
            assert_eq!(hsl.hue(), 0.0);
            assert_eq!(hsl.saturation(), 0.0);
        }
    }

    #[test]
    fn test_rgb_to_hsl_channel_branches() {
        let magenta_red = rgb_to_hsl(Rgb::rgb(255, 0, 128));
        assert!(magenta_red.hue() > 0.9 && magenta_red.hue() < 1.0);

        let green = rgb_to_hsl(Rgb::rgb(0, 255, 0));
        assert!((green.hue() - 1.0 / 3.0).abs() < 1e-9);

        let blue = rgb_to_hsl(Rgb::rgb(0, 0, 255));
        assert!((blue.hue() - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(blue.saturation(), 1.0);
        assert_eq!(blue.lightness(), 0.5);
    }

    #[test]
    fn test_rgb_to_hsl_saturation_above_half_lightness() {
        let pink = rgb_to_hsl(Rgb::rgb(255, 128, 128));
        assert!(pink.lightness() > 0.5);
        assert!((pink.saturation() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_hex_round_trip_and_shorthand() {
        assert_eq!(rgb_to_hex(hex_to_rgb("#ff0000")).as_str(), "#ff0000");
        assert_eq!(rgb_to_hex(hex_to_rgb("#f00")).as_str(), "#ff0000");
        assert_eq!(rgb_to_hex(hex_to_rgb("#A1b2C3")).as_str(), "#a1b2c3");
    }

    #[test]
    fn test_hex_to_rgb_degrades_to_black() {
        assert_eq!(hex_to_rgb("#zzzzzz"), Rgb::rgb(0, 0, 0));
        assert_eq!(hex_to_rgb("#ff00"), Rgb::rgb(0, 0, 0));
        assert_eq!(hex_to_rgb(""), Rgb::rgb(0, 0, 0));
        assert_eq!(hex_to_rgb("ff0000"), Rgb::rgb(0, 0, 0));
        assert_eq!(hex_to_rgb("#ffé00"), Rgb::rgb(0, 0, 0));
    }

    #[test]
    fn test_strict_hex_rejects() {
        assert_eq!(
            try_hex_to_rgb("#zzzzzz"),
            Err(Error::InvalidHexColor("#zzzzzz".to_string()))
        );
        assert!(try_hex_to_hue("#12345").is_err());
        assert_eq!(try_hex_to_hue("#00f").unwrap(), Hue::new(43690));
    }
}
