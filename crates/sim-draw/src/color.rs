//! Colors, hex parsing and the generated state palette.
//!
//! # Example
//!
//! ```
//! use sim_draw::{generate_palette, hex_to_rgb, is_valid_hex, Color};
//!
//! assert!(is_valid_hex(Some("#aBc")));
//! assert_eq!(hex_to_rgb("#abc").unwrap(), Color::rgb(0xaa, 0xbb, 0xcc));
//! assert_eq!(generate_palette(2), vec![Color::rgb(128, 64, 64), Color::rgb(64, 128, 128)]);
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Saturation shared by every generated palette entry.
pub const PALETTE_SATURATION: f64 = 0.5;

/// Value (brightness) shared by every generated palette entry.
pub const PALETTE_VALUE: f64 = 0.5;

/// An 8-bit RGBA color.
///
/// Serializes to `#rrggbb`, or `#rrggbbaa` when not fully opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    /// Creates an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Renders the color as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ValidationError;

    /// Parses `#rgb`, `#rrggbb` or `#rrggbbaa`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if is_valid_hex(Some(s)) {
            return hex_to_rgb(s);
        }
        let digits = s
            .strip_prefix('#')
            .filter(|d| d.len() == 8 && d.chars().all(|c| c.is_ascii_hexdigit()))
            .ok_or_else(|| ValidationError::InvalidColor(s.to_string()))?;
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| ValidationError::InvalidColor(s.to_string()))
        };
        Ok(Color::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?))
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Checks a string against the strict `#RRGGBB` / `#RGB` grammar.
///
/// `None`, the empty string and every other length are rejected.
pub fn is_valid_hex(value: Option<&str>) -> bool {
    let Some(digits) = value.and_then(|v| v.strip_prefix('#')) else {
        return false;
    };
    matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

/// Decodes a `#RGB` or `#RRGGBB` string into an opaque color.
///
/// The short form doubles each digit, so `#abc` equals `#aabbcc`.
pub fn hex_to_rgb(value: &str) -> Result<Color, ValidationError> {
    if !is_valid_hex(Some(value)) {
        return Err(ValidationError::InvalidColor(value.to_string()));
    }
    let digits: Vec<u8> = value[1..]
        .chars()
        .filter_map(|c| c.to_digit(16))
        .map(|d| d as u8)
        .collect();

    let [r, g, b] = match digits.as_slice() {
        [r, g, b] => [r * 17, g * 17, b * 17],
        [r1, r0, g1, g0, b1, b0] => [r1 * 16 + r0, g1 * 16 + g0, b1 * 16 + b0],
        _ => return Err(ValidationError::InvalidColor(value.to_string())),
    };
    Ok(Color::rgb(r, g, b))
}

/// Generates `n` evenly hue-spaced colors at fixed saturation and value.
///
/// Hue `i / n` for `i` in `0..n` is converted to RGB, each channel scaled to
/// `0..=255` with ceiling rounding and clamped. The output depends on `n`
/// alone, so the same count always yields the same palette.
pub fn generate_palette(n: usize) -> Vec<Color> {
    (0..n)
        .map(|i| {
            let hue = i as f64 / n as f64;
            let (r, g, b) = hsv_to_rgb(hue, PALETTE_SATURATION, PALETTE_VALUE);
            Color::rgb(to_channel(r), to_channel(g), to_channel(b))
        })
        .collect()
}

fn to_channel(component: f64) -> u8 {
    (255.0 * component).ceil().clamp(0.0, 255.0) as u8
}

/// Six-sector HSV to RGB conversion, all components in `0.0..=1.0`.
fn hsv_to_rgb(h: f64, s: f64, v: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (v, v, v);
    }
    let sector = (h * 6.0).floor();
    let f = h * 6.0 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    match (sector as i64).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_hex() {
        assert!(is_valid_hex(Some("#abc")));
        assert!(is_valid_hex(Some("#AABBCC")));
        assert!(is_valid_hex(Some("#0f0F0f")));

        assert!(!is_valid_hex(None));
        assert!(!is_valid_hex(Some("")));
        assert!(!is_valid_hex(Some("#")));
        assert!(!is_valid_hex(Some("abc")));
        assert!(!is_valid_hex(Some("#abcd")));
        assert!(!is_valid_hex(Some("#aabbccd")));
        assert!(!is_valid_hex(Some("#ggg")));
        assert!(!is_valid_hex(Some("notahex")));
    }

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb("#fff").unwrap(), Color::WHITE);
        assert_eq!(hex_to_rgb("#000000").unwrap(), Color::BLACK);
        assert_eq!(hex_to_rgb("#FF8000").unwrap(), Color::rgb(255, 128, 0));
        assert_eq!(hex_to_rgb("#1a2").unwrap(), Color::rgb(0x11, 0xaa, 0x22));
        assert!(hex_to_rgb("#12345").is_err());
    }

    #[test]
    fn test_color_to_hex() {
        assert_eq!(Color::rgb(255, 128, 0).to_hex(), "#ff8000");
        assert_eq!(Color::rgba(1, 2, 3, 4).to_hex(), "#01020304");
    }

    #[test]
    fn test_color_parse_with_alpha() {
        let color: Color = "#10203040".parse().unwrap();
        assert_eq!(color, Color::rgba(0x10, 0x20, 0x30, 0x40));
        assert!("#1020304".parse::<Color>().is_err());
        assert!("red".parse::<Color>().is_err());
    }

    #[test]
    fn test_color_serialization() {
        assert_eq!(
            serde_json::to_string(&Color::rgb(0, 255, 16)).unwrap(),
            r##""#00ff10""##
        );
        let color: Color = serde_json::from_str(r##""#abc""##).unwrap();
        assert_eq!(color, Color::rgb(0xaa, 0xbb, 0xcc));
        assert!(serde_json::from_str::<Color>(r#""nope""#).is_err());
    }

    #[test]
    fn test_palette_two_colors() {
        // Hue 0 and hue 0.5 at s = v = 0.5
        assert_eq!(
            generate_palette(2),
            vec![Color::rgb(128, 64, 64), Color::rgb(64, 128, 128)]
        );
    }

    #[test]
    fn test_palette_single_color() {
        assert_eq!(generate_palette(1), vec![Color::rgb(128, 64, 64)]);
    }

    #[test]
    fn test_palette_empty() {
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn test_palette_deterministic() {
        assert_eq!(generate_palette(17), generate_palette(17));
    }

    #[test]
    fn test_palette_distinct_hues() {
        let palette = generate_palette(6);
        for (i, a) in palette.iter().enumerate() {
            for b in palette.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_hsv_grey_when_unsaturated() {
        assert_eq!(hsv_to_rgb(0.3, 0.0, 0.5), (0.5, 0.5, 0.5));
    }
}
