//! Accent color parsing and tint derivation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color '{0}': expected #RRGGBB")]
pub struct ColorParseError(pub String);

/// A straight-alpha RGBA color. `a` is in 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn from_hex_u32(hex: u32) -> Self {
        Self::rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    pub fn is_opaque(&self) -> bool {
        self.a >= 1.0
    }

    /// CSS form: `#rrggbb` when opaque, `rgba(r, g, b, a)` otherwise.
    pub fn css(&self) -> String {
        if self.is_opaque() {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }
}

/// The single user-chosen color every emphasis and tint is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccentColor {
    r: u8,
    g: u8,
    b: u8,
}

impl AccentColor {
    pub const DEFAULT: AccentColor = AccentColor {
        r: 0x0D,
        g: 0x94,
        b: 0x88,
    };

    pub fn channels(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Solid color for headings and emphasis.
    pub fn solid(&self) -> Color {
        Color::rgb(self.r, self.g, self.b)
    }

    /// Same channels recomposed with an explicit alpha.
    pub fn tint(&self, alpha: f32) -> Color {
        Color {
            r: self.r,
            g: self.g,
            b: self.b,
            a: alpha.clamp(0.0, 1.0),
        }
    }
}

impl Default for AccentColor {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl FromStr for AccentColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .filter(|h| h.len() == 6 && h.chars().all(|c| c.is_ascii_hexdigit()))
            .ok_or_else(|| ColorParseError(s.to_string()))?;

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| ColorParseError(s.to_string()))
        };

        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.css())
    }
}

impl fmt::Display for AccentColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Serialize for AccentColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AccentColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_accent() {
        let accent: AccentColor = "#0D9488".parse().unwrap();
        assert_eq!(accent, AccentColor::DEFAULT);
        assert_eq!(accent.channels(), (13, 148, 136));
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        let upper: AccentColor = "#ABCDEF".parse().unwrap();
        let lower: AccentColor = "#abcdef".parse().unwrap();
        assert_eq!(upper, lower);
    }

    #[test]
    fn test_rejects_malformed_hex() {
        for bad in ["0D9488", "#0D948", "#0D94888", "#GG9488", "", "#"] {
            assert!(bad.parse::<AccentColor>().is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_tint_keeps_channels_for_every_sampled_hex() {
        for hex in ["#000000", "#FFFFFF", "#0D9488", "#7F00FF", "#123456", "#FEDCBA"] {
            let accent: AccentColor = hex.parse().unwrap();
            let tint = accent.tint(0.15);
            assert_eq!((tint.r, tint.g, tint.b), accent.channels());
            assert!((tint.a - 0.15).abs() < f32::EPSILON);
            // and the recomposed tint reads back as the original hex
            let solid = format!("#{:02X}{:02X}{:02X}", tint.r, tint.g, tint.b);
            assert_eq!(solid, hex);
        }
    }

    #[test]
    fn test_css_forms() {
        let accent = AccentColor::DEFAULT;
        assert_eq!(accent.solid().css(), "#0d9488");
        assert_eq!(accent.tint(0.15).css(), "rgba(13, 148, 136, 0.15)");
    }

    #[test]
    fn test_serde_uses_hex_string() {
        let json = serde_json::to_string(&AccentColor::DEFAULT).unwrap();
        assert_eq!(json, "\"#0D9488\"");
        let back: AccentColor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, AccentColor::DEFAULT);
        assert!(serde_json::from_str::<AccentColor>("\"teal\"").is_err());
    }
}
