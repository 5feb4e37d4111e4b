//! Display colors

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An 8-bit sRGB color, serialized as `"#rrggbb"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `rrggbb`
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(ColorError(hex.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| ColorError(hex.to_string()))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Lowercase `#rrggbb`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Channels scaled to 0..=1
    pub fn to_f32(&self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_hex()
    }
}

/// Malformed hex color
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Invalid color '{0}', expected #rrggbb")]
pub struct ColorError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        let c = Rgb::from_hex("#2c3e50").unwrap();
        assert_eq!(c, Rgb::new(0x2c, 0x3e, 0x50));
        assert_eq!(c.to_hex(), "#2c3e50");
        assert_eq!("E67E22".parse::<Rgb>().unwrap(), Rgb::new(0xe6, 0x7e, 0x22));
    }

    #[test]
    fn test_reject_malformed() {
        assert!(Rgb::from_hex("#12345").is_err());
        assert!(Rgb::from_hex("#12345g").is_err());
        assert!(Rgb::from_hex("#ééé").is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Rgb::new(0x11, 0x11, 0x11)).unwrap();
        assert_eq!(json, "\"#111111\"");
        let back: Rgb = serde_json::from_str("\"#5dade2\"").unwrap();
        assert_eq!(back, Rgb::new(0x5d, 0xad, 0xe2));
    }
}
