//! 8-bit sRGB palette values.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

/// Canonical palette value of a color identity.
///
/// The registry only compares these for equality. Serialized as a
/// `#rrggbb` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from a packed `0xRRGGBB` integer. The top byte is ignored.
    pub const fn from_u32(rgb: u32) -> Self {
        Self {
            r: (rgb >> 16) as u8,
            g: (rgb >> 8) as u8,
            b: rgb as u8,
        }
    }

    /// Pack into `0xRRGGBB`.
    pub const fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

impl Display for Rgb {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = RegistryError;

    /// Accepts `#rrggbb` and `0xrrggbb`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix('#')
            .or_else(|| s.strip_prefix("0x"))
            .filter(|d| d.len() == 6 && d.bytes().all(|b| b.is_ascii_hexdigit()))
            .ok_or_else(|| RegistryError::InvalidRgb(s.to_string()))?;

        u32::from_str_radix(digits, 16)
            .map(Self::from_u32)
            .map_err(|_| RegistryError::InvalidRgb(s.to_string()))
    }
}

impl TryFrom<String> for Rgb {
    type Error = RegistryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hash_and_0x_forms() {
        assert_eq!("#1d1d21".parse::<Rgb>().ok(), Some(Rgb::new(0x1d, 0x1d, 0x21)));
        assert_eq!("0xF9801D".parse::<Rgb>().ok(), Some(Rgb::new(0xf9, 0x80, 0x1d)));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "#", "#fff", "1d1d21", "#1d1d2", "#1d1d21ff", "#gg0000", "#+1d1d2"] {
            assert!(bad.parse::<Rgb>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn test_display_is_lowercase_hex() {
        assert_eq!(Rgb::from_u32(0x9D9D97).to_string(), "#9d9d97");
    }

    #[test]
    fn test_packed_u32() {
        assert_eq!(Rgb::from_u32(0x3AB3DA).to_u32(), 0x3AB3DA);
        assert_eq!(Rgb::from_u32(0xFF_123456), Rgb::new(0x12, 0x34, 0x56));
    }

    #[test]
    fn test_serde_uses_hex_string() {
        let json = serde_json::to_string(&Rgb::new(0xb0, 0x2e, 0x26)).unwrap();
        assert_eq!(json, "\"#b02e26\"");
        let back: Rgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Rgb::new(0xb0, 0x2e, 0x26));
        assert!(serde_json::from_str::<Rgb>("\"red\"").is_err());
    }
}
