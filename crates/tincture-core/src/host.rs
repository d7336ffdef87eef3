//! Host-supplied palette values and display codes per identity.
//!
//! The host rendering layer owns these constants. They are injected once
//! when a [`ColorRegistry`](crate::registry::ColorRegistry) is built and
//! never reassigned afterwards.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::display_code::DisplayCode;
use crate::error::RegistryError;
use crate::identity::{COUNT, ColorIdentity};
use crate::rgb::Rgb;

/// Palette value and display code for one identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostEntry {
    pub palette: Rgb,
    pub code: DisplayCode,
}

/// Complete host table, one entry per identity.
///
/// Serialized as a JSON object keyed by identity key:
///
/// ```text
/// { "BLACK": { "palette": "#1d1d21", "code": "0" }, ... }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "BTreeMap<String, HostEntry>")]
pub struct HostPalette {
    entries: [HostEntry; COUNT],
}

const fn entry(rgb: u32, legend: char) -> HostEntry {
    HostEntry {
        palette: Rgb::from_u32(rgb),
        code: DisplayCode::new(legend),
    }
}

/// Dye colors and chat legends in [`ColorIdentity::ALL`] order.
const STANDARD: [HostEntry; COUNT] = [
    entry(0x1D1D21, '0'), // Black
    entry(0x474F52, '8'), // DarkGrey
    entry(0x9D9D97, '7'), // LightGrey
    entry(0xF9FFFE, 'f'), // White
    entry(0x3C44AA, '1'), // DarkBlue
    entry(0x835432, '9'), // Brown
    entry(0x169C9C, '3'), // DarkCyan
    entry(0x3AB3DA, 'b'), // LightCyan
    entry(0x5E7C16, '2'), // DarkGreen
    entry(0x80C71F, 'a'), // LightGreen
    entry(0xFED83D, 'e'), // Yellow
    entry(0xF9801D, '6'), // Orange
    entry(0xB02E26, '4'), // DarkRed
    entry(0xF38BAA, 'c'), // LightRed
    entry(0x8932B8, '5'), // DarkPurple
    entry(0xC74EBD, 'd'), // LightPurple
];

impl HostPalette {
    /// The built-in table: wool dye colors with chat formatting legends.
    pub const fn standard() -> Self {
        Self { entries: STANDARD }
    }

    /// Build from entries given in [`ColorIdentity::ALL`] order.
    pub const fn from_entries(entries: [HostEntry; COUNT]) -> Self {
        Self { entries }
    }

    /// Parse a JSON table. Every identity must appear exactly once.
    pub fn from_json_str(json: &str) -> Result<Self, RegistryError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn entry(&self, identity: ColorIdentity) -> HostEntry {
        self.entries[identity.ordinal()]
    }

    pub fn palette_value(&self, identity: ColorIdentity) -> Rgb {
        self.entry(identity).palette
    }

    pub fn display_code(&self, identity: ColorIdentity) -> DisplayCode {
        self.entry(identity).code
    }

    /// Check that palette values and display codes are each injective.
    ///
    /// A collision means the host table and the enumeration disagree, so
    /// reverse lookups would be ambiguous.
    pub fn validate(&self) -> Result<(), RegistryError> {
        let mut palettes: HashMap<Rgb, ColorIdentity> = HashMap::with_capacity(COUNT);
        let mut codes: HashMap<DisplayCode, ColorIdentity> = HashMap::with_capacity(COUNT);

        for identity in ColorIdentity::ALL {
            let HostEntry { palette, code } = self.entry(identity);
            if let Some(&first) = palettes.get(&palette) {
                return Err(RegistryError::DuplicatePaletteValue {
                    first,
                    second: identity,
                    value: palette,
                });
            }
            if let Some(&first) = codes.get(&code) {
                return Err(RegistryError::DuplicateDisplayCode {
                    first,
                    second: identity,
                    code,
                });
            }
            palettes.insert(palette, identity);
            codes.insert(code, identity);
        }
        Ok(())
    }
}

impl Default for HostPalette {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<BTreeMap<String, HostEntry>> for HostPalette {
    type Error = RegistryError;

    fn try_from(mut table: BTreeMap<String, HostEntry>) -> Result<Self, Self::Error> {
        let mut entries = STANDARD;
        for identity in ColorIdentity::ALL {
            entries[identity.ordinal()] = table
                .remove(identity.key())
                .ok_or(RegistryError::MissingIdentity(identity))?;
        }
        if let Some(unknown) = table.into_keys().next() {
            return Err(RegistryError::UnknownIdentity(unknown));
        }
        Ok(Self { entries })
    }
}

impl<'de> Deserialize<'de> for HostPalette {
    /// Reads the key → entry object, rejecting a key that appears twice.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = HostPalette;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map from color identity keys to host entries")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<HostPalette, A::Error> {
                let mut table = BTreeMap::new();
                while let Some((key, entry)) = map.next_entry::<String, HostEntry>()? {
                    if table.contains_key(&key) {
                        return Err(de::Error::custom(RegistryError::DuplicateIdentity(key)));
                    }
                    table.insert(key, entry);
                }
                HostPalette::try_from(table).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

impl From<HostPalette> for BTreeMap<String, HostEntry> {
    fn from(palette: HostPalette) -> Self {
        ColorIdentity::ALL
            .into_iter()
            .map(|identity| (identity.key().to_string(), palette.entry(identity)))
            .collect()
    }
}
