//! The closed set of color identities and their structural encodings.
//!
//! Each identity carries its legacy wool-style index as plain data. The
//! dye-style index is derived from it (`15 - wool`) and never stored.

use std::fmt;
use std::str::FromStr;

/// Number of color identities. The set is closed.
pub const COUNT: usize = 16;

/// Highest legal value for either legacy index.
const LEGACY_MAX: u8 = 15;

/// One of the sixteen fixed named colors.
///
/// Palette values and display codes come from the host, so they are read
/// through [`ColorRegistry::palette_value`](crate::registry::ColorRegistry::palette_value)
/// and [`ColorRegistry::display_code`](crate::registry::ColorRegistry::display_code).
///
/// Variant order is the enumeration order used everywhere a table is
/// built over the identities (name overlay precedence included).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColorIdentity {
    Black,
    DarkGrey,
    LightGrey,
    White,
    DarkBlue,
    Brown,
    DarkCyan,
    LightCyan,
    DarkGreen,
    LightGreen,
    Yellow,
    Orange,
    DarkRed,
    LightRed,
    DarkPurple,
    LightPurple,
}

impl ColorIdentity {
    /// Every identity, in enumeration order.
    pub const ALL: [Self; COUNT] = [
        Self::Black,
        Self::DarkGrey,
        Self::LightGrey,
        Self::White,
        Self::DarkBlue,
        Self::Brown,
        Self::DarkCyan,
        Self::LightCyan,
        Self::DarkGreen,
        Self::LightGreen,
        Self::Yellow,
        Self::Orange,
        Self::DarkRed,
        Self::LightRed,
        Self::DarkPurple,
        Self::LightPurple,
    ];

    /// Stable symbolic key, e.g. `DARK_GREY`.
    ///
    /// Used as the localization node segment and as the display fallback.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Black => "BLACK",
            Self::DarkGrey => "DARK_GREY",
            Self::LightGrey => "LIGHT_GREY",
            Self::White => "WHITE",
            Self::DarkBlue => "DARK_BLUE",
            Self::Brown => "BROWN",
            Self::DarkCyan => "DARK_CYAN",
            Self::LightCyan => "LIGHT_CYAN",
            Self::DarkGreen => "DARK_GREEN",
            Self::LightGreen => "LIGHT_GREEN",
            Self::Yellow => "YELLOW",
            Self::Orange => "ORANGE",
            Self::DarkRed => "DARK_RED",
            Self::LightRed => "LIGHT_RED",
            Self::DarkPurple => "DARK_PURPLE",
            Self::LightPurple => "LIGHT_PURPLE",
        }
    }

    /// Position of this identity in [`Self::ALL`].
    pub const fn ordinal(self) -> usize {
        self as usize
    }

    /// Legacy wool-style data value in `0..=15`.
    ///
    /// Historical magic number kept for old data formats. Prefer the
    /// identity itself or its palette value for anything new.
    pub const fn legacy_primary_index(self) -> u8 {
        match self {
            Self::White => 0,
            Self::Orange => 1,
            Self::LightPurple => 2,
            Self::LightCyan => 3,
            Self::Yellow => 4,
            Self::LightGreen => 5,
            Self::LightRed => 6,
            Self::DarkGrey => 7,
            Self::LightGrey => 8,
            Self::DarkCyan => 9,
            Self::DarkPurple => 10,
            Self::DarkBlue => 11,
            Self::Brown => 12,
            Self::DarkGreen => 13,
            Self::DarkRed => 14,
            Self::Black => 15,
        }
    }

    /// Legacy dye-style data value, always `15 - legacy_primary_index()`.
    ///
    /// Same caveat as [`Self::legacy_primary_index`].
    pub const fn legacy_secondary_index(self) -> u8 {
        LEGACY_MAX - self.legacy_primary_index()
    }

    /// Resolve a symbolic key such as `LIGHT_GREEN`. Matching is exact.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|identity| identity.key() == key)
    }
}

impl fmt::Display for ColorIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Returned when a string is not one of the sixteen symbolic keys.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown color identity key: {0}")]
pub struct UnknownKey(pub String);

impl FromStr for ColorIdentity {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s).ok_or_else(|| UnknownKey(s.to_string()))
    }
}
