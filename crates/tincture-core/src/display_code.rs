//! Formatting tokens used to render a color in text output.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefix character of a formatting sequence.
pub const SECTION_SIGN: char = '\u{a7}';

/// A formatting code identified by its legend character (`0`-`9`, `a`-`f`).
///
/// Opaque to the registry beyond equality; the host decides which
/// legend belongs to which identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "char", into = "char")]
pub struct DisplayCode(char);

impl DisplayCode {
    /// Create a code from its legend character. Uppercase legends are
    /// folded so `A` and `a` are the same code.
    pub const fn new(legend: char) -> Self {
        Self(legend.to_ascii_lowercase())
    }

    pub const fn legend(self) -> char {
        self.0
    }

    /// The sequence to embed in text, e.g. `§0`.
    pub fn formatted(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DisplayCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SECTION_SIGN}{}", self.0)
    }
}

impl From<char> for DisplayCode {
    fn from(legend: char) -> Self {
        Self::new(legend)
    }
}

impl From<DisplayCode> for char {
    fn from(code: DisplayCode) -> Self {
        code.0
    }
}
