use crate::display_code::DisplayCode;
use crate::identity::ColorIdentity;
use crate::rgb::Rgb;

/// Failures while building a registry or loading its configuration.
///
/// Lookups never produce these: a missing name or index is `None`.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("{first} and {second} share palette value {value}")]
    DuplicatePaletteValue {
        first: ColorIdentity,
        second: ColorIdentity,
        value: Rgb,
    },
    #[error("{first} and {second} share display code {code}")]
    DuplicateDisplayCode {
        first: ColorIdentity,
        second: ColorIdentity,
        code: DisplayCode,
    },
    #[error("{first} and {second} share legacy index {index}")]
    DuplicateLegacyIndex {
        first: ColorIdentity,
        second: ColorIdentity,
        index: u8,
    },
    #[error("{identity} has legacy index {index}, outside 0..=15")]
    LegacyIndexOutOfRange { identity: ColorIdentity, index: u8 },
    #[error("unknown color identity: {0}")]
    UnknownIdentity(String),
    #[error("color identity {0} listed more than once")]
    DuplicateIdentity(String),
    #[error("no entry for color identity {0}")]
    MissingIdentity(ColorIdentity),
    #[error("invalid rgb value: {0}")]
    InvalidRgb(String),
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
