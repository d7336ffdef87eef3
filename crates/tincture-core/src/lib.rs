//! Tincture Core — a closed registry of named colors.
//!
//! Sixteen fixed color identities, each with a host palette value, a
//! display code, two legacy numeric indices and a localized name. The
//! registry resolves any of these back to an identity and swaps in a new
//! localized name overlay whenever the language source reloads.

pub mod display_code;
pub mod error;
pub mod host;
pub mod identity;
pub mod localization;
pub mod registry;
pub mod rgb;

// Re-exports for convenience.
pub use display_code::DisplayCode;
pub use error::RegistryError;
pub use host::{HostEntry, HostPalette};
pub use identity::ColorIdentity;
pub use localization::{Adjective, Inflection, Language, Localization, ReloadListener};
pub use registry::{ColorRegistry, NameOverlay};
pub use rgb::Rgb;
