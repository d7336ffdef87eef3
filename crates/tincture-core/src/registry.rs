//! Process-wide lookup tables over the color identities.
//!
//! # Structure
//! - Structural indices (palette value, display code, both legacy indices)
//!   are built once in [`ColorRegistry::new`] and never change.
//! - The name overlay ([`NameOverlay`]) starts empty and is rebuilt in full
//!   on every localization reload, off to the side, then published with a
//!   single `ArcSwap::store`. Readers never take a lock and see either the
//!   old overlay or the new one.
//! - Reloads serialize on a mutex; the last one to finish wins.
//!
//! # Failure modes
//! - Name and legacy-index misses are `None`.
//! - Colliding encodings are rejected by [`ColorRegistry::new`].
//! - [`ColorRegistry::lookup_by_palette_value`] panics on a miss: the host
//!   table and the enumeration disagree, which is a build defect.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;

use crate::display_code::DisplayCode;
use crate::error::RegistryError;
use crate::host::HostPalette;
use crate::identity::{COUNT, ColorIdentity};
use crate::localization::{
    Adjective, Inflection, Language, Localization, ReloadListener, color_node,
};
use crate::rgb::Rgb;

/// Legacy index table: slot `i` holds the identity claiming index `i`.
type LegacyTable = [Option<ColorIdentity>; COUNT];

/// Immutable snapshot of localized names and adjectives.
#[derive(Debug, Default)]
pub struct NameOverlay {
    by_name: HashMap<String, ColorIdentity>,
    adjectives: [Option<Arc<dyn Adjective>>; COUNT],
    generation: u64,
}

impl NameOverlay {
    /// Case-insensitive exact match.
    pub fn get(&self, name: &str) -> Option<ColorIdentity> {
        self.by_name.get(&name.to_lowercase()).copied()
    }

    pub fn adjective(&self, identity: ColorIdentity) -> Option<&Arc<dyn Adjective>> {
        self.adjectives[identity.ordinal()].as_ref()
    }

    /// Normalized names resolving to `identity`, sorted.
    pub fn names_of(&self, identity: ColorIdentity) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .by_name
            .iter()
            .filter(|&(_, &owner)| owner == identity)
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Number of distinct normalized names.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Reload count that produced this overlay; 0 before the first reload.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn build(localization: &dyn Localization, generation: u64) -> Self {
        let mut by_name = HashMap::new();
        let mut adjectives: [Option<Arc<dyn Adjective>>; COUNT] = Default::default();

        for identity in ColorIdentity::ALL {
            let key = identity.key();
            adjectives[identity.ordinal()] = localization.adjective(&color_node(key, "adjective"));

            for name in localization.list(&color_node(key, "names")) {
                let name = name.to_lowercase();
                if let Some(previous) = by_name.insert(name, identity) {
                    if previous != identity {
                        tracing::warn!(
                            "color name claimed by both {previous} and {identity}; keeping {identity}"
                        );
                    }
                }
            }
        }

        Self {
            by_name,
            adjectives,
            generation,
        }
    }
}

/// Lookup tables over the sixteen color identities.
///
/// Share it as `Arc<ColorRegistry>`; every method takes `&self`.
pub struct ColorRegistry {
    palette: HostPalette,
    by_palette: HashMap<Rgb, ColorIdentity>,
    by_code: HashMap<DisplayCode, ColorIdentity>,
    by_legacy_primary: LegacyTable,
    by_legacy_secondary: LegacyTable,
    localization: Arc<dyn Localization>,
    overlay: ArcSwap<NameOverlay>,
    reload_lock: Mutex<()>,
}

impl ColorRegistry {
    /// Build the structural indices and an empty name overlay.
    ///
    /// Fails if any palette value, display code or legacy index is shared
    /// by two identities.
    pub fn new(
        palette: HostPalette,
        localization: Arc<dyn Localization>,
    ) -> Result<Self, RegistryError> {
        palette.validate()?;

        let by_legacy_primary = legacy_table(ColorIdentity::legacy_primary_index)?;
        let by_legacy_secondary = legacy_table(ColorIdentity::legacy_secondary_index)?;

        let by_palette = ColorIdentity::ALL
            .into_iter()
            .map(|identity| (palette.palette_value(identity), identity))
            .collect();
        let by_code = ColorIdentity::ALL
            .into_iter()
            .map(|identity| (palette.display_code(identity), identity))
            .collect();

        tracing::debug!("color registry built over {COUNT} identities");

        Ok(Self {
            palette,
            by_palette,
            by_code,
            by_legacy_primary,
            by_legacy_secondary,
            localization,
            overlay: ArcSwap::from_pointee(NameOverlay::default()),
            reload_lock: Mutex::new(()),
        })
    }

    /// Build a registry fed by `language` and subscribe it to reloads.
    ///
    /// If the language already holds data, the overlay is populated right
    /// away; otherwise it stays empty until the first reload.
    pub fn with_language(
        palette: HostPalette,
        language: &Arc<Language>,
    ) -> Result<Arc<Self>, RegistryError> {
        let localization: Arc<dyn Localization> = language.clone();
        let registry = Arc::new(Self::new(palette, localization)?);
        language.add_listener(&registry);
        if language.is_loaded() {
            registry.reload();
        }
        Ok(registry)
    }

    /// All identities in enumeration order.
    pub fn identities(&self) -> [ColorIdentity; COUNT] {
        ColorIdentity::ALL
    }

    pub fn host_palette(&self) -> &HostPalette {
        &self.palette
    }

    /// Host palette value for `identity`.
    pub fn palette_value(&self, identity: ColorIdentity) -> Rgb {
        self.palette.palette_value(identity)
    }

    /// Host display code for `identity`.
    pub fn display_code(&self, identity: ColorIdentity) -> DisplayCode {
        self.palette.display_code(identity)
    }

    /// Case-insensitive exact match against the current name overlay.
    pub fn lookup_by_name(&self, name: &str) -> Option<ColorIdentity> {
        self.overlay.load().get(name)
    }

    /// Non-panicking palette lookup for values of unknown origin.
    pub fn find_by_palette_value(&self, value: Rgb) -> Option<ColorIdentity> {
        self.by_palette.get(&value).copied()
    }

    /// Resolve a palette value taken from the host's own palette domain.
    ///
    /// # Panics
    ///
    /// Panics if no identity owns `value`. That means the host palette and
    /// this enumeration are out of sync; use
    /// [`find_by_palette_value`](Self::find_by_palette_value) for arbitrary
    /// input.
    pub fn lookup_by_palette_value(&self, value: Rgb) -> ColorIdentity {
        match self.find_by_palette_value(value) {
            Some(identity) => identity,
            None => {
                tracing::error!("palette value {value} has no color identity");
                panic!("palette value {value} is not owned by any color identity");
            }
        }
    }

    pub fn lookup_by_display_code(&self, code: DisplayCode) -> Option<ColorIdentity> {
        self.by_code.get(&code).copied()
    }

    /// Resolve a legacy wool-style index. `None` outside `0..=15`.
    pub fn lookup_by_legacy_primary_index(&self, index: i32) -> Option<ColorIdentity> {
        legacy_lookup(&self.by_legacy_primary, index)
    }

    /// Resolve a legacy dye-style index. `None` outside `0..=15`.
    pub fn lookup_by_legacy_secondary_index(&self, index: i32) -> Option<ColorIdentity> {
        legacy_lookup(&self.by_legacy_secondary, index)
    }

    /// Localized adjective for `identity` in the current overlay.
    pub fn adjective_of(&self, identity: ColorIdentity) -> Option<Arc<dyn Adjective>> {
        self.overlay.load().adjective(identity).cloned()
    }

    /// Neutral adjective form, or the symbolic key when none is loaded.
    pub fn display_name_of(&self, identity: ColorIdentity) -> String {
        self.inflected_name_of(identity, Inflection::NEUTRAL)
    }

    /// Inflected adjective form, or the symbolic key when none is loaded
    /// or the adjective yields an empty string.
    pub fn inflected_name_of(&self, identity: ColorIdentity, inflection: Inflection) -> String {
        self.overlay
            .load()
            .adjective(identity)
            .map(|adjective| adjective.inflect(inflection))
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| identity.key().to_string())
    }

    /// The overlay currently published. Holding it pins a consistent view
    /// across several lookups.
    pub fn snapshot(&self) -> Arc<NameOverlay> {
        self.overlay.load_full()
    }

    /// Re-query the localization source and publish a fresh overlay.
    pub fn reload(&self) {
        let _guard = self.reload_lock.lock();
        let generation = self.overlay.load().generation + 1;
        // One version of the source for the whole build, taken under the
        // lock so the last reload to run also reads the newest data.
        let pinned = self.localization.pinned();
        let source = pinned.as_deref().unwrap_or(self.localization.as_ref());
        let overlay = NameOverlay::build(source, generation);
        let adjectives = overlay.adjectives.iter().flatten().count();
        tracing::info!(
            "color names reloaded (generation {generation}, {} names, {adjectives} adjectives)",
            overlay.len()
        );
        self.overlay.store(Arc::new(overlay));
    }
}

impl ReloadListener for ColorRegistry {
    fn on_localization_reload(&self) {
        self.reload();
    }
}

impl fmt::Debug for ColorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let overlay = self.overlay.load();
        f.debug_struct("ColorRegistry")
            .field("palette", &self.palette)
            .field("names", &overlay.len())
            .field("generation", &overlay.generation)
            .finish_non_exhaustive()
    }
}

fn legacy_table(index_of: fn(ColorIdentity) -> u8) -> Result<LegacyTable, RegistryError> {
    let mut table: LegacyTable = [None; COUNT];
    for identity in ColorIdentity::ALL {
        let index = index_of(identity);
        let slot = table
            .get_mut(usize::from(index))
            .ok_or(RegistryError::LegacyIndexOutOfRange { identity, index })?;
        if let Some(first) = *slot {
            return Err(RegistryError::DuplicateLegacyIndex {
                first,
                second: identity,
                index,
            });
        }
        *slot = Some(identity);
    }
    Ok(table)
}

fn legacy_lookup(table: &LegacyTable, index: i32) -> Option<ColorIdentity> {
    let index = usize::try_from(index).ok()?;
    table.get(index).copied().flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::localization::AdjectiveForms;

    /// Localization stub serving a fixed set of names and adjectives.
    #[derive(Default)]
    struct Fixed {
        names: HashMap<String, Vec<String>>,
        adjectives: HashMap<String, String>,
    }

    impl Fixed {
        fn with_names(mut self, identity: ColorIdentity, names: &[&str]) -> Self {
            self.names.insert(
                color_node(identity.key(), "names"),
                names.iter().map(|n| n.to_string()).collect(),
            );
            self
        }

        fn with_adjective(mut self, identity: ColorIdentity, text: &str) -> Self {
            self.adjectives
                .insert(color_node(identity.key(), "adjective"), text.to_string());
            self
        }
    }

    impl Localization for Fixed {
        fn list(&self, node: &str) -> Vec<String> {
            self.names.get(node).cloned().unwrap_or_default()
        }

        fn adjective(&self, node: &str) -> Option<Arc<dyn Adjective>> {
            let text = self.adjectives.get(node)?;
            Some(Arc::new(AdjectiveForms::uninflected(text.clone())))
        }
    }

    fn registry(localization: Fixed) -> ColorRegistry {
        ColorRegistry::new(HostPalette::standard(), Arc::new(localization)).unwrap()
    }

    #[test]
    fn test_palette_value_round_trip() {
        let registry = registry(Fixed::default());
        for identity in ColorIdentity::ALL {
            let value = registry.palette_value(identity);
            assert_eq!(registry.lookup_by_palette_value(value), identity);
        }
    }

    #[test]
    fn test_display_code_round_trip() {
        let registry = registry(Fixed::default());
        for identity in ColorIdentity::ALL {
            let code = registry.display_code(identity);
            assert_eq!(registry.lookup_by_display_code(code), Some(identity));
        }
        assert_eq!(registry.lookup_by_display_code(DisplayCode::new('k')), None);
    }

    #[test]
    #[should_panic(expected = "not owned by any color identity")]
    fn test_unknown_palette_value_panics() {
        let registry = registry(Fixed::default());
        registry.lookup_by_palette_value(Rgb::new(1, 2, 3));
    }

    #[test]
    fn test_find_by_palette_value_misses_quietly() {
        let registry = registry(Fixed::default());
        assert_eq!(registry.find_by_palette_value(Rgb::new(1, 2, 3)), None);
        assert_eq!(
            registry.find_by_palette_value(Rgb::from_u32(0x835432)),
            Some(ColorIdentity::Brown)
        );
    }

    #[test]
    fn test_legacy_lookups_cover_range_and_reject_outside() {
        let registry = registry(Fixed::default());
        for identity in ColorIdentity::ALL {
            let primary = i32::from(identity.legacy_primary_index());
            let secondary = i32::from(identity.legacy_secondary_index());
            assert_eq!(registry.lookup_by_legacy_primary_index(primary), Some(identity));
            assert_eq!(registry.lookup_by_legacy_secondary_index(secondary), Some(identity));
        }
        for index in [-1, 16, 255, i32::MIN, i32::MAX] {
            assert_eq!(registry.lookup_by_legacy_primary_index(index), None);
            assert_eq!(registry.lookup_by_legacy_secondary_index(index), None);
        }
        assert_eq!(
            registry.lookup_by_legacy_primary_index(0),
            Some(ColorIdentity::White)
        );
        assert_eq!(
            registry.lookup_by_legacy_secondary_index(0),
            Some(ColorIdentity::Black)
        );
    }

    #[test]
    fn test_names_empty_before_first_reload() {
        let registry = registry(Fixed::default().with_names(ColorIdentity::Black, &["black"]));
        assert_eq!(registry.lookup_by_name("black"), None);
        assert_eq!(registry.snapshot().generation(), 0);
    }

    #[test]
    fn test_reload_populates_case_insensitive_names() {
        let registry = registry(
            Fixed::default()
                .with_names(ColorIdentity::Black, &["black"])
                .with_names(ColorIdentity::White, &["White", "snow"]),
        );
        registry.reload();

        assert_eq!(registry.lookup_by_name("black"), Some(ColorIdentity::Black));
        assert_eq!(registry.lookup_by_name("BLACK"), Some(ColorIdentity::Black));
        assert_eq!(registry.lookup_by_name("white"), Some(ColorIdentity::White));
        assert_eq!(registry.lookup_by_name("Snow"), Some(ColorIdentity::White));
        assert_eq!(registry.lookup_by_name("unknown"), None);
        assert_eq!(registry.lookup_by_name("blac"), None);
        assert_eq!(
            registry.snapshot().names_of(ColorIdentity::White),
            vec!["snow", "white"]
        );
    }

    #[test]
    fn test_shared_name_goes_to_later_identity() {
        let registry = registry(
            Fixed::default()
                .with_names(ColorIdentity::DarkGrey, &["grey"])
                .with_names(ColorIdentity::LightGrey, &["grey"]),
        );
        registry.reload();
        assert_eq!(registry.lookup_by_name("grey"), Some(ColorIdentity::LightGrey));
    }

    #[test]
    fn test_display_name_falls_back_to_key() {
        let registry = registry(Fixed::default().with_adjective(ColorIdentity::Orange, "orange"));
        assert_eq!(registry.display_name_of(ColorIdentity::Orange), "ORANGE");

        registry.reload();
        assert_eq!(registry.display_name_of(ColorIdentity::Orange), "orange");
        assert_eq!(registry.display_name_of(ColorIdentity::DarkRed), "DARK_RED");
        assert!(registry.adjective_of(ColorIdentity::Orange).is_some());
        assert!(registry.adjective_of(ColorIdentity::DarkRed).is_none());
    }

    #[test]
    fn test_empty_adjective_falls_back_to_key() {
        let registry = registry(Fixed::default().with_adjective(ColorIdentity::Yellow, ""));
        registry.reload();
        assert_eq!(registry.display_name_of(ColorIdentity::Yellow), "YELLOW");
    }

    #[test]
    fn test_duplicate_host_entries_are_rejected() {
        let mut table: std::collections::BTreeMap<String, crate::host::HostEntry> =
            HostPalette::standard().into();
        let black = table["BLACK"];
        table.insert("WHITE".to_string(), black);
        let palette: HostPalette = table.try_into().unwrap();

        let err = ColorRegistry::new(palette, Arc::new(Fixed::default())).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicatePaletteValue { .. }));
    }

    #[test]
    fn test_legacy_tables_are_complete() {
        let primary = legacy_table(ColorIdentity::legacy_primary_index).unwrap();
        let secondary = legacy_table(ColorIdentity::legacy_secondary_index).unwrap();
        assert!(primary.iter().all(Option::is_some));
        assert!(secondary.iter().all(Option::is_some));
    }

    #[test]
    fn test_legacy_table_rejects_collisions() {
        let err = legacy_table(|_| 3).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::DuplicateLegacyIndex {
                first: ColorIdentity::Black,
                second: ColorIdentity::DarkGrey,
                index: 3,
            }
        ));
    }

    #[test]
    fn test_legacy_table_rejects_out_of_range() {
        let err = legacy_table(|_| 16).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::LegacyIndexOutOfRange { index: 16, .. }
        ));
    }
}
