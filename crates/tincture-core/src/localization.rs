//! Localization seam: the source of color names and adjective forms.
//!
//! The registry only needs two things from a language source: the list of
//! names registered under a node, and an adjective that can be inflected.
//! [`Language`] is an in-memory JSON-backed source that notifies its
//! [`ReloadListener`]s whenever its table is replaced.
//!
//! # Node layout
//! ```text
//! colors.<KEY>.names      -> ["black", "blacks"]  or  "black, blacks"
//! colors.<KEY>.adjective  -> "black"  or  { "default": "black", "plural": "black", "genders": { "1": "noire" } }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;
use std::sync::{Arc, Weak};

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

/// Root node for color entries.
pub const LANGUAGE_NODE: &str = "colors";

/// Grammatical number/case selector handed through to an [`Adjective`].
///
/// The registry never interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Inflection {
    /// Grammatical gender index, negative when unspecified.
    pub gender: i32,
    /// Source-defined flag bits, see [`Inflection::PLURAL`].
    pub flags: u32,
}

impl Inflection {
    /// No gender, no flags. Used for display names.
    pub const NEUTRAL: Self = Self { gender: -1, flags: 0 };

    /// Flag bit requesting the plural form.
    pub const PLURAL: u32 = 1;

    pub const fn plural(self) -> Self {
        Self {
            flags: self.flags | Self::PLURAL,
            ..self
        }
    }

    pub const fn with_gender(self, gender: i32) -> Self {
        Self { gender, ..self }
    }

    pub const fn is_plural(self) -> bool {
        self.flags & Self::PLURAL != 0
    }
}

impl Default for Inflection {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// A localized adjective that produces inflected forms on demand.
pub trait Adjective: Send + Sync + fmt::Debug {
    fn inflect(&self, inflection: Inflection) -> String;
}

/// A source of localized strings addressed by dotted node paths.
pub trait Localization: Send + Sync {
    /// Names registered under `node`. Empty when the node is absent.
    fn list(&self, node: &str) -> Vec<String>;

    /// Adjective registered under `node`, if any.
    fn adjective(&self, node: &str) -> Option<Arc<dyn Adjective>>;

    /// A view that cannot change while it is held.
    ///
    /// Sources whose data can be replaced concurrently return the current
    /// data here so that one overlay build reads from one version. `None`
    /// means `self` is already immutable.
    fn pinned(&self) -> Option<Arc<dyn Localization>> {
        None
    }
}

/// Notified after a localization source replaces its data.
pub trait ReloadListener: Send + Sync {
    fn on_localization_reload(&self);
}

/// Node path for an identity entry, e.g. `colors.BLACK.names`.
pub fn color_node(key: &str, leaf: &str) -> String {
    format!("{LANGUAGE_NODE}.{key}.{leaf}")
}

/// Adjective forms as stored in a language file.
///
/// `genders` is keyed by the gender index written as a string (`"1"`),
/// since JSON object keys are strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjectiveForms {
    pub default: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plural: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub genders: BTreeMap<String, String>,
}

impl AdjectiveForms {
    pub fn uninflected(text: impl Into<String>) -> Self {
        Self {
            default: text.into(),
            plural: None,
            genders: BTreeMap::new(),
        }
    }
}

impl Adjective for AdjectiveForms {
    /// Plural wins over gender; anything missing falls back to `default`.
    fn inflect(&self, inflection: Inflection) -> String {
        if inflection.is_plural() {
            if let Some(plural) = &self.plural {
                return plural.clone();
            }
        }
        self.genders
            .get(&inflection.gender.to_string())
            .unwrap_or(&self.default)
            .clone()
    }
}

/// One value in a language table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LanguageValue {
    Text(String),
    List(Vec<String>),
    Adjective(AdjectiveForms),
}

/// Flat node-path → value table.
pub type LanguageTable = HashMap<String, LanguageValue>;

impl Localization for LanguageTable {
    /// Lists are returned as-is; a plain string is split on commas.
    fn list(&self, node: &str) -> Vec<String> {
        match self.get(node) {
            Some(LanguageValue::List(names)) => names.clone(),
            Some(LanguageValue::Text(text)) => text
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect(),
            Some(LanguageValue::Adjective(_)) | None => Vec::new(),
        }
    }

    fn adjective(&self, node: &str) -> Option<Arc<dyn Adjective>> {
        match self.get(node)? {
            LanguageValue::Adjective(forms) => Some(Arc::new(forms.clone())),
            LanguageValue::Text(text) => Some(Arc::new(AdjectiveForms::uninflected(text.clone()))),
            LanguageValue::List(_) => None,
        }
    }
}

/// In-memory language source with reload notification.
///
/// The table is published through an `ArcSwap`, so a reload replaces it
/// in one step and [`Localization::pinned`] hands out a whole version.
pub struct Language {
    table: ArcSwap<LanguageTable>,
    listeners: Mutex<Vec<Weak<dyn ReloadListener>>>,
}

impl Default for Language {
    fn default() -> Self {
        Self::from_table(LanguageTable::new())
    }
}

impl Language {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_table(table: LanguageTable) -> Self {
        Self {
            table: ArcSwap::from_pointee(table),
            listeners: Mutex::new(Vec::new()),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, RegistryError> {
        Ok(Self::from_table(serde_json::from_str(json)?))
    }

    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Register a listener. Only a weak reference is kept; dropped
    /// listeners are pruned on the next reload.
    pub fn add_listener<L: ReloadListener + 'static>(&self, listener: &Arc<L>) {
        let weak: Weak<L> = Arc::downgrade(listener);
        let weak: Weak<dyn ReloadListener> = weak;
        self.listeners.lock().push(weak);
    }

    /// Replace the whole table and notify listeners.
    pub fn reload(&self, table: LanguageTable) {
        let entries = table.len();
        self.table.store(Arc::new(table));
        tracing::debug!("language table replaced ({entries} entries)");
        self.notify();
    }

    /// Parse `json` and [`reload`](Self::reload) with it. On a parse error
    /// the current table is kept and no listener fires.
    pub fn reload_from_json_str(&self, json: &str) -> Result<(), RegistryError> {
        let table: LanguageTable = serde_json::from_str(json)?;
        self.reload(table);
        Ok(())
    }

    pub fn reload_file(&self, path: impl AsRef<Path>) -> Result<(), RegistryError> {
        let json = std::fs::read_to_string(path)?;
        self.reload_from_json_str(&json)
    }

    /// The table currently published.
    pub fn table(&self) -> Arc<LanguageTable> {
        self.table.load_full()
    }

    /// Whether the table holds any entries.
    pub fn is_loaded(&self) -> bool {
        !self.table.load().is_empty()
    }

    /// Number of live listeners.
    pub fn listener_count(&self) -> usize {
        let mut listeners = self.listeners.lock();
        listeners.retain(|l| l.strong_count() > 0);
        listeners.len()
    }

    fn notify(&self) {
        // Listeners read back through `list`/`adjective`, so the listener
        // lock is released before they run.
        let live: Vec<Arc<dyn ReloadListener>> = {
            let mut listeners = self.listeners.lock();
            listeners.retain(|l| l.strong_count() > 0);
            listeners.iter().filter_map(Weak::upgrade).collect()
        };
        for listener in live {
            listener.on_localization_reload();
        }
    }
}

impl Localization for Language {
    fn list(&self, node: &str) -> Vec<String> {
        self.table.load().list(node)
    }

    fn adjective(&self, node: &str) -> Option<Arc<dyn Adjective>> {
        self.table.load().adjective(node)
    }

    fn pinned(&self) -> Option<Arc<dyn Localization>> {
        let table: Arc<dyn Localization> = self.table.load_full();
        Some(table)
    }
}

impl fmt::Debug for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Language")
            .field("entries", &self.table.load().len())
            .field("listeners", &self.listeners.lock().len())
            .finish()
    }
}
