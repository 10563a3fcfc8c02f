//! Translation store: active language plus per-language dictionaries.
//!
//! This is the state the transcoder reads through [`Lookup`]. It never fails
//! a lookup: a missing language, dictionary or entry yields the key itself.

use crate::i18n::metrics::LookupMetrics;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use tracing::debug;

/// Key -> translated template for one language.
pub type Dictionary = BTreeMap<String, String>;

/// Language code -> dictionary.
pub type Resources = BTreeMap<String, Dictionary>;

/// Maps a stable key to a localized string.
///
/// Implementations must return the key unchanged when they have nothing
/// better, and must not block.
pub trait Lookup {
    fn lookup(&self, key: &str) -> String;
}

impl<F> Lookup for F
where
    F: Fn(&str) -> String,
{
    fn lookup(&self, key: &str) -> String {
        self(key)
    }
}

/// Active language and loaded dictionaries.
#[derive(Debug, Default)]
pub struct TranslationStore {
    language: Option<String>,
    dictionaries: Resources,
    metrics: LookupMetrics,
}

impl TranslationStore {
    /// An empty store with no active language: every lookup returns its key.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode resources shaped like `{"en": {"key": "value"}, "es": {...}}`.
    pub fn from_json(json: &str) -> Result<Self> {
        let resources: Resources =
            serde_json::from_str(json).context("Failed to parse translation resources")?;
        let mut store = Self::new();
        store.add_resources(resources);
        Ok(store)
    }

    /// Merge dictionaries into the store.
    ///
    /// The merge is shallow: a language present in `resources` replaces the
    /// stored dictionary for that language wholesale.
    pub fn add_resources(&mut self, resources: Resources) {
        for (language, dictionary) in resources {
            debug!(
                "Loaded {} entries for language '{}'",
                dictionary.len(),
                language
            );
            self.dictionaries.insert(language, dictionary);
        }
    }

    /// Switch the active language. An empty code clears it.
    pub fn set_language(&mut self, language: impl Into<String>) {
        let language = language.into();
        self.language = (!language.is_empty()).then_some(language);
    }

    pub fn current_language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Codes of every loaded language, sorted.
    pub fn languages(&self) -> Vec<&str> {
        self.dictionaries.keys().map(String::as_str).collect()
    }

    /// The translation for `key` in the active language, if there is a non-empty one.
    pub fn get(&self, key: &str) -> Option<&str> {
        let language = self.language.as_deref()?;
        self.dictionaries
            .get(language)?
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn metrics(&self) -> &LookupMetrics {
        &self.metrics
    }
}

impl Lookup for TranslationStore {
    fn lookup(&self, key: &str) -> String {
        match self.get(key) {
            Some(value) => {
                self.metrics.record_hit();
                value.to_string()
            }
            None => {
                self.metrics.record_miss();
                debug!(
                    "No translation for '{}' in language {:?}, using key",
                    key, self.language
                );
                key.to_string()
            }
        }
    }
}
