//! Phrase store: merged per-language phrase tables.
//!
//! Every installed package contributes its own phrase files. The store merges
//! them into a single mapping of `language -> qualified key -> template`, where
//! a qualified key is `namespace.key` (e.g. `app.hello`, `error.UNKNOWN_LANG`).
//! A later write for the same language and key replaces the earlier one.

use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised while ingesting phrases.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The dotted key did not have the `lang.namespace.key` shape.
    #[error("malformed phrase key '{0}': expected '<lang>.<key>'")]
    MalformedKey(String),
}

/// A single language's phrases, keyed by qualified key.
pub type PhraseTable = BTreeMap<String, String>;

/// Merged phrase tables for every loaded language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhraseStore {
    languages: BTreeMap<String, PhraseTable>,
}

impl PhraseStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a phrase under a dotted key whose first segment is the language.
    ///
    /// `"en.app.hello"` is stored as language `en`, key `app.hello`. Any
    /// existing phrase for the same language and key is overwritten.
    ///
    /// # Arguments
    /// * `dotted_key` - The key in `<lang>.<namespace>.<key>` form
    /// * `value` - The template string
    ///
    /// # Returns
    /// * `Ok(())` once the phrase is stored
    /// * `Err(StoreError::MalformedKey)` if the key has no separator or an
    ///   empty language or key segment; the store is left untouched
    pub fn store_strings(
        &mut self,
        dotted_key: &str,
        value: impl Into<String>,
    ) -> Result<(), StoreError> {
        let (lang, key) = dotted_key
            .split_once('.')
            .filter(|(lang, key)| !lang.is_empty() && !key.is_empty())
            .ok_or_else(|| StoreError::MalformedKey(dotted_key.to_string()))?;

        self.languages
            .entry(lang.to_string())
            .or_default()
            .insert(key.to_string(), value.into());
        Ok(())
    }

    /// Look up a phrase. Unknown languages and keys yield `None`.
    pub fn lookup(&self, lang: &str, key: &str) -> Option<&str> {
        self.languages
            .get(lang)
            .and_then(|table| table.get(key))
            .map(String::as_str)
    }

    /// The languages that have at least one phrase, in sorted order.
    pub fn supported_languages(&self) -> Vec<&str> {
        self.languages.keys().map(String::as_str).collect()
    }

    /// Check whether any phrase has been stored for a language
    pub fn contains_language(&self, lang: &str) -> bool {
        self.languages.contains_key(lang)
    }

    /// The full phrase table of a language.
    pub fn phrases_for(&self, lang: &str) -> Option<&PhraseTable> {
        self.languages.get(lang)
    }

    /// Total number of phrases across all languages
    pub fn len(&self) -> usize {
        self.languages.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
