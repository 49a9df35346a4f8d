//! Phrase-table consistency checks.
//!
//! Packages ship their phrase files independently, so translations drift:
//! a language may lack keys the default language has, or a translated
//! phrase may reference different placeholders than the original. This
//! module compares every language against the default one.

use crate::i18n::store::PhraseStore;
use crate::i18n::template;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Validation report for a single phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Problems that break substitution
    pub errors: Vec<String>,

    /// Suspicious content that still renders
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Create a new empty validation report
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Check if the report has any errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if the report has any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if the report is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Findings for one language compared with the default language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageReport {
    pub lang: String,

    /// Keys present in the default language but not in this one
    pub missing_keys: Vec<String>,

    /// Keys present only in this language
    pub extra_keys: Vec<String>,

    /// Per-phrase reports that are not clean, by key
    pub phrases: Vec<(String, ValidationReport)>,
}

impl LanguageReport {
    pub fn error_count(&self) -> usize {
        self.phrases.iter().map(|(_, r)| r.errors.len()).sum()
    }

    pub fn warning_count(&self) -> usize {
        self.phrases.iter().map(|(_, r)| r.warnings.len()).sum::<usize>()
            + self.missing_keys.len()
            + self.extra_keys.len()
    }
}

/// Findings for the whole store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreReport {
    pub default_lang: String,

    /// `false` if the default language has no phrases at all
    pub default_lang_loaded: bool,

    pub languages: Vec<LanguageReport>,
}

impl StoreReport {
    pub fn error_count(&self) -> usize {
        self.languages.iter().map(LanguageReport::error_count).sum()
    }

    pub fn warning_count(&self) -> usize {
        self.languages.iter().map(LanguageReport::warning_count).sum()
    }

    pub fn has_errors(&self) -> bool {
        !self.default_lang_loaded || self.error_count() > 0
    }
}

/// Validator for phrase tables.
pub struct PhraseValidator;

static LEGACY_INTERPOLATION_REGEX: OnceLock<Regex> = OnceLock::new();
static UNTERMINATED_REGEX: OnceLock<Regex> = OnceLock::new();

impl PhraseValidator {
    /// Validate a translated phrase against the default-language phrase.
    ///
    /// This function checks that:
    /// - Both phrases reference the same placeholder names
    /// - The translation has no legacy `%{name}` interpolation
    /// - The translation has no unterminated `${` or `$map{`
    pub fn validate(reference: &str, translated: &str) -> ValidationReport {
        let mut report = ValidationReport::new();

        let expected: BTreeSet<&str> = template::placeholders(reference).into_iter().collect();
        let actual: BTreeSet<&str> = template::placeholders(translated).into_iter().collect();
        if expected != actual {
            report.errors.push(format!(
                "Placeholder mismatch: expected {:?}, found {:?}",
                expected, actual
            ));
        }

        report.warnings.extend(Self::lint(translated));
        report
    }

    /// Warnings for a phrase on its own.
    pub fn lint(phrase: &str) -> Vec<String> {
        let mut warnings = Vec::new();

        let legacy = Self::extract_legacy_interpolations(phrase);
        if !legacy.is_empty() {
            warnings.push(format!(
                "Legacy interpolation {:?} is not substituted; use ${{name}}",
                legacy
            ));
        }

        if Self::has_unterminated_placeholder(phrase) {
            warnings.push("Unterminated placeholder is rendered literally".to_string());
        }

        warnings
    }

    /// Compare every language in the store with the default language.
    pub fn validate_store(store: &PhraseStore, default_lang: &str) -> StoreReport {
        let mut report = StoreReport {
            default_lang: default_lang.to_string(),
            default_lang_loaded: store.contains_language(default_lang),
            languages: Vec::new(),
        };

        let empty = Default::default();
        let reference = store.phrases_for(default_lang).unwrap_or(&empty);

        for lang in store.supported_languages() {
            let Some(table) = store.phrases_for(lang) else {
                continue;
            };
            let mut lang_report = LanguageReport {
                lang: lang.to_string(),
                ..Default::default()
            };

            if lang == default_lang {
                for (key, phrase) in table {
                    let warnings = Self::lint(phrase);
                    if !warnings.is_empty() {
                        lang_report.phrases.push((
                            key.clone(),
                            ValidationReport {
                                errors: Vec::new(),
                                warnings,
                            },
                        ));
                    }
                }
                report.languages.push(lang_report);
                continue;
            }

            for (key, reference_phrase) in reference {
                match table.get(key) {
                    Some(phrase) => {
                        let phrase_report = Self::validate(reference_phrase, phrase);
                        if !phrase_report.is_clean() {
                            lang_report.phrases.push((key.clone(), phrase_report));
                        }
                    }
                    None => lang_report.missing_keys.push(key.clone()),
                }
            }
            lang_report.extra_keys = table
                .keys()
                .filter(|key| !reference.contains_key(*key))
                .cloned()
                .collect();

            report.languages.push(lang_report);
        }

        report
    }

    /// Extract all `%{name}` interpolations from a phrase
    fn extract_legacy_interpolations(text: &str) -> Vec<String> {
        let regex = LEGACY_INTERPOLATION_REGEX
            .get_or_init(|| Regex::new(r"%\{([A-Za-z0-9_.]+)\}").expect("valid regex"));

        regex
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Check for a `${` or `$map{` that is never closed
    fn has_unterminated_placeholder(text: &str) -> bool {
        let regex = UNTERMINATED_REGEX
            .get_or_init(|| Regex::new(r"\$(?:map)?\{[^}]*$").expect("valid regex"));
        regex.is_match(text)
    }
}
