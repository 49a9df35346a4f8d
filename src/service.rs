//! The language service: the loaded phrase store plus everything a request
//! needs to translate against it.
//!
//! Built once at startup and shared read-only (`Arc<LangService>`) for the
//! rest of the process lifetime.

use crate::config::Config;
use crate::i18n::{
    negotiate, Data, LangMetrics, Param, PhraseStore, PhraseTable, PhraseValidator, StoreReport,
    Target, Translatable, TranslatableError, Translator,
};
use crate::loader::{self, LoadReport};
use tracing::{info, warn};

pub struct LangService {
    store: PhraseStore,
    default_lang: String,
    metrics: LangMetrics,
}

impl LangService {
    pub fn new(store: PhraseStore, default_lang: impl Into<String>) -> Self {
        Self {
            store,
            default_lang: default_lang.into(),
            metrics: LangMetrics::new(),
        }
    }

    /// Load every configured package's phrases and check them for consistency.
    pub async fn load(config: &Config) -> (Self, LoadReport) {
        let mut store = PhraseStore::new();
        let report = loader::load_phrases(&mut store, &config.package_dirs).await;

        let service = Self::new(store, config.default_lang.clone());
        service.log_validation(&service.validate());
        (service, report)
    }

    pub fn store(&self) -> &PhraseStore {
        &self.store
    }

    pub fn default_lang(&self) -> &str {
        &self.default_lang
    }

    pub fn metrics(&self) -> &LangMetrics {
        &self.metrics
    }

    pub fn supported_languages(&self) -> Vec<&str> {
        self.store.supported_languages()
    }

    pub fn phrases_for(&self, lang: &str) -> Option<&PhraseTable> {
        self.store.phrases_for(lang)
    }

    /// Pick a loaded language for an `Accept-Language` header.
    pub fn negotiate(&self, accept_language: Option<&str>) -> Option<String> {
        negotiate(accept_language, &self.supported_languages())
    }

    /// Translate a key or error; `None` uses the default language.
    pub fn translate<'k>(
        &self,
        lang: Option<&str>,
        target: impl Into<Target<'k>>,
        data: Option<&Data>,
    ) -> String {
        self.metrics.record_lookup();
        let warn = |msg: &str| self.report_missing(msg);
        self.translator(&warn).translate(lang, target, data)
    }

    /// Translate a value if it is an error, otherwise return it unchanged.
    pub fn translate_error(&self, lang: Option<&str>, value: &Param) -> Param {
        if value.is_error() {
            self.metrics.record_lookup();
        }
        let warn = |msg: &str| self.report_missing(msg);
        self.translator(&warn).translate_error(lang, value)
    }

    /// Translate any error exposing a code (and optional data).
    pub fn translate_translatable<E: Translatable + ?Sized>(
        &self,
        lang: Option<&str>,
        error: &E,
    ) -> String {
        let error = TranslatableError::from_translatable(error);
        self.translate(lang, &error, None)
    }

    /// Check every language against the default language.
    pub fn validate(&self) -> StoreReport {
        PhraseValidator::validate_store(&self.store, &self.default_lang)
    }

    fn translator<'a>(&'a self, warn: &'a dyn Fn(&str)) -> Translator<'a> {
        Translator::new(&self.store, &self.default_lang, warn)
    }

    fn report_missing(&self, msg: &str) {
        warn!("{}", msg);
        self.metrics.record_missing_key();
    }

    fn log_validation(&self, report: &StoreReport) {
        if !report.default_lang_loaded {
            warn!(
                "Default language '{}' has no phrases; lookups without a language will return raw keys",
                report.default_lang
            );
        }

        for lang in &report.languages {
            if !lang.missing_keys.is_empty() {
                warn!(
                    "Language '{}' is missing {} phrases present in '{}'",
                    lang.lang,
                    lang.missing_keys.len(),
                    report.default_lang
                );
            }
            for (key, phrase_report) in &lang.phrases {
                for e in &phrase_report.errors {
                    warn!("{}.{}: {}", lang.lang, key, e);
                }
            }
        }

        info!(
            "Phrase check: {} errors, {} warnings across {} languages",
            report.error_count(),
            report.warning_count(),
            report.languages.len()
        );
    }
}
