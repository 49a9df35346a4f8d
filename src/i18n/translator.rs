//! Phrase translation: lookup, placeholder substitution and error translation.
//!
//! The functions here are pure over a [`PhraseStore`]. Nothing fails: a missing
//! phrase is reported through the `warn` sink and the key itself is returned,
//! so an untranslated key is visible in the output instead of an empty string.

use crate::i18n::params::{Data, Param, TranslatableError};
use crate::i18n::store::PhraseStore;
use crate::i18n::template::{self, MapProjection, Segment};
use serde_json::Value;

/// What to translate: a phrase key or an error.
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    Key(&'a str),
    Error(&'a TranslatableError),
}

impl<'a> From<&'a str> for Target<'a> {
    fn from(key: &'a str) -> Self {
        Target::Key(key)
    }
}

impl<'a> From<&'a String> for Target<'a> {
    fn from(key: &'a String) -> Self {
        Target::Key(key)
    }
}

impl<'a> From<&'a TranslatableError> for Target<'a> {
    fn from(error: &'a TranslatableError) -> Self {
        Target::Error(error)
    }
}

/// Translate a phrase key (or an error) into a display string.
///
/// # Arguments
/// * `store` - The merged phrase tables
/// * `default_lang` - Language used when `lang` is `None`
/// * `warn` - Sink for missing-phrase diagnostics
/// * `lang` - The target language
/// * `target` - A phrase key, or an error to be rendered as `error.<code>`
/// * `data` - Values for `${name}` and `$map{name:...}` placeholders
///
/// # Returns
/// The substituted phrase, the raw phrase when `data` is `None`, or the key
/// itself when no phrase exists for the language.
pub fn translate<'a>(
    store: &PhraseStore,
    default_lang: &str,
    warn: &dyn Fn(&str),
    lang: Option<&str>,
    target: impl Into<Target<'a>>,
    data: Option<&Data>,
) -> String {
    let lang = lang.unwrap_or(default_lang);

    let key = match target.into() {
        Target::Key(key) => key,
        Target::Error(error) => {
            return translate_error_code(store, default_lang, warn, Some(lang), error)
        }
    };

    // An empty phrase is as good as a missing one
    let phrase = match store.lookup(lang, key).filter(|s| !s.is_empty()) {
        Some(phrase) => phrase,
        None => {
            warn(&format!("missing key '{}.{}'", lang, key));
            return key.to_string();
        }
    };

    let Some(data) = data else {
        return phrase.to_string();
    };

    data.iter().fold(phrase.to_string(), |text, (name, value)| {
        let value = translate_nested_errors(store, default_lang, warn, lang, value);
        substitute(&text, name, &value)
    })
}

/// Translate a value if it is an error, otherwise hand it back unchanged.
///
/// Strings, numbers, `null`, objects and lists all pass through untouched.
pub fn translate_error(
    store: &PhraseStore,
    default_lang: &str,
    warn: &dyn Fn(&str),
    lang: Option<&str>,
    value: &Param,
) -> Param {
    match value {
        Param::Error(error) => Param::Value(Value::String(translate_error_code(
            store,
            default_lang,
            warn,
            lang,
            error,
        ))),
        other => other.clone(),
    }
}

/// Translate an error into its `error.<code>` phrase.
///
/// Without explicit data the error's own code is offered for substitution.
pub fn translate_error_code(
    store: &PhraseStore,
    default_lang: &str,
    warn: &dyn Fn(&str),
    lang: Option<&str>,
    error: &TranslatableError,
) -> String {
    let data = error.substitution_data();
    translate(
        store,
        default_lang,
        warn,
        lang,
        error.key().as_str(),
        Some(&data),
    )
}

/// Translate a data value before substitution: the value itself if it is an
/// error, or each error element if it is a list.
fn translate_nested_errors(
    store: &PhraseStore,
    default_lang: &str,
    warn: &dyn Fn(&str),
    lang: &str,
    value: &Param,
) -> Param {
    match value {
        Param::List(items) => Param::List(
            items
                .iter()
                .map(|item| translate_error(store, default_lang, warn, Some(lang), item))
                .collect(),
        ),
        other => translate_error(store, default_lang, warn, Some(lang), other),
    }
}

/// Replace every `${name}` in `text`, then every `$map{name:...}` if the
/// value is a list.
fn substitute(text: &str, name: &str, value: &Param) -> String {
    let text = text.replace(&format!("${{{}}}", name), &value.render());
    let Some(items) = value.as_list() else {
        return text;
    };

    template::parse(&text)
        .into_iter()
        .map(|segment| match segment {
            Segment::Map(ref projection) if projection.key == name => project(projection, items),
            other => other.raw().to_string(),
        })
        .collect()
}

/// Render a `$map{...}` projection over list elements.
///
/// Each element contributes its requested attributes concatenated with no
/// separator; an attribute the element lacks is rendered as its own name.
fn project(projection: &MapProjection<'_>, items: &[Param]) -> String {
    items
        .iter()
        .map(|item| {
            projection
                .attrs
                .iter()
                .map(|attr| item.attribute(attr).unwrap_or_else(|| attr.to_string()))
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(projection.delimiter)
}

/// A store, default language and warning sink bundled for repeated calls.
pub struct Translator<'a> {
    store: &'a PhraseStore,
    default_lang: &'a str,
    warn: &'a dyn Fn(&str),
}

impl<'a> Translator<'a> {
    pub fn new(store: &'a PhraseStore, default_lang: &'a str, warn: &'a dyn Fn(&str)) -> Self {
        Self {
            store,
            default_lang,
            warn,
        }
    }

    pub fn translate<'k>(
        &self,
        lang: Option<&str>,
        target: impl Into<Target<'k>>,
        data: Option<&Data>,
    ) -> String {
        translate(self.store, self.default_lang, self.warn, lang, target, data)
    }

    pub fn translate_error(&self, lang: Option<&str>, value: &Param) -> Param {
        translate_error(self.store, self.default_lang, self.warn, lang, value)
    }

    pub fn translate_error_code(&self, lang: Option<&str>, error: &TranslatableError) -> String {
        translate_error_code(self.store, self.default_lang, self.warn, lang, error)
    }
}
