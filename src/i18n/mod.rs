//! Internationalization (i18n): phrase storage and translation.
//!
//! Phrase files from many independently versioned packages are merged into one
//! [`PhraseStore`]; the [`translator`] resolves a key (or a translatable error)
//! plus substitution data into the final display string.
//!
//! # Architecture
//!
//! - `store`: Merged `language -> key -> template` tables
//! - `params`: Substitution data and the translatable-error capability
//! - `template`: Tokenizer for `${name}` and `$map{name:attrs:delimiter}`
//! - `translator`: Lookup, substitution and recursive error translation
//! - `negotiate`: Accept-Language negotiation against the loaded languages
//! - `validator`: Consistency checks across languages
//! - `metrics`: Lookup counters
//!
//! # Example
//!
//! ```rust
//! use phrasebook::i18n::{translate, Data, PhraseStore};
//!
//! let mut store = PhraseStore::new();
//! store.store_strings("en.app.hello", "Hello ${name}").unwrap();
//!
//! let data = Data::new().with("name", "John");
//! let text = translate(&store, "en", &|_| {}, Some("en"), "app.hello", Some(&data));
//! assert_eq!(text, "Hello John");
//! ```

mod metrics;
mod negotiate;
mod params;
mod store;
pub mod template;
mod translator;
mod validator;

pub use metrics::{LangMetrics, MetricsReport};
pub use negotiate::negotiate;
pub use params::{Data, Param, Translatable, TranslatableError};
pub use store::{PhraseStore, PhraseTable, StoreError};
pub use translator::{translate, translate_error, translate_error_code, Target, Translator};
pub use validator::{LanguageReport, PhraseValidator, StoreReport, ValidationReport};
