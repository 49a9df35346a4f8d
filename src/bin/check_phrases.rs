//! Phrase check binary - loads every package's phrase files and reports
//! inconsistencies between languages
//!
//! Usage:
//!   cargo run --bin check_phrases                  # Check LANG_PACKAGE_DIRS
//!   cargo run --bin check_phrases -- ./core ./ui   # Check the given package roots
//!
//! Optional:
//! - DEFAULT_LANG (defaults to en)
//! - LANG_PACKAGE_DIRS (defaults to .)
//!
//! Exits with an error when a translation references different placeholders
//! than the default language, or when the default language has no phrases.

use anyhow::Result;
use phrasebook::config::Config;
use phrasebook::i18n::{Data, Param, Translatable};
use phrasebook::service::LangService;
use serde_json::json;
use std::path::PathBuf;

/// A language lacking phrases that the default language has
struct MissingPhrases<'a> {
    lang: &'a str,
    count: usize,
}

impl Translatable for MissingPhrases<'_> {
    fn code(&self) -> &str {
        "MISSING_PHRASES"
    }

    fn data(&self) -> Option<Data> {
        Some(Data::new().with("lang", self.lang).with("count", self.count))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("phrasebook=warn".parse()?),
        )
        .init();

    let mut config = Config::from_env()?;
    let args: Vec<PathBuf> = std::env::args().skip(1).map(PathBuf::from).collect();
    if !args.is_empty() {
        config.package_dirs = args;
    }

    println!("Checking phrases in {:?}", config.package_dirs);
    let (service, load_report) = LangService::load(&config).await;
    let report = service.validate();
    let lang = Some(service.default_lang());

    let languages = Param::List(
        service
            .supported_languages()
            .into_iter()
            .map(|code| Param::from(json!({ "code": code })))
            .collect(),
    );
    println!(
        "{}",
        service.translate(lang, "app.languages", Some(&Data::new().with("languages", languages)))
    );
    println!(
        "{} phrases from {} files ({} files failed, {} entries skipped)",
        load_report.phrases_stored,
        load_report.files_loaded,
        load_report.files_failed,
        load_report.entries_skipped
    );

    for lang_report in &report.languages {
        if !lang_report.missing_keys.is_empty() {
            let missing = MissingPhrases {
                lang: &lang_report.lang,
                count: lang_report.missing_keys.len(),
            };
            println!("\n{}", service.translate_translatable(lang, &missing));
            for key in &lang_report.missing_keys {
                println!("  - {}", key);
            }
        }
        if !lang_report.extra_keys.is_empty() {
            println!(
                "\n'{}' has {} phrases unknown to '{}':",
                lang_report.lang,
                lang_report.extra_keys.len(),
                report.default_lang
            );
            for key in &lang_report.extra_keys {
                println!("  - {}", key);
            }
        }
        for (key, phrase_report) in &lang_report.phrases {
            for e in &phrase_report.errors {
                println!("  ✗ {}.{}: {}", lang_report.lang, key, e);
            }
            for w in &phrase_report.warnings {
                println!("  ! {}.{}: {}", lang_report.lang, key, w);
            }
        }
    }

    println!(
        "\n{} errors, {} warnings",
        report.error_count(),
        report.warning_count()
    );

    if !report.default_lang_loaded {
        anyhow::bail!("Default language '{}' has no phrases", report.default_lang);
    }
    if report.has_errors() {
        anyhow::bail!("{} phrase errors found", report.error_count());
    }
    println!("No phrase errors!");
    Ok(())
}
