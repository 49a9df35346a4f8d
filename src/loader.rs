//! Loading package phrase files into a [`PhraseStore`].
//!
//! Each package root may contain a `lang/` directory with one JSON file per
//! language (`lang/en.json`, `lang/fr.json`, ...). A file holds a flat object of
//! qualified keys to templates:
//!
//! ```json
//! { "app.hello": "Hello ${name}", "error.NOT_FOUND": "Nothing at ${path}" }
//! ```
//!
//! Files are read concurrently; ingestion then happens in package order and,
//! within a package, in file-name order, so a later package overrides an
//! earlier one for the same key.

use crate::i18n::PhraseStore;
use futures::future::join_all;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Directory inside a package that holds its phrase files
pub const LANG_DIR: &str = "lang";

/// Errors for a single phrase file. The file is skipped, loading continues.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{} must contain a JSON object of phrases", path.display())]
    NotAnObject { path: PathBuf },
}

/// Summary of a load run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Phrase files ingested successfully
    pub files_loaded: usize,

    /// Phrase files skipped because of an error
    pub files_failed: usize,

    /// Phrases stored (including overrides)
    pub phrases_stored: usize,

    /// Entries skipped: non-string values or malformed keys
    pub entries_skipped: usize,
}

/// Load the phrase files of every package into the store.
///
/// # Arguments
/// * `store` - The store to merge into
/// * `package_dirs` - Package root directories, lowest precedence first
///
/// # Returns
/// A `LoadReport` describing what was loaded. Individual file failures are
/// logged and counted; they never abort the load.
pub async fn load_phrases(store: &mut PhraseStore, package_dirs: &[PathBuf]) -> LoadReport {
    let mut report = LoadReport::default();

    let listings = join_all(package_dirs.iter().map(|dir| list_phrase_files(dir))).await;
    let files: Vec<PathBuf> = listings.into_iter().flatten().collect();

    let contents = join_all(files.iter().map(|path| read_phrase_file(path))).await;

    for (path, result) in files.iter().zip(contents) {
        let lang = match language_of(path) {
            Some(lang) => lang,
            None => {
                warn!("Skipping phrase file with unusable name: {}", path.display());
                report.files_failed += 1;
                continue;
            }
        };

        match result {
            Ok(phrases) => {
                ingest(store, lang, phrases, &mut report);
                report.files_loaded += 1;
                debug!("Loaded phrases from {}", path.display());
            }
            Err(e) => {
                error!("{}", e);
                report.files_failed += 1;
            }
        }
    }

    info!(
        "Loaded {} phrases from {} files ({} failed) for languages {:?}",
        report.phrases_stored,
        report.files_loaded,
        report.files_failed,
        store.supported_languages()
    );
    report
}

/// List `<dir>/lang/*.json`, sorted by file name.
///
/// A package without a `lang/` directory simply contributes nothing.
async fn list_phrase_files(dir: &Path) -> Vec<PathBuf> {
    let lang_dir = dir.join(LANG_DIR);
    let mut entries = match tokio::fs::read_dir(&lang_dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No {} directory in {}", LANG_DIR, dir.display());
            return Vec::new();
        }
        Err(e) => {
            error!("Failed to list {}: {}", lang_dir.display(), e);
            return Vec::new();
        }
    };

    let mut files = Vec::new();
    loop {
        match entries.next_entry().await {
            Ok(Some(entry)) => {
                let path = entry.path();
                let is_json = path.extension().is_some_and(|ext| ext == "json");
                let is_file = tokio::fs::metadata(&path)
                    .await
                    .map(|meta| meta.is_file())
                    .unwrap_or(false);
                if is_json && is_file {
                    files.push(path);
                }
            }
            Ok(None) => break,
            Err(e) => {
                error!("Failed to list {}: {}", lang_dir.display(), e);
                break;
            }
        }
    }
    files.sort();
    files
}

/// Read and parse one phrase file.
pub async fn read_phrase_file(path: &Path) -> Result<Map<String, Value>, LoadError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(phrases)) => Ok(phrases),
        Ok(_) => Err(LoadError::NotAnObject {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(LoadError::Parse {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// The language of a phrase file is its file stem (`lang/fr.json` -> `fr`).
fn language_of(path: &Path) -> Option<&str> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty() && !stem.contains('.'))
}

fn ingest(store: &mut PhraseStore, lang: &str, phrases: Map<String, Value>, report: &mut LoadReport) {
    for (key, value) in phrases {
        let Value::String(phrase) = value else {
            warn!("Skipping non-string phrase '{}.{}'", lang, key);
            report.entries_skipped += 1;
            continue;
        };

        match store.store_strings(&format!("{}.{}", lang, key), phrase) {
            Ok(()) => report.phrases_stored += 1,
            Err(e) => {
                warn!("Skipping phrase: {}", e);
                report.entries_skipped += 1;
            }
        }
    }
}
