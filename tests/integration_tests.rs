//! Integration tests for phrasebook
//!
//! These tests load phrase packages from disk, serve them over HTTP on an
//! ephemeral port and check the full request path, including translated
//! error responses.

use phrasebook::config::Config;
use phrasebook::i18n::{Data, Param, PhraseStore, TranslatableError};
use phrasebook::loader::load_phrases;
use phrasebook::server;
use phrasebook::service::LangService;
use reqwest::header::ACCEPT_LANGUAGE;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

// ==================== Test Helpers ====================

/// Create a package root containing the given `lang/` files
fn create_package(files: &[(&str, Value)]) -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let lang_dir = dir.path().join("lang");
    std::fs::create_dir(&lang_dir).expect("Failed to create lang dir");
    for (name, contents) in files {
        std::fs::write(lang_dir.join(name), contents.to_string())
            .expect("Failed to write phrase file");
    }
    dir
}

fn test_store() -> PhraseStore {
    let mut store = PhraseStore::new();
    for (key, value) in [
        ("en.app.hello", "Hello ${name}"),
        ("en.error.UNKNOWN_LANG", "Unknown language '${lang}'"),
        ("fr.app.hello", "Bonjour ${name}"),
        ("fr.error.UNKNOWN_LANG", "Langue inconnue « ${lang} »"),
    ] {
        store.store_strings(key, value).expect("valid key");
    }
    store
}

/// Serve the router on an ephemeral port and return its base URL
async fn spawn_app(store: PhraseStore) -> (String, Arc<LangService>) {
    let service = Arc::new(LangService::new(store, "en"));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("local addr");
    let app = server::router(service.clone());

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server error");
    });

    (format!("http://{}", addr), service)
}

// ==================== Loading Tests ====================

#[tokio::test]
async fn test_packages_merge_with_later_override() {
    let core = create_package(&[
        (
            "en.json",
            json!({"app.title": "Core", "error.NOT_FOUND": "Nothing at ${path}"}),
        ),
        ("fr.json", json!({"app.title": "Noyau"})),
    ]);
    let plugin = create_package(&[("en.json", json!({"app.title": "Plugin", "plugin.ready": "Ready"}))]);

    let mut store = PhraseStore::new();
    let report = load_phrases(
        &mut store,
        &[core.path().to_path_buf(), plugin.path().to_path_buf()],
    )
    .await;

    assert_eq!(report.files_loaded, 3);
    assert_eq!(store.supported_languages(), vec!["en", "fr"]);
    assert_eq!(store.lookup("en", "app.title"), Some("Plugin"));
    assert_eq!(store.lookup("fr", "app.title"), Some("Noyau"));
    assert_eq!(store.lookup("en", "plugin.ready"), Some("Ready"));
}

#[tokio::test]
async fn test_shipped_phrases_load_and_are_consistent() {
    let config = Config {
        default_lang: "en".to_string(),
        package_dirs: vec![PathBuf::from(env!("CARGO_MANIFEST_DIR"))],
        port: 8080,
    };

    let (service, report) = LangService::load(&config).await;

    assert_eq!(report.files_failed, 0);
    assert!(service.supported_languages().contains(&"en"));
    assert!(service.store().lookup("en", "error.UNKNOWN_LANG").is_some());

    let validation = service.validate();
    assert!(!validation.has_errors(), "{:?}", validation);
    assert_eq!(validation.warning_count(), 0, "{:?}", validation);
}

#[tokio::test]
async fn test_translate_loaded_phrases_end_to_end() {
    let pkg = create_package(&[(
        "en.json",
        json!({
            "app.summary": "${user} has ${count} errors: $map{errors:code,detail: | }",
            "app.failed": "Failed: ${err}",
            "error.QUOTA": "Quota of ${limit} exceeded",
            "error.GENERIC": "Error ${code}"
        }),
    )]);
    let mut store = PhraseStore::new();
    load_phrases(&mut store, &[pkg.path().to_path_buf()]).await;
    let service = LangService::new(store, "en");

    let errors = Param::from(json!([
        {"code": "E1", "detail": "(disk)"},
        {"code": "E2"}
    ]));
    let data = Data::new()
        .with("user", "ana")
        .with("count", 2)
        .with("errors", errors);
    assert_eq!(
        service.translate(None, "app.summary", Some(&data)),
        "ana has 2 errors: E1(disk) | E2detail"
    );

    let quota = TranslatableError::new("QUOTA").with_data(Data::new().with("limit", 10));
    let data = Data::new().with("err", quota);
    assert_eq!(
        service.translate(Some("en"), "app.failed", Some(&data)),
        "Failed: Quota of 10 exceeded"
    );

    assert_eq!(
        service.translate(Some("en"), &TranslatableError::new("GENERIC"), None),
        "Error GENERIC"
    );
}

// ==================== HTTP Tests ====================

#[tokio::test]
async fn test_get_phrases_for_language() {
    let (base, _service) = spawn_app(test_store()).await;

    let response = reqwest::get(format!("{}/api/lang/fr", base))
        .await
        .expect("request");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["app.hello"], "Bonjour ${name}");
    assert_eq!(body.as_object().map(|o| o.len()), Some(2));
}

#[tokio::test]
async fn test_unknown_language_is_translated_error() {
    let (base, service) = spawn_app(test_store()).await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/lang/de", base))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["code"], "UNKNOWN_LANG");
    assert_eq!(body["message"], "Unknown language 'de'");

    let response = client
        .get(format!("{}/api/lang/de", base))
        .header(ACCEPT_LANGUAGE, "fr-FR,fr;q=0.9")
        .send()
        .await
        .expect("request");
    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["message"], "Langue inconnue « de »");

    assert_eq!(service.metrics().unknown_language_requests(), 2);
}

#[tokio::test]
async fn test_negotiated_language_route() {
    let (base, _service) = spawn_app(test_store()).await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/lang", base))
        .header(ACCEPT_LANGUAGE, "de;q=0.9, fr-CA;q=0.8")
        .send()
        .await
        .expect("request");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["app.hello"], "Bonjour ${name}");

    // No header: the first loaded language
    let body: Value = client
        .get(format!("{}/api/lang", base))
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("json body");
    assert_eq!(body["app.hello"], "Hello ${name}");
}

#[tokio::test]
async fn test_negotiation_without_match_is_unknown_language() {
    let (base, _service) = spawn_app(test_store()).await;

    let response = reqwest::Client::new()
        .get(format!("{}/api/lang", base))
        .header(ACCEPT_LANGUAGE, "ja")
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["message"], "Unknown language 'ja'");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let (base, _service) = spawn_app(test_store()).await;

    reqwest::get(format!("{}/api/lang/en", base))
        .await
        .expect("request");
    reqwest::get(format!("{}/api/lang/xx", base))
        .await
        .expect("request");

    let report: Value = reqwest::get(format!("{}/api/lang/metrics", base))
        .await
        .expect("request")
        .json()
        .await
        .expect("json body");

    assert_eq!(report["phrase_table_requests"], 1);
    assert_eq!(report["unknown_language_requests"], 1);
    // The unknown-language message is the only translate call
    assert_eq!(report["lookups"], 1);
    assert_eq!(report["missing_keys"], 0);
}
