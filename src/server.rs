//! HTTP surface: per-language phrase tables and request translation.
//!
//! Routes:
//! - `GET /api/lang` - phrase table for the language negotiated from `Accept-Language`
//! - `GET /api/lang/metrics` - lookup metrics
//! - `GET /api/lang/:lang` - phrase table for an explicit language
//!
//! Every request passes through [`add_translation_utils`], which attaches a
//! [`RequestTranslator`] bound to the request's negotiated language.

use crate::i18n::{Data, MetricsReport, PhraseTable, Target, Translatable};
use crate::service::LangService;
use axum::{
    extract::{Path, Request, State},
    http::{header::ACCEPT_LANGUAGE, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::debug;

/// Build the application router.
pub fn router(service: Arc<LangService>) -> Router {
    Router::new()
        .route("/api/lang", get(negotiated_phrases))
        .route("/api/lang/metrics", get(metrics))
        .route("/api/lang/:lang", get(phrases_for_lang))
        .layer(middleware::from_fn_with_state(
            service.clone(),
            add_translation_utils,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Translator bound to the language negotiated for one request.
#[derive(Clone)]
pub struct RequestTranslator {
    service: Arc<LangService>,
    lang: Option<String>,
}

impl RequestTranslator {
    pub fn new(service: Arc<LangService>, lang: Option<String>) -> Self {
        Self { service, lang }
    }

    /// The negotiated language, if any loaded language was acceptable
    pub fn lang(&self) -> Option<&str> {
        self.lang.as_deref()
    }

    /// Translate in the request's language (default language if none matched).
    pub fn translate<'k>(&self, target: impl Into<Target<'k>>, data: Option<&Data>) -> String {
        self.service.translate(self.lang(), target, data)
    }

    /// Translate an error in the request's language.
    pub fn translate_error<E: Translatable + ?Sized>(&self, error: &E) -> String {
        self.service.translate_translatable(self.lang(), error)
    }
}

/// Attach a [`RequestTranslator`] to the request.
pub async fn add_translation_utils(
    State(service): State<Arc<LangService>>,
    mut req: Request,
    next: Next,
) -> Response {
    let accept_language = req
        .headers()
        .get(ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok());
    let lang = service.negotiate(accept_language);
    debug!("Negotiated language {:?} from {:?}", lang, accept_language);

    req.extensions_mut()
        .insert(RequestTranslator::new(service.clone(), lang));
    next.run(req).await
}

/// Errors reported to API clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unknown language '{lang}'")]
    UnknownLang { lang: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::UnknownLang { .. } => StatusCode::NOT_FOUND,
        }
    }
}

impl Translatable for ApiError {
    fn code(&self) -> &str {
        match self {
            ApiError::UnknownLang { .. } => "UNKNOWN_LANG",
        }
    }

    fn data(&self) -> Option<Data> {
        match self {
            ApiError::UnknownLang { lang } => Some(Data::new().with("lang", lang.as_str())),
        }
    }
}

/// JSON body of an error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

/// An [`ApiError`] translated into the requester's language.
#[derive(Debug)]
pub struct TranslatedError {
    status: StatusCode,
    body: ErrorBody,
}

impl TranslatedError {
    pub fn new(error: &ApiError, translator: &RequestTranslator) -> Self {
        Self {
            status: error.status(),
            body: ErrorBody {
                code: error.code().to_string(),
                message: translator.translate_error(error),
            },
        }
    }
}

impl IntoResponse for TranslatedError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

async fn phrases_for_lang(
    State(service): State<Arc<LangService>>,
    Extension(translator): Extension<RequestTranslator>,
    Path(lang): Path<String>,
) -> Result<Json<PhraseTable>, TranslatedError> {
    phrase_table(&service, &translator, &lang)
}

async fn negotiated_phrases(
    State(service): State<Arc<LangService>>,
    Extension(translator): Extension<RequestTranslator>,
    headers: HeaderMap,
) -> Result<Json<PhraseTable>, TranslatedError> {
    match translator.lang() {
        Some(lang) => phrase_table(&service, &translator, lang),
        None => {
            let requested = headers
                .get(ACCEPT_LANGUAGE)
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default();
            Err(unknown_language(&service, &translator, requested))
        }
    }
}

async fn metrics(State(service): State<Arc<LangService>>) -> Json<MetricsReport> {
    Json(service.metrics().report())
}

fn phrase_table(
    service: &LangService,
    translator: &RequestTranslator,
    lang: &str,
) -> Result<Json<PhraseTable>, TranslatedError> {
    match service.phrases_for(lang) {
        Some(table) => {
            service.metrics().record_phrase_table_request();
            Ok(Json(table.clone()))
        }
        None => Err(unknown_language(service, translator, lang)),
    }
}

fn unknown_language(
    service: &LangService,
    translator: &RequestTranslator,
    lang: &str,
) -> TranslatedError {
    service.metrics().record_unknown_language();
    let error = ApiError::UnknownLang {
        lang: lang.to_string(),
    };
    debug!("{}", error);
    TranslatedError::new(&error, translator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::PhraseStore;

    fn service() -> Arc<LangService> {
        let mut store = PhraseStore::new();
        store
            .store_strings("en.error.UNKNOWN_LANG", "Unknown language '${lang}'")
            .unwrap();
        store
            .store_strings("fr.error.UNKNOWN_LANG", "Langue inconnue « ${lang} »")
            .unwrap();
        Arc::new(LangService::new(store, "en"))
    }

    #[test]
    fn test_api_error_is_translatable() {
        let error = ApiError::UnknownLang {
            lang: "xx".to_string(),
        };
        assert_eq!(error.code(), "UNKNOWN_LANG");
        assert_eq!(error.status(), StatusCode::NOT_FOUND);
        assert_eq!(error.to_string(), "unknown language 'xx'");
    }

    #[test]
    fn test_translated_error_uses_request_language() {
        let service = service();
        let error = ApiError::UnknownLang {
            lang: "xx".to_string(),
        };

        let fr = TranslatedError::new(&error, &RequestTranslator::new(service.clone(), Some("fr".into())));
        assert_eq!(fr.body.message, "Langue inconnue « xx »");
        assert_eq!(fr.body.code, "UNKNOWN_LANG");

        let default = TranslatedError::new(&error, &RequestTranslator::new(service, None));
        assert_eq!(default.body.message, "Unknown language 'xx'");
    }

    #[test]
    fn test_request_translator_translates_keys() {
        let translator = RequestTranslator::new(service(), Some("fr".to_string()));
        assert_eq!(translator.lang(), Some("fr"));
        assert_eq!(translator.translate("app.none", None), "app.none");
    }

    #[test]
    fn test_unknown_language_is_counted() {
        let service = service();
        let translator = RequestTranslator::new(service.clone(), None);

        assert!(phrase_table(&service, &translator, "de").is_err());
        assert!(phrase_table(&service, &translator, "en").is_ok());

        assert_eq!(service.metrics().unknown_language_requests(), 1);
        assert_eq!(service.metrics().phrase_table_requests(), 1);
    }
}
