//! Lookup metrics and observability.
//!
//! Counts phrase lookups, missing phrases and phrase-table requests so the
//! service can report how well its loaded languages cover what is asked of it.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters shared by every request handled by the service.
#[derive(Debug, Default)]
pub struct LangMetrics {
    /// Number of translate calls (errors included)
    lookups: AtomicUsize,

    /// Number of lookups that fell back to the raw key
    missing_keys: AtomicUsize,

    /// Number of phrase tables served
    phrase_table_requests: AtomicUsize,

    /// Number of phrase-table requests for a language that isn't loaded
    unknown_language_requests: AtomicUsize,
}

impl LangMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a translate call.
    pub fn record_lookup(&self) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a phrase that could not be found.
    pub fn record_missing_key(&self) {
        self.missing_keys.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a phrase table being served.
    pub fn record_phrase_table_request(&self) {
        self.phrase_table_requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a request for an unknown language.
    pub fn record_unknown_language(&self) {
        self.unknown_language_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }

    pub fn missing_keys(&self) -> usize {
        self.missing_keys.load(Ordering::Relaxed)
    }

    pub fn phrase_table_requests(&self) -> usize {
        self.phrase_table_requests.load(Ordering::Relaxed)
    }

    pub fn unknown_language_requests(&self) -> usize {
        self.unknown_language_requests.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    ///
    /// Nested error translations can log more missing keys than there were
    /// lookups, so the hit rate is clamped at zero.
    pub fn report(&self) -> MetricsReport {
        let lookups = self.lookups();
        let missing = self.missing_keys();
        let hit_rate = if lookups > 0 {
            (lookups.saturating_sub(missing) as f64 / lookups as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            lookups,
            missing_keys: missing,
            hit_rate,
            phrase_table_requests: self.phrase_table_requests(),
            unknown_language_requests: self.unknown_language_requests(),
        }
    }
}

/// Metrics report containing current lookup statistics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    /// Number of translate calls
    pub lookups: usize,

    /// Number of missing phrases
    pub missing_keys: usize,

    /// Share of lookups that found a phrase, as a percentage (0-100)
    pub hit_rate: f64,

    /// Number of phrase tables served
    pub phrase_table_requests: usize,

    /// Number of requests for unknown languages
    pub unknown_language_requests: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Counter Tests ====================

    #[test]
    fn test_record_lookup() {
        let metrics = LangMetrics::new();

        assert_eq!(metrics.lookups(), 0);
        metrics.record_lookup();
        assert_eq!(metrics.lookups(), 1);
        metrics.record_lookup();
        assert_eq!(metrics.lookups(), 2);
    }

    #[test]
    fn test_record_missing_key() {
        let metrics = LangMetrics::new();

        assert_eq!(metrics.missing_keys(), 0);
        metrics.record_missing_key();
        assert_eq!(metrics.missing_keys(), 1);
    }

    #[test]
    fn test_record_phrase_table_and_unknown_language() {
        let metrics = LangMetrics::new();

        metrics.record_phrase_table_request();
        metrics.record_phrase_table_request();
        metrics.record_unknown_language();

        assert_eq!(metrics.phrase_table_requests(), 2);
        assert_eq!(metrics.unknown_language_requests(), 1);
    }

    // ==================== Report Tests ====================

    #[test]
    fn test_report_empty() {
        let report = LangMetrics::new().report();

        assert_eq!(report.lookups, 0);
        assert_eq!(report.missing_keys, 0);
        assert_eq!(report.hit_rate, 0.0);
        assert_eq!(report.phrase_table_requests, 0);
        assert_eq!(report.unknown_language_requests, 0);
    }

    #[test]
    fn test_report_hit_rate() {
        let metrics = LangMetrics::new();

        // 4 lookups, 1 missing = 75% hit rate
        for _ in 0..4 {
            metrics.record_lookup();
        }
        metrics.record_missing_key();

        let report = metrics.report();
        assert_eq!(report.lookups, 4);
        assert_eq!(report.missing_keys, 1);
        assert_eq!(report.hit_rate, 75.0);
    }

    #[test]
    fn test_report_hit_rate_never_negative() {
        let metrics = LangMetrics::new();

        metrics.record_lookup();
        metrics.record_missing_key();
        metrics.record_missing_key();

        assert_eq!(metrics.report().hit_rate, 0.0);
    }

    #[test]
    fn test_report_serializes() {
        let metrics = LangMetrics::new();
        metrics.record_lookup();

        let json = serde_json::to_value(metrics.report()).expect("serialize");
        assert_eq!(json["lookups"], 1);
        assert_eq!(json["hit_rate"], 100.0);
    }
}
