//! Prometheus metrics for the posting engine.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, HistogramVec, TextEncoder,
};

/// Database query duration histogram.
pub static DB_QUERY_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "ledger_db_query_duration_seconds",
        "Database query duration in seconds",
        &["operation"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
    )
    .expect("Failed to register db_query_duration")
});

/// Journal entries posted, by outcome.
pub static ENTRIES_POSTED: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "ledger_entries_posted_total",
        "Journal entries posted by the import pipeline",
        &["status"] // posted, rejected
    )
    .expect("Failed to register entries_posted")
});

/// Incoming records skipped as duplicates.
pub static DUPLICATES_SKIPPED: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "ledger_duplicates_skipped_total",
        "Incoming transactions dropped by the duplicate filter",
        &["source"]
    )
    .expect("Failed to register duplicates_skipped")
});

/// Error counter for alerting.
pub static ERRORS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "ledger_errors_total",
        "Total number of errors by type",
        &["error_type"] // db_error, validation_error, dedup_fail_open
    )
    .expect("Failed to register errors_total")
});

/// Initialize all metrics (forces lazy initialization).
pub fn init_metrics() {
    Lazy::force(&DB_QUERY_DURATION);
    Lazy::force(&ENTRIES_POSTED);
    Lazy::force(&DUPLICATES_SKIPPED);
    Lazy::force(&ERRORS_TOTAL);
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder
        .encode_to_string(&metric_families)
        .unwrap_or_default()
}
