//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Ingestion (slot assignments, drops)
//! - Commands (per command name and outcome)
//! - Export runs

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, IntCounterVec, Opts};

/// Ingest events by result.
pub static INGEST_EVENTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("replayq_ingest_events_total", "Total ingest events"),
        &["result"], // "assigned", "pool_full", "ignored"
    )
    .unwrap()
});

/// Commands executed by name and outcome.
pub static COMMANDS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("replayq_commands_total", "Total commands executed"),
        &["command", "result"], // result: "ok", "error"
    )
    .unwrap()
});

/// Export runs by result.
pub static EXPORTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("replayq_exports_total", "Total export runs"),
        &["result"], // "success", "failed"
    )
    .unwrap()
});

/// Export duration in seconds.
pub static EXPORT_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new("replayq_export_duration_seconds", "Duration of export runs")
            .buckets(vec![0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0]),
    )
    .unwrap()
});

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(INGEST_EVENTS.clone()),
        Box::new(COMMANDS_TOTAL.clone()),
        Box::new(EXPORTS_TOTAL.clone()),
        Box::new(EXPORT_DURATION.clone()),
    ]
}
