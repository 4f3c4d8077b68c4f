//! Prometheus metrics for the resolution pipeline.
//!
//! Collectors are process-global; hosts register them with
//! [`all_metrics`] into whatever registry they expose.

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};

// =============================================================================
// Backends
// =============================================================================

/// Per-backend resolutions by result.
pub static BACKEND_RESOLUTIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "debridino_backend_resolutions_total",
            "Total per-backend resolutions",
        ),
        &["backend", "result"], // "ok", "error", "timeout"
    )
    .unwrap()
});

/// Per-backend resolution duration in seconds.
pub static BACKEND_RESOLUTION_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "debridino_backend_resolution_duration_seconds",
            "Duration of one backend's resolution of a batch",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["backend"],
    )
    .unwrap()
});

/// Releases that produced a resolved entry.
pub static RELEASES_RESOLVED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("debridino_releases_resolved_total", "Total releases resolved"),
        &["backend"], // "local" for releases resolved from their own file list
    )
    .unwrap()
});

// =============================================================================
// Filtering and parsing
// =============================================================================

/// Releases dropped by metadata validation.
pub static RELEASES_FILTERED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "debridino_releases_filtered_total",
            "Releases rejected by metadata validation",
        ),
        &["reason"], // "title", "season", "episode"
    )
    .unwrap()
});

/// Distinct strings sent to the parser per batch.
pub static PARSE_BATCH_SIZE: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "debridino_parse_batch_size",
            "Number of distinct strings parsed per batch",
        )
        .buckets(vec![1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0]),
        &["kind"], // "title", "file"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(BACKEND_RESOLUTIONS.clone()),
        Box::new(BACKEND_RESOLUTION_DURATION.clone()),
        Box::new(RELEASES_RESOLVED.clone()),
        Box::new(RELEASES_FILTERED.clone()),
        Box::new(PARSE_BATCH_SIZE.clone()),
    ]
}
