//! Metrics and observability utilities
//!
//! Provides metric descriptions and recording helpers for the
//! curriculum engine, with standardized naming conventions.

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Unit};

/// Metrics prefix for all LearnPilot metrics
pub const METRICS_PREFIX: &str = "learnpilot";

/// Histogram buckets for graph build latency (in seconds).
/// Batches are tens of papers, so builds are expected well under 10ms.
pub const BUILD_BUCKETS: &[f64] = &[
    0.0001, // 100us
    0.0005, // 500us
    0.001,  // 1ms
    0.005,  // 5ms
    0.010,  // 10ms
    0.050,  // 50ms
    0.100,  // 100ms
    0.500,  // 500ms
    1.000,  // 1s
];

/// Register all metric descriptions
pub fn register_metrics() {
    describe_counter!(
        format!("{}_graphs_built_total", METRICS_PREFIX),
        Unit::Count,
        "Total dependency graphs built"
    );

    describe_gauge!(
        format!("{}_graph_nodes", METRICS_PREFIX),
        Unit::Count,
        "Papers in the most recently built graph"
    );

    describe_gauge!(
        format!("{}_graph_edges", METRICS_PREFIX),
        Unit::Count,
        "Dependency edges in the most recently built graph"
    );

    describe_histogram!(
        format!("{}_graph_build_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Dependency graph build latency in seconds"
    );

    describe_counter!(
        format!("{}_reading_order_fallbacks_total", METRICS_PREFIX),
        Unit::Count,
        "Reading orders that fell back to insertion order because of a cycle"
    );

    describe_counter!(
        format!("{}_complexity_analyses_total", METRICS_PREFIX),
        Unit::Count,
        "Total per-paper complexity analyses"
    );

    tracing::info!("Metrics registered");
}

/// Helper to record a completed graph build
pub fn record_graph_build(duration_secs: f64, node_count: usize, edge_count: usize) {
    counter!(format!("{}_graphs_built_total", METRICS_PREFIX)).increment(1);

    gauge!(format!("{}_graph_nodes", METRICS_PREFIX)).set(node_count as f64);
    gauge!(format!("{}_graph_edges", METRICS_PREFIX)).set(edge_count as f64);

    histogram!(format!("{}_graph_build_duration_seconds", METRICS_PREFIX)).record(duration_secs);
}

/// Helper to record a reading-order resolution
pub fn record_reading_order(resolved: bool) {
    if !resolved {
        counter!(format!("{}_reading_order_fallbacks_total", METRICS_PREFIX)).increment(1);
    }
}

/// Helper to record complexity analyses
pub fn record_complexity_analyses(count: usize, level: &str) {
    counter!(
        format!("{}_complexity_analyses_total", METRICS_PREFIX),
        "level" => level.to_string()
    )
    .increment(count as u64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_buckets_sorted() {
        let mut prev = 0.0;
        for &bucket in BUILD_BUCKETS {
            assert!(bucket > prev);
            prev = bucket;
        }
    }

    #[test]
    fn test_recording_without_recorder() {
        // No global recorder installed: every helper must be a no-op
        register_metrics();
        record_graph_build(0.002, 3, 2);
        record_reading_order(false);
        record_complexity_analyses(3, "low");
    }
}
