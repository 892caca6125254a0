//! Observability for the fingerprint engine
//!
//! Prometheus instruments for ingestion volume, eviction pressure, drift
//! alert counts, and record latency. Structured log events are emitted
//! inline by the engine via `tracing`.

use prometheus::{register_histogram, register_int_gauge, Histogram, IntGauge};
use std::sync::OnceLock;

/// Histogram buckets for record latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.000001, 0.000005, 0.00001, 0.000025, 0.00005, 0.0001, 0.00025, 0.0005, 0.001, 0.0025, 0.005,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<EngineMetricsInner> = OnceLock::new();

/// Inner metrics structure that holds the actual Prometheus instruments
struct EngineMetricsInner {
    record_latency_seconds: Histogram,
    samples_recorded: IntGauge,
    samples_evicted: IntGauge,
    samples_retained: IntGauge,
    fingerprints_tracked: IntGauge,
    drift_alerts_emitted: IntGauge,
}

impl EngineMetricsInner {
    fn new() -> Self {
        Self {
            record_latency_seconds: register_histogram!(
                "fingerprint_engine_record_latency_seconds",
                "Time spent ingesting a sample and refreshing its fingerprint",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register record_latency_seconds"),

            samples_recorded: register_int_gauge!(
                "fingerprint_engine_samples_recorded_total",
                "Total number of samples recorded"
            )
            .expect("Failed to register samples_recorded_total"),

            samples_evicted: register_int_gauge!(
                "fingerprint_engine_samples_evicted_total",
                "Total number of samples evicted by the global retention cap"
            )
            .expect("Failed to register samples_evicted_total"),

            samples_retained: register_int_gauge!(
                "fingerprint_engine_samples_retained",
                "Samples currently retained across all services"
            )
            .expect("Failed to register samples_retained"),

            fingerprints_tracked: register_int_gauge!(
                "fingerprint_engine_fingerprints_tracked",
                "Services with a live fingerprint"
            )
            .expect("Failed to register fingerprints_tracked"),

            drift_alerts_emitted: register_int_gauge!(
                "fingerprint_engine_drift_alerts_total",
                "Total number of drift alerts returned to callers"
            )
            .expect("Failed to register drift_alerts_total"),
        }
    }
}

/// Engine metrics for Prometheus exposition
///
/// Lightweight handle to the global metrics instance; clones share the
/// same underlying instruments.
#[derive(Clone)]
pub struct EngineMetrics {
    _private: (),
}

impl Default for EngineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineMetrics {
    /// Create a metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(EngineMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &EngineMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    /// Record a sample-ingestion latency observation
    pub fn observe_record_latency(&self, duration_secs: f64) {
        self.inner().record_latency_seconds.observe(duration_secs);
    }

    /// Increment the recorded-sample counter
    pub fn inc_samples_recorded(&self) {
        self.inner().samples_recorded.inc();
    }

    /// Increment the eviction counter
    pub fn inc_samples_evicted(&self) {
        self.inner().samples_evicted.inc();
    }

    /// Update retained-sample and fingerprint gauges
    pub fn set_retention(&self, samples_retained: i64, fingerprints_tracked: i64) {
        self.inner().samples_retained.set(samples_retained);
        self.inner().fingerprints_tracked.set(fingerprints_tracked);
    }

    /// Add to the drift-alert counter
    pub fn add_drift_alerts(&self, count: i64) {
        self.inner().drift_alerts_emitted.add(count);
    }
}
