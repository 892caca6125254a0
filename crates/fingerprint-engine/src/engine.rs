//! Workload fingerprint engine
//!
//! Owns the sample store and the per-service fingerprint table and exposes
//! the call-level API consumed by dashboards and alert pipelines. Every
//! method completes synchronously. The engine is shared explicitly by its
//! callers; under concurrency it needs exclusive-writer discipline, since
//! recording a sample can touch any service's fingerprint through global
//! eviction. One lock around the instance is sufficient.

use crate::config::EngineConfig;
use crate::drift::DriftDetector;
use crate::lifecycle;
use crate::models::{
    DriftAlert, EngineStats, FingerprintStatus, NewSample, WorkloadFingerprint, WorkloadSample,
    WorkloadType,
};
use crate::observability::EngineMetrics;
use crate::stats::{self, WindowStats};
use crate::store::SampleStore;
use chrono::Utc;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// In-memory fingerprint and drift detection engine
pub struct FingerprintEngine {
    config: EngineConfig,
    store: SampleStore,
    fingerprints: HashMap<String, WorkloadFingerprint>,
    detector: DriftDetector,
    metrics: EngineMetrics,
}

impl FingerprintEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            store: SampleStore::new(config.max_samples),
            detector: DriftDetector::new(config.drift_threshold_pct),
            fingerprints: HashMap::new(),
            metrics: EngineMetrics::new(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Record one utilization sample for a service.
    ///
    /// Never fails: unset metrics default to zero and no validation is
    /// applied. Refreshes the owning service's fingerprint, and the evicted
    /// sample's service when the global retention cap is hit.
    pub fn record_sample(&mut self, service: &str, input: NewSample) -> WorkloadSample {
        let started = Instant::now();

        let sample = WorkloadSample {
            id: Uuid::new_v4().to_string(),
            service: service.to_string(),
            workload_type: input.workload_type,
            cpu_pct: input.cpu_pct,
            memory_pct: input.memory_pct,
            request_rate: input.request_rate,
            error_rate: input.error_rate,
            latency_p99_ms: input.latency_p99_ms,
            metadata: input.metadata,
            timestamp: Utc::now().timestamp(),
        };
        let recorded = sample.clone();

        if let Some(evicted) = self.store.push(sample) {
            self.metrics.inc_samples_evicted();
            debug!(
                service = %evicted.service,
                sample_id = %evicted.id,
                "Evicted oldest sample at retention cap"
            );
            if evicted.service != service {
                self.refresh_fingerprint(&evicted.service);
            }
        }
        self.refresh_fingerprint(service);

        self.metrics.inc_samples_recorded();
        self.metrics
            .set_retention(self.store.len() as i64, self.fingerprints.len() as i64);
        self.metrics
            .observe_record_latency(started.elapsed().as_secs_f64());

        debug!(
            service = %service,
            sample_id = %recorded.id,
            cpu_pct = recorded.cpu_pct,
            memory_pct = recorded.memory_pct,
            request_rate = recorded.request_rate,
            "Recorded workload sample"
        );
        recorded
    }

    /// Compare a service's most recent sample against its fingerprint.
    ///
    /// Read-only: neither the sample store nor the fingerprint table is
    /// modified. Unknown services yield an empty result, never an error.
    pub fn check_drift(&self, service: &str) -> Vec<DriftAlert> {
        let Some(fingerprint) = self.fingerprints.get(service) else {
            return Vec::new();
        };
        let Some(latest) = self.store.latest_for(service) else {
            return Vec::new();
        };

        let alerts = self.detector.detect(fingerprint, latest);
        if !alerts.is_empty() {
            self.metrics.add_drift_alerts(alerts.len() as i64);
            for alert in &alerts {
                warn!(
                    service = %service,
                    metric = %alert.metric,
                    expected = alert.expected_value,
                    observed = alert.observed_value,
                    deviation_pct = alert.deviation_pct,
                    "Workload drift detected"
                );
            }
        }
        alerts
    }

    /// Fingerprint for a service, if it has any retained samples
    pub fn get_fingerprint(&self, service: &str) -> Option<WorkloadFingerprint> {
        self.fingerprints.get(service).cloned()
    }

    /// Fingerprints matching the given filters, ordered by service name
    pub fn list_fingerprints(
        &self,
        status: Option<FingerprintStatus>,
        workload_type: Option<WorkloadType>,
    ) -> Vec<WorkloadFingerprint> {
        let mut fingerprints: Vec<WorkloadFingerprint> = self
            .fingerprints
            .values()
            .filter(|fp| status.map_or(true, |s| fp.status == s))
            .filter(|fp| workload_type.map_or(true, |t| fp.workload_type == t))
            .cloned()
            .collect();
        fingerprints.sort_by(|a, b| a.service.cmp(&b.service));
        fingerprints
    }

    /// Reclassify a service's fingerprint; `None` if it does not exist.
    ///
    /// Never creates a fingerprint: classification without samples has no
    /// baseline to attach to.
    pub fn set_workload_type(
        &mut self,
        service: &str,
        workload_type: WorkloadType,
    ) -> Option<WorkloadFingerprint> {
        let fingerprint = self.fingerprints.get_mut(service)?;
        fingerprint.workload_type = workload_type;
        info!(
            service = %service,
            workload_type = ?workload_type,
            "Reclassified workload fingerprint"
        );
        Some(fingerprint.clone())
    }

    /// Retained samples for a service, newest first, optionally capped
    pub fn get_samples(&self, service: &str, limit: Option<usize>) -> Vec<WorkloadSample> {
        self.store.recent_for(service, limit)
    }

    /// Remove all retained samples for a service along with its fingerprint,
    /// returning the number of samples removed
    pub fn clear_samples(&mut self, service: &str) -> usize {
        let removed = self.store.clear_service(service);
        if self.fingerprints.remove(service).is_some() {
            info!(
                service = %service,
                samples_removed = removed,
                "Cleared service samples and fingerprint"
            );
        }
        self.metrics
            .set_retention(self.store.len() as i64, self.fingerprints.len() as i64);
        removed
    }

    /// Summary counters across all services
    pub fn get_stats(&self) -> EngineStats {
        let mut stable_count = 0;
        let mut drifted_count = 0;
        let mut learning_count = 0;
        for fingerprint in self.fingerprints.values() {
            match fingerprint.status {
                FingerprintStatus::Stable => stable_count += 1,
                FingerprintStatus::Drifted => drifted_count += 1,
                FingerprintStatus::Learning => learning_count += 1,
                FingerprintStatus::Unknown => {}
            }
        }

        let cpu_means: Vec<f64> = self.fingerprints.values().map(|fp| fp.cpu_mean).collect();
        let memory_means: Vec<f64> = self
            .fingerprints
            .values()
            .map(|fp| fp.memory_mean)
            .collect();

        EngineStats {
            total_samples: self.store.len(),
            total_fingerprints: self.fingerprints.len(),
            stable_count,
            drifted_count,
            learning_count,
            avg_cpu: stats::mean(&cpu_means),
            avg_memory: stats::mean(&memory_means),
        }
    }

    /// Recompute a service's fingerprint from its retained window.
    ///
    /// Deletes the fingerprint when the window is empty; creates it at
    /// `Learning` when the first sample for the service arrives.
    fn refresh_fingerprint(&mut self, service: &str) {
        let window = self.store.service_window(service);
        let Some(window_stats) = WindowStats::from_window(&window) else {
            if self.fingerprints.remove(service).is_some() {
                info!(service = %service, "Removed fingerprint with no retained samples");
            }
            return;
        };
        let initial_type = window.first().map(|s| s.workload_type).unwrap_or_default();

        let fingerprint = self
            .fingerprints
            .entry(service.to_string())
            .or_insert_with(|| WorkloadFingerprint {
                id: Uuid::new_v4().to_string(),
                service: service.to_string(),
                workload_type: initial_type,
                status: FingerprintStatus::Learning,
                sample_count: 0,
                cpu_mean: 0.0,
                cpu_stddev: 0.0,
                memory_mean: 0.0,
                memory_stddev: 0.0,
                request_rate_mean: 0.0,
                created_at: Utc::now().timestamp(),
            });

        fingerprint.sample_count = window_stats.sample_count;
        fingerprint.cpu_mean = window_stats.cpu_mean;
        fingerprint.cpu_stddev = window_stats.cpu_stddev;
        fingerprint.memory_mean = window_stats.memory_mean;
        fingerprint.memory_stddev = window_stats.memory_stddev;
        fingerprint.request_rate_mean = window_stats.request_rate_mean;

        let previous = fingerprint.status;
        fingerprint.status = lifecycle::on_window_update(
            previous,
            fingerprint.sample_count,
            self.config.min_samples_for_stable,
        );
        if previous == FingerprintStatus::Learning
            && fingerprint.status == FingerprintStatus::Stable
        {
            info!(
                service = %service,
                sample_count = fingerprint.sample_count,
                "Fingerprint reached stable baseline"
            );
        }
    }
}

impl Default for FingerprintEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
