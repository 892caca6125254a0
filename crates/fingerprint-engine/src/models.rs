//! Core data models for the fingerprint engine

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Workload classification attached to samples and fingerprints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkloadType {
    #[default]
    WebServer,
    BatchJob,
    Database,
    Cache,
    Worker,
}

/// Maturity of a service's learned baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FingerprintStatus {
    /// Accumulating samples, baseline not yet trusted
    Learning,
    /// Enough samples retained for the baseline to be meaningful
    Stable,
    /// Marked as deviating by an external caller
    Drifted,
    /// Status never established
    Unknown,
}

/// One resource-utilization observation for a service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadSample {
    pub id: String,
    pub service: String,
    pub workload_type: WorkloadType,
    pub cpu_pct: f64,
    pub memory_pct: f64,
    pub request_rate: f64,
    pub error_rate: f64,
    pub latency_p99_ms: f64,
    pub metadata: HashMap<String, String>,
    pub timestamp: i64,
}

/// Metric values for a sample being recorded
///
/// Unset fields default to 0.0; ingestion never rejects a sample.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewSample {
    pub workload_type: WorkloadType,
    pub cpu_pct: f64,
    pub memory_pct: f64,
    pub request_rate: f64,
    pub error_rate: f64,
    pub latency_p99_ms: f64,
    pub metadata: HashMap<String, String>,
}

impl NewSample {
    pub fn with_workload_type(mut self, workload_type: WorkloadType) -> Self {
        self.workload_type = workload_type;
        self
    }

    pub fn with_cpu_pct(mut self, cpu_pct: f64) -> Self {
        self.cpu_pct = cpu_pct;
        self
    }

    pub fn with_memory_pct(mut self, memory_pct: f64) -> Self {
        self.memory_pct = memory_pct;
        self
    }

    pub fn with_request_rate(mut self, request_rate: f64) -> Self {
        self.request_rate = request_rate;
        self
    }

    pub fn with_error_rate(mut self, error_rate: f64) -> Self {
        self.error_rate = error_rate;
        self
    }

    pub fn with_latency_p99_ms(mut self, latency_p99_ms: f64) -> Self {
        self.latency_p99_ms = latency_p99_ms;
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Learned statistical baseline for one service
///
/// Exists iff the service has at least one retained sample; `sample_count`
/// tracks the retained window, not a lifetime total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadFingerprint {
    pub id: String,
    pub service: String,
    pub workload_type: WorkloadType,
    pub status: FingerprintStatus,
    pub sample_count: usize,
    pub cpu_mean: f64,
    pub cpu_stddev: f64,
    pub memory_mean: f64,
    pub memory_stddev: f64,
    pub request_rate_mean: f64,
    pub created_at: i64,
}

/// A single metric deviation surfaced by drift detection
///
/// Constructed on demand and returned to the caller; never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriftAlert {
    pub id: String,
    pub service: String,
    pub metric: String,
    pub expected_value: f64,
    pub observed_value: f64,
    pub deviation_pct: f64,
    pub message: String,
    pub detected_at: i64,
}

/// Summary counters across the whole engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineStats {
    pub total_samples: usize,
    pub total_fingerprints: usize,
    pub stable_count: usize,
    pub drifted_count: usize,
    pub learning_count: usize,
    /// Mean of per-fingerprint CPU means, not a flat mean over raw samples
    pub avg_cpu: f64,
    pub avg_memory: f64,
}
