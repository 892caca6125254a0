//! Baseline drift detection
//!
//! Compares the most recent sample for a service against the fingerprint
//! baseline and emits one alert per metric whose relative deviation exceeds
//! the configured percentage threshold. The fingerprint has already absorbed
//! the sample under test by the time detection runs.

use crate::models::{DriftAlert, WorkloadFingerprint, WorkloadSample};
use chrono::Utc;
use uuid::Uuid;

/// Floor applied to baseline means so a near-zero baseline cannot divide by zero
const BASELINE_EPSILON: f64 = 1e-6;

/// Minimum retained samples before a baseline is comparable
///
/// A single-sample baseline is the sample under test; comparing the two
/// would never alert and carries no signal.
const MIN_SAMPLES_FOR_DETECTION: usize = 2;

/// Detects samples that stray from a service's learned baseline
#[derive(Debug, Clone)]
pub struct DriftDetector {
    /// Relative deviation (percent) above which an alert is emitted
    pub threshold_pct: f64,
}

impl DriftDetector {
    pub fn new(threshold_pct: f64) -> Self {
        Self { threshold_pct }
    }

    /// Check the latest sample against the fingerprint baseline.
    ///
    /// Returns one alert per deviating metric, or nothing when the baseline
    /// is too young to compare. Pure with respect to its inputs.
    pub fn detect(
        &self,
        fingerprint: &WorkloadFingerprint,
        latest: &WorkloadSample,
    ) -> Vec<DriftAlert> {
        if fingerprint.sample_count < MIN_SAMPLES_FOR_DETECTION {
            return Vec::new();
        }

        let checks = [
            ("cpu_pct", fingerprint.cpu_mean, latest.cpu_pct),
            ("memory_pct", fingerprint.memory_mean, latest.memory_pct),
            (
                "request_rate",
                fingerprint.request_rate_mean,
                latest.request_rate,
            ),
        ];

        let mut alerts = Vec::new();
        for (metric, expected, observed) in checks {
            let deviation_pct = relative_deviation_pct(expected, observed);
            if deviation_pct > self.threshold_pct {
                alerts.push(DriftAlert {
                    id: Uuid::new_v4().to_string(),
                    service: fingerprint.service.clone(),
                    metric: metric.to_string(),
                    expected_value: expected,
                    observed_value: observed,
                    deviation_pct,
                    message: format!(
                        "{} for {} deviates {:.1}% from baseline: observed {:.2}, expected {:.2}",
                        metric, fingerprint.service, deviation_pct, observed, expected
                    ),
                    detected_at: Utc::now().timestamp(),
                });
            }
        }
        alerts
    }
}

impl Default for DriftDetector {
    fn default() -> Self {
        Self::new(50.0)
    }
}

/// Relative deviation of an observation from its baseline, in percent
pub fn relative_deviation_pct(expected: f64, observed: f64) -> f64 {
    (observed - expected).abs() / expected.max(BASELINE_EPSILON) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FingerprintStatus, WorkloadType};
    use std::collections::HashMap;

    fn fingerprint(sample_count: usize, cpu_mean: f64, memory_mean: f64) -> WorkloadFingerprint {
        WorkloadFingerprint {
            id: "fp".to_string(),
            service: "api".to_string(),
            workload_type: WorkloadType::WebServer,
            status: FingerprintStatus::Stable,
            sample_count,
            cpu_mean,
            cpu_stddev: 0.0,
            memory_mean,
            memory_stddev: 0.0,
            request_rate_mean: 0.0,
            created_at: 0,
        }
    }

    fn sample(cpu_pct: f64, memory_pct: f64) -> WorkloadSample {
        WorkloadSample {
            id: "s".to_string(),
            service: "api".to_string(),
            workload_type: WorkloadType::WebServer,
            cpu_pct,
            memory_pct,
            request_rate: 0.0,
            error_rate: 0.0,
            latency_p99_ms: 0.0,
            metadata: HashMap::new(),
            timestamp: 0,
        }
    }

    #[test]
    fn test_no_alert_within_threshold() {
        let detector = DriftDetector::new(50.0);
        let alerts = detector.detect(&fingerprint(10, 10.0, 50.0), &sample(12.0, 55.0));
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_alert_on_cpu_deviation() {
        let detector = DriftDetector::new(50.0);
        // Baseline mean 40 with an observation of 100 is a 150% deviation
        let alerts = detector.detect(&fingerprint(3, 40.0, 50.0), &sample(100.0, 50.0));
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].metric, "cpu_pct");
        assert_eq!(alerts[0].expected_value, 40.0);
        assert_eq!(alerts[0].observed_value, 100.0);
        assert!(alerts[0].deviation_pct > 50.0);
        assert!(alerts[0].message.contains("cpu_pct"));
    }

    #[test]
    fn test_multiple_metrics_deviate() {
        let detector = DriftDetector::new(50.0);
        let alerts = detector.detect(&fingerprint(5, 10.0, 10.0), &sample(100.0, 100.0));
        let metrics: Vec<&str> = alerts.iter().map(|a| a.metric.as_str()).collect();
        assert!(metrics.contains(&"cpu_pct"));
        assert!(metrics.contains(&"memory_pct"));
    }

    #[test]
    fn test_single_sample_baseline_skipped() {
        let detector = DriftDetector::new(50.0);
        // One retained sample: the baseline is the observation itself
        let alerts = detector.detect(&fingerprint(1, 10.0, 10.0), &sample(10.0, 10.0));
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_zero_baseline_does_not_divide_by_zero() {
        let detector = DriftDetector::new(50.0);
        let alerts = detector.detect(&fingerprint(5, 0.0, 0.0), &sample(5.0, 0.0));
        // cpu deviates off an epsilon-floored baseline; memory matches exactly
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].metric, "cpu_pct");
        assert!(alerts[0].deviation_pct.is_finite());
    }

    #[test]
    fn test_relative_deviation_is_non_negative() {
        assert_eq!(relative_deviation_pct(10.0, 10.0), 0.0);
        assert_eq!(relative_deviation_pct(10.0, 5.0), 50.0);
        assert_eq!(relative_deviation_pct(10.0, 15.0), 50.0);
    }
}
