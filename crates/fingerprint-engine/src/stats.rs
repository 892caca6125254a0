//! Window statistics
//!
//! Batch recomputation of fingerprint aggregates from a service's retained
//! window. Recomputing over the live subset keeps the means exact under
//! global eviction, which one-way streaming averages cannot guarantee.
//! O(window) per update; the retention cap keeps windows small.

use crate::models::WorkloadSample;

/// Aggregates derived from one service's retained window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStats {
    pub sample_count: usize,
    pub cpu_mean: f64,
    pub cpu_stddev: f64,
    pub memory_mean: f64,
    pub memory_stddev: f64,
    pub request_rate_mean: f64,
}

impl WindowStats {
    /// Compute aggregates over a window, `None` when it is empty.
    ///
    /// An empty window never reaches a fingerprint: the table entry is
    /// deleted instead.
    pub fn from_window(window: &[&WorkloadSample]) -> Option<Self> {
        if window.is_empty() {
            return None;
        }

        let cpu: Vec<f64> = window.iter().map(|s| s.cpu_pct).collect();
        let memory: Vec<f64> = window.iter().map(|s| s.memory_pct).collect();
        let request_rate: Vec<f64> = window.iter().map(|s| s.request_rate).collect();

        Some(Self {
            sample_count: window.len(),
            cpu_mean: mean(&cpu),
            cpu_stddev: population_std_dev(&cpu),
            memory_mean: mean(&memory),
            memory_stddev: population_std_dev(&memory),
            request_rate_mean: mean(&request_rate),
        })
    }
}

/// Arithmetic mean, 0.0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation over the full window
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
