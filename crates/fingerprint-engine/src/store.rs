//! Global sample retention
//!
//! Holds the most recent samples across all services in arrival order,
//! bounded by a global capacity with FIFO eviction. Eviction is global,
//! not per-service: a high-volume service can crowd out the retained
//! history of a quiet one.

use crate::models::WorkloadSample;
use std::collections::VecDeque;

/// Append-only, capacity-bounded sequence of samples
pub struct SampleStore {
    samples: VecDeque<WorkloadSample>,
    max_samples: usize,
}

impl SampleStore {
    pub fn new(max_samples: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(max_samples.min(10_000)),
            max_samples,
        }
    }

    /// Append a sample, evicting the globally oldest one past capacity.
    ///
    /// Returns the evicted sample so the caller can refresh the owning
    /// service's fingerprint.
    pub fn push(&mut self, sample: WorkloadSample) -> Option<WorkloadSample> {
        self.samples.push_back(sample);
        if self.samples.len() > self.max_samples {
            self.samples.pop_front()
        } else {
            None
        }
    }

    /// Retained samples for one service, oldest first
    pub fn service_window(&self, service: &str) -> Vec<&WorkloadSample> {
        self.samples.iter().filter(|s| s.service == service).collect()
    }

    /// Most recently arrived sample for a service
    pub fn latest_for(&self, service: &str) -> Option<&WorkloadSample> {
        self.samples.iter().rev().find(|s| s.service == service)
    }

    /// Retained samples for a service, newest first, optionally capped
    pub fn recent_for(&self, service: &str, limit: Option<usize>) -> Vec<WorkloadSample> {
        let newest_first = self
            .samples
            .iter()
            .rev()
            .filter(|s| s.service == service)
            .cloned();
        match limit {
            Some(n) => newest_first.take(n).collect(),
            None => newest_first.collect(),
        }
    }

    /// Remove every retained sample for a service, returning the count removed
    pub fn clear_service(&mut self, service: &str) -> usize {
        let before = self.samples.len();
        self.samples.retain(|s| s.service != service);
        before - self.samples.len()
    }

    /// Total retained samples across all services
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Global retention cap
    pub fn capacity(&self) -> usize {
        self.max_samples
    }
}
