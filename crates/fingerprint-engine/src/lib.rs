//! Workload fingerprint and drift detection engine
//!
//! This crate provides the core functionality for:
//! - Bounded retention of resource-utilization samples across services
//! - Per-service statistical baselines (fingerprints) recomputed on ingest
//! - A fingerprint maturity lifecycle gated by retained sample count
//! - Threshold-based drift detection against the learned baseline
//! - Read-only query and summary surfaces for dashboards and alerting
//!
//! The engine is an embedded, synchronous library: callers hold a
//! [`FingerprintEngine`] instance explicitly and serialize mutation. State
//! lives for the process lifetime only.

pub mod config;
pub mod drift;
pub mod engine;
pub mod lifecycle;
pub mod models;
pub mod observability;
pub mod stats;
pub mod store;

pub use config::{ConfigError, EngineConfig};
pub use drift::DriftDetector;
pub use engine::FingerprintEngine;
pub use models::*;
pub use observability::EngineMetrics;
pub use store::SampleStore;
