//! Fingerprint maturity lifecycle
//!
//! The only automatic transition is `Learning -> Stable`, fired the moment a
//! service's retained count reaches the configured threshold. A stable
//! fingerprint never regresses on its own; clearing a service's samples
//! deletes the fingerprint, and fresh samples restart it at `Learning`.

use crate::models::FingerprintStatus;

/// Next status after the retained window for a service changed
pub fn on_window_update(
    current: FingerprintStatus,
    sample_count: usize,
    min_samples_for_stable: usize,
) -> FingerprintStatus {
    match current {
        FingerprintStatus::Learning if sample_count >= min_samples_for_stable => {
            FingerprintStatus::Stable
        }
        other => other,
    }
}
