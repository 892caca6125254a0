//! End-to-end tests for the fingerprint engine

use fingerprint_engine::{
    EngineConfig, FingerprintEngine, FingerprintStatus, NewSample, WorkloadType,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("fingerprint_engine=debug")
        .with_test_writer()
        .try_init();
}

fn engine(max_samples: usize, min_samples_for_stable: usize) -> FingerprintEngine {
    init_tracing();
    FingerprintEngine::new(EngineConfig {
        max_samples,
        min_samples_for_stable,
        drift_threshold_pct: 50.0,
    })
}

#[test]
fn fingerprint_lifecycle_from_learning_to_stable() {
    let mut engine = engine(100, 5);

    for i in 0..4 {
        engine.record_sample("api", NewSample::default().with_cpu_pct(10.0 + i as f64));
        assert_eq!(
            engine.get_fingerprint("api").unwrap().status,
            FingerprintStatus::Learning,
            "still learning at {} samples",
            i + 1
        );
    }

    engine.record_sample("api", NewSample::default().with_cpu_pct(14.0));
    let fp = engine.get_fingerprint("api").unwrap();
    assert_eq!(fp.status, FingerprintStatus::Stable);
    assert_eq!(fp.sample_count, 5);
    assert_eq!(fp.cpu_mean, 12.0);
}

#[test]
fn mean_tracks_retained_window_exactly() {
    let mut engine = engine(1000, 2);
    let values = [3.0, 7.0, 11.0, 19.0, 40.0];
    for v in values {
        engine.record_sample("api", NewSample::default().with_cpu_pct(v));
        let fp = engine.get_fingerprint("api").unwrap();
        let window = engine.get_samples("api", None);
        let expected =
            window.iter().map(|s| s.cpu_pct).sum::<f64>() / window.len() as f64;
        assert_eq!(fp.cpu_mean, expected);
        assert_eq!(fp.sample_count, window.len());
    }
}

#[test]
fn busy_service_crowds_out_quiet_service() {
    let mut engine = engine(4, 2);

    engine.record_sample("quiet", NewSample::default().with_cpu_pct(5.0));
    engine.record_sample("quiet", NewSample::default().with_cpu_pct(5.0));
    for _ in 0..4 {
        engine.record_sample("busy", NewSample::default().with_cpu_pct(80.0));
    }

    // Both of quiet's samples were evicted by busy's volume
    assert!(engine.get_fingerprint("quiet").is_none());
    let busy = engine.get_fingerprint("busy").unwrap();
    assert_eq!(busy.sample_count, 4);

    let stats = engine.get_stats();
    assert_eq!(stats.total_samples, 4);
    assert_eq!(stats.total_fingerprints, 1);
}

#[test]
fn drift_scenario_against_settled_baseline() {
    let mut engine = engine(100, 2);
    engine.record_sample("checkout", NewSample::default().with_cpu_pct(10.0));
    engine.record_sample("checkout", NewSample::default().with_cpu_pct(10.0));
    assert!(engine.check_drift("checkout").is_empty());

    engine.record_sample("checkout", NewSample::default().with_cpu_pct(100.0));
    let alerts = engine.check_drift("checkout");
    let cpu_alert = alerts.iter().find(|a| a.metric == "cpu_pct").unwrap();
    assert!(cpu_alert.deviation_pct > 50.0);
    assert_eq!(cpu_alert.observed_value, 100.0);
    assert_eq!(cpu_alert.service, "checkout");
    assert!(!cpu_alert.message.is_empty());

    // Detection is repeatable and leaves the fingerprint untouched
    let again = engine.check_drift("checkout");
    assert_eq!(again.len(), alerts.len());
    assert_eq!(
        engine.get_fingerprint("checkout").unwrap().status,
        FingerprintStatus::Stable
    );
}

#[test]
fn clear_samples_resets_service_completely() {
    let mut engine = engine(100, 2);
    engine.record_sample("api", NewSample::default().with_cpu_pct(10.0));
    engine.record_sample("api", NewSample::default().with_cpu_pct(30.0));
    engine.record_sample("worker", NewSample::default().with_cpu_pct(50.0));

    assert_eq!(engine.clear_samples("api"), 2);
    assert!(engine.get_fingerprint("api").is_none());

    // The other service is untouched
    assert!(engine.get_fingerprint("worker").is_some());
    assert_eq!(engine.get_stats().total_samples, 1);
}

#[test]
fn fingerprints_serialize_for_dashboards() {
    let mut engine = engine(100, 1);
    engine.record_sample(
        "api",
        NewSample::default()
            .with_workload_type(WorkloadType::Database)
            .with_cpu_pct(42.0)
            .with_metadata("region", "eu-west-1"),
    );

    let fp = engine.get_fingerprint("api").unwrap();
    let json = serde_json::to_value(&fp).unwrap();
    assert_eq!(json["service"], "api");
    assert_eq!(json["workload_type"], "database");
    assert_eq!(json["status"], "stable");
    assert_eq!(json["cpu_mean"], 42.0);

    let samples = engine.get_samples("api", None);
    let json = serde_json::to_value(&samples).unwrap();
    assert_eq!(json[0]["metadata"]["region"], "eu-west-1");
}

#[test]
fn config_load_falls_back_to_defaults() {
    let config = EngineConfig::load().expect("load with no environment overrides");
    assert!(config.max_samples > 0);
    assert!(config.min_samples_for_stable > 0);
    assert!(config.drift_threshold_pct >= 0.0);
}
