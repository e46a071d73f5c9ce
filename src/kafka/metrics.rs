use anyhow::Result;
use once_cell::sync::Lazy;
use prometheus::{register_counter, register_histogram, Counter, Encoder, Histogram, TextEncoder};

/// Acknowledged publishes
pub static PUBLISH_SUCCESS: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "notify_publish_success_total",
        "Total number of notifications acknowledged by Kafka"
    )
    .expect("Failed to register notify_publish_success_total metric")
});

/// Failed publishes
pub static PUBLISH_FAILURE: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "notify_publish_failure_total",
        "Total number of notifications Kafka failed to acknowledge"
    )
    .expect("Failed to register notify_publish_failure_total metric")
});

/// Time from send to broker acknowledgment
pub static PUBLISH_LATENCY: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "notify_publish_latency_seconds",
        "Kafka publish latency in seconds",
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]
    )
    .expect("Failed to register notify_publish_latency_seconds metric")
});

/// Render every registered metric in the Prometheus text format
pub fn gather_metrics() -> Result<String> {
    Lazy::force(&PUBLISH_SUCCESS);
    Lazy::force(&PUBLISH_FAILURE);
    Lazy::force(&PUBLISH_LATENCY);

    let mut buffer = vec![];
    let encoder = TextEncoder::new();
    encoder.encode(&prometheus::gather(), &mut buffer)?;

    Ok(String::from_utf8(buffer)?)
}
