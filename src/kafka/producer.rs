use anyhow::{Context, Result};
use async_trait::async_trait;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::util::Timeout;
use std::time::{Duration, Instant};
use tracing::{error, info};

use super::config::create_client_config;
use super::metrics;
use crate::config::KafkaConfig;
use crate::error::{AppError, AppResult};
use crate::publisher::{PublishReceipt, Publisher};

/// Kafka producer that waits for broker acknowledgment on every send
///
/// This producer is configured for:
/// - `acks` from config (default `all`), so `send` resolves only after the
///   broker has durably stored the message
/// - Idempotent writes when `acks=all`, so librdkafka's internal transport
///   retries cannot duplicate or reorder messages on a partition
/// - A bounded delivery timeout, after which the send fails back to the caller
#[derive(Clone)]
pub struct KafkaPublisher {
    // FutureProducer is internally reference counted and safe to share.
    producer: FutureProducer,
    queue_timeout: Duration,
}

impl KafkaPublisher {
    /// Create a new Kafka producer from the application configuration.
    ///
    /// This does not touch the network; see [`KafkaPublisher::connect`].
    pub fn new(config: &KafkaConfig) -> Result<Self> {
        info!("Initializing Kafka producer...");

        let mut client_config = create_client_config(config);

        // librdkafka only allows idempotence together with acks=all.
        let idempotent = matches!(config.producer_acks.as_str(), "all" | "-1");

        let producer: FutureProducer = client_config
            .set("acks", &config.producer_acks)
            .set("enable.idempotence", idempotent.to_string())
            .set("max.in.flight.requests.per.connection", "5")
            .set("compression.type", &config.producer_compression)
            .set("linger.ms", config.producer_linger_ms.to_string())
            .set(
                "request.timeout.ms",
                config.producer_request_timeout_ms.to_string(),
            )
            .set(
                "delivery.timeout.ms",
                config.producer_delivery_timeout_ms.to_string(),
            )
            .create()
            .context("Failed to create Kafka producer")?;

        Ok(Self {
            producer,
            queue_timeout: Duration::from_millis(u64::from(config.producer_delivery_timeout_ms)),
        })
    }

    /// Create the producer and verify the brokers are reachable.
    ///
    /// librdkafka connects lazily, so cluster metadata is fetched once here;
    /// a broker that cannot answer within `connect_timeout_ms` is an error.
    pub async fn connect(config: &KafkaConfig) -> Result<Self> {
        let publisher = Self::new(config)?;
        let probe = publisher.producer.clone();
        let timeout = Duration::from_millis(config.connect_timeout_ms);

        let (brokers, topics) = tokio::task::spawn_blocking(move || {
            probe
                .client()
                .fetch_metadata(None, Timeout::After(timeout))
                .map(|metadata| (metadata.brokers().len(), metadata.topics().len()))
        })
        .await
        .context("Kafka metadata probe panicked")?
        .with_context(|| format!("Failed to reach Kafka brokers at {}", config.brokers))?;

        info!(brokers, topics, "Kafka producer connected");

        Ok(publisher)
    }

    /// Flush pending messages (for graceful shutdown)
    ///
    /// Waits for in-flight messages to be acknowledged, up to `timeout`.
    pub async fn flush(&self, timeout: Duration) -> Result<()> {
        info!("Flushing Kafka producer (timeout: {:?})", timeout);

        let producer = self.producer.clone();
        tokio::task::spawn_blocking(move || producer.flush(Timeout::After(timeout)))
            .await
            .context("Kafka flush panicked")?
            .context("Failed to flush Kafka producer")?;

        info!("Kafka producer flushed successfully");
        Ok(())
    }
}

#[async_trait]
impl Publisher for KafkaPublisher {
    async fn publish(&self, topic: &str, key: &str, value: &[u8]) -> AppResult<PublishReceipt> {
        let record = FutureRecord::to(topic).key(key).payload(value);
        let start = Instant::now();

        match self
            .producer
            .send(record, Timeout::After(self.queue_timeout))
            .await
        {
            Ok((partition, offset)) => {
                let latency = start.elapsed();
                metrics::PUBLISH_SUCCESS.inc();
                metrics::PUBLISH_LATENCY.observe(latency.as_secs_f64());

                info!(
                    topic = %topic,
                    key = %key,
                    partition = partition,
                    offset = offset,
                    latency_ms = latency.as_millis(),
                    "Notification acknowledged by Kafka"
                );

                Ok(PublishReceipt { partition, offset })
            }
            Err((kafka_err, _)) => {
                metrics::PUBLISH_FAILURE.inc();

                error!(
                    error = %kafka_err,
                    topic = %topic,
                    key = %key,
                    latency_ms = start.elapsed().as_millis(),
                    "Failed to send notification to Kafka"
                );

                Err(AppError::publish(kafka_err.to_string()))
            }
        }
    }
}
