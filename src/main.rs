use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use notify_gateway::config::{Config, SHUTDOWN_FLUSH_TIMEOUT_SECS};
use notify_gateway::directory::UserDirectory;
use notify_gateway::gateway::NotificationGateway;
use notify_gateway::kafka::KafkaPublisher;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.rust_log.clone()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("=== Notification Gateway Starting ===");
    info!("Port: {}", config.port);
    info!("Kafka brokers: {}", config.kafka.brokers);
    info!("Kafka topic: {}", config.kafka.topic);

    let directory = Arc::new(
        UserDirectory::new(config.users.clone()).context("Failed to build user directory")?,
    );
    info!(users = directory.len(), "User directory loaded");

    // Without a working producer there is nothing to serve.
    let producer = Arc::new(
        KafkaPublisher::connect(&config.kafka)
            .await
            .context("Failed to initialize producer")?,
    );

    let gateway = Arc::new(NotificationGateway::new(
        directory,
        producer.clone(),
        config.kafka.topic.clone(),
    ));

    let listener = notify_gateway::bind(config.port).await?;
    let served =
        notify_gateway::run_http_server(gateway, listener, notify_gateway::shutdown_signal()).await;

    if let Err(e) = producer
        .flush(Duration::from_secs(SHUTDOWN_FLUSH_TIMEOUT_SECS))
        .await
    {
        error!(error = %e, "Kafka producer did not drain before shutdown");
    }

    served
}
