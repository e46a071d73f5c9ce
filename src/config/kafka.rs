// ============================================================================
// Kafka Configuration
// ============================================================================

/// Kafka producer configuration
#[derive(Clone, Debug)]
pub struct KafkaConfig {
    /// Comma-separated list of Kafka brokers (e.g., "kafka1:9092,kafka2:9092")
    pub brokers: String,
    /// Topic notifications are published to
    pub topic: String,
    /// SSL/TLS enabled
    pub ssl_enabled: bool,
    /// SASL mechanism (e.g., "SCRAM-SHA-256", "PLAIN")
    pub sasl_mechanism: Option<String>,
    /// SASL username
    pub sasl_username: Option<String>,
    /// SASL password
    pub sasl_password: Option<String>,
    // producer-specific settings
    pub producer_acks: String,        // "all" | "-1" | "1"
    pub producer_compression: String, // "zstd" | "snappy" | "gzip" | "lz4" | "none"
    pub producer_linger_ms: u32,
    pub producer_request_timeout_ms: u32,
    pub producer_delivery_timeout_ms: u32,
    /// How long startup waits for cluster metadata before giving up
    pub connect_timeout_ms: u64,
}

impl Default for KafkaConfig {
    fn default() -> Self {
        Self {
            brokers: "localhost:9092".to_string(),
            topic: "notifications".to_string(),
            ssl_enabled: false,
            sasl_mechanism: None,
            sasl_username: None,
            sasl_password: None,
            producer_acks: "all".to_string(),
            producer_compression: "none".to_string(),
            producer_linger_ms: 5,
            producer_request_timeout_ms: 30000,
            producer_delivery_timeout_ms: 30000,
            connect_timeout_ms: 5000,
        }
    }
}

impl KafkaConfig {
    pub(crate) fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            brokers: std::env::var("KAFKA_BROKERS").unwrap_or(defaults.brokers),
            topic: std::env::var("KAFKA_TOPIC").unwrap_or(defaults.topic),
            ssl_enabled: std::env::var("KAFKA_SSL_ENABLED")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
            sasl_mechanism: std::env::var("KAFKA_SASL_MECHANISM").ok(),
            sasl_username: std::env::var("KAFKA_SASL_USERNAME").ok(),
            sasl_password: std::env::var("KAFKA_SASL_PASSWORD").ok(),
            producer_acks: std::env::var("KAFKA_PRODUCER_ACKS").unwrap_or(defaults.producer_acks),
            producer_compression: std::env::var("KAFKA_PRODUCER_COMPRESSION")
                .unwrap_or(defaults.producer_compression),
            producer_linger_ms: std::env::var("KAFKA_PRODUCER_LINGER_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.producer_linger_ms),
            producer_request_timeout_ms: std::env::var("KAFKA_PRODUCER_REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.producer_request_timeout_ms),
            producer_delivery_timeout_ms: std::env::var("KAFKA_PRODUCER_DELIVERY_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.producer_delivery_timeout_ms),
            connect_timeout_ms: std::env::var("KAFKA_CONNECT_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.connect_timeout_ms),
        }
    }

    /// Reject settings the gateway cannot serve with.
    ///
    /// `acks=0` is refused: the gateway only answers after the broker has
    /// acknowledged the write.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.brokers.trim().is_empty() {
            anyhow::bail!("KAFKA_BROKERS must not be empty");
        }
        if self.topic.trim().is_empty() {
            anyhow::bail!("KAFKA_TOPIC must not be empty");
        }
        match self.producer_acks.as_str() {
            "all" | "-1" | "1" => {}
            other => anyhow::bail!(
                "KAFKA_PRODUCER_ACKS={} does not wait for broker acknowledgment (use \"all\" or \"1\")",
                other
            ),
        }
        Ok(())
    }
}
