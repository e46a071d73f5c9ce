use rdkafka::config::ClientConfig;
use tracing::info;

use crate::config::KafkaConfig;

/// Creates a new `rdkafka::config::ClientConfig` from the application's `KafkaConfig`.
///
/// Handles bootstrap servers, SSL/TLS when `ssl_enabled` is true, and SASL
/// authentication when a mechanism, username and password are all provided.
pub fn create_client_config(config: &KafkaConfig) -> ClientConfig {
    let mut client_config = ClientConfig::new();
    client_config.set("bootstrap.servers", &config.brokers);

    // Default to plaintext if SSL is not explicitly enabled and no SASL.
    client_config.set("security.protocol", "plaintext");

    if config.ssl_enabled {
        info!("Enabling SSL/TLS for Kafka connection");
        client_config.set("security.protocol", "ssl");
    }

    if let (Some(mechanism), Some(username), Some(password)) = (
        &config.sasl_mechanism,
        &config.sasl_username,
        &config.sasl_password,
    ) {
        info!(sasl_mechanism = %mechanism, "Configuring SASL authentication");
        client_config
            .set("sasl.mechanism", mechanism)
            .set("sasl.username", username)
            .set("sasl.password", password);

        if config.ssl_enabled {
            client_config.set("security.protocol", "sasl_ssl");
        } else {
            client_config.set("security.protocol", "sasl_plaintext");
        }
    }

    client_config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plaintext_by_default() {
        let client_config = create_client_config(&KafkaConfig::default());
        assert_eq!(client_config.get("bootstrap.servers"), Some("localhost:9092"));
        assert_eq!(client_config.get("security.protocol"), Some("plaintext"));
        assert_eq!(client_config.get("sasl.mechanism"), None);
    }

    #[test]
    fn test_sasl_over_ssl() {
        let config = KafkaConfig {
            ssl_enabled: true,
            sasl_mechanism: Some("PLAIN".to_string()),
            sasl_username: Some("gateway".to_string()),
            sasl_password: Some("secret".to_string()),
            ..KafkaConfig::default()
        };
        let client_config = create_client_config(&config);
        assert_eq!(client_config.get("security.protocol"), Some("sasl_ssl"));
        assert_eq!(client_config.get("sasl.username"), Some("gateway"));
    }

    #[test]
    fn test_partial_sasl_is_ignored() {
        let config = KafkaConfig {
            sasl_mechanism: Some("PLAIN".to_string()),
            ..KafkaConfig::default()
        };
        let client_config = create_client_config(&config);
        assert_eq!(client_config.get("security.protocol"), Some("plaintext"));
    }
}
