use anyhow::{Context, Result};

use crate::directory::UserDirectory;
use crate::models::User;

mod kafka;

pub use kafka::KafkaConfig;

// ============================================================================
// Configuration Constants
// ============================================================================

const DEFAULT_PORT: u16 = 8080;

// Producer flush budget at shutdown (in seconds)
pub const SHUTDOWN_FLUSH_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// Configuration Structures
// ============================================================================

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Users loaded into the directory at startup
    pub users: Vec<User>,
    pub kafka: KafkaConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let users = match std::env::var("DIRECTORY_USERS") {
            Ok(raw) => parse_users(&raw).context("Invalid DIRECTORY_USERS")?,
            Err(_) => UserDirectory::seed_users(),
        };

        let kafka = KafkaConfig::from_env();
        kafka.validate().context("Invalid Kafka configuration")?;

        Ok(Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            users,
            kafka,
        })
    }
}

/// Parse a directory listing of the form `1:Emma,2:Bruno`.
pub fn parse_users(raw: &str) -> Result<Vec<User>> {
    let mut users = Vec::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (id, name) = entry
            .split_once(':')
            .with_context(|| format!("entry '{}' is not in id:name form", entry))?;
        let id: i64 = id
            .trim()
            .parse()
            .with_context(|| format!("entry '{}' has a non-integer id", entry))?;
        let name = name.trim();
        if name.is_empty() {
            anyhow::bail!("entry '{}' has an empty name", entry);
        }
        users.push(User::new(id, name));
    }
    Ok(users)
}
