// ============================================================================
// Publisher
// ============================================================================
//
// Narrow "publish and wait for the broker ack" capability. The gateway only
// sees this trait; `KafkaPublisher` backs it in production and
// `MemoryPublisher` backs it in tests.
//
// ============================================================================

use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Mutex;

use crate::error::{AppError, AppResult};

/// Where the broker stored an acknowledged message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishReceipt {
    pub partition: i32,
    pub offset: i64,
}

#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publish one message and return once the broker has acknowledged it.
    ///
    /// Implementations must be safe to call concurrently and must not retry
    /// on behalf of the caller beyond their client's own transport retries.
    async fn publish(&self, topic: &str, key: &str, value: &[u8]) -> AppResult<PublishReceipt>;
}

/// A message accepted by `MemoryPublisher`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedRecord {
    pub topic: String,
    pub key: String,
    pub value: Vec<u8>,
    pub receipt: PublishReceipt,
}

#[derive(Default)]
struct MemoryState {
    records: Vec<PublishedRecord>,
    next_offsets: HashMap<(String, i32), i64>,
    attempts: usize,
    failure: Option<String>,
}

/// In-process publisher that keeps every message in memory.
///
/// Messages are routed to one of `partitions` partitions by key hash and get
/// per-partition increasing offsets, so same-key ordering can be observed.
pub struct MemoryPublisher {
    partitions: i32,
    state: Mutex<MemoryState>,
}

impl MemoryPublisher {
    pub fn new(partitions: i32) -> Self {
        Self {
            partitions: partitions.max(1),
            state: Mutex::new(MemoryState::default()),
        }
    }

    /// Make every subsequent publish fail with `reason`
    pub fn fail_with(&self, reason: impl Into<String>) {
        self.lock().failure = Some(reason.into());
    }

    /// Number of publish calls, successful or not
    pub fn attempts(&self) -> usize {
        self.lock().attempts
    }

    pub fn records(&self) -> Vec<PublishedRecord> {
        self.lock().records.clone()
    }

    fn partition_for(&self, key: &str) -> i32 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() % self.partitions as u64) as i32
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        // A poisoned lock only means another test thread panicked mid-publish.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MemoryPublisher {
    fn default() -> Self {
        Self::new(1)
    }
}

#[async_trait]
impl Publisher for MemoryPublisher {
    async fn publish(&self, topic: &str, key: &str, value: &[u8]) -> AppResult<PublishReceipt> {
        let partition = self.partition_for(key);
        let mut state = self.lock();
        state.attempts += 1;

        if let Some(reason) = &state.failure {
            return Err(AppError::publish(reason.clone()));
        }

        let next = state
            .next_offsets
            .entry((topic.to_string(), partition))
            .or_insert(0);
        let receipt = PublishReceipt {
            partition,
            offset: *next,
        };
        *next += 1;

        state.records.push(PublishedRecord {
            topic: topic.to_string(),
            key: key.to_string(),
            value: value.to_vec(),
            receipt,
        });

        Ok(receipt)
    }
}
