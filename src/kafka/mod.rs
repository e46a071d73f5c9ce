// Kafka module for acknowledged notification delivery
//
// Wraps an rdkafka `FutureProducer` behind the crate's `Publisher` trait.

pub mod config;
pub mod metrics;
pub mod producer;

pub use producer::KafkaPublisher;
