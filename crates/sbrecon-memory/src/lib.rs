//! In-memory Service Bus namespace for the endpoint reconciler.
//!
//! This crate provides an implementation of the `ServiceBusClient` trait from
//! `sbrecon-client` that keeps queues, topics and rules in process memory.
//! It backs the reconciler's tests and the `sbrecon` command line tool.
//!
//! # Example
//!
//! ```ignore
//! use sbrecon_client::{QueueOptions, ServiceBusClient};
//! use sbrecon_memory::InMemoryServiceBus;
//!
//! let bus = InMemoryServiceBus::new();
//! bus.create_topic("bundle-1").await;
//! bus.create_endpoint_queue("orders", &QueueOptions::default()).await?;
//! assert!(bus.queue_exists("orders").await?);
//! ```

mod client_impl;
pub mod faults;
pub mod namespace;
pub mod snapshot;

// Re-export the client trait for convenience
pub use sbrecon_client::{ClientError, ServiceBusClient};

pub use faults::{Call, Fault, Operation};
pub use namespace::{BACKEND_PARTITION_COUNT, InMemoryServiceBus, NamespaceOptions};
pub use snapshot::{
    EndpointSnapshot, NamespaceSnapshot, QueueSnapshot, SnapshotError, TopicSnapshot,
};
