//! # sbrecon-core
//!
//! Reconciliation engine for Service Bus endpoints.
//!
//! An endpoint is a queue named after it, optional additional queues, a
//! subscription on a topic forwarding to the queue, and one rule per
//! subscribed message type. The engine creates that cluster from a planned
//! [`EndpointState`] and reads it back, turning out-of-band changes into
//! state flags rather than errors.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use sbrecon_client::{EndpointModel, QueueOptions};
//! use sbrecon_core::{EndpointState, Reconciler};
//! use sbrecon_memory::InMemoryServiceBus;
//!
//! let bus = Arc::new(InMemoryServiceBus::new());
//! bus.create_topic("bundle-1").await;
//!
//! let reconciler = Reconciler::new(bus);
//! let plan = EndpointState::planned(
//!     EndpointModel::new("bundle-1", "orders").with_subscription("Acme.Orders.V1.OrderPlaced"),
//! );
//!
//! let created = reconciler.create(plan).await?;
//! let refreshed = reconciler.read(created.state).await?;
//! assert!(refreshed.state.status().is_settled());
//! ```

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod import;
pub mod reconcile;
pub mod state;

pub use config::ReconcilerConfig;
pub use diagnostics::{Diagnostic, Diagnostics, Reconciled, Severity};
pub use error::{ReconcileError, ReconcileResult};
pub use import::ImportId;
pub use reconcile::{
    DEFAULT_PARTITION_COUNT, NameMatch, Reconciler, match_subscription_name,
    normalize_queue_size, resolve_subscription_name,
};
pub use state::{DriftReason, EndpointState, ReconcileStatus};
