//! # sbrecon-client
//!
//! Client contract for the Service Bus endpoint reconciler.
//!
//! This crate defines the [`ServiceBusClient`] trait that messaging backends
//! implement, the domain types exchanged with them, and the naming and filter
//! rules the backend imposes. It contains no backend; see `sbrecon-memory` for
//! an in-process one.
//!
//! ## Implementing a backend
//!
//! ```ignore
//! use async_trait::async_trait;
//! use sbrecon_client::{ClientError, EndpointModel, ServiceBusClient};
//!
//! struct RestClient {
//!     // ...
//! }
//!
//! #[async_trait]
//! impl ServiceBusClient for RestClient {
//!     async fn queue_exists(&self, queue_name: &str) -> Result<bool, ClientError> {
//!         // Implementation
//!     }
//!     // ... other methods
//! }
//! ```

mod error;
pub mod filter;
pub mod naming;
mod traits;
mod types;

pub use error::{ClientError, ErrorCategory};
pub use filter::{FilterConvention, is_filter_correct};
pub use naming::{DEFAULT_RULE_NAME, MAX_RULE_NAME_LENGTH, truncate_rule_name};
pub use traits::ServiceBusClient;
pub use types::{EndpointModel, QueueOptions, QueueProperties, RemoteSubscription, RuleFilter};

/// Type alias for a client result.
pub type ClientResult<T> = Result<T, ClientError>;

/// Type alias for a shared client trait object.
pub type DynClient = std::sync::Arc<dyn ServiceBusClient>;
