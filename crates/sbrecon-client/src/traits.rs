//! The client contract every messaging backend must implement.

use async_trait::async_trait;

use crate::error::ClientError;
use crate::types::{EndpointModel, QueueOptions, QueueProperties, RemoteSubscription};

/// Operations the reconciler needs from a Service Bus namespace.
///
/// Implementations must be thread-safe (`Send + Sync`). Each call is a single
/// request/response against the backend; implementations must not retry or
/// cache on the reconciler's behalf.
///
/// # Example
///
/// ```ignore
/// use sbrecon_client::{ClientError, EndpointModel, ServiceBusClient};
///
/// async fn queue_size(
///     client: &dyn ServiceBusClient,
///     endpoint: &EndpointModel,
/// ) -> Result<Option<i64>, ClientError> {
///     Ok(client
///         .get_endpoint_queue(endpoint)
///         .await?
///         .map(|queue| queue.max_size_in_megabytes))
/// }
/// ```
#[async_trait]
pub trait ServiceBusClient: Send + Sync {
    /// Creates a queue named `queue_name` with the given options.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Conflict` if a queue with that name already exists.
    async fn create_endpoint_queue(
        &self,
        queue_name: &str,
        options: &QueueOptions,
    ) -> Result<(), ClientError>;

    /// Reads the endpoint's primary queue.
    ///
    /// Returns `None` if the queue does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error only for transport or authorization failures.
    async fn get_endpoint_queue(
        &self,
        endpoint: &EndpointModel,
    ) -> Result<Option<QueueProperties>, ClientError>;

    /// Returns whether a queue with the given name exists.
    async fn queue_exists(&self, queue_name: &str) -> Result<bool, ClientError>;

    /// Returns whether the endpoint's topic subscription exists.
    async fn endpoint_exists(&self, endpoint: &EndpointModel) -> Result<bool, ClientError>;

    /// Creates the endpoint's topic subscription, forwarding to its queue, with
    /// the default rule that matches nothing.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` if the topic does not exist.
    async fn create_endpoint_with_default_rule(
        &self,
        endpoint: &EndpointModel,
    ) -> Result<(), ClientError>;

    /// Adds a subscription rule for `subscription` to the endpoint.
    ///
    /// The rule name may be truncated by the backend; the filter always uses
    /// the full name.
    async fn create_endpoint_subscription(
        &self,
        endpoint: &EndpointModel,
        subscription: &str,
    ) -> Result<(), ClientError>;

    /// Lists the endpoint's subscription rules, excluding the default rule.
    async fn get_endpoint_subscriptions(
        &self,
        endpoint: &EndpointModel,
    ) -> Result<Vec<RemoteSubscription>, ClientError>;

    /// Returns the name of this backend for logging.
    fn backend_name(&self) -> &'static str;
}
