//! Domain types shared between the reconciler and client backends.

use serde::{Deserialize, Serialize};

/// Size and partitioning requested for an endpoint queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueOptions {
    /// Logical queue size in megabytes, as declared by the user.
    pub max_size_in_megabytes: i64,
    /// Whether the queue is spread across partitions.
    pub enable_partitioning: bool,
}

impl Default for QueueOptions {
    fn default() -> Self {
        Self {
            max_size_in_megabytes: 1024,
            enable_partitioning: false,
        }
    }
}

/// Queue attributes as reported by the backend.
///
/// For partitioned queues `max_size_in_megabytes` is the total across all
/// partitions, not the size that was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueProperties {
    pub max_size_in_megabytes: i64,
    pub enable_partitioning: bool,
}

/// One endpoint's resource cluster, as handed to a client for a single pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointModel {
    /// Name of the endpoint; also the name of its primary queue.
    pub endpoint_name: String,
    /// Topic the endpoint subscribes to.
    pub topic_name: String,
    #[serde(default)]
    pub queue_options: QueueOptions,
    /// Extra queues owned by the endpoint, in declared order.
    #[serde(default)]
    pub additional_queues: Vec<String>,
    /// Declared subscription (message type) names, in declared order.
    #[serde(default)]
    pub subscriptions: Vec<String>,
}

impl EndpointModel {
    pub fn new(topic_name: impl Into<String>, endpoint_name: impl Into<String>) -> Self {
        Self {
            endpoint_name: endpoint_name.into(),
            topic_name: topic_name.into(),
            ..Default::default()
        }
    }

    pub fn with_queue_options(mut self, queue_options: QueueOptions) -> Self {
        self.queue_options = queue_options;
        self
    }

    pub fn with_subscription(mut self, subscription: impl Into<String>) -> Self {
        self.subscriptions.push(subscription.into());
        self
    }

    pub fn with_additional_queue(mut self, queue: impl Into<String>) -> Self {
        self.additional_queues.push(queue.into());
        self
    }
}

/// Filter attached to a subscription rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleFilter {
    /// SQL-like expression evaluated against message properties.
    Sql { expression: String },
    /// Correlation filter matching on a label.
    Correlation { label: Option<String> },
}

impl RuleFilter {
    pub fn sql(expression: impl Into<String>) -> Self {
        Self::Sql {
            expression: expression.into(),
        }
    }

    /// Returns the SQL expression, if this is a SQL filter.
    pub fn sql_expression(&self) -> Option<&str> {
        match self {
            Self::Sql { expression } => Some(expression),
            Self::Correlation { .. } => None,
        }
    }
}

/// A subscription rule as observed on the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSubscription {
    /// Rule name; at most the backend's rule-name limit, so possibly truncated.
    pub name: String,
    pub filter: RuleFilter,
}

impl RemoteSubscription {
    pub fn new(name: impl Into<String>, filter: RuleFilter) -> Self {
        Self {
            name: name.into(),
            filter,
        }
    }
}
