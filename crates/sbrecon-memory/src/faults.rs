//! Call recording and failure injection for the in-memory namespace.

use std::fmt;

use sbrecon_client::ClientError;

/// Client operations, as recorded in the call log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateQueue,
    GetQueue,
    QueueExists,
    EndpointExists,
    CreateEndpoint,
    CreateSubscription,
    GetSubscriptions,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateQueue => write!(f, "create_queue"),
            Self::GetQueue => write!(f, "get_queue"),
            Self::QueueExists => write!(f, "queue_exists"),
            Self::EndpointExists => write!(f, "endpoint_exists"),
            Self::CreateEndpoint => write!(f, "create_endpoint"),
            Self::CreateSubscription => write!(f, "create_subscription"),
            Self::GetSubscriptions => write!(f, "get_subscriptions"),
        }
    }
}

/// One call made against the namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub operation: Operation,
    /// Queue, endpoint or subscription name the call was about.
    pub target: String,
}

impl Call {
    pub fn new(operation: Operation, target: impl Into<String>) -> Self {
        Self {
            operation,
            target: target.into(),
        }
    }
}

/// A failure the namespace returns instead of executing a call.
///
/// A fault with no target matches every call of its operation. Faults stay
/// armed until [`crate::InMemoryServiceBus::clear_faults`] is called.
#[derive(Debug, Clone)]
pub struct Fault {
    pub operation: Operation,
    pub target: Option<String>,
    pub error: ClientError,
}

impl Fault {
    pub(crate) fn matches(&self, operation: Operation, target: &str) -> bool {
        self.operation == operation
            && self.target.as_deref().is_none_or(|expected| expected == target)
    }
}
