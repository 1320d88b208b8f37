//! Failures that abort a reconciliation pass.

use sbrecon_client::ClientError;

use crate::diagnostics::Diagnostic;

/// A step of a reconciliation pass that could not complete.
///
/// Drift is not an error: deleted queues, edited filters and untracked rules
/// are folded into the returned state instead.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// The primary queue exists but is not tracked.
    #[error("Queue {queue} already exists and is tracked elsewhere")]
    QueueConflict {
        queue: String,
        topic: String,
        import_address: String,
    },

    #[error("Could not create queue {queue}: {source}")]
    CreateQueue { queue: String, source: ClientError },

    #[error("Could not create queue {queue}, unexpected error: {source}")]
    CreateAdditionalQueue { queue: String, source: ClientError },

    #[error("Could not create endpoint {endpoint}: {source}")]
    CreateEndpoint {
        endpoint: String,
        source: ClientError,
    },

    #[error("Could not create rule #{index} ({name}): {source}")]
    CreateSubscription {
        index: usize,
        name: String,
        source: ClientError,
    },

    #[error("Could not get queue {queue}: {source}")]
    ReadQueue { queue: String, source: ClientError },

    #[error("Could not read if endpoint {endpoint} exists: {source}")]
    ReadEndpoint {
        endpoint: String,
        source: ClientError,
    },

    #[error("Could not list subscriptions of endpoint {endpoint}: {source}")]
    ReadSubscriptions {
        endpoint: String,
        source: ClientError,
    },

    #[error("Could not read if additional queue {queue} exists: {source}")]
    ReadAdditionalQueue { queue: String, source: ClientError },

    #[error("Queue {queue} not found")]
    QueueNotFound { queue: String },

    #[error("Invalid import id {id:?}: {reason}")]
    InvalidImportId { id: String, reason: String },
}

impl ReconcileError {
    /// Short title used as the diagnostic summary.
    pub fn summary(&self) -> &'static str {
        match self {
            Self::QueueConflict { .. } => "Resource already exists",
            Self::CreateQueue { .. } => "Error creating queue",
            Self::CreateAdditionalQueue { .. } => "Error creating additional queue",
            Self::CreateEndpoint { .. } => "Error creating subscription",
            Self::CreateSubscription { .. } => "Error creating rule",
            Self::ReadQueue { .. } => "Error reading Queue",
            Self::ReadEndpoint { .. } => "Error reading Endpoint",
            Self::ReadSubscriptions { .. } => "Error reading subscriptions",
            Self::ReadAdditionalQueue { .. } => "Error reading queue",
            Self::QueueNotFound { .. } => "Endpoint queue not found",
            Self::InvalidImportId { .. } => "Unexpected import identifier",
        }
    }

    /// Returns `true` for the untracked-resource case, which callers render
    /// with its own remediation.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::QueueConflict { .. })
    }

    /// The client error behind this failure, if any.
    pub fn client_error(&self) -> Option<&ClientError> {
        match self {
            Self::CreateQueue { source, .. }
            | Self::CreateAdditionalQueue { source, .. }
            | Self::CreateEndpoint { source, .. }
            | Self::CreateSubscription { source, .. }
            | Self::ReadQueue { source, .. }
            | Self::ReadEndpoint { source, .. }
            | Self::ReadSubscriptions { source, .. }
            | Self::ReadAdditionalQueue { source, .. } => Some(source),
            Self::QueueConflict { .. } | Self::QueueNotFound { .. } | Self::InvalidImportId { .. } => {
                None
            }
        }
    }

    fn detail(&self) -> String {
        match self {
            Self::QueueConflict {
                queue,
                topic,
                import_address,
            } => format!(
                "This resource already exists and is tracked outside of this state. \
                 To track this resource you have to import it into state with: \
                 'import {import_address}.<Block label> {topic},{queue}'"
            ),
            other => other.to_string(),
        }
    }
}

impl From<&ReconcileError> for Diagnostic {
    fn from(err: &ReconcileError) -> Self {
        Diagnostic::error(err.summary(), err.detail())
    }
}

impl From<ReconcileError> for Diagnostic {
    fn from(err: ReconcileError) -> Self {
        Diagnostic::from(&err)
    }
}

pub type ReconcileResult<T> = Result<T, ReconcileError>;
