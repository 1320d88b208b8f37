//! Persisted endpoint state and its reconciliation status.

use sbrecon_client::{EndpointModel, QueueOptions};
use serde::{Deserialize, Serialize};

/// Flat record persisted by the orchestration layer between passes.
///
/// Holds the endpoint's declared fields plus the six reconciliation flags.
/// Create and Read each return a new value; a state is never shared between
/// passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointState {
    pub endpoint_name: String,
    pub topic_name: String,
    pub queue_options: QueueOptions,
    #[serde(default)]
    pub additional_queues: Vec<String>,
    #[serde(default)]
    pub subscriptions: Vec<String>,

    #[serde(default)]
    pub queue_exists: bool,
    #[serde(default)]
    pub endpoint_exists: bool,
    #[serde(default)]
    pub should_create_queue: bool,
    #[serde(default)]
    pub should_create_endpoint: bool,
    #[serde(default)]
    pub should_update_subscriptions: bool,
    #[serde(default)]
    pub has_malformed_filters: bool,
}

impl EndpointState {
    /// Desired state for an endpoint that does not exist yet.
    pub fn planned(model: EndpointModel) -> Self {
        let mut state = Self::from_model(model);
        state.should_create_queue = true;
        state.should_create_endpoint = true;
        state
    }

    /// State carrying the model's fields with every flag cleared.
    pub fn from_model(model: EndpointModel) -> Self {
        Self {
            endpoint_name: model.endpoint_name,
            topic_name: model.topic_name,
            queue_options: model.queue_options,
            additional_queues: model.additional_queues,
            subscriptions: model.subscriptions,
            queue_exists: false,
            endpoint_exists: false,
            should_create_queue: false,
            should_create_endpoint: false,
            should_update_subscriptions: false,
            has_malformed_filters: false,
        }
    }

    /// Fresh model for one pass against the client.
    pub fn to_model(&self) -> EndpointModel {
        EndpointModel {
            endpoint_name: self.endpoint_name.clone(),
            topic_name: self.topic_name.clone(),
            queue_options: self.queue_options,
            additional_queues: self.additional_queues.clone(),
            subscriptions: self.subscriptions.clone(),
        }
    }

    /// Marks everything as created and in sync.
    pub fn settle(&mut self) {
        self.queue_exists = true;
        self.endpoint_exists = true;
        self.should_create_queue = false;
        self.should_create_endpoint = false;
        self.should_update_subscriptions = false;
        self.has_malformed_filters = false;
    }

    /// Returns the explicit status encoded by the flags.
    pub fn status(&self) -> ReconcileStatus {
        if self.should_create_queue || self.should_create_endpoint {
            return ReconcileStatus::NotCreated {
                queue: self.should_create_queue,
                endpoint: self.should_create_endpoint,
            };
        }

        let mut reasons = Vec::new();
        if !self.queue_exists {
            reasons.push(DriftReason::QueueMissing);
        }
        if !self.endpoint_exists {
            reasons.push(DriftReason::EndpointMissing);
        }
        if self.has_malformed_filters {
            reasons.push(DriftReason::MalformedFilters);
        }
        if self.should_update_subscriptions {
            reasons.push(DriftReason::SubscriptionsChanged);
        }

        if reasons.is_empty() {
            ReconcileStatus::Settled
        } else {
            ReconcileStatus::Drifted(reasons)
        }
    }
}

/// Where an endpoint stands in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileStatus {
    /// Parts of the endpoint still have to be created.
    NotCreated { queue: bool, endpoint: bool },
    /// Remote state matches the record.
    Settled,
    /// Remote state diverged from what was applied.
    Drifted(Vec<DriftReason>),
}

impl ReconcileStatus {
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Settled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriftReason {
    QueueMissing,
    EndpointMissing,
    MalformedFilters,
    SubscriptionsChanged,
}
