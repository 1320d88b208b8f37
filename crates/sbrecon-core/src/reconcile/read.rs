use crate::diagnostics::Diagnostics;
use crate::error::ReconcileResult;
use crate::state::EndpointState;

use super::Reconciler;
use super::endpoint::observe_endpoint;
use super::queues::{QueueObservation, observe_endpoint_queue, retain_existing_queues};
use super::subscriptions::observe_subscriptions;

impl Reconciler {
    /// Re-derives `state` from remote observation.
    ///
    /// Warnings go to `warnings`; the returned state is only produced when
    /// every step succeeded.
    pub(crate) async fn apply_read(
        &self,
        mut state: EndpointState,
        warnings: &mut Diagnostics,
    ) -> ReconcileResult<EndpointState> {
        let client = self.client.as_ref();
        let model = state.to_model();

        // 1. Optimistic defaults, cleared below by whatever is missing
        state.settle();

        // 2. Primary queue
        match observe_endpoint_queue(client, &model, self.config.partition_count).await? {
            QueueObservation::Absent => {
                tracing::warn!(queue = %model.endpoint_name, "Queue was deleted outside of this state");
                state.queue_exists = false;
            }
            QueueObservation::Present(options) => {
                state.queue_options = options;
            }
        }

        // 3-4. Endpoint and subscriptions; nothing to check without subscriptions
        if !model.subscriptions.is_empty() {
            if observe_endpoint(client, &model).await? {
                let observed = observe_subscriptions(client, &model, &self.config.filter).await?;

                if self.config.warn_on_ambiguous_subscriptions {
                    for (remote, candidates) in &observed.ambiguous {
                        warnings.add_warning(
                            "Ambiguous subscription name",
                            format!(
                                "Rule {remote:?} matches several subscriptions ({}); \
                                 it was attributed to {:?}",
                                candidates.join(", "),
                                candidates.first().map(String::as_str).unwrap_or_default()
                            ),
                        );
                    }
                }

                state.has_malformed_filters = !observed.malformed.is_empty();
                state.subscriptions = observed.names;
            } else {
                state.endpoint_exists = false;
                state.subscriptions = Vec::new();
            }
        }

        // 5. Additional queues
        state.additional_queues = retain_existing_queues(client, &model.additional_queues).await?;

        tracing::info!(
            endpoint = %state.endpoint_name,
            queue_exists = state.queue_exists,
            endpoint_exists = state.endpoint_exists,
            has_malformed_filters = state.has_malformed_filters,
            subscriptions = state.subscriptions.len(),
            additional_queues = state.additional_queues.len(),
            "Endpoint state refreshed"
        );

        Ok(state)
    }
}
