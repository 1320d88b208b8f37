use sbrecon_client::EndpointModel;

use crate::error::{ReconcileError, ReconcileResult};
use crate::state::EndpointState;

use super::Reconciler;
use super::endpoint::observe_endpoint;
use super::queues::{QueueObservation, observe_raw_endpoint_queue};
use super::subscriptions::observe_subscriptions;

impl Reconciler {
    /// Describes an existing endpoint from remote state alone.
    ///
    /// With nothing declared, every rule is reported under its remote name and
    /// filters are not validated. Additional queues cannot be discovered.
    /// The queue size is reported as the backend stores it, so a partitioned
    /// queue shows the total over all partitions.
    pub(crate) async fn apply_lookup(
        &self,
        topic_name: &str,
        endpoint_name: &str,
    ) -> ReconcileResult<EndpointState> {
        let client = self.client.as_ref();
        let model = EndpointModel::new(topic_name, endpoint_name);

        let queue_options = match observe_raw_endpoint_queue(client, &model).await? {
            QueueObservation::Present(options) => options,
            QueueObservation::Absent => {
                return Err(ReconcileError::QueueNotFound {
                    queue: endpoint_name.to_string(),
                });
            }
        };

        let mut state = EndpointState::from_model(model.with_queue_options(queue_options));
        state.settle();

        if observe_endpoint(client, &state.to_model()).await? {
            let observed =
                observe_subscriptions(client, &state.to_model(), &self.config.filter).await?;
            state.subscriptions = observed.names;
        } else {
            state.endpoint_exists = false;
        }

        tracing::info!(
            endpoint = %endpoint_name,
            topic = %topic_name,
            subscriptions = state.subscriptions.len(),
            "Endpoint looked up"
        );

        Ok(state)
    }
}
