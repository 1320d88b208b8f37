use crate::error::ReconcileResult;
use crate::state::EndpointState;

use super::Reconciler;
use super::endpoint::create_endpoint;
use super::queues::{create_additional_queues, create_endpoint_queue};
use super::subscriptions::create_subscriptions;

impl Reconciler {
    /// Brings the backend in line with `plan`, step by step.
    ///
    /// Nothing is rolled back: resources created before a failing step stay.
    pub(crate) async fn apply_create(&self, mut plan: EndpointState) -> ReconcileResult<EndpointState> {
        let client = self.client.as_ref();
        let model = plan.to_model();

        // 1. Primary queue
        if plan.should_create_queue {
            create_endpoint_queue(client, &model, &self.config.import_address).await?;
        } else {
            tracing::info!(queue = %model.endpoint_name, "Queue already exists, skipping creation");
        }

        // 2. Additional queues
        if plan.should_create_endpoint {
            create_additional_queues(client, &model).await?;
        } else {
            tracing::info!(endpoint = %model.endpoint_name, "Endpoint already exists, skipping creation");
        }

        // 3. Endpoint with its default rule
        create_endpoint(client, &model).await?;

        // 4. Subscriptions, in declared order
        create_subscriptions(client, &model).await?;

        plan.settle();

        tracing::info!(
            endpoint = %plan.endpoint_name,
            topic = %plan.topic_name,
            subscriptions = plan.subscriptions.len(),
            additional_queues = plan.additional_queues.len(),
            "Endpoint created"
        );

        Ok(plan)
    }
}
