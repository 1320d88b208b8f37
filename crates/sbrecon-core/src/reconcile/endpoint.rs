use sbrecon_client::{EndpointModel, ServiceBusClient};

use crate::error::{ReconcileError, ReconcileResult};

/// Returns whether the endpoint's topic subscription exists.
pub(crate) async fn observe_endpoint(
    client: &dyn ServiceBusClient,
    model: &EndpointModel,
) -> ReconcileResult<bool> {
    let exists = client
        .endpoint_exists(model)
        .await
        .map_err(|source| ReconcileError::ReadEndpoint {
            endpoint: model.endpoint_name.clone(),
            source,
        })?;
    if !exists {
        tracing::warn!(
            endpoint = %model.endpoint_name,
            topic = %model.topic_name,
            "Endpoint was deleted outside of this state"
        );
    }
    Ok(exists)
}

/// Creates the endpoint with its default rule.
pub(crate) async fn create_endpoint(
    client: &dyn ServiceBusClient,
    model: &EndpointModel,
) -> ReconcileResult<()> {
    client
        .create_endpoint_with_default_rule(model)
        .await
        .map_err(|source| ReconcileError::CreateEndpoint {
            endpoint: model.endpoint_name.clone(),
            source,
        })?;
    tracing::info!(
        endpoint = %model.endpoint_name,
        topic = %model.topic_name,
        "Endpoint created with default rule"
    );
    Ok(())
}
