//! `ServiceBusClient` implementation for the in-memory namespace.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use sbrecon_client::{
    ClientError, EndpointModel, QueueOptions, QueueProperties, RemoteSubscription,
    ServiceBusClient, truncate_rule_name,
};

use crate::faults::Operation;
use crate::namespace::{EndpointEntry, InMemoryServiceBus, endpoint_entry_mut};

#[async_trait]
impl ServiceBusClient for InMemoryServiceBus {
    async fn create_endpoint_queue(
        &self,
        queue_name: &str,
        options: &QueueOptions,
    ) -> Result<(), ClientError> {
        self.enter(Operation::CreateQueue, queue_name).await?;

        match self.queues.entry(queue_name.to_string()) {
            Entry::Occupied(_) => Err(ClientError::conflict("queue", queue_name)),
            Entry::Vacant(slot) => {
                let properties = self.stored_properties(options)?;
                tracing::debug!(
                    queue = queue_name,
                    max_size_in_megabytes = properties.max_size_in_megabytes,
                    enable_partitioning = properties.enable_partitioning,
                    "Queue created"
                );
                slot.insert(properties);
                Ok(())
            }
        }
    }

    async fn get_endpoint_queue(
        &self,
        endpoint: &EndpointModel,
    ) -> Result<Option<QueueProperties>, ClientError> {
        self.enter(Operation::GetQueue, &endpoint.endpoint_name)
            .await?;
        Ok(self.queue(&endpoint.endpoint_name))
    }

    async fn queue_exists(&self, queue_name: &str) -> Result<bool, ClientError> {
        self.enter(Operation::QueueExists, queue_name).await?;
        Ok(self.queues.contains_key(queue_name))
    }

    async fn endpoint_exists(&self, endpoint: &EndpointModel) -> Result<bool, ClientError> {
        self.enter(Operation::EndpointExists, &endpoint.endpoint_name)
            .await?;
        let topics = self.topics.read().await;
        Ok(topics
            .get(&endpoint.topic_name)
            .is_some_and(|endpoints| endpoints.contains_key(&endpoint.endpoint_name)))
    }

    async fn create_endpoint_with_default_rule(
        &self,
        endpoint: &EndpointModel,
    ) -> Result<(), ClientError> {
        self.enter(Operation::CreateEndpoint, &endpoint.endpoint_name)
            .await?;

        let (rule_name, filter) = self.default_rule();
        let mut topics = self.topics.write().await;
        let endpoints = topics
            .get_mut(&endpoint.topic_name)
            .ok_or_else(|| ClientError::not_found("topic", endpoint.topic_name.as_str()))?;

        // An endpoint that already exists keeps its rules; only the default
        // rule is put back if it went missing.
        let entry = endpoints
            .entry(endpoint.endpoint_name.clone())
            .or_insert_with(|| EndpointEntry {
                forward_to: endpoint.endpoint_name.clone(),
                ..Default::default()
            });
        entry.rules.entry(rule_name).or_insert(filter);
        Ok(())
    }

    async fn create_endpoint_subscription(
        &self,
        endpoint: &EndpointModel,
        subscription: &str,
    ) -> Result<(), ClientError> {
        self.enter(Operation::CreateSubscription, subscription)
            .await?;

        let rule_name = truncate_rule_name(subscription, self.options.max_rule_name_length);
        let filter = self.options.filter.subscription_filter(subscription);

        let mut topics = self.topics.write().await;
        let entry = endpoint_entry_mut(&mut topics, &endpoint.topic_name, &endpoint.endpoint_name)?;
        entry.rules.insert(rule_name.to_string(), filter);
        Ok(())
    }

    async fn get_endpoint_subscriptions(
        &self,
        endpoint: &EndpointModel,
    ) -> Result<Vec<RemoteSubscription>, ClientError> {
        self.enter(Operation::GetSubscriptions, &endpoint.endpoint_name)
            .await?;

        let (default_rule, _) = self.default_rule();
        let topics = self.topics.read().await;
        let entry = topics
            .get(&endpoint.topic_name)
            .and_then(|endpoints| endpoints.get(&endpoint.endpoint_name))
            .ok_or_else(|| {
                ClientError::not_found(
                    "subscription",
                    format!("{}/{}", endpoint.topic_name, endpoint.endpoint_name),
                )
            })?;
        Ok(entry
            .rules
            .iter()
            .filter(|(name, _)| **name != default_rule)
            .map(|(name, filter)| RemoteSubscription::new(name.clone(), filter.clone()))
            .collect())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
