use std::collections::HashMap;

use dashmap::DashMap;
use indexmap::IndexMap;
use sbrecon_client::{
    ClientError, ClientResult, DEFAULT_RULE_NAME, FilterConvention, MAX_RULE_NAME_LENGTH,
    QueueOptions, QueueProperties, RemoteSubscription, RuleFilter,
};
use tokio::sync::{Mutex, RwLock};

use crate::faults::{Call, Fault, Operation};

/// Number of partitions the real service spreads a partitioned queue over.
pub const BACKEND_PARTITION_COUNT: i64 = 16;

/// Behaviour knobs of the emulated namespace.
#[derive(Debug, Clone)]
pub struct NamespaceOptions {
    /// Multiplier applied to the size of partitioned queues.
    pub partition_count: i64,
    /// Rule names longer than this keep only their tail.
    pub max_rule_name_length: usize,
    /// Convention used to write subscription filters.
    pub filter: FilterConvention,
}

impl Default for NamespaceOptions {
    fn default() -> Self {
        Self {
            partition_count: BACKEND_PARTITION_COUNT,
            max_rule_name_length: MAX_RULE_NAME_LENGTH,
            filter: FilterConvention::default(),
        }
    }
}

/// A topic subscription owned by an endpoint.
#[derive(Debug, Clone, Default)]
pub(crate) struct EndpointEntry {
    pub(crate) forward_to: String,
    /// Rules keyed by (possibly truncated) rule name, in creation order.
    pub(crate) rules: IndexMap<String, RuleFilter>,
}

pub(crate) type TopicEntries = HashMap<String, HashMap<String, EndpointEntry>>;

/// In-memory Service Bus namespace.
///
/// Emulates the parts of the service the reconciler observes:
/// - partitioned queues report their size multiplied by the partition count
/// - rule names are truncated to the backend limit
/// - creating an existing queue is a conflict
///
/// It also records every client call and can be told to fail specific calls,
/// which lets tests assert on the exact sequence of remote operations.
#[derive(Debug)]
pub struct InMemoryServiceBus {
    pub(crate) queues: DashMap<String, QueueProperties>,
    /// topic -> endpoint -> subscription
    pub(crate) topics: RwLock<TopicEntries>,
    pub(crate) options: NamespaceOptions,
    faults: Mutex<Vec<Fault>>,
    calls: Mutex<Vec<Call>>,
}

impl Default for InMemoryServiceBus {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryServiceBus {
    /// Creates an empty namespace with default options.
    pub fn new() -> Self {
        Self::with_options(NamespaceOptions::default())
    }

    /// Creates an empty namespace with the given options.
    pub fn with_options(options: NamespaceOptions) -> Self {
        Self {
            queues: DashMap::new(),
            topics: RwLock::new(HashMap::new()),
            options,
            faults: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn options(&self) -> &NamespaceOptions {
        &self.options
    }

    // ==================== Administration ====================

    /// Creates a topic. Existing topics are left untouched.
    pub async fn create_topic(&self, topic: &str) {
        self.topics
            .write()
            .await
            .entry(topic.to_string())
            .or_default();
    }

    /// Stores a queue directly, bypassing size multiplication.
    pub fn put_queue(&self, name: &str, properties: QueueProperties) {
        self.queues.insert(name.to_string(), properties);
    }

    /// Deletes a queue. Returns `true` if it existed.
    pub fn delete_queue(&self, name: &str) -> bool {
        self.queues.remove(name).is_some()
    }

    /// Deletes an endpoint's topic subscription with all its rules.
    pub async fn delete_endpoint(&self, topic: &str, endpoint: &str) -> bool {
        let mut topics = self.topics.write().await;
        topics
            .get_mut(topic)
            .is_some_and(|endpoints| endpoints.remove(endpoint).is_some())
    }

    /// Stores a rule verbatim on an existing endpoint.
    ///
    /// Used to simulate out-of-band changes such as edited filters or rules
    /// added by another tool.
    pub async fn put_rule(
        &self,
        topic: &str,
        endpoint: &str,
        rule: RemoteSubscription,
    ) -> ClientResult<()> {
        let mut topics = self.topics.write().await;
        let entry = endpoint_entry_mut(&mut topics, topic, endpoint)?;
        entry.rules.insert(rule.name, rule.filter);
        Ok(())
    }

    /// Removes a rule by its stored name.
    pub async fn remove_rule(&self, topic: &str, endpoint: &str, rule_name: &str) -> bool {
        let mut topics = self.topics.write().await;
        match endpoint_entry_mut(&mut topics, topic, endpoint) {
            Ok(entry) => entry.rules.shift_remove(rule_name).is_some(),
            Err(_) => false,
        }
    }

    /// Returns the raw queue properties as stored by the namespace.
    pub fn queue(&self, name: &str) -> Option<QueueProperties> {
        self.queues.get(name).map(|entry| *entry.value())
    }

    /// Returns the queue an endpoint forwards to, if the endpoint exists.
    pub async fn forward_target(&self, topic: &str, endpoint: &str) -> Option<String> {
        let topics = self.topics.read().await;
        topics
            .get(topic)
            .and_then(|endpoints| endpoints.get(endpoint))
            .map(|entry| entry.forward_to.clone())
    }

    // ==================== Faults & call log ====================

    /// Makes every matching call fail with `error` until faults are cleared.
    pub async fn fail_on(&self, operation: Operation, target: Option<&str>, error: ClientError) {
        self.faults.lock().await.push(Fault {
            operation,
            target: target.map(str::to_string),
            error,
        });
    }

    pub async fn clear_faults(&self) {
        self.faults.lock().await.clear();
    }

    /// Returns every call made so far, oldest first.
    pub async fn calls(&self) -> Vec<Call> {
        self.calls.lock().await.clone()
    }

    /// Returns the calls made for one operation.
    pub async fn calls_to(&self, operation: Operation) -> Vec<Call> {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|call| call.operation == operation)
            .cloned()
            .collect()
    }

    pub async fn clear_calls(&self) {
        self.calls.lock().await.clear();
    }

    /// Records a call and returns the injected failure for it, if any.
    pub(crate) async fn enter(&self, operation: Operation, target: &str) -> ClientResult<()> {
        self.calls.lock().await.push(Call::new(operation, target));
        let faults = self.faults.lock().await;
        match faults.iter().find(|fault| fault.matches(operation, target)) {
            Some(fault) => {
                tracing::debug!(%operation, resource = target, error = %fault.error, "Injected failure");
                Err(fault.error.clone())
            }
            None => Ok(()),
        }
    }

    // ==================== Emulation helpers ====================

    /// Size the service reports for a queue created with `options`.
    ///
    /// Sizes whose partitioned total does not fit are rejected like the
    /// service rejects an invalid request.
    pub(crate) fn stored_properties(
        &self,
        options: &QueueOptions,
    ) -> ClientResult<QueueProperties> {
        let size = if options.enable_partitioning {
            options
                .max_size_in_megabytes
                .checked_mul(self.options.partition_count)
                .ok_or_else(|| {
                    ClientError::remote(
                        400,
                        format!(
                            "max_size_in_megabytes {} is out of range for a partitioned queue",
                            options.max_size_in_megabytes
                        ),
                    )
                })?
        } else {
            options.max_size_in_megabytes
        };
        Ok(QueueProperties {
            max_size_in_megabytes: size,
            enable_partitioning: options.enable_partitioning,
        })
    }

    pub(crate) fn default_rule(&self) -> (String, RuleFilter) {
        (
            DEFAULT_RULE_NAME.to_string(),
            self.options.filter.default_rule_filter(),
        )
    }
}

pub(crate) fn endpoint_entry_mut<'a>(
    topics: &'a mut TopicEntries,
    topic: &str,
    endpoint: &str,
) -> ClientResult<&'a mut EndpointEntry> {
    topics
        .get_mut(topic)
        .ok_or_else(|| ClientError::not_found("topic", topic))?
        .get_mut(endpoint)
        .ok_or_else(|| ClientError::not_found("subscription", format!("{topic}/{endpoint}")))
}
