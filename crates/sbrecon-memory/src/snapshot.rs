//! JSON snapshots of an in-memory namespace.
//!
//! A snapshot file stands in for a live namespace when the reconciler is run
//! from the command line: it is loaded, reconciled against and written back.

use std::collections::HashMap;
use std::path::Path;

use indexmap::IndexMap;
use sbrecon_client::{QueueProperties, RemoteSubscription};
use serde::{Deserialize, Serialize};

use crate::namespace::{EndpointEntry, InMemoryServiceBus, NamespaceOptions};

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Serialisable content of a namespace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamespaceSnapshot {
    #[serde(default)]
    pub queues: Vec<QueueSnapshot>,
    #[serde(default)]
    pub topics: Vec<TopicSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueSnapshot {
    pub name: String,
    #[serde(flatten)]
    pub properties: QueueProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicSnapshot {
    pub name: String,
    #[serde(default)]
    pub endpoints: Vec<EndpointSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointSnapshot {
    pub name: String,
    pub forward_to: String,
    /// Every rule, the default rule included.
    #[serde(default)]
    pub rules: Vec<RemoteSubscription>,
}

impl InMemoryServiceBus {
    /// Builds a namespace holding exactly the content of `snapshot`.
    pub fn from_snapshot(snapshot: NamespaceSnapshot, options: NamespaceOptions) -> Self {
        let mut bus = Self::with_options(options);
        for queue in snapshot.queues {
            bus.queues.insert(queue.name, queue.properties);
        }

        let topics: HashMap<String, HashMap<String, EndpointEntry>> = snapshot
            .topics
            .into_iter()
            .map(|topic| {
                let endpoints: HashMap<String, EndpointEntry> = topic
                    .endpoints
                    .into_iter()
                    .map(|endpoint| {
                        let rules: IndexMap<_, _> = endpoint
                            .rules
                            .into_iter()
                            .map(|rule| (rule.name, rule.filter))
                            .collect();
                        (
                            endpoint.name,
                            EndpointEntry {
                                forward_to: endpoint.forward_to,
                                rules,
                            },
                        )
                    })
                    .collect();
                (topic.name, endpoints)
            })
            .collect();
        *bus.topics.get_mut() = topics;
        bus
    }

    /// Captures the namespace content. Entries are sorted by name so that
    /// snapshots of equal namespaces compare equal.
    pub async fn snapshot(&self) -> NamespaceSnapshot {
        let mut queues: Vec<QueueSnapshot> = self
            .queues
            .iter()
            .map(|entry| QueueSnapshot {
                name: entry.key().clone(),
                properties: *entry.value(),
            })
            .collect();
        queues.sort_by(|a, b| a.name.cmp(&b.name));

        let guard = self.topics.read().await;
        let mut topics: Vec<TopicSnapshot> = guard
            .iter()
            .map(|(name, endpoints)| {
                let mut endpoints: Vec<EndpointSnapshot> = endpoints
                    .iter()
                    .map(|(name, entry)| EndpointSnapshot {
                        name: name.clone(),
                        forward_to: entry.forward_to.clone(),
                        rules: entry
                            .rules
                            .iter()
                            .map(|(rule, filter)| {
                                RemoteSubscription::new(rule.clone(), filter.clone())
                            })
                            .collect(),
                    })
                    .collect();
                endpoints.sort_by(|a, b| a.name.cmp(&b.name));
                TopicSnapshot {
                    name: name.clone(),
                    endpoints,
                }
            })
            .collect();
        topics.sort_by(|a, b| a.name.cmp(&b.name));

        NamespaceSnapshot { queues, topics }
    }

    /// Loads a namespace from a JSON snapshot file.
    pub async fn load(
        path: impl AsRef<Path>,
        options: NamespaceOptions,
    ) -> Result<Self, SnapshotError> {
        let content = tokio::fs::read_to_string(path).await?;
        let snapshot: NamespaceSnapshot = serde_json::from_str(&content)?;
        Ok(Self::from_snapshot(snapshot, options))
    }

    /// Writes the namespace to a JSON snapshot file.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let content = serde_json::to_string_pretty(&self.snapshot().await)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}
