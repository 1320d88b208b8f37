use sbrecon_client::FilterConvention;
use serde::{Deserialize, Serialize};

use crate::reconcile::DEFAULT_PARTITION_COUNT;

/// Settings of the reconciliation engine.
///
/// Every field has a default matching the production backend, so an empty
/// TOML table deserialises to a usable configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcilerConfig {
    /// Partitions the backend spreads a partitioned queue over.
    #[serde(default = "default_partition_count")]
    pub partition_count: i64,
    #[serde(default)]
    pub filter: FilterConvention,
    /// Resource address shown in the import hint of a queue conflict.
    #[serde(default = "default_import_address")]
    pub import_address: String,
    /// Emit a warning when a remote rule name is a suffix of several declared
    /// subscriptions.
    #[serde(default = "default_true")]
    pub warn_on_ambiguous_subscriptions: bool,
}

fn default_partition_count() -> i64 {
    DEFAULT_PARTITION_COUNT
}

fn default_import_address() -> String {
    "dgservicebus_endpoint".into()
}

fn default_true() -> bool {
    true
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            partition_count: default_partition_count(),
            filter: FilterConvention::default(),
            import_address: default_import_address(),
            warn_on_ambiguous_subscriptions: true,
        }
    }
}

impl ReconcilerConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.partition_count <= 0 {
            return Err("reconciler.partition_count must be > 0".into());
        }
        if self.filter.header_property.trim().is_empty() {
            return Err("reconciler.filter.header_property must not be empty".into());
        }
        if self.import_address.trim().is_empty() {
            return Err("reconciler.import_address must not be empty".into());
        }
        Ok(())
    }
}
