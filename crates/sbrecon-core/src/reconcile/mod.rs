//! Reconciliation of one endpoint's resource cluster.
//!
//! Two passes are exposed:
//! - Create: brings the backend in line with a planned state
//! - Read: re-derives the state from what the backend reports, folding drift
//!   (deleted queues, edited filters, foreign rules) into the flags
//!
//! Remote calls are issued one at a time, in a fixed order, and the first
//! failing call ends the pass.

mod create;
mod endpoint;
mod lookup;
mod queues;
mod read;
mod subscriptions;

pub use queues::{DEFAULT_PARTITION_COUNT, normalize_queue_size};
pub use subscriptions::{NameMatch, match_subscription_name, resolve_subscription_name};

use sbrecon_client::DynClient;
use tracing::Instrument;

use crate::config::ReconcilerConfig;
use crate::diagnostics::{Diagnostic, Diagnostics, Reconciled};
use crate::error::ReconcileError;
use crate::import::ImportId;
use crate::state::EndpointState;

/// Entry point of the reconciliation engine.
///
/// Holds no state between passes; one instance can serve any number of
/// endpoints.
pub struct Reconciler {
    client: DynClient,
    config: ReconcilerConfig,
}

impl Reconciler {
    pub fn new(client: DynClient) -> Self {
        Self::with_config(client, ReconcilerConfig::default())
    }

    pub fn with_config(client: DynClient, config: ReconcilerConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Creates the endpoint described by `plan`.
    ///
    /// On success every `*_exists` flag is set and every `should_*` flag is
    /// cleared. On failure the diagnostics name the failing step; resources
    /// created before it are left in place.
    pub async fn create(&self, plan: EndpointState) -> Result<Reconciled, Diagnostics> {
        let span = tracing::info_span!(
            "create",
            endpoint = %plan.endpoint_name,
            topic = %plan.topic_name,
            backend = self.client.backend_name()
        );

        finish(self.apply_create(plan).instrument(span).await, Diagnostics::new())
    }

    /// Refreshes `state` from the backend.
    ///
    /// Running it twice without remote changes yields the same state.
    pub async fn read(&self, state: EndpointState) -> Result<Reconciled, Diagnostics> {
        let span = tracing::info_span!(
            "read",
            endpoint = %state.endpoint_name,
            topic = %state.topic_name,
            backend = self.client.backend_name()
        );

        let mut warnings = Diagnostics::new();
        let result = self.apply_read(state, &mut warnings).instrument(span).await;
        finish(result, warnings)
    }

    /// Describes an existing endpoint without any declared state.
    pub async fn lookup(
        &self,
        topic_name: &str,
        endpoint_name: &str,
    ) -> Result<Reconciled, Diagnostics> {
        finish(
            self.apply_lookup(topic_name, endpoint_name).await,
            Diagnostics::new(),
        )
    }

    /// Builds the state of an endpoint from an import id of the form
    /// `<topic_name>,<endpoint_name>`.
    pub async fn import(&self, id: &str) -> Result<Reconciled, Diagnostics> {
        let id = ImportId::parse(id).map_err(|err| Diagnostics::from(Diagnostic::from(err)))?;
        self.lookup(&id.topic_name, &id.endpoint_name).await
    }
}

fn finish(
    result: Result<EndpointState, ReconcileError>,
    mut diagnostics: Diagnostics,
) -> Result<Reconciled, Diagnostics> {
    match result {
        Ok(state) => Ok(Reconciled { state, diagnostics }),
        Err(err) => {
            tracing::error!(
                error = %err,
                conflict = err.is_conflict(),
                category = ?err.client_error().map(|source| source.category()),
                "Reconciliation failed"
            );
            diagnostics.push(Diagnostic::from(err));
            Err(diagnostics)
        }
    }
}
