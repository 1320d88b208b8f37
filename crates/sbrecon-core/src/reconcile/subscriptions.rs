//! Subscription reconciliation.
//!
//! The backend truncates rule names to their last 50 characters, so a remote
//! rule is mapped back to the declared subscription whose name ends with it.

use sbrecon_client::{EndpointModel, FilterConvention, ServiceBusClient};

use crate::error::{ReconcileError, ReconcileResult};

/// Returns the first declared name that ends with `remote`.
///
/// Declared order decides between several candidates; see
/// [`resolve_subscription_name`] to find out whether that happened. An empty
/// remote name matches nothing.
pub fn match_subscription_name<'a>(remote: &str, declared: &'a [String]) -> Option<&'a str> {
    if remote.is_empty() {
        return None;
    }
    declared
        .iter()
        .find(|name| name.ends_with(remote))
        .map(String::as_str)
}

/// Result of mapping a remote rule name to a declared subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameMatch<'a> {
    /// No declared name ends with the remote name.
    Unmatched,
    Unique(&'a str),
    /// Several declared names end with the remote name; `chosen` is the first.
    Ambiguous {
        chosen: &'a str,
        candidates: Vec<&'a str>,
    },
}

impl<'a> NameMatch<'a> {
    /// The declared name the remote rule resolves to.
    pub fn resolved(&self) -> Option<&'a str> {
        match self {
            Self::Unmatched => None,
            Self::Unique(name) => Some(*name),
            Self::Ambiguous { chosen, .. } => Some(*chosen),
        }
    }
}

/// Like [`match_subscription_name`], but reports every candidate.
pub fn resolve_subscription_name<'a>(remote: &str, declared: &'a [String]) -> NameMatch<'a> {
    if remote.is_empty() {
        return NameMatch::Unmatched;
    }
    let candidates: Vec<&'a str> = declared
        .iter()
        .filter(|name| name.ends_with(remote))
        .map(String::as_str)
        .collect();

    match candidates.len() {
        0 => NameMatch::Unmatched,
        1 => NameMatch::Unique(candidates[0]),
        _ => NameMatch::Ambiguous {
            chosen: candidates[0],
            candidates,
        },
    }
}

/// Subscriptions as observed on the backend, mapped to declared names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SubscriptionObservation {
    /// New subscription list, in the order the backend returned the rules.
    pub names: Vec<String>,
    /// Declared names whose filter differs from the expected one.
    pub malformed: Vec<String>,
    /// Remote rules no declared subscription accounts for.
    pub untracked: Vec<String>,
    /// Remote names that matched several declared names, with the candidates.
    pub ambiguous: Vec<(String, Vec<String>)>,
}

/// Creates every declared subscription in order, stopping at the first failure.
pub(crate) async fn create_subscriptions(
    client: &dyn ServiceBusClient,
    model: &EndpointModel,
) -> ReconcileResult<()> {
    for (index, subscription) in model.subscriptions.iter().enumerate() {
        client
            .create_endpoint_subscription(model, subscription)
            .await
            .map_err(|source| ReconcileError::CreateSubscription {
                index,
                name: subscription.clone(),
                source,
            })?;
        tracing::debug!(
            endpoint = %model.endpoint_name,
            subscription = %subscription,
            "Subscription created"
        );
    }
    Ok(())
}

/// Reads the endpoint's rules and maps them back to declared subscriptions.
///
/// Unknown rules are kept under their remote name so the next apply removes
/// them. Filters are validated against the full declared name.
pub(crate) async fn observe_subscriptions(
    client: &dyn ServiceBusClient,
    model: &EndpointModel,
    filter: &FilterConvention,
) -> ReconcileResult<SubscriptionObservation> {
    let remote = client
        .get_endpoint_subscriptions(model)
        .await
        .map_err(|source| ReconcileError::ReadSubscriptions {
            endpoint: model.endpoint_name.clone(),
            source,
        })?;

    let mut observation = SubscriptionObservation::default();
    for rule in remote {
        let matched = resolve_subscription_name(&rule.name, &model.subscriptions);

        if let NameMatch::Ambiguous { candidates, .. } = &matched {
            observation.ambiguous.push((
                rule.name.clone(),
                candidates.iter().map(|c| c.to_string()).collect(),
            ));
        }

        let Some(full_name) = matched.resolved() else {
            if !model.subscriptions.is_empty() {
                tracing::warn!(
                    endpoint = %model.endpoint_name,
                    rule = %rule.name,
                    "Untracked subscription rule"
                );
            }
            observation.untracked.push(rule.name.clone());
            observation.names.push(rule.name);
            continue;
        };

        if !filter.is_filter_correct(&rule.filter, full_name) {
            tracing::warn!(
                endpoint = %model.endpoint_name,
                subscription = %full_name,
                "Subscription filter was changed outside of this state"
            );
            observation.malformed.push(full_name.to_string());
        }
        observation.names.push(full_name.to_string());
    }

    Ok(observation)
}
