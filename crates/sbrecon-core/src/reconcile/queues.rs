//! Queue state synchronisation for the primary and additional queues.

use sbrecon_client::{EndpointModel, QueueOptions, ServiceBusClient};

use crate::error::{ReconcileError, ReconcileResult};

/// Partitions the production backend spreads a partitioned queue over.
pub const DEFAULT_PARTITION_COUNT: i64 = 16;

/// Recovers the declared queue size from the size reported by the backend.
///
/// Partitioned queues report the total across partitions, so the declared
/// size is the observed size divided by the partition count (integer
/// division).
pub fn normalize_queue_size(observed: i64, partitioning_enabled: bool, partition_count: i64) -> i64 {
    if partitioning_enabled && partition_count > 0 {
        observed / partition_count
    } else {
        observed
    }
}

/// What a read of the primary queue found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum QueueObservation {
    Absent,
    /// Queue options as declared, size already normalised.
    Present(QueueOptions),
}

/// Creates the endpoint's primary queue.
///
/// A conflict is not success: the queue exists but nothing tracks it.
pub(crate) async fn create_endpoint_queue(
    client: &dyn ServiceBusClient,
    model: &EndpointModel,
    import_address: &str,
) -> ReconcileResult<()> {
    match client
        .create_endpoint_queue(&model.endpoint_name, &model.queue_options)
        .await
    {
        Ok(()) => {
            tracing::info!(queue = %model.endpoint_name, "Queue created");
            Ok(())
        }
        Err(err) if err.is_conflict() => {
            tracing::warn!(queue = %model.endpoint_name, "Queue already exists but is not tracked");
            Err(ReconcileError::QueueConflict {
                queue: model.endpoint_name.clone(),
                topic: model.topic_name.clone(),
                import_address: import_address.to_string(),
            })
        }
        Err(source) => Err(ReconcileError::CreateQueue {
            queue: model.endpoint_name.clone(),
            source,
        }),
    }
}

/// Creates every additional queue in declared order, stopping at the first
/// failure.
pub(crate) async fn create_additional_queues(
    client: &dyn ServiceBusClient,
    model: &EndpointModel,
) -> ReconcileResult<()> {
    for queue in &model.additional_queues {
        client
            .create_endpoint_queue(queue, &model.queue_options)
            .await
            .map_err(|source| ReconcileError::CreateAdditionalQueue {
                queue: queue.clone(),
                source,
            })?;
        tracing::debug!(queue = %queue, "Additional queue created");
    }
    Ok(())
}

/// Reads the primary queue as the backend reports it.
///
/// Partitioned queues keep the size summed over their partitions.
pub(crate) async fn observe_raw_endpoint_queue(
    client: &dyn ServiceBusClient,
    model: &EndpointModel,
) -> ReconcileResult<QueueObservation> {
    let queue = client
        .get_endpoint_queue(model)
        .await
        .map_err(|source| ReconcileError::ReadQueue {
            queue: model.endpoint_name.clone(),
            source,
        })?;

    Ok(match queue {
        Some(queue) => QueueObservation::Present(QueueOptions {
            max_size_in_megabytes: queue.max_size_in_megabytes,
            enable_partitioning: queue.enable_partitioning,
        }),
        None => QueueObservation::Absent,
    })
}

/// Reads the primary queue and normalises its size.
pub(crate) async fn observe_endpoint_queue(
    client: &dyn ServiceBusClient,
    model: &EndpointModel,
    partition_count: i64,
) -> ReconcileResult<QueueObservation> {
    let observation = observe_raw_endpoint_queue(client, model).await?;

    let QueueObservation::Present(options) = observation else {
        return Ok(observation);
    };

    Ok(QueueObservation::Present(QueueOptions {
        max_size_in_megabytes: normalize_queue_size(
            options.max_size_in_megabytes,
            options.enable_partitioning,
            partition_count,
        ),
        enable_partitioning: options.enable_partitioning,
    }))
}

/// Returns the queues that still exist, in their original relative order.
///
/// The result is built as a new sequence; the input is never mutated while
/// it is being walked.
pub(crate) async fn retain_existing_queues(
    client: &dyn ServiceBusClient,
    queues: &[String],
) -> ReconcileResult<Vec<String>> {
    let mut existing = Vec::with_capacity(queues.len());
    for queue in queues {
        let exists = client
            .queue_exists(queue)
            .await
            .map_err(|source| ReconcileError::ReadAdditionalQueue {
                queue: queue.clone(),
                source,
            })?;
        if exists {
            existing.push(queue.clone());
        } else {
            tracing::warn!(queue = %queue, "Additional queue was deleted outside of this state");
        }
    }
    Ok(existing)
}
