//! Create and Read passes against the in-memory namespace.

use std::sync::Arc;

use sbrecon_client::{
    ClientError, EndpointModel, FilterConvention, QueueOptions, QueueProperties,
    RemoteSubscription, RuleFilter,
};
use sbrecon_core::{DriftReason, EndpointState, ReconcileStatus, Reconciler, Severity};
use sbrecon_memory::{InMemoryServiceBus, Operation};

const TOPIC: &str = "bundle-1";
const ENDPOINT: &str = "orders";

async fn namespace() -> Arc<InMemoryServiceBus> {
    let bus = Arc::new(InMemoryServiceBus::new());
    bus.create_topic(TOPIC).await;
    bus
}

fn plan(subscriptions: &[&str]) -> EndpointState {
    let model = subscriptions
        .iter()
        .fold(EndpointModel::new(TOPIC, ENDPOINT), |model, name| {
            model.with_subscription(*name)
        });
    EndpointState::planned(model)
}

fn targets(calls: Vec<sbrecon_memory::Call>) -> Vec<String> {
    calls.into_iter().map(|call| call.target).collect()
}

#[tokio::test]
async fn create_then_read_partitioned_endpoint() {
    let bus = namespace().await;
    let reconciler = Reconciler::new(bus.clone());

    let mut planned = plan(&["Dg.Test.V1.Subscription"]);
    planned.queue_options = QueueOptions {
        max_size_in_megabytes: 5120,
        enable_partitioning: true,
    };

    let created = reconciler.create(planned).await.expect("create endpoint");
    assert!(created.diagnostics.is_empty());
    assert!(created.state.queue_exists);
    assert!(created.state.endpoint_exists);
    assert!(!created.state.should_create_queue);
    assert!(!created.state.should_create_endpoint);
    assert!(created.state.status().is_settled());

    // The namespace reports the size summed over its partitions
    assert_eq!(
        bus.queue(ENDPOINT),
        Some(QueueProperties {
            max_size_in_megabytes: 81920,
            enable_partitioning: true,
        })
    );
    assert_eq!(bus.forward_target(TOPIC, ENDPOINT).await.as_deref(), Some(ENDPOINT));

    let read = reconciler.read(created.state.clone()).await.expect("read endpoint");
    assert_eq!(read.state.queue_options.max_size_in_megabytes, 5120);
    assert!(read.state.queue_options.enable_partitioning);
    assert_eq!(read.state.subscriptions, vec!["Dg.Test.V1.Subscription"]);
    assert_eq!(read.state, created.state);
}

#[tokio::test]
async fn read_is_idempotent() {
    let bus = namespace().await;
    let reconciler = Reconciler::new(bus.clone());

    let mut planned = plan(&["Orders.Placed", "Orders.Shipped"]);
    planned.additional_queues = vec!["orders-audit".to_string()];
    let created = reconciler.create(planned).await.expect("create endpoint");

    let first = reconciler.read(created.state).await.expect("first read");
    let second = reconciler.read(first.state.clone()).await.expect("second read");
    assert_eq!(first.state, second.state);
    assert_eq!(second.state.additional_queues, vec!["orders-audit"]);
}

#[tokio::test]
async fn create_reports_untracked_queue_as_conflict() {
    let bus = namespace().await;
    bus.put_queue(
        ENDPOINT,
        QueueProperties {
            max_size_in_megabytes: 1024,
            enable_partitioning: false,
        },
    );
    let reconciler = Reconciler::new(bus.clone());

    let diagnostics = reconciler
        .create(plan(&["Orders.Placed"]))
        .await
        .expect_err("queue is not tracked");

    let error = diagnostics.errors().next().expect("one error");
    assert_eq!(error.severity, Severity::Error);
    assert_eq!(error.summary, "Resource already exists");
    assert!(error.detail.contains("dgservicebus_endpoint.<Block label> bundle-1,orders"));

    // Nothing after the queue was attempted
    assert!(bus.calls_to(Operation::CreateEndpoint).await.is_empty());
}

#[tokio::test]
async fn create_reports_other_queue_failures_generically() {
    let bus = namespace().await;
    bus.fail_on(
        Operation::CreateQueue,
        Some(ENDPOINT),
        ClientError::remote(500, "internal server error"),
    )
    .await;
    let reconciler = Reconciler::new(bus.clone());

    let diagnostics = reconciler
        .create(plan(&["Orders.Placed"]))
        .await
        .expect_err("queue creation fails");

    let error = diagnostics.errors().next().expect("one error");
    assert_eq!(error.summary, "Error creating queue");
    assert!(!error.detail.contains("import"));
}

#[tokio::test]
async fn create_names_failing_additional_queue() {
    let bus = namespace().await;
    bus.fail_on(
        Operation::CreateQueue,
        Some("orders-audit"),
        ClientError::connection("connection reset"),
    )
    .await;
    let reconciler = Reconciler::new(bus.clone());

    let mut planned = plan(&["Orders.Placed"]);
    planned.additional_queues = vec!["orders-retry".to_string(), "orders-audit".to_string()];

    let diagnostics = reconciler.create(planned).await.expect_err("additional queue fails");
    let error = diagnostics.errors().next().expect("one error");
    assert_eq!(error.summary, "Error creating additional queue");
    assert!(error.detail.contains("orders-audit"));

    // Created resources are not rolled back
    assert!(bus.queue(ENDPOINT).is_some());
    assert!(bus.queue("orders-retry").is_some());
    assert!(bus.calls_to(Operation::CreateEndpoint).await.is_empty());
}

#[tokio::test]
async fn create_stops_at_first_failing_subscription() {
    let bus = namespace().await;
    bus.fail_on(
        Operation::CreateSubscription,
        Some("Orders.Shipped"),
        ClientError::remote(400, "bad request"),
    )
    .await;
    let reconciler = Reconciler::new(bus.clone());

    let diagnostics = reconciler
        .create(plan(&["Orders.Placed", "Orders.Shipped", "Orders.Cancelled"]))
        .await
        .expect_err("second rule fails");

    let error = diagnostics.errors().next().expect("one error");
    assert_eq!(error.summary, "Error creating rule");
    assert!(error.detail.contains("#1"));
    assert_eq!(
        targets(bus.calls_to(Operation::CreateSubscription).await),
        vec!["Orders.Placed", "Orders.Shipped"]
    );
}

#[tokio::test]
async fn create_without_topic_fails_on_endpoint() {
    let bus = Arc::new(InMemoryServiceBus::new());
    let reconciler = Reconciler::new(bus.clone());

    let diagnostics = reconciler
        .create(plan(&["Orders.Placed"]))
        .await
        .expect_err("topic is missing");
    assert_eq!(
        diagnostics.errors().next().map(|d| d.summary.as_str()),
        Some("Error creating subscription")
    );
}

#[tokio::test]
async fn create_skips_queue_when_already_created() {
    let bus = namespace().await;
    bus.put_queue(
        ENDPOINT,
        QueueProperties {
            max_size_in_megabytes: 1024,
            enable_partitioning: false,
        },
    );
    let reconciler = Reconciler::new(bus.clone());

    let mut planned = plan(&["Orders.Placed"]);
    planned.should_create_queue = false;
    planned.additional_queues = vec!["orders-audit".to_string()];

    let created = reconciler.create(planned).await.expect("create endpoint");
    assert!(created.state.status().is_settled());
    assert_eq!(
        targets(bus.calls_to(Operation::CreateQueue).await),
        vec!["orders-audit"]
    );
}

#[tokio::test]
async fn create_skips_additional_queues_when_endpoint_exists() {
    let bus = namespace().await;
    let reconciler = Reconciler::new(bus.clone());

    let mut planned = plan(&["Orders.Placed"]);
    planned.should_create_endpoint = false;
    planned.additional_queues = vec!["orders-audit".to_string()];

    reconciler.create(planned).await.expect("create endpoint");
    assert_eq!(targets(bus.calls_to(Operation::CreateQueue).await), vec![ENDPOINT]);
    // The endpoint call itself is idempotent and still issued
    assert_eq!(bus.calls_to(Operation::CreateEndpoint).await.len(), 1);
}

#[tokio::test]
async fn long_subscription_names_resolve_from_truncated_rules() {
    let bus = namespace().await;
    let reconciler = Reconciler::new(bus.clone());

    let long_name = format!("Acme.Fulfilment.{}", "Warehouse".repeat(5));
    assert!(long_name.len() > 50);
    let truncated = &long_name[long_name.len() - 50..];

    let created = reconciler
        .create(plan(&[long_name.as_str()]))
        .await
        .expect("create endpoint");

    let read = reconciler.read(created.state.clone()).await.expect("read endpoint");
    assert_eq!(read.state.subscriptions, vec![long_name.clone()]);
    assert!(!read.state.has_malformed_filters);

    // A filter built from the truncated name is not the expected one
    bus.put_rule(
        TOPIC,
        ENDPOINT,
        RemoteSubscription::new(
            truncated,
            FilterConvention::default().subscription_filter(truncated),
        ),
    )
    .await
    .expect("replace rule");

    let read = reconciler.read(created.state).await.expect("read endpoint");
    assert_eq!(read.state.subscriptions, vec![long_name]);
    assert!(read.state.has_malformed_filters);
    assert_eq!(
        read.state.status(),
        ReconcileStatus::Drifted(vec![DriftReason::MalformedFilters])
    );
}

#[tokio::test]
async fn read_detects_deleted_queue() {
    let bus = namespace().await;
    let reconciler = Reconciler::new(bus.clone());
    let created = reconciler
        .create(plan(&["Orders.Placed"]))
        .await
        .expect("create endpoint");

    assert!(bus.delete_queue(ENDPOINT));

    let read = reconciler.read(created.state).await.expect("read endpoint");
    assert!(!read.state.queue_exists);
    assert!(read.state.endpoint_exists);
    assert_eq!(
        read.state.status(),
        ReconcileStatus::Drifted(vec![DriftReason::QueueMissing])
    );
}

#[tokio::test]
async fn read_without_endpoint_clears_subscriptions() {
    let bus = namespace().await;
    let reconciler = Reconciler::new(bus.clone());
    let created = reconciler
        .create(plan(&["Orders.Placed", "Orders.Shipped"]))
        .await
        .expect("create endpoint");

    assert!(bus.delete_endpoint(TOPIC, ENDPOINT).await);
    bus.clear_calls().await;

    let read = reconciler.read(created.state).await.expect("read endpoint");
    assert!(!read.state.endpoint_exists);
    assert!(read.state.subscriptions.is_empty());
    assert!(bus.calls_to(Operation::GetSubscriptions).await.is_empty());
}

#[tokio::test]
async fn read_without_subscriptions_skips_endpoint_checks() {
    let bus = namespace().await;
    let reconciler = Reconciler::new(bus.clone());
    let created = reconciler.create(plan(&[])).await.expect("create endpoint");

    assert!(bus.delete_endpoint(TOPIC, ENDPOINT).await);
    bus.clear_calls().await;

    let read = reconciler.read(created.state).await.expect("read endpoint");
    assert!(read.state.endpoint_exists);
    assert!(bus.calls_to(Operation::EndpointExists).await.is_empty());
}

#[tokio::test]
async fn read_prunes_deleted_additional_queues() {
    let bus = namespace().await;
    let reconciler = Reconciler::new(bus.clone());

    let mut planned = plan(&["Orders.Placed"]);
    planned.additional_queues = vec!["a".to_string(), "b".to_string(), "c".to_string()];
    let created = reconciler.create(planned).await.expect("create endpoint");

    assert!(bus.delete_queue("b"));

    let read = reconciler.read(created.state).await.expect("read endpoint");
    assert_eq!(read.state.additional_queues, vec!["a", "c"]);
    assert!(read.state.status().is_settled());
}

#[tokio::test]
async fn read_keeps_untracked_rules_and_flags_edited_filters() {
    let bus = namespace().await;
    let reconciler = Reconciler::new(bus.clone());
    let created = reconciler
        .create(plan(&["Orders.Placed", "Orders.Shipped"]))
        .await
        .expect("create endpoint");

    bus.put_rule(
        TOPIC,
        ENDPOINT,
        RemoteSubscription::new("Orders.Shipped", RuleFilter::sql("1=1")),
    )
    .await
    .expect("edit rule");
    bus.put_rule(
        TOPIC,
        ENDPOINT,
        RemoteSubscription::new(
            "Legacy.Invoices",
            FilterConvention::default().subscription_filter("Legacy.Invoices"),
        ),
    )
    .await
    .expect("add rule");

    let read = reconciler.read(created.state).await.expect("read endpoint");
    assert_eq!(
        read.state.subscriptions,
        vec!["Orders.Placed", "Orders.Shipped", "Legacy.Invoices"]
    );
    assert!(read.state.has_malformed_filters);
}

#[tokio::test]
async fn read_drops_rules_deleted_out_of_band() {
    let bus = namespace().await;
    let reconciler = Reconciler::new(bus.clone());
    let created = reconciler
        .create(plan(&["Orders.Placed", "Orders.Shipped", "Orders.Cancelled"]))
        .await
        .expect("create endpoint");

    assert!(bus.remove_rule(TOPIC, ENDPOINT, "Orders.Shipped").await);

    let read = reconciler.read(created.state).await.expect("read endpoint");
    assert_eq!(read.state.subscriptions, vec!["Orders.Placed", "Orders.Cancelled"]);
    assert!(!read.state.has_malformed_filters);
}

#[tokio::test]
async fn read_keeps_rule_with_empty_name_untracked() {
    let bus = namespace().await;
    let reconciler = Reconciler::new(bus.clone());
    let created = reconciler
        .create(plan(&["Orders.Placed"]))
        .await
        .expect("create endpoint");

    bus.put_rule(
        TOPIC,
        ENDPOINT,
        RemoteSubscription::new("", RuleFilter::sql("1=1")),
    )
    .await
    .expect("add rule");

    let read = reconciler.read(created.state).await.expect("read endpoint");
    assert_eq!(read.state.subscriptions, vec!["Orders.Placed", ""]);
    // The empty rule is not attributed to a declared name, so no filter is flagged
    assert!(!read.state.has_malformed_filters);
    assert!(read.diagnostics.is_empty());
}

#[tokio::test]
async fn read_warns_about_ambiguous_rule_names() {
    let bus = namespace().await;
    let reconciler = Reconciler::new(bus.clone());
    let created = reconciler
        .create(plan(&["Billing.Orders.Placed", "Orders.Placed"]))
        .await
        .expect("create endpoint");

    let read = reconciler.read(created.state).await.expect("read endpoint");
    assert!(read.diagnostics.iter().all(|d| d.severity == Severity::Warning));
    let warning = read.diagnostics.warnings().next().expect("ambiguity warning");
    assert_eq!(warning.summary, "Ambiguous subscription name");
    assert!(warning.detail.contains("Billing.Orders.Placed"));

    // The first declared candidate wins, so the second rule is misattributed
    assert_eq!(
        read.state.subscriptions,
        vec!["Billing.Orders.Placed", "Billing.Orders.Placed"]
    );
    assert!(read.state.has_malformed_filters);
}

#[tokio::test]
async fn read_aborts_on_transport_error() {
    let bus = namespace().await;
    let reconciler = Reconciler::new(bus.clone());
    let created = reconciler
        .create(plan(&["Orders.Placed"]))
        .await
        .expect("create endpoint");

    bus.fail_on(
        Operation::QueueExists,
        None,
        ClientError::connection("connection refused"),
    )
    .await;

    let mut state = created.state;
    state.additional_queues = vec!["orders-audit".to_string()];

    let diagnostics = reconciler.read(state).await.expect_err("read fails");
    assert!(diagnostics.has_error());
    assert_eq!(
        diagnostics.errors().next().map(|d| d.summary.as_str()),
        Some("Error reading queue")
    );
}

#[tokio::test]
async fn read_reports_queue_read_failure() {
    let bus = namespace().await;
    let reconciler = Reconciler::new(bus.clone());
    let created = reconciler
        .create(plan(&["Orders.Placed"]))
        .await
        .expect("create endpoint");

    bus.fail_on(Operation::GetQueue, None, ClientError::unauthorized("token expired"))
        .await;
    bus.clear_calls().await;

    let diagnostics = reconciler.read(created.state).await.expect_err("read fails");
    assert_eq!(
        diagnostics.errors().next().map(|d| d.summary.as_str()),
        Some("Error reading Queue")
    );
    assert!(bus.calls_to(Operation::EndpointExists).await.is_empty());
}
