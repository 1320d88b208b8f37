use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use sbrecon_client::EndpointModel;
use sbrecon_core::{Diagnostics, EndpointState, Reconciled, Reconciler};
use sbrecon_memory::InMemoryServiceBus;
use serde::de::DeserializeOwned;

use crate::cli::{CreateArgs, ImportArgs, LookupArgs, OutputFormat, ReadArgs};
use crate::commands::namespace;
use crate::output::{print_diagnostics, print_state, print_status, print_success};

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

async fn write_state(state: &EndpointState, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(state)?;
    tokio::fs::write(path, content)
        .await
        .with_context(|| format!("Failed to write state: {}", path.display()))
}

/// Reports a pass: diagnostics always, then the state either to `out` or to
/// stdout.
async fn report(
    result: Result<Reconciled, Diagnostics>,
    out: Option<&Path>,
    format: OutputFormat,
) -> Result<EndpointState> {
    let reconciled = match result {
        Ok(reconciled) => reconciled,
        Err(diagnostics) => {
            print_diagnostics(&diagnostics);
            anyhow::bail!("reconciliation failed with {} diagnostic(s)", diagnostics.len());
        }
    };

    print_diagnostics(&reconciled.diagnostics);
    match out {
        Some(path) => {
            write_state(&reconciled.state, path).await?;
            print_success(&format!(
                "Endpoint {} written to {}",
                reconciled.state.endpoint_name.cyan(),
                path.display()
            ));
        }
        None => print_state(&reconciled.state, format)?,
    }
    Ok(reconciled.state)
}

pub async fn create(
    reconciler: &Reconciler,
    bus: &InMemoryServiceBus,
    namespace_path: &Path,
    args: &CreateArgs,
    format: OutputFormat,
) -> Result<()> {
    let model: EndpointModel = read_json(&args.plan).await?;
    let mut plan = EndpointState::planned(model);
    plan.should_create_queue = !args.skip_queue;
    plan.should_create_endpoint = !args.skip_endpoint;

    let result = reconciler.create(plan).await;

    // Nothing is rolled back, so whatever was created is persisted even when
    // a later step failed.
    namespace::save(bus, namespace_path).await?;
    report(result, args.out.as_deref(), format).await?;
    Ok(())
}

pub async fn read(reconciler: &Reconciler, args: &ReadArgs, format: OutputFormat) -> Result<()> {
    let state: EndpointState = read_json(&args.state).await?;
    report(reconciler.read(state).await, args.out.as_deref(), format).await?;
    Ok(())
}

pub async fn lookup(reconciler: &Reconciler, args: &LookupArgs, format: OutputFormat) -> Result<()> {
    let result = reconciler.lookup(&args.topic, &args.endpoint).await;
    report(result, None, format).await?;
    Ok(())
}

pub async fn import(reconciler: &Reconciler, args: &ImportArgs, format: OutputFormat) -> Result<()> {
    report(reconciler.import(&args.id).await, args.out.as_deref(), format).await?;
    Ok(())
}

pub async fn status(state_path: &Path) -> Result<()> {
    let state: EndpointState = read_json(state_path).await?;
    print_status(&state.status());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    const PLAN: &str = r#"{
        "endpoint_name": "orders",
        "topic_name": "bundle-1",
        "queue_options": { "max_size_in_megabytes": 5120, "enable_partitioning": true },
        "additional_queues": ["orders-audit"],
        "subscriptions": ["Acme.Orders.V1.OrderPlaced"]
    }"#;

    #[tokio::test]
    async fn create_persists_namespace_and_state() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let plan_path = dir.path().join("plan.json");
        let state_path = dir.path().join("state.json");
        let namespace_path = dir.path().join("namespace.json");
        tokio::fs::write(&plan_path, PLAN).await.expect("write plan");

        let bus = Arc::new(InMemoryServiceBus::new());
        bus.create_topic("bundle-1").await;
        let reconciler = Reconciler::new(bus.clone());

        let args = CreateArgs {
            plan: plan_path,
            skip_queue: false,
            skip_endpoint: false,
            out: Some(state_path.clone()),
        };
        create(&reconciler, &bus, &namespace_path, &args, OutputFormat::Json)
            .await
            .expect("create endpoint");

        let state: EndpointState = read_json(&state_path).await.expect("state written");
        assert!(state.status().is_settled());
        assert_eq!(state.queue_options.max_size_in_megabytes, 5120);

        let reopened = namespace::open(&namespace_path, bus.options().clone())
            .await
            .expect("reopen namespace");
        assert_eq!(
            reopened.queue("orders").map(|q| q.max_size_in_megabytes),
            Some(81920)
        );
        assert!(reopened.queue("orders-audit").is_some());

        // A second create conflicts on the now untracked queue
        let reconciler = Reconciler::new(reopened.clone());
        let err = create(&reconciler, &reopened, &namespace_path, &args, OutputFormat::Json)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("reconciliation failed"));
    }

    #[tokio::test]
    async fn read_rejects_invalid_state_file() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let state_path = dir.path().join("state.json");
        tokio::fs::write(&state_path, "{ not json").await.expect("write state");

        let reconciler = Reconciler::new(Arc::new(InMemoryServiceBus::new()));
        let args = ReadArgs {
            state: state_path,
            out: None,
        };
        let err = read(&reconciler, &args, OutputFormat::Text).await.unwrap_err();
        assert!(err.to_string().contains("Invalid JSON"));
    }
}
