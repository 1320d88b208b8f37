use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use sbrecon_memory::{InMemoryServiceBus, NamespaceOptions};

use crate::output::print_success;

/// Opens the namespace snapshot at `path`, or an empty namespace if the file
/// does not exist yet.
pub async fn open(path: &Path, options: NamespaceOptions) -> Result<Arc<InMemoryServiceBus>> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "No namespace snapshot, starting empty");
        return Ok(Arc::new(InMemoryServiceBus::with_options(options)));
    }

    let bus = InMemoryServiceBus::load(path, options)
        .await
        .with_context(|| format!("Failed to load namespace: {}", path.display()))?;
    Ok(Arc::new(bus))
}

pub async fn save(bus: &InMemoryServiceBus, path: &Path) -> Result<()> {
    bus.save(path)
        .await
        .with_context(|| format!("Failed to save namespace: {}", path.display()))
}

pub async fn create_topic(bus: &InMemoryServiceBus, path: &Path, name: &str) -> Result<()> {
    bus.create_topic(name).await;
    save(bus, path).await?;
    print_success(&format!("Topic {} ready", name.cyan()));
    Ok(())
}
