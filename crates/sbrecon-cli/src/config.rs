use sbrecon_client::MAX_RULE_NAME_LENGTH;
use sbrecon_core::ReconcilerConfig;
use sbrecon_memory::{BACKEND_PARTITION_COUNT, NamespaceOptions};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub reconciler: ReconcilerConfig,
    /// Behaviour of the emulated namespace
    #[serde(default)]
    pub namespace: NamespaceSettings,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        self.reconciler.validate()?;
        if self.namespace.partition_count <= 0 {
            return Err("namespace.partition_count must be > 0".into());
        }
        if self.namespace.max_rule_name_length == 0 {
            return Err("namespace.max_rule_name_length must be > 0".into());
        }
        Ok(())
    }

    /// Options for the in-memory namespace. Rules are written with the same
    /// filter convention the reconciler validates against.
    pub fn namespace_options(&self) -> NamespaceOptions {
        NamespaceOptions {
            partition_count: self.namespace.partition_count,
            max_rule_name_length: self.namespace.max_rule_name_length,
            filter: self.reconciler.filter.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".into()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamespaceSettings {
    #[serde(default = "default_partition_count")]
    pub partition_count: i64,
    #[serde(default = "default_max_rule_name_length")]
    pub max_rule_name_length: usize,
}

impl Default for NamespaceSettings {
    fn default() -> Self {
        Self {
            partition_count: default_partition_count(),
            max_rule_name_length: default_max_rule_name_length(),
        }
    }
}

fn default_partition_count() -> i64 {
    BACKEND_PARTITION_COUNT
}

fn default_max_rule_name_length() -> usize {
    MAX_RULE_NAME_LENGTH
}

pub mod loader {
    use super::AppConfig;
    use config::{Config, Environment, File};
    use std::path::PathBuf;

    pub const DEFAULT_CONFIG_PATH: &str = "sbrecon.toml";

    pub fn load_config(path: Option<&str>) -> Result<AppConfig, String> {
        let mut builder = Config::builder();
        let pathbuf = PathBuf::from(path.unwrap_or(DEFAULT_CONFIG_PATH));
        if pathbuf.exists() {
            builder = builder.add_source(File::from(pathbuf));
        } else if path.is_some() {
            return Err(format!("config file not found: {}", pathbuf.display()));
        }
        // Environment variable overrides, e.g., SBRECON__RECONCILER__PARTITION_COUNT=8
        builder = builder.add_source(
            Environment::with_prefix("SBRECON")
                .try_parsing(true)
                .separator("__"),
        );
        let cfg = builder
            .build()
            .map_err(|e| format!("config build error: {e}"))?;
        let merged: AppConfig = cfg
            .try_deserialize()
            .map_err(|e| format!("config deserialize error: {e}"))?;
        merged.validate()?;
        Ok(merged)
    }
}
