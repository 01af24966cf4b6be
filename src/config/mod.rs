//! Configuration management for dispatch-scan
//!
//! Handles loading, validating and applying scan settings.

use crate::scan::{Lifetime, ModuleRef, ScanOptions, ScanTarget, ServiceContainer};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log filter (e.g. "info", "dispatch_scan=debug"); RUST_LOG takes precedence
    #[serde(default)]
    pub filter: Option<String>,

    /// Emit JSON lines (requires the `json-logging` feature)
    #[serde(default)]
    pub json_format: bool,
}

/// Scan settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanSettings {
    /// Registration lifetime for discovered services
    #[serde(default)]
    pub lifetime: Lifetime,

    /// Targets to scan, applied in order
    #[serde(default)]
    pub targets: Vec<ScanTarget>,

    /// Logging configuration
    #[serde(default)]
    pub logging: Option<LoggingConfig>,
}

impl ScanSettings {
    /// Load settings from a TOML file
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let settings: ScanSettings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings TOML {}", path.display()))?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: ScanSettings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    /// Load settings, picking the format from the file extension
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Save settings to a JSON file
    pub fn to_json_file(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate settings
    pub fn validate(&self) -> anyhow::Result<()> {
        for (index, target) in self.targets.iter().enumerate() {
            if target.module.is_blank() {
                return Err(anyhow::anyhow!(
                    "targets[{}]: module name cannot be empty",
                    index
                ));
            }
            if let Some(namespace) = &target.namespace {
                if namespace.trim().is_empty() {
                    return Err(anyhow::anyhow!(
                        "targets[{}]: namespace cannot be empty (omit it to scan the whole module)",
                        index
                    ));
                }
            }
        }
        Ok(())
    }

    /// Apply the lifetime and targets to scan options
    ///
    /// Targets are added in file order; each addition goes first, so the last
    /// listed target ends up with the highest precedence.
    pub fn apply<C: ServiceContainer>(&self, options: &mut ScanOptions<C>) -> anyhow::Result<()> {
        self.validate()?;
        options.use_lifetime(self.lifetime);
        for target in &self.targets {
            match &target.namespace {
                Some(namespace) => {
                    options.add_scan_namespace(target.module.clone(), namespace.clone())?;
                }
                None => {
                    options.add_scan_targets(Some(target.module.clone()), Vec::<ModuleRef>::new())?;
                }
            }
        }
        debug!(
            "Applied settings: {} lifetime, {} targets",
            self.lifetime,
            self.targets.len()
        );
        Ok(())
    }
}
