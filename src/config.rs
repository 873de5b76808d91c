//! Rule configuration
//!
//! The lookup tables the scanners match against (environment labels,
//! automation tag fragments, shape catalogs) live here rather than in scanner
//! code. Shape catalogs drift as OCI ships new shapes, so they can be
//! refreshed from a TOML file without a rebuild.

use crate::utils::{ensure_dir, expand_path};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const DEFAULT_DEV_TEST_LABELS: &[&str] =
    &["dev", "test", "development", "testing", "staging", "qa"];

pub const DEFAULT_AUTOMATION_KEY_FRAGMENTS: &[&str] = &[
    "auto-shutdown",
    "auto-start",
    "schedule",
    "stop-start",
    "automation",
];

pub const DEFAULT_PRODUCTION_DB_SHAPES: &[&str] = &[
    "VM.Standard2.2",
    "VM.Standard2.4",
    "VM.Standard2.8",
    "VM.Standard2.16",
    "VM.Standard2.24",
    "VM.Standard3.2",
    "VM.Standard3.4",
    "VM.Standard3.8",
    "VM.Standard3.16",
    "VM.Standard3.24",
    "BM.Standard2.52",
    "BM.Standard3.64",
    "BM.HighIO1.36",
    "VM.Standard.E3.2",
    "VM.Standard.E3.4",
    "VM.Standard.E3.8",
];

pub const DEFAULT_OVERSIZED_COMPUTE_SHAPES: &[&str] = &[
    "VM.Standard2.2",
    "VM.Standard2.4",
    "VM.Standard2.8",
    "VM.Standard2.16",
    "VM.Standard2.24",
    "VM.Standard3.2",
    "VM.Standard3.4",
    "VM.Standard3.8",
    "VM.Standard3.16",
    "VM.Standard3.24",
    "VM.DenseIO2.8",
    "VM.DenseIO2.16",
    "VM.DenseIO2.24",
    "VM.GPU3.1",
    "VM.GPU3.2",
    "VM.GPU3.4",
    "BM.Standard2.52",
    "BM.Standard3.64",
];

/// Autonomous databases at or above this many OCPUs count as production-grade.
pub const DEFAULT_AUTONOMOUS_MIN_CPU_CORES: u32 = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tags: TagRules,
    pub shapes: ShapeRules,
    pub autonomous_database: AutonomousRules,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagRules {
    /// Tag values (case-insensitive, whole value) that mark dev/test resources
    pub dev_test_labels: Vec<String>,
    /// Tag key fragments (case-insensitive, substring) that indicate stop/start automation
    pub automation_key_fragments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeRules {
    /// DB system shapes considered production-grade
    pub production_database: Vec<String>,
    /// Compute shapes considered oversized for dev/test
    pub oversized_compute: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutonomousRules {
    pub min_cpu_cores: u32,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for TagRules {
    fn default() -> Self {
        Self {
            dev_test_labels: owned(DEFAULT_DEV_TEST_LABELS),
            automation_key_fragments: owned(DEFAULT_AUTOMATION_KEY_FRAGMENTS),
        }
    }
}

impl Default for ShapeRules {
    fn default() -> Self {
        Self {
            production_database: owned(DEFAULT_PRODUCTION_DB_SHAPES),
            oversized_compute: owned(DEFAULT_OVERSIZED_COMPUTE_SHAPES),
        }
    }
}

impl Default for AutonomousRules {
    fn default() -> Self {
        Self {
            min_cpu_cores: DEFAULT_AUTONOMOUS_MIN_CPU_CORES,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tags: TagRules::default(),
            shapes: ShapeRules::default(),
            autonomous_database: AutonomousRules::default(),
        }
    }
}

impl ShapeRules {
    pub fn is_production_database(&self, shape: &str) -> bool {
        self.production_database.iter().any(|s| s == shape)
    }

    pub fn is_oversized_compute(&self, shape: &str) -> bool {
        self.oversized_compute.iter().any(|s| s == shape)
    }
}

impl Config {
    /// Load rules from `path`, or from `.costchef.toml` in the current
    /// directory, or from `~/.config/costchef/config.toml`. Falls back to the
    /// built-in defaults when none exists.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = if let Some(p) = path {
            expand_path(p)
        } else {
            let local = PathBuf::from(".costchef.toml");
            if local.exists() {
                local
            } else {
                dirs::config_dir()
                    .map(|d| d.join("costchef").join("config.toml"))
                    .unwrap_or_else(|| PathBuf::from(".costchef.toml"))
            }
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read rules: {}", config_path.display()))?;
            let config: Config = toml::from_str(&content).with_context(|| {
                let mut err = format!("Failed to parse rules: {}", config_path.display());
                err.push_str("\n  Common issues:");
                err.push_str("\n    - Invalid TOML syntax");
                err.push_str("\n    - Shape lists must be arrays of strings");
                err.push_str("\n  Tip: Run 'costchef --init-rules <file>' to write the defaults");
                err
            })?;
            config.validate()?;
            debug!("Loaded rules from {}", config_path.display());
            Ok(config)
        } else {
            if path.is_some() {
                warn!(
                    "Rules file not found: {}; using built-in rules",
                    config_path.display()
                );
            }
            Ok(Config::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            ensure_dir(parent)?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize rules")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write rules: {}", path.display()))?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.tags.dev_test_labels.is_empty() {
            anyhow::bail!("tags.dev_test_labels must not be empty: nothing would be classified as dev/test");
        }
        if self.autonomous_database.min_cpu_cores == 0 {
            anyhow::bail!("autonomous_database.min_cpu_cores must be at least 1");
        }
        Ok(())
    }
}

pub fn init_config(output: &Path) -> Result<()> {
    let config = Config::default();
    config.save(output)?;
    println!("Created rules file: {}", output.display());
    Ok(())
}
