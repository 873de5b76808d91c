//! Error types for costchef
//!
//! There are three error types: `CostChefError` (main error enum),
//! `ConfigError` (configuration-specific) and `ScanError` (one scanner failing
//! for one compartment).
//!
//! ## Error Handling Philosophy
//!
//! Library code uses `crate::error::Result<T>` which returns `CostChefError`.
//! The binary uses `anyhow::Result<T>` for top-level error handling. The
//! conversion happens at the CLI boundary so error chains are preserved.
//!
//! ## Which errors are fatal
//!
//! - `ConfigError`: always fatal. Raised before any scanning starts
//!   (unreadable OCI config, missing profile, missing `oci` binary,
//!   unreachable tenancy root).
//! - `CloudProvider`: fatal only where the caller decides so. Scanners return
//!   it, and the aggregator downgrades it to a `ScanError` for that category.
//! - `ReportWrite`: fatal. A partial report set without a clear signal would
//!   mislead the operator.
//! - `Validation`: user input problems (malformed OCIDs).

use crate::scanners::ScannerKind;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for costchef
#[derive(Error, Debug)]
pub enum CostChefError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Cloud provider error: {service} - {message}")]
    CloudProvider {
        service: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Validation error: {field} - {reason}")]
    Validation { field: String, reason: String },

    #[error("Failed to write report {}: {source}", path.display())]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Profile '{profile}' not found in {path}")]
    ProfileNotFound { profile: String, path: String },

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Failed to parse config: {0}")]
    ParseError(String),

    #[error("OCI CLI not found on PATH ({0}). Install it with: pip install oci-cli")]
    CliNotFound(String),

    #[error("Could not access root compartment {tenancy}: {reason}")]
    RootUnreachable { tenancy: String, reason: String },
}

/// One scanner failing for one compartment, either as a whole or for a
/// single resource (`resource_id` set).
///
/// Recoverable: the aggregator records it and moves on. A whole-scan failure
/// leaves the category empty for that compartment; a resource failure leaves
/// out only that resource.
#[derive(Error, Debug)]
#[error(
    "Error checking {kind} in compartment {scope_id}{}: {source}",
    skipped_suffix(.resource_id)
)]
pub struct ScanError {
    pub kind: ScannerKind,
    pub scope_id: String,
    pub resource_id: Option<String>,
    #[source]
    pub source: CostChefError,
}

fn skipped_suffix(resource_id: &Option<String>) -> String {
    resource_id
        .as_deref()
        .map(|id| format!(" (skipped {})", id))
        .unwrap_or_default()
}

/// Result type alias
pub type Result<T> = std::result::Result<T, CostChefError>;

impl CostChefError {
    /// Shorthand for a cloud API failure without an underlying error value.
    pub fn cloud(service: impl Into<String>, message: impl Into<String>) -> Self {
        CostChefError::CloudProvider {
            service: service.into(),
            message: message.into(),
            source: None,
        }
    }

    /// True for errors raised while loading configuration.
    pub fn is_config(&self) -> bool {
        matches!(self, CostChefError::Config(_))
    }
}
