//! costchef library
//!
//! Scans OCI compartments for dev/test resources that cost more than they
//! should, and writes CSV and HTML reports of what it finds.

pub mod aggregate;
pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod exit_codes;
pub mod findings;
pub mod model;
pub mod report;
pub mod scanners;
pub mod tags;
pub mod utils;
pub mod validation;

// Re-export commonly used types
pub use aggregate::{resolve_scopes, AggregateOutcome, Aggregator};
pub use config::Config;
pub use error::{CostChefError, Result};
pub use findings::{Category, Finding, ReportBundle};
pub use scanners::ScanContext;
