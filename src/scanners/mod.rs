//! Resource scanners
//!
//! One scanner per resource kind. A scanner lists its kind in one
//! compartment, applies the dev/test tag check plus its own static rules, and
//! returns the matching findings. Scanners keep no state between calls.
//!
//! Error contract: a failed *listing* call fails the whole scan (the
//! aggregator records it and moves on). A failed *follow-up* call for a
//! single resource skips only that resource; the scanner records it on the
//! context so the aggregator can report the category as incomplete.

mod compute;
mod database;
mod network;
mod storage;

pub use compute::ComputeScanner;
pub use database::{AutonomousDatabaseScanner, DbSystemScanner};
pub use network::{
    is_permissive_rule, permissive_rule_labels, LoadBalancerScanner, PublicIpScanner,
    SecurityListScanner,
};
pub use storage::VolumeScanner;

use crate::client::{DetailLookup, ResourceLister};
use crate::config::Config;
use crate::error::{CostChefError, Result};
use crate::findings::Finding;
use crate::tags::TagClassifier;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;
use tokio::sync::Mutex;

/// Which scanner produced a result (or failed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScannerKind {
    DatabaseSystems,
    AutonomousDatabases,
    ComputeInstances,
    BlockVolumes,
    PublicIps,
    LoadBalancers,
    SecurityLists,
}

impl fmt::Display for ScannerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ScannerKind::DatabaseSystems => "database systems",
            ScannerKind::AutonomousDatabases => "autonomous databases",
            ScannerKind::ComputeInstances => "compute instances",
            ScannerKind::BlockVolumes => "block volumes",
            ScannerKind::PublicIps => "public IPs",
            ScannerKind::LoadBalancers => "load balancers",
            ScannerKind::SecurityLists => "security lists",
        };
        f.write_str(label)
    }
}

/// A resource left out of a scan because its follow-up call failed.
#[derive(Debug)]
pub struct SkippedResource {
    pub resource_id: String,
    pub error: CostChefError,
}

/// Everything a scanner needs: API access, rules, and the tag classifier.
pub struct ScanContext<'a> {
    pub lister: &'a dyn ResourceLister,
    pub details: &'a dyn DetailLookup,
    pub rules: &'a Config,
    pub classifier: TagClassifier,
    skipped: Mutex<Vec<SkippedResource>>,
}

impl<'a> ScanContext<'a> {
    pub fn new(
        lister: &'a dyn ResourceLister,
        details: &'a dyn DetailLookup,
        rules: &'a Config,
    ) -> Self {
        Self {
            lister,
            details,
            rules,
            classifier: TagClassifier::from_rules(&rules.tags),
            skipped: Mutex::new(Vec::new()),
        }
    }

    pub async fn record_skipped(&self, resource_id: &str, error: CostChefError) {
        self.skipped.lock().await.push(SkippedResource {
            resource_id: resource_id.to_string(),
            error,
        });
    }

    /// Drain the resources skipped since the last call.
    pub async fn take_skipped(&self) -> Vec<SkippedResource> {
        std::mem::take(&mut *self.skipped.lock().await)
    }
}

#[async_trait]
pub trait Scanner: Send + Sync {
    fn kind(&self) -> ScannerKind;

    /// Scan one compartment. Findings come back in listing order.
    async fn scan(&self, ctx: &ScanContext<'_>, compartment_id: &str) -> Result<Vec<Finding>>;
}

/// All seven scanners in report order.
pub fn default_scanners() -> Vec<Box<dyn Scanner>> {
    vec![
        Box::new(DbSystemScanner),
        Box::new(AutonomousDatabaseScanner),
        Box::new(ComputeScanner),
        Box::new(VolumeScanner),
        Box::new(PublicIpScanner),
        Box::new(LoadBalancerScanner),
        Box::new(SecurityListScanner),
    ]
}

/// Creation times render in UTC, second precision.
pub(crate) fn format_time(time: Option<DateTime<Utc>>) -> String {
    time.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_time() {
        let t = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 1).unwrap();
        assert_eq!(format_time(Some(t)), "2024-12-31 23:59:01");
        assert_eq!(format_time(None), "N/A");
    }

    #[tokio::test]
    async fn test_take_skipped_drains() {
        use crate::client::{MockDetailLookup, MockResourceLister};

        let lister = MockResourceLister::new();
        let details = MockDetailLookup::new();
        let rules = Config::default();
        let ctx = ScanContext::new(&lister, &details, &rules);

        ctx.record_skipped("vol-a", CostChefError::cloud("core", "timeout"))
            .await;
        let skipped = ctx.take_skipped().await;
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].resource_id, "vol-a");
        assert!(ctx.take_skipped().await.is_empty());
    }

    #[test]
    fn test_default_scanners_cover_every_kind() {
        let kinds: Vec<_> = default_scanners().iter().map(|s| s.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                ScannerKind::DatabaseSystems,
                ScannerKind::AutonomousDatabases,
                ScannerKind::ComputeInstances,
                ScannerKind::BlockVolumes,
                ScannerKind::PublicIps,
                ScannerKind::LoadBalancers,
                ScannerKind::SecurityLists,
            ]
        );
    }
}
