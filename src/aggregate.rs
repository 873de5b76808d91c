//! Scope resolution and the scan loop
//!
//! Runs every scanner over every active compartment, in order, and collects
//! the results into one `ReportBundle`. A scanner failing for a compartment
//! never aborts the run: it is recorded as a `ScanError` and that category
//! simply contributes nothing for that compartment.

use crate::client::ResourceLister;
use crate::error::{ConfigError, Result, ScanError};
use crate::findings::{Finding, ReportBundle};
use crate::model::Scope;
use crate::scanners::{default_scanners, ScanContext, Scanner};
use crate::validation::validate_compartment_id;
use tracing::{info, warn};

/// Turn the requested compartment ids into scopes.
///
/// With explicit ids, each one is fetched on its own; a malformed or
/// unreachable id is warned about and dropped. Without ids, the tenancy root
/// is the only scope, and failing to read it is fatal.
pub async fn resolve_scopes(
    lister: &dyn ResourceLister,
    requested: Option<&[String]>,
    tenancy_id: &str,
) -> Result<Vec<Scope>> {
    let Some(ids) = requested.filter(|ids| !ids.is_empty()) else {
        let root = lister.get_compartment(tenancy_id).await.map_err(|e| {
            ConfigError::RootUnreachable {
                tenancy: tenancy_id.to_string(),
                reason: e.to_string(),
            }
        })?;
        info!("Scanning root compartment: {}", root.name);
        return Ok(vec![root]);
    };

    let mut scopes = Vec::with_capacity(ids.len());
    for id in ids {
        if let Err(e) = validate_compartment_id(id) {
            warn!("Skipping compartment {}: {}", id, e);
            continue;
        }
        match lister.get_compartment(id).await {
            Ok(scope) => scopes.push(scope),
            Err(e) => warn!("Could not access compartment {}: {}", id, e),
        }
    }
    Ok(scopes)
}

/// Result of one full scan.
#[derive(Debug)]
pub struct AggregateOutcome {
    pub bundle: ReportBundle,
    pub scan_errors: Vec<ScanError>,
    pub scopes_scanned: usize,
    pub scopes_skipped: usize,
}

impl AggregateOutcome {
    pub fn has_scan_errors(&self) -> bool {
        !self.scan_errors.is_empty()
    }
}

pub struct Aggregator {
    scanners: Vec<Box<dyn Scanner>>,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(default_scanners())
    }
}

impl Aggregator {
    pub fn new(scanners: Vec<Box<dyn Scanner>>) -> Self {
        Self { scanners }
    }

    /// Scan each active scope with every scanner. Findings keep scope order
    /// first, then scanner order, then listing order.
    pub async fn run(&self, ctx: &ScanContext<'_>, scopes: &[Scope]) -> AggregateOutcome {
        let mut findings: Vec<Finding> = Vec::new();
        let mut scan_errors = Vec::new();
        let mut scopes_scanned = 0;
        let mut scopes_skipped = 0;

        for scope in scopes {
            if !scope.is_active() {
                warn!(
                    "Skipping compartment {} ({}): lifecycle state is {}",
                    scope.name, scope.id, scope.lifecycle_state
                );
                scopes_skipped += 1;
                continue;
            }

            info!("Processing compartment: {}", scope.name);
            scopes_scanned += 1;

            for scanner in &self.scanners {
                match scanner.scan(ctx, &scope.id).await {
                    Ok(found) => findings.extend(found),
                    Err(source) => {
                        let error = ScanError {
                            kind: scanner.kind(),
                            scope_id: scope.id.clone(),
                            resource_id: None,
                            source,
                        };
                        warn!("{}", error);
                        scan_errors.push(error);
                    }
                }
                for skipped in ctx.take_skipped().await {
                    scan_errors.push(ScanError {
                        kind: scanner.kind(),
                        scope_id: scope.id.clone(),
                        resource_id: Some(skipped.resource_id),
                        source: skipped.error,
                    });
                }
            }
        }

        let bundle = ReportBundle::from_findings(findings);
        info!(
            "Scan complete: {} findings across {} compartments",
            bundle.total(),
            scopes_scanned
        );

        AggregateOutcome {
            bundle,
            scan_errors,
            scopes_scanned,
            scopes_skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{MockDetailLookup, MockResourceLister};
    use crate::config::Config;
    use crate::error::CostChefError;
    use crate::findings::Category;
    use crate::model::DbSystem;
    use crate::scanners::ScannerKind;
    use crate::tags::TagSet;

    const TENANCY: &str = "ocid1.tenancy.oc1..aaaaaaaaroot";
    const DEV: &str = "ocid1.compartment.oc1..aaaaaaaadev";

    fn scope(id: &str, name: &str, state: &str) -> Scope {
        Scope {
            id: id.to_string(),
            name: name.to_string(),
            lifecycle_state: state.to_string(),
        }
    }

    // Every listing succeeds empty, and only for `DEV`.
    fn quiet_lister() -> MockResourceLister {
        let mut lister = MockResourceLister::new();
        lister
            .expect_list_db_systems()
            .withf(|id| id == DEV)
            .times(1)
            .returning(|_| Ok(vec![]));
        lister
            .expect_list_autonomous_databases()
            .returning(|_| Ok(vec![]));
        lister.expect_list_instances().returning(|_| Ok(vec![]));
        lister.expect_list_volumes().returning(|_| Ok(vec![]));
        lister.expect_list_public_ips().returning(|_| Ok(vec![]));
        lister.expect_list_load_balancers().returning(|_| Ok(vec![]));
        lister.expect_list_vcns().returning(|_| Ok(vec![]));
        lister
    }

    #[tokio::test]
    async fn test_root_scope_when_nothing_requested() {
        let mut lister = MockResourceLister::new();
        lister
            .expect_get_compartment()
            .withf(|id| id == TENANCY)
            .times(1)
            .returning(|id| Ok(scope(id, "root", "ACTIVE")));

        let scopes = resolve_scopes(&lister, None, TENANCY).await.unwrap();
        assert_eq!(scopes.len(), 1);
        assert_eq!(scopes[0].name, "root");
    }

    #[tokio::test]
    async fn test_unreachable_root_is_config_error() {
        let mut lister = MockResourceLister::new();
        lister
            .expect_get_compartment()
            .returning(|_| Err(CostChefError::cloud("iam", "NotAuthenticated")));

        let err = resolve_scopes(&lister, Some(&[][..]), TENANCY).await.unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("NotAuthenticated"));
    }

    #[tokio::test]
    async fn test_bad_requested_ids_are_dropped() {
        let mut lister = MockResourceLister::new();
        lister.expect_get_compartment().returning(|id| {
            if id == DEV {
                Ok(scope(id, "dev", "ACTIVE"))
            } else {
                Err(CostChefError::cloud("iam", "NotAuthorizedOrNotFound"))
            }
        });

        let requested = vec![
            DEV.to_string(),
            "not-an-ocid".to_string(),
            "ocid1.compartment.oc1..aaaaaaaagone".to_string(),
        ];
        let scopes = resolve_scopes(&lister, Some(requested.as_slice()), TENANCY)
            .await
            .unwrap();
        assert_eq!(scopes, vec![scope(DEV, "dev", "ACTIVE")]);
    }

    #[tokio::test]
    async fn test_inactive_scope_is_skipped() {
        let lister = quiet_lister();
        let details = MockDetailLookup::new();
        let rules = Config::default();
        let ctx = ScanContext::new(&lister, &details, &rules);

        let outcome = Aggregator::default()
            .run(
                &ctx,
                &[scope("deleted", "old", "DELETED"), scope(DEV, "dev", "ACTIVE")],
            )
            .await;
        assert_eq!(outcome.scopes_scanned, 1);
        assert_eq!(outcome.scopes_skipped, 1);
        assert!(outcome.bundle.is_empty());
        assert!(!outcome.has_scan_errors());
    }

    #[tokio::test]
    async fn test_failing_category_is_recorded_and_others_continue() {
        let mut lister = MockResourceLister::new();
        lister.expect_list_db_systems().returning(|_| {
            Ok(vec![DbSystem {
                id: "ocid1.dbsystem.oc1..a".to_string(),
                display_name: "qa-db".to_string(),
                lifecycle_state: "AVAILABLE".to_string(),
                shape: "BM.Standard2.52".to_string(),
                tags: TagSet::new().with_freeform("Environment", "QA"),
                ..Default::default()
            }])
        });
        lister
            .expect_list_autonomous_databases()
            .returning(|_| Ok(vec![]));
        lister
            .expect_list_instances()
            .returning(|_| Err(CostChefError::cloud("compute", "TooManyRequests")));
        lister.expect_list_volumes().returning(|_| Ok(vec![]));
        lister.expect_list_public_ips().returning(|_| Ok(vec![]));
        lister.expect_list_load_balancers().returning(|_| Ok(vec![]));
        lister.expect_list_vcns().returning(|_| Ok(vec![]));
        let details = MockDetailLookup::new();
        let rules = Config::default();
        let ctx = ScanContext::new(&lister, &details, &rules);

        let outcome = Aggregator::default()
            .run(&ctx, &[scope(DEV, "dev", "ACTIVE")])
            .await;

        assert_eq!(outcome.bundle.count(Category::DatabaseInstances), 1);
        assert_eq!(outcome.bundle.count(Category::ComputeMissingAutomation), 0);
        assert_eq!(outcome.scan_errors.len(), 1);
        let error = &outcome.scan_errors[0];
        assert_eq!(error.kind, ScannerKind::ComputeInstances);
        assert_eq!(error.scope_id, DEV);
        assert!(error.to_string().contains("TooManyRequests"));
    }
}
