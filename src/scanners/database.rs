//! Database scanners: DB systems on production shapes, and autonomous
//! databases with production-sized OCPU counts.

use super::{ScanContext, Scanner, ScannerKind};
use crate::error::Result;
use crate::findings::{or_na, Category, DatabaseRow, Finding, FindingRecord};
use crate::model::{lifecycle, AutonomousDatabase, DbSystem};
use crate::tags::format_tags;
use async_trait::async_trait;
use tracing::info;

pub struct DbSystemScanner;

#[async_trait]
impl Scanner for DbSystemScanner {
    fn kind(&self) -> ScannerKind {
        ScannerKind::DatabaseSystems
    }

    async fn scan(&self, ctx: &ScanContext<'_>, compartment_id: &str) -> Result<Vec<Finding>> {
        info!("Checking database systems in compartment: {}", compartment_id);
        let systems = ctx.lister.list_db_systems(compartment_id).await?;

        Ok(systems
            .iter()
            .filter(|db| {
                ctx.classifier.is_dev_test(&db.tags)
                    && ctx.rules.shapes.is_production_database(&db.shape)
                    && db.lifecycle_state == lifecycle::AVAILABLE
            })
            .map(|db| db_system_finding(db, compartment_id))
            .collect())
    }
}

fn db_system_finding(db: &DbSystem, compartment_id: &str) -> Finding {
    Finding::new(
        Category::DatabaseInstances,
        FindingRecord::Database(DatabaseRow {
            resource_type: "DB System".to_string(),
            name: db.display_name.clone(),
            shape: db.shape.clone(),
            lifecycle_state: db.lifecycle_state.clone(),
            availability_domain: or_na(db.availability_domain.as_deref()),
            cpu_core_count: or_na(db.cpu_core_count),
            database_edition: or_na(db.database_edition.as_deref()),
            compartment_id: compartment_id.to_string(),
            tags: format_tags(&db.tags),
            resource_id: db.id.clone(),
        }),
    )
}

pub struct AutonomousDatabaseScanner;

#[async_trait]
impl Scanner for AutonomousDatabaseScanner {
    fn kind(&self) -> ScannerKind {
        ScannerKind::AutonomousDatabases
    }

    async fn scan(&self, ctx: &ScanContext<'_>, compartment_id: &str) -> Result<Vec<Finding>> {
        info!("Checking autonomous databases in compartment: {}", compartment_id);
        let databases = ctx.lister.list_autonomous_databases(compartment_id).await?;
        let min_cores = ctx.rules.autonomous_database.min_cpu_cores;

        Ok(databases
            .iter()
            .filter(|adb| {
                ctx.classifier.is_dev_test(&adb.tags)
                    && adb.cpu_core_count >= min_cores
                    && adb.lifecycle_state == lifecycle::AVAILABLE
            })
            .map(|adb| autonomous_finding(adb, compartment_id))
            .collect())
    }
}

fn autonomous_finding(adb: &AutonomousDatabase, compartment_id: &str) -> Finding {
    Finding::new(
        Category::DatabaseInstances,
        FindingRecord::Database(DatabaseRow {
            resource_type: "Autonomous Database".to_string(),
            name: adb.display_name.clone(),
            shape: format!("{} OCPUs", adb.cpu_core_count),
            lifecycle_state: adb.lifecycle_state.clone(),
            availability_domain: "N/A".to_string(),
            cpu_core_count: adb.cpu_core_count.to_string(),
            database_edition: or_na(adb.db_workload.as_deref()),
            compartment_id: compartment_id.to_string(),
            tags: format_tags(&adb.tags),
            resource_id: adb.id.clone(),
        }),
    )
}
