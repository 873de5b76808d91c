//! Compute scanner
//!
//! One instance listing per compartment feeds two categories: dev/test
//! instances without stop/start automation tags, and dev/test instances on
//! oversized shapes. An instance can land in both.

use super::{format_time, ScanContext, Scanner, ScannerKind};
use crate::error::Result;
use crate::findings::{or_na, Category, ComputeRow, Finding, FindingRecord};
use crate::model::{lifecycle, Instance};
use crate::tags::format_tags;
use async_trait::async_trait;
use tracing::{debug, info};

pub struct ComputeScanner;

#[async_trait]
impl Scanner for ComputeScanner {
    fn kind(&self) -> ScannerKind {
        ScannerKind::ComputeInstances
    }

    async fn scan(&self, ctx: &ScanContext<'_>, compartment_id: &str) -> Result<Vec<Finding>> {
        info!("Checking compute instances in compartment: {}", compartment_id);
        let instances = ctx.lister.list_instances(compartment_id).await?;

        let mut missing_automation = Vec::new();
        let mut oversized = Vec::new();

        for instance in &instances {
            if !ctx.classifier.is_dev_test(&instance.tags) || !is_billable_state(instance) {
                continue;
            }

            if !ctx.classifier.has_automation_tag(&instance.tags) {
                missing_automation.push(compute_finding(
                    Category::ComputeMissingAutomation,
                    instance,
                    compartment_id,
                ));
            }

            if ctx.rules.shapes.is_oversized_compute(&instance.shape) {
                oversized.push(compute_finding(
                    Category::OversizedCompute,
                    instance,
                    compartment_id,
                ));
            }
        }

        debug!(
            "{} instances: {} missing automation, {} oversized",
            instances.len(),
            missing_automation.len(),
            oversized.len()
        );

        missing_automation.extend(oversized);
        Ok(missing_automation)
    }
}

// Instances counted by both compute checks: RUNNING or STOPPED.
fn is_billable_state(instance: &Instance) -> bool {
    instance.lifecycle_state == lifecycle::RUNNING || instance.lifecycle_state == lifecycle::STOPPED
}

fn compute_finding(category: Category, instance: &Instance, compartment_id: &str) -> Finding {
    Finding::new(
        category,
        FindingRecord::Compute(ComputeRow {
            instance_name: instance.display_name.clone(),
            shape: instance.shape.clone(),
            lifecycle_state: instance.lifecycle_state.clone(),
            availability_domain: or_na(instance.availability_domain.as_deref()),
            time_created: format_time(instance.time_created),
            compartment_id: compartment_id.to_string(),
            tags: format_tags(&instance.tags),
            resource_id: instance.id.clone(),
        }),
    )
}
