//! Block volume scanner: available dev/test volumes with no attachment.

use super::{format_time, ScanContext, Scanner, ScannerKind};
use crate::error::Result;
use crate::findings::{or_na, Category, Finding, FindingRecord, VolumeRow};
use crate::model::{lifecycle, Volume};
use crate::tags::format_tags;
use async_trait::async_trait;
use tracing::{info, warn};

pub struct VolumeScanner;

#[async_trait]
impl Scanner for VolumeScanner {
    fn kind(&self) -> ScannerKind {
        ScannerKind::BlockVolumes
    }

    async fn scan(&self, ctx: &ScanContext<'_>, compartment_id: &str) -> Result<Vec<Finding>> {
        info!("Checking block volumes in compartment: {}", compartment_id);
        let volumes = ctx.lister.list_volumes(compartment_id).await?;
        let mut findings = Vec::new();

        for volume in &volumes {
            if !ctx.classifier.is_dev_test(&volume.tags)
                || volume.lifecycle_state != lifecycle::AVAILABLE
            {
                continue;
            }

            match ctx
                .details
                .list_volume_attachments(compartment_id, &volume.id)
                .await
            {
                Ok(attachments) if attachments.is_empty() => {
                    findings.push(volume_finding(volume, compartment_id));
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(
                        "Could not list attachments for volume {} ({}); skipping it: {}",
                        volume.display_name, volume.id, e
                    );
                    ctx.record_skipped(&volume.id, e).await;
                }
            }
        }

        Ok(findings)
    }
}

fn volume_finding(volume: &Volume, compartment_id: &str) -> Finding {
    Finding::new(
        Category::UnattachedVolumes,
        FindingRecord::Volume(VolumeRow {
            volume_name: volume.display_name.clone(),
            size_gb: or_na(volume.size_in_gbs),
            volume_type: volume
                .vpus_per_gb
                .map(|v| v.to_string())
                .unwrap_or_else(|| "Standard".to_string()),
            availability_domain: or_na(volume.availability_domain.as_deref()),
            lifecycle_state: volume.lifecycle_state.clone(),
            time_created: format_time(volume.time_created),
            compartment_id: compartment_id.to_string(),
            tags: format_tags(&volume.tags),
            resource_id: volume.id.clone(),
        }),
    )
}
