//! OCI API access
//!
//! Scanners never talk to OCI directly. Primary listings (one call per
//! resource kind and compartment) go through `ResourceLister`; the
//! per-resource follow-up calls go through `DetailLookup`. The split lets a
//! batched or concurrent detail fetcher replace the sequential one without
//! touching scanner predicates.
//!
//! Pagination is the implementation's job: a listing returns every item.

pub mod cli;

pub use cli::OciCliClient;

use crate::error::Result;
use crate::model::{
    AutonomousDatabase, DbSystem, Instance, LoadBalancer, LoadBalancerDetail, PublicIp, Scope,
    SecurityList, Vcn, Volume, VolumeAttachment,
};
use async_trait::async_trait;

/// One listing call per resource kind and compartment.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResourceLister: Send + Sync {
    /// Fetch a compartment (or the tenancy root) by OCID.
    async fn get_compartment(&self, compartment_id: &str) -> Result<Scope>;

    async fn list_db_systems(&self, compartment_id: &str) -> Result<Vec<DbSystem>>;

    async fn list_autonomous_databases(
        &self,
        compartment_id: &str,
    ) -> Result<Vec<AutonomousDatabase>>;

    async fn list_instances(&self, compartment_id: &str) -> Result<Vec<Instance>>;

    async fn list_volumes(&self, compartment_id: &str) -> Result<Vec<Volume>>;

    /// Regional reserved and ephemeral public IPs.
    async fn list_public_ips(&self, compartment_id: &str) -> Result<Vec<PublicIp>>;

    async fn list_load_balancers(&self, compartment_id: &str) -> Result<Vec<LoadBalancer>>;

    async fn list_vcns(&self, compartment_id: &str) -> Result<Vec<Vcn>>;
}

/// Follow-up calls made for individual resources found by a listing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DetailLookup: Send + Sync {
    async fn list_volume_attachments(
        &self,
        compartment_id: &str,
        volume_id: &str,
    ) -> Result<Vec<VolumeAttachment>>;

    async fn get_load_balancer(&self, load_balancer_id: &str) -> Result<LoadBalancerDetail>;

    async fn list_security_lists(
        &self,
        compartment_id: &str,
        vcn_id: &str,
    ) -> Result<Vec<SecurityList>>;
}
