//! In-memory OCI tenancy for integration tests
//!
//! Listings are keyed by compartment id; follow-up lookups by resource id.
//! Any call can be made to fail, and every call is counted.

#![allow(dead_code)]

use async_trait::async_trait;
use costchef::client::{DetailLookup, ResourceLister};
use costchef::error::{CostChefError, Result};
use costchef::model::*;
use costchef::tags::TagSet;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

pub const TENANCY: &str = "ocid1.tenancy.oc1..aaaaaaaaroot";
pub const DEV: &str = "ocid1.compartment.oc1..aaaaaaaadev";
pub const QA: &str = "ocid1.compartment.oc1..aaaaaaaaqa";

#[derive(Default)]
pub struct FakeCloud {
    pub compartments: HashMap<String, Scope>,
    pub db_systems: HashMap<String, Vec<DbSystem>>,
    pub autonomous: HashMap<String, Vec<AutonomousDatabase>>,
    pub instances: HashMap<String, Vec<Instance>>,
    pub volumes: HashMap<String, Vec<Volume>>,
    pub public_ips: HashMap<String, Vec<PublicIp>>,
    pub load_balancers: HashMap<String, Vec<LoadBalancer>>,
    pub vcns: HashMap<String, Vec<Vcn>>,
    /// volume id -> attachments
    pub attachments: HashMap<String, Vec<VolumeAttachment>>,
    /// load balancer id -> detail
    pub lb_details: HashMap<String, LoadBalancerDetail>,
    /// vcn id -> security lists
    pub security_lists: HashMap<String, Vec<SecurityList>>,
    /// "<call>:<id>" keys that fail
    failures: HashSet<String>,
    calls: Mutex<HashMap<String, usize>>,
}

impl FakeCloud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_compartment(mut self, id: &str, name: &str, state: &str) -> Self {
        self.compartments.insert(
            id.to_string(),
            Scope {
                id: id.to_string(),
                name: name.to_string(),
                lifecycle_state: state.to_string(),
            },
        );
        self
    }

    /// Make `call` fail for `id`, e.g. `fail("list_instances", DEV)`.
    pub fn fail(mut self, call: &str, id: &str) -> Self {
        self.failures.insert(format!("{}:{}", call, id));
        self
    }

    pub fn calls(&self, call: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(key, _)| key.starts_with(&format!("{}:", call)))
            .map(|(_, n)| *n)
            .sum()
    }

    fn record(&self, call: &str, id: &str) -> Result<()> {
        let key = format!("{}:{}", call, id);
        *self.calls.lock().unwrap().entry(key.clone()).or_default() += 1;
        if self.failures.contains(&key) {
            return Err(CostChefError::cloud(call, "InternalServerError"));
        }
        Ok(())
    }

    fn listing<T: Clone>(
        &self,
        call: &str,
        table: &HashMap<String, Vec<T>>,
        id: &str,
    ) -> Result<Vec<T>> {
        self.record(call, id)?;
        Ok(table.get(id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl ResourceLister for FakeCloud {
    async fn get_compartment(&self, compartment_id: &str) -> Result<Scope> {
        self.record("get_compartment", compartment_id)?;
        self.compartments
            .get(compartment_id)
            .cloned()
            .ok_or_else(|| CostChefError::cloud("iam", "NotAuthorizedOrNotFound"))
    }

    async fn list_db_systems(&self, compartment_id: &str) -> Result<Vec<DbSystem>> {
        self.listing("list_db_systems", &self.db_systems, compartment_id)
    }

    async fn list_autonomous_databases(
        &self,
        compartment_id: &str,
    ) -> Result<Vec<AutonomousDatabase>> {
        self.listing("list_autonomous_databases", &self.autonomous, compartment_id)
    }

    async fn list_instances(&self, compartment_id: &str) -> Result<Vec<Instance>> {
        self.listing("list_instances", &self.instances, compartment_id)
    }

    async fn list_volumes(&self, compartment_id: &str) -> Result<Vec<Volume>> {
        self.listing("list_volumes", &self.volumes, compartment_id)
    }

    async fn list_public_ips(&self, compartment_id: &str) -> Result<Vec<PublicIp>> {
        self.listing("list_public_ips", &self.public_ips, compartment_id)
    }

    async fn list_load_balancers(&self, compartment_id: &str) -> Result<Vec<LoadBalancer>> {
        self.listing("list_load_balancers", &self.load_balancers, compartment_id)
    }

    async fn list_vcns(&self, compartment_id: &str) -> Result<Vec<Vcn>> {
        self.listing("list_vcns", &self.vcns, compartment_id)
    }
}

#[async_trait]
impl DetailLookup for FakeCloud {
    async fn list_volume_attachments(
        &self,
        _compartment_id: &str,
        volume_id: &str,
    ) -> Result<Vec<VolumeAttachment>> {
        self.listing("list_volume_attachments", &self.attachments, volume_id)
    }

    async fn get_load_balancer(&self, load_balancer_id: &str) -> Result<LoadBalancerDetail> {
        self.record("get_load_balancer", load_balancer_id)?;
        self.lb_details
            .get(load_balancer_id)
            .cloned()
            .ok_or_else(|| CostChefError::cloud("lb", "NotFound"))
    }

    async fn list_security_lists(
        &self,
        _compartment_id: &str,
        vcn_id: &str,
    ) -> Result<Vec<SecurityList>> {
        self.listing("list_security_lists", &self.security_lists, vcn_id)
    }
}

pub fn dev_tags() -> TagSet {
    TagSet::new().with_freeform("Environment", "Dev")
}

pub fn prod_tags() -> TagSet {
    TagSet::new().with_freeform("Environment", "Production")
}

pub fn volume(id: &str, state: &str, tags: TagSet) -> Volume {
    Volume {
        id: id.to_string(),
        display_name: format!("{}-name", id),
        lifecycle_state: state.to_string(),
        size_in_gbs: Some(50),
        tags,
        ..Default::default()
    }
}

pub fn attachment(volume_id: &str) -> VolumeAttachment {
    VolumeAttachment {
        id: format!("attach-{}", volume_id),
        volume_id: Some(volume_id.to_string()),
        instance_id: Some("ocid1.instance.oc1..x".to_string()),
        lifecycle_state: Some("ATTACHED".to_string()),
    }
}

pub fn vcn(id: &str, state: &str) -> Vcn {
    Vcn {
        id: id.to_string(),
        display_name: format!("{}-vcn", id),
        lifecycle_state: state.to_string(),
    }
}

pub fn ingress(source: &str, ports: Option<(u16, u16)>) -> IngressRule {
    IngressRule {
        source: source.to_string(),
        protocol: "6".to_string(),
        tcp_options: ports.map(|(min, max)| TcpOptions {
            destination_port_range: Some(PortRange { min, max }),
            source_port_range: None,
        }),
        is_stateless: Some(false),
    }
}

pub fn security_list(id: &str, rules: Vec<IngressRule>, tags: TagSet) -> SecurityList {
    SecurityList {
        id: id.to_string(),
        display_name: format!("{}-list", id),
        lifecycle_state: lifecycle::AVAILABLE.to_string(),
        vcn_id: None,
        ingress_security_rules: rules,
        tags,
    }
}

pub fn db_system(id: &str, shape: &str, tags: TagSet) -> DbSystem {
    DbSystem {
        id: id.to_string(),
        display_name: format!("{}-db", id),
        lifecycle_state: lifecycle::AVAILABLE.to_string(),
        shape: shape.to_string(),
        cpu_core_count: Some(8),
        tags,
        ..Default::default()
    }
}
