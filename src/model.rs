//! Resource snapshots as returned by the OCI APIs
//!
//! Field names follow the JSON the OCI CLI prints (kebab-case). Every
//! snapshot is read-only once deserialized; only the fields the scanners look
//! at are modelled, everything else is ignored.

use crate::tags::TagSet;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Lifecycle states the scanners compare against.
pub mod lifecycle {
    pub const ACTIVE: &str = "ACTIVE";
    pub const AVAILABLE: &str = "AVAILABLE";
    pub const RUNNING: &str = "RUNNING";
    pub const STOPPED: &str = "STOPPED";
}

/// A compartment the scan runs over.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Scope {
    pub id: String,
    pub name: String,
    pub lifecycle_state: String,
}

impl Scope {
    pub fn is_active(&self) -> bool {
        self.lifecycle_state == lifecycle::ACTIVE
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DbSystem {
    pub id: String,
    pub display_name: String,
    pub lifecycle_state: String,
    pub shape: String,
    #[serde(default)]
    pub availability_domain: Option<String>,
    #[serde(default)]
    pub cpu_core_count: Option<u32>,
    #[serde(default)]
    pub database_edition: Option<String>,
    #[serde(flatten)]
    pub tags: TagSet,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AutonomousDatabase {
    pub id: String,
    pub display_name: String,
    pub lifecycle_state: String,
    #[serde(default)]
    pub cpu_core_count: u32,
    #[serde(default)]
    pub db_workload: Option<String>,
    #[serde(flatten)]
    pub tags: TagSet,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Instance {
    pub id: String,
    pub display_name: String,
    pub lifecycle_state: String,
    pub shape: String,
    #[serde(default)]
    pub availability_domain: Option<String>,
    #[serde(default)]
    pub time_created: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub tags: TagSet,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Volume {
    pub id: String,
    pub display_name: String,
    pub lifecycle_state: String,
    #[serde(default)]
    pub size_in_gbs: Option<u64>,
    #[serde(default)]
    pub vpus_per_gb: Option<u64>,
    #[serde(default)]
    pub availability_domain: Option<String>,
    #[serde(default)]
    pub time_created: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub tags: TagSet,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct VolumeAttachment {
    pub id: String,
    #[serde(default)]
    pub instance_id: Option<String>,
    #[serde(default)]
    pub volume_id: Option<String>,
    #[serde(default)]
    pub lifecycle_state: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PublicIp {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub lifecycle_state: String,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub lifetime: Option<String>,
    #[serde(default)]
    pub assigned_entity_id: Option<String>,
    #[serde(default)]
    pub time_created: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub tags: TagSet,
}

impl PublicIp {
    pub fn is_assigned(&self) -> bool {
        self.assigned_entity_id
            .as_deref()
            .is_some_and(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct IpAddress {
    pub ip_address: String,
    #[serde(default)]
    pub is_public: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LoadBalancer {
    pub id: String,
    pub display_name: String,
    pub lifecycle_state: String,
    #[serde(default)]
    pub shape_name: Option<String>,
    #[serde(default)]
    pub ip_addresses: Vec<IpAddress>,
    #[serde(default)]
    pub time_created: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub tags: TagSet,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Backend {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BackendSet {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub backends: Vec<Backend>,
}

/// The fields of `load-balancer get` that the listing call does not return.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LoadBalancerDetail {
    pub id: String,
    #[serde(default)]
    pub backend_sets: BTreeMap<String, BackendSet>,
}

impl LoadBalancerDetail {
    /// True when at least one backend set has at least one backend.
    pub fn has_backends(&self) -> bool {
        self.backend_sets.values().any(|set| !set.backends.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Vcn {
    pub id: String,
    pub display_name: String,
    pub lifecycle_state: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct PortRange {
    pub min: u16,
    pub max: u16,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TcpOptions {
    #[serde(default)]
    pub destination_port_range: Option<PortRange>,
    #[serde(default)]
    pub source_port_range: Option<PortRange>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct IngressRule {
    pub source: String,
    /// IANA protocol number as a string, or `all`
    #[serde(default)]
    pub protocol: String,
    #[serde(default)]
    pub tcp_options: Option<TcpOptions>,
    #[serde(default)]
    pub is_stateless: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SecurityList {
    pub id: String,
    pub display_name: String,
    pub lifecycle_state: String,
    #[serde(default)]
    pub vcn_id: Option<String>,
    #[serde(default)]
    pub ingress_security_rules: Vec<IngressRule>,
    #[serde(flatten)]
    pub tags: TagSet,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::format_tags;

    #[test]
    fn test_deserialize_instance() {
        let json = r#"{
            "id": "ocid1.instance.oc1.iad.aaaa",
            "display-name": "build-runner",
            "lifecycle-state": "RUNNING",
            "shape": "VM.Standard2.4",
            "availability-domain": "Uocm:US-ASHBURN-AD-1",
            "time-created": "2025-03-01T08:15:30.123000+00:00",
            "freeform-tags": {"env": "dev"},
            "defined-tags": {"Oracle-Tags": {"CreatedBy": "alice"}},
            "fault-domain": "FAULT-DOMAIN-2"
        }"#;
        let instance: Instance = serde_json::from_str(json).unwrap();
        assert_eq!(instance.display_name, "build-runner");
        assert_eq!(instance.shape, "VM.Standard2.4");
        assert_eq!(
            instance.time_created.unwrap().format("%Y-%m-%d %H:%M:%S").to_string(),
            "2025-03-01 08:15:30"
        );
        assert_eq!(
            format_tags(&instance.tags),
            "env=dev; Oracle-Tags.CreatedBy=alice"
        );
    }

    #[test]
    fn test_deserialize_security_list_rules() {
        let json = r#"{
            "id": "ocid1.securitylist.oc1.iad.aaaa",
            "display-name": "Default Security List",
            "lifecycle-state": "AVAILABLE",
            "vcn-id": "ocid1.vcn.oc1.iad.aaaa",
            "ingress-security-rules": [
                {"source": "0.0.0.0/0", "protocol": "6",
                 "tcp-options": {"destination-port-range": {"min": 22, "max": 22}, "source-port-range": null}},
                {"source": "10.0.0.0/16", "protocol": "all", "tcp-options": null}
            ]
        }"#;
        let list: SecurityList = serde_json::from_str(json).unwrap();
        assert_eq!(list.ingress_security_rules.len(), 2);
        let first = &list.ingress_security_rules[0];
        assert_eq!(
            first.tcp_options.as_ref().unwrap().destination_port_range,
            Some(PortRange { min: 22, max: 22 })
        );
        assert!(list.ingress_security_rules[1].tcp_options.is_none());
        assert!(list.tags.is_empty());
    }

    #[test]
    fn test_load_balancer_detail_backends() {
        let json = r#"{
            "id": "ocid1.loadbalancer.oc1.iad.aaaa",
            "backend-sets": {
                "web": {"name": "web", "backends": []},
                "api": {"name": "api", "backends": [{"name": "10.0.0.5:8080", "ip-address": "10.0.0.5", "port": 8080}]}
            }
        }"#;
        let detail: LoadBalancerDetail = serde_json::from_str(json).unwrap();
        assert!(detail.has_backends());

        let empty: LoadBalancerDetail =
            serde_json::from_str(r#"{"id": "x", "backend-sets": {"web": {"backends": []}}}"#).unwrap();
        assert!(!empty.has_backends());
    }

    #[test]
    fn test_public_ip_assignment() {
        let mut ip = PublicIp::default();
        assert!(!ip.is_assigned());
        ip.assigned_entity_id = Some(String::new());
        assert!(!ip.is_assigned());
        ip.assigned_entity_id = Some("ocid1.privateip.oc1.iad.aaaa".to_string());
        assert!(ip.is_assigned());
    }

    #[test]
    fn test_scope_active() {
        let scope: Scope = serde_json::from_str(
            r#"{"id": "ocid1.compartment.oc1..aaaa", "name": "dev", "lifecycle-state": "ACTIVE", "description": "x"}"#,
        )
        .unwrap();
        assert!(scope.is_active());
    }
}
