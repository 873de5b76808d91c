//! Networking scanners: idle public IPs, load balancers without backends,
//! and security lists open to the internet on remote-access ports.

use super::{format_time, ScanContext, Scanner, ScannerKind};
use crate::error::Result;
use crate::findings::{
    or_na, Category, Finding, FindingRecord, LoadBalancerRow, PublicIpRow, SecurityListRow,
};
use crate::model::{lifecycle, IngressRule, LoadBalancer, PublicIp, SecurityList, Vcn};
use crate::tags::format_tags;
use async_trait::async_trait;
use tracing::{debug, info, warn};

pub const OPEN_TO_WORLD: &str = "0.0.0.0/0";

/// SSH and RDP.
const REMOTE_ACCESS_PORTS: [u16; 2] = [22, 3389];

pub struct PublicIpScanner;

#[async_trait]
impl Scanner for PublicIpScanner {
    fn kind(&self) -> ScannerKind {
        ScannerKind::PublicIps
    }

    async fn scan(&self, ctx: &ScanContext<'_>, compartment_id: &str) -> Result<Vec<Finding>> {
        info!("Checking public IPs in compartment: {}", compartment_id);
        let ips = ctx.lister.list_public_ips(compartment_id).await?;

        Ok(ips
            .iter()
            .filter(|ip| {
                ctx.classifier.is_dev_test(&ip.tags)
                    && ip.lifecycle_state == lifecycle::AVAILABLE
                    && !ip.is_assigned()
            })
            .map(|ip| public_ip_finding(ip, compartment_id))
            .collect())
    }
}

fn public_ip_finding(ip: &PublicIp, compartment_id: &str) -> Finding {
    Finding::new(
        Category::UnusedPublicIps,
        FindingRecord::PublicIp(PublicIpRow {
            public_ip_name: or_na(ip.display_name.as_deref()),
            ip_address: or_na(ip.ip_address.as_deref()),
            scope: or_na(ip.scope.as_deref()),
            lifetime: or_na(ip.lifetime.as_deref()),
            lifecycle_state: ip.lifecycle_state.clone(),
            time_created: format_time(ip.time_created),
            compartment_id: compartment_id.to_string(),
            tags: format_tags(&ip.tags),
            resource_id: ip.id.clone(),
        }),
    )
}

pub struct LoadBalancerScanner;

#[async_trait]
impl Scanner for LoadBalancerScanner {
    fn kind(&self) -> ScannerKind {
        ScannerKind::LoadBalancers
    }

    async fn scan(&self, ctx: &ScanContext<'_>, compartment_id: &str) -> Result<Vec<Finding>> {
        info!("Checking load balancers in compartment: {}", compartment_id);
        let load_balancers = ctx.lister.list_load_balancers(compartment_id).await?;
        let mut findings = Vec::new();

        for lb in &load_balancers {
            if !ctx.classifier.is_dev_test(&lb.tags) || lb.lifecycle_state != lifecycle::ACTIVE {
                continue;
            }

            // Backend sets are only returned by the detail call.
            match ctx.details.get_load_balancer(&lb.id).await {
                Ok(detail) if !detail.has_backends() => {
                    findings.push(load_balancer_finding(lb, compartment_id));
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(
                        "Could not fetch load balancer {} ({}); skipping it: {}",
                        lb.display_name, lb.id, e
                    );
                    ctx.record_skipped(&lb.id, e).await;
                }
            }
        }

        Ok(findings)
    }
}

fn load_balancer_finding(lb: &LoadBalancer, compartment_id: &str) -> Finding {
    let ip_addresses = lb
        .ip_addresses
        .iter()
        .map(|ip| ip.ip_address.as_str())
        .collect::<Vec<_>>()
        .join("; ");

    Finding::new(
        Category::EmptyLoadBalancers,
        FindingRecord::LoadBalancer(LoadBalancerRow {
            load_balancer_name: lb.display_name.clone(),
            shape: or_na(lb.shape_name.as_deref()),
            lifecycle_state: lb.lifecycle_state.clone(),
            ip_addresses,
            time_created: format_time(lb.time_created),
            compartment_id: compartment_id.to_string(),
            tags: format_tags(&lb.tags),
            resource_id: lb.id.clone(),
        }),
    )
}

/// An ingress rule from anywhere that either has no TCP options at all or
/// whose destination range starts at SSH/RDP. Other open ports are not
/// flagged.
pub fn is_permissive_rule(rule: &IngressRule) -> bool {
    if rule.source != OPEN_TO_WORLD {
        return false;
    }
    match &rule.tcp_options {
        None => true,
        Some(tcp) => tcp
            .destination_port_range
            .is_some_and(|range| REMOTE_ACCESS_PORTS.contains(&range.min)),
    }
}

/// `TCP:<port>` or `TCP:ALL` for every permissive rule, in rule order.
pub fn permissive_rule_labels(rules: &[IngressRule]) -> Vec<String> {
    rules
        .iter()
        .filter(|rule| is_permissive_rule(rule))
        .map(|rule| {
            match rule
                .tcp_options
                .as_ref()
                .and_then(|tcp| tcp.destination_port_range)
            {
                Some(range) => format!("TCP:{}", range.min),
                None => "TCP:ALL".to_string(),
            }
        })
        .collect()
}

pub struct SecurityListScanner;

#[async_trait]
impl Scanner for SecurityListScanner {
    fn kind(&self) -> ScannerKind {
        ScannerKind::SecurityLists
    }

    async fn scan(&self, ctx: &ScanContext<'_>, compartment_id: &str) -> Result<Vec<Finding>> {
        info!("Checking security lists in compartment: {}", compartment_id);
        let vcns = ctx.lister.list_vcns(compartment_id).await?;
        let mut findings = Vec::new();

        for vcn in vcns.iter().filter(|v| v.lifecycle_state == lifecycle::AVAILABLE) {
            let lists = match ctx.details.list_security_lists(compartment_id, &vcn.id).await {
                Ok(lists) => lists,
                Err(e) => {
                    warn!(
                        "Could not list security lists for VCN {} ({}); skipping it: {}",
                        vcn.display_name, vcn.id, e
                    );
                    ctx.record_skipped(&vcn.id, e).await;
                    continue;
                }
            };
            debug!("VCN {}: {} security lists", vcn.display_name, lists.len());

            for list in &lists {
                if !ctx.classifier.is_dev_test(&list.tags)
                    || list.lifecycle_state != lifecycle::AVAILABLE
                {
                    continue;
                }

                let labels = permissive_rule_labels(&list.ingress_security_rules);
                if !labels.is_empty() {
                    findings.push(security_list_finding(list, vcn, labels, compartment_id));
                }
            }
        }

        Ok(findings)
    }
}

fn security_list_finding(
    list: &SecurityList,
    vcn: &Vcn,
    labels: Vec<String>,
    compartment_id: &str,
) -> Finding {
    Finding::new(
        Category::PermissiveSecurityLists,
        FindingRecord::SecurityList(SecurityListRow {
            security_list_name: list.display_name.clone(),
            vcn_name: vcn.display_name.clone(),
            lifecycle_state: list.lifecycle_state.clone(),
            permissive_rules_count: labels.len(),
            permissive_rules: labels.join("; "),
            compartment_id: compartment_id.to_string(),
            tags: format_tags(&list.tags),
            resource_id: list.id.clone(),
        }),
    )
}
