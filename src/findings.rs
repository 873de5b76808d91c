//! Findings, categories and the report bundle
//!
//! A `Finding` is one flattened report row tied to one resource and one
//! category. Rows expose their columns in a fixed order; that order is the
//! CSV header order.

use std::collections::BTreeMap;
use std::fmt;

/// The seven finding categories, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    DatabaseInstances,
    ComputeMissingAutomation,
    OversizedCompute,
    UnattachedVolumes,
    UnusedPublicIps,
    EmptyLoadBalancers,
    PermissiveSecurityLists,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::DatabaseInstances,
        Category::ComputeMissingAutomation,
        Category::OversizedCompute,
        Category::UnattachedVolumes,
        Category::UnusedPublicIps,
        Category::EmptyLoadBalancers,
        Category::PermissiveSecurityLists,
    ];

    /// Stable machine key, e.g. `database_instances`.
    pub fn key(self) -> &'static str {
        match self {
            Category::DatabaseInstances => "database_instances",
            Category::ComputeMissingAutomation => "compute_missing_automation",
            Category::OversizedCompute => "oversized_compute",
            Category::UnattachedVolumes => "unattached_volumes",
            Category::UnusedPublicIps => "unused_public_ips",
            Category::EmptyLoadBalancers => "empty_load_balancers",
            Category::PermissiveSecurityLists => "permissive_security_lists",
        }
    }

    /// Prefix of the CSV file name.
    pub fn file_label(self) -> &'static str {
        match self {
            Category::DatabaseInstances => "Database_Production_Shapes",
            Category::ComputeMissingAutomation => "Compute_Missing_Automation_Tags",
            Category::OversizedCompute => "Oversized_Compute_Instances",
            Category::UnattachedVolumes => "Unattached_Block_Volumes",
            Category::UnusedPublicIps => "Unused_Public_IPs",
            Category::EmptyLoadBalancers => "Empty_Load_Balancers",
            Category::PermissiveSecurityLists => "Permissive_Security_Lists",
        }
    }

    /// Short label used in summary blocks.
    pub fn summary_label(self) -> &'static str {
        match self {
            Category::DatabaseInstances => "Database Production Shapes",
            Category::ComputeMissingAutomation => "Compute Missing Auto-Tags",
            Category::OversizedCompute => "Oversized Compute Instances",
            Category::UnattachedVolumes => "Unattached Block Volumes",
            Category::UnusedPublicIps => "Unused Public IPs",
            Category::EmptyLoadBalancers => "Empty Load Balancers",
            Category::PermissiveSecurityLists => "Permissive Security Lists",
        }
    }

    /// Line used in the console summary.
    pub fn description(self) -> &'static str {
        match self {
            Category::DatabaseInstances => "Database instances with production shapes",
            Category::ComputeMissingAutomation => "Compute instances missing automation tags",
            Category::OversizedCompute => "Oversized compute instances",
            Category::UnattachedVolumes => "Unattached block volumes",
            Category::UnusedPublicIps => "Unused public IP addresses",
            Category::EmptyLoadBalancers => "Empty load balancers",
            Category::PermissiveSecurityLists => "Permissive security lists",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Renders optional API values the way every report column does.
pub(crate) fn or_na<T: ToString>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseRow {
    pub resource_type: String,
    pub name: String,
    pub shape: String,
    pub lifecycle_state: String,
    pub availability_domain: String,
    pub cpu_core_count: String,
    pub database_edition: String,
    pub compartment_id: String,
    pub tags: String,
    pub resource_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputeRow {
    pub instance_name: String,
    pub shape: String,
    pub lifecycle_state: String,
    pub availability_domain: String,
    pub time_created: String,
    pub compartment_id: String,
    pub tags: String,
    pub resource_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeRow {
    pub volume_name: String,
    pub size_gb: String,
    pub volume_type: String,
    pub availability_domain: String,
    pub lifecycle_state: String,
    pub time_created: String,
    pub compartment_id: String,
    pub tags: String,
    pub resource_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicIpRow {
    pub public_ip_name: String,
    pub ip_address: String,
    pub scope: String,
    pub lifetime: String,
    pub lifecycle_state: String,
    pub time_created: String,
    pub compartment_id: String,
    pub tags: String,
    pub resource_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadBalancerRow {
    pub load_balancer_name: String,
    pub shape: String,
    pub lifecycle_state: String,
    pub ip_addresses: String,
    pub time_created: String,
    pub compartment_id: String,
    pub tags: String,
    pub resource_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityListRow {
    pub security_list_name: String,
    pub vcn_name: String,
    pub lifecycle_state: String,
    pub permissive_rules_count: usize,
    pub permissive_rules: String,
    pub compartment_id: String,
    pub tags: String,
    pub resource_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FindingRecord {
    Database(DatabaseRow),
    Compute(ComputeRow),
    Volume(VolumeRow),
    PublicIp(PublicIpRow),
    LoadBalancer(LoadBalancerRow),
    SecurityList(SecurityListRow),
}

/// One reported issue: exactly one resource, exactly one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub category: Category,
    pub record: FindingRecord,
}

impl Finding {
    pub fn new(category: Category, record: FindingRecord) -> Self {
        Self { category, record }
    }

    /// `(field name, value)` pairs in CSV column order.
    pub fn columns(&self) -> Vec<(&'static str, String)> {
        match &self.record {
            FindingRecord::Database(r) => vec![
                ("resource_type", r.resource_type.clone()),
                ("name", r.name.clone()),
                ("shape", r.shape.clone()),
                ("lifecycle_state", r.lifecycle_state.clone()),
                ("availability_domain", r.availability_domain.clone()),
                ("cpu_core_count", r.cpu_core_count.clone()),
                ("database_edition", r.database_edition.clone()),
                ("compartment_id", r.compartment_id.clone()),
                ("tags", r.tags.clone()),
                ("resource_id", r.resource_id.clone()),
            ],
            FindingRecord::Compute(r) => vec![
                ("instance_name", r.instance_name.clone()),
                ("shape", r.shape.clone()),
                ("lifecycle_state", r.lifecycle_state.clone()),
                ("availability_domain", r.availability_domain.clone()),
                ("time_created", r.time_created.clone()),
                ("compartment_id", r.compartment_id.clone()),
                ("tags", r.tags.clone()),
                ("resource_id", r.resource_id.clone()),
            ],
            FindingRecord::Volume(r) => vec![
                ("volume_name", r.volume_name.clone()),
                ("size_gb", r.size_gb.clone()),
                ("volume_type", r.volume_type.clone()),
                ("availability_domain", r.availability_domain.clone()),
                ("lifecycle_state", r.lifecycle_state.clone()),
                ("time_created", r.time_created.clone()),
                ("compartment_id", r.compartment_id.clone()),
                ("tags", r.tags.clone()),
                ("resource_id", r.resource_id.clone()),
            ],
            FindingRecord::PublicIp(r) => vec![
                ("public_ip_name", r.public_ip_name.clone()),
                ("ip_address", r.ip_address.clone()),
                ("scope", r.scope.clone()),
                ("lifetime", r.lifetime.clone()),
                ("lifecycle_state", r.lifecycle_state.clone()),
                ("time_created", r.time_created.clone()),
                ("compartment_id", r.compartment_id.clone()),
                ("tags", r.tags.clone()),
                ("resource_id", r.resource_id.clone()),
            ],
            FindingRecord::LoadBalancer(r) => vec![
                ("load_balancer_name", r.load_balancer_name.clone()),
                ("shape", r.shape.clone()),
                ("lifecycle_state", r.lifecycle_state.clone()),
                ("ip_addresses", r.ip_addresses.clone()),
                ("time_created", r.time_created.clone()),
                ("compartment_id", r.compartment_id.clone()),
                ("tags", r.tags.clone()),
                ("resource_id", r.resource_id.clone()),
            ],
            FindingRecord::SecurityList(r) => vec![
                ("security_list_name", r.security_list_name.clone()),
                ("vcn_name", r.vcn_name.clone()),
                ("lifecycle_state", r.lifecycle_state.clone()),
                ("permissive_rules_count", r.permissive_rules_count.to_string()),
                ("permissive_rules", r.permissive_rules.clone()),
                ("compartment_id", r.compartment_id.clone()),
                ("tags", r.tags.clone()),
                ("resource_id", r.resource_id.clone()),
            ],
        }
    }

    /// Value of one named column.
    pub fn field(&self, name: &str) -> Option<String> {
        self.columns()
            .into_iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    pub fn resource_id(&self) -> &str {
        match &self.record {
            FindingRecord::Database(r) => &r.resource_id,
            FindingRecord::Compute(r) => &r.resource_id,
            FindingRecord::Volume(r) => &r.resource_id,
            FindingRecord::PublicIp(r) => &r.resource_id,
            FindingRecord::LoadBalancer(r) => &r.resource_id,
            FindingRecord::SecurityList(r) => &r.resource_id,
        }
    }

    pub fn compartment_id(&self) -> &str {
        match &self.record {
            FindingRecord::Database(r) => &r.compartment_id,
            FindingRecord::Compute(r) => &r.compartment_id,
            FindingRecord::Volume(r) => &r.compartment_id,
            FindingRecord::PublicIp(r) => &r.compartment_id,
            FindingRecord::LoadBalancer(r) => &r.compartment_id,
            FindingRecord::SecurityList(r) => &r.compartment_id,
        }
    }
}

/// All findings of one run, grouped by category.
///
/// Every category is present (possibly empty). Built once from the full
/// finding list; there is no way to add to it afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportBundle {
    sections: BTreeMap<Category, Vec<Finding>>,
}

impl ReportBundle {
    /// Group findings by category, keeping their relative order.
    pub fn from_findings(findings: impl IntoIterator<Item = Finding>) -> Self {
        let mut sections: BTreeMap<Category, Vec<Finding>> =
            Category::ALL.iter().map(|c| (*c, Vec::new())).collect();
        for finding in findings {
            sections.entry(finding.category).or_default().push(finding);
        }
        Self { sections }
    }

    pub fn findings(&self, category: Category) -> &[Finding] {
        self.sections
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn count(&self, category: Category) -> usize {
        self.findings(category).len()
    }

    /// Per-category counts in report order.
    pub fn counts(&self) -> Vec<(Category, usize)> {
        Category::ALL.iter().map(|c| (*c, self.count(*c))).collect()
    }

    pub fn total(&self) -> usize {
        self.sections.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Categories in report order, with their findings.
    pub fn sections(&self) -> impl Iterator<Item = (Category, &[Finding])> {
        Category::ALL.iter().map(move |c| (*c, self.findings(*c)))
    }
}

impl Default for ReportBundle {
    fn default() -> Self {
        Self::from_findings(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compute(category: Category, name: &str) -> Finding {
        Finding::new(
            category,
            FindingRecord::Compute(ComputeRow {
                instance_name: name.to_string(),
                shape: "VM.Standard2.4".to_string(),
                lifecycle_state: "RUNNING".to_string(),
                availability_domain: "AD-1".to_string(),
                time_created: "2025-01-01 00:00:00".to_string(),
                compartment_id: "ocid1.compartment.oc1..a".to_string(),
                tags: "env=dev".to_string(),
                resource_id: format!("ocid1.instance.oc1..{}", name),
            }),
        )
    }

    #[test]
    fn test_category_keys_are_unique() {
        let mut keys: Vec<_> = Category::ALL.iter().map(|c| c.key()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 7);
        assert_eq!(Category::UnusedPublicIps.to_string(), "unused_public_ips");
    }

    #[test]
    fn test_columns_and_field_lookup() {
        let f = compute(Category::OversizedCompute, "web");
        let names: Vec<_> = f.columns().into_iter().map(|(n, _)| n).collect();
        assert_eq!(
            names,
            vec![
                "instance_name",
                "shape",
                "lifecycle_state",
                "availability_domain",
                "time_created",
                "compartment_id",
                "tags",
                "resource_id"
            ]
        );
        assert_eq!(f.field("shape").as_deref(), Some("VM.Standard2.4"));
        assert_eq!(f.field("nope"), None);
        assert_eq!(f.resource_id(), "ocid1.instance.oc1..web");
    }

    #[test]
    fn test_bundle_groups_in_order() {
        let bundle = ReportBundle::from_findings(vec![
            compute(Category::OversizedCompute, "a"),
            compute(Category::ComputeMissingAutomation, "b"),
            compute(Category::OversizedCompute, "c"),
        ]);
        assert_eq!(bundle.total(), 3);
        assert_eq!(bundle.count(Category::OversizedCompute), 2);
        assert_eq!(bundle.count(Category::DatabaseInstances), 0);
        let names: Vec<_> = bundle
            .findings(Category::OversizedCompute)
            .iter()
            .map(|f| f.field("instance_name").unwrap())
            .collect();
        assert_eq!(names, vec!["a", "c"]);
        assert_eq!(bundle.counts().len(), 7);
    }

    #[test]
    fn test_empty_bundle() {
        let bundle = ReportBundle::default();
        assert!(bundle.is_empty());
        assert_eq!(bundle.sections().count(), 7);
    }

    #[test]
    fn test_or_na() {
        assert_eq!(or_na(Some(4)), "4");
        assert_eq!(or_na::<u32>(None), "N/A");
    }
}
