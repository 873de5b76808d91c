//! Tag sets and the dev/test tag classifier
//!
//! Every OCI resource carries two tag mappings: free-form tags
//! (`key -> value`) and defined tags (`namespace -> key -> value`). Both are
//! always present on a `TagSet`, possibly empty, so callers never have to
//! probe for their existence.

use crate::config::TagRules;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Placeholder rendered when a resource has no tags at all.
pub const NO_TAGS: &str = "N/A";

/// Free-form and namespaced tags of one resource, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TagSet {
    #[serde(
        rename = "freeform-tags",
        default,
        deserialize_with = "deserialize_freeform"
    )]
    freeform: Vec<(String, String)>,
    #[serde(
        rename = "defined-tags",
        default,
        deserialize_with = "deserialize_defined"
    )]
    defined: Vec<(String, Vec<(String, String)>)>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a free-form tag.
    pub fn with_freeform(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        upsert(&mut self.freeform, key.into(), value.into());
        self
    }

    /// Add or replace a defined tag inside `namespace`.
    pub fn with_defined(
        mut self,
        namespace: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        let namespace = namespace.into();
        match self.defined.iter_mut().find(|(ns, _)| *ns == namespace) {
            Some((_, tags)) => upsert(tags, key.into(), value.into()),
            None => self
                .defined
                .push((namespace, vec![(key.into(), value.into())])),
        }
        self
    }

    pub fn freeform(&self) -> &[(String, String)] {
        &self.freeform
    }

    pub fn defined(&self) -> &[(String, Vec<(String, String)>)] {
        &self.defined
    }

    pub fn is_empty(&self) -> bool {
        self.freeform.is_empty() && self.defined.iter().all(|(_, tags)| tags.is_empty())
    }

    /// Every `(key, value)` pair, free-form first, ignoring namespaces.
    fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.freeform
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .chain(
                self.defined
                    .iter()
                    .flat_map(|(_, tags)| tags.iter().map(|(k, v)| (k.as_str(), v.as_str()))),
            )
    }
}

fn upsert(pairs: &mut Vec<(String, String)>, key: String, value: String) {
    match pairs.iter_mut().find(|(k, _)| *k == key) {
        Some((_, v)) => *v = value,
        None => pairs.push((key, value)),
    }
}

fn value_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn deserialize_freeform<'de, D>(deserializer: D) -> Result<Vec<(String, String)>, D::Error>
where
    D: Deserializer<'de>,
{
    let map: Option<Map<String, Value>> = Option::deserialize(deserializer)?;
    Ok(map
        .unwrap_or_default()
        .into_iter()
        .map(|(k, v)| (k, value_to_string(v)))
        .collect())
}

fn deserialize_defined<'de, D>(
    deserializer: D,
) -> Result<Vec<(String, Vec<(String, String)>)>, D::Error>
where
    D: Deserializer<'de>,
{
    let map: Option<Map<String, Value>> = Option::deserialize(deserializer)?;
    Ok(map
        .unwrap_or_default()
        .into_iter()
        .map(|(namespace, tags)| {
            let tags = match tags {
                Value::Object(inner) => inner
                    .into_iter()
                    .map(|(k, v)| (k, value_to_string(v)))
                    .collect(),
                _ => Vec::new(),
            };
            (namespace, tags)
        })
        .collect())
}

/// Decides whether tags mark a resource as dev/test and whether it carries
/// stop/start automation.
///
/// Built from the rule configuration so alternative label sets can be
/// swapped in without touching scanner code.
#[derive(Debug, Clone)]
pub struct TagClassifier {
    dev_test_labels: Vec<String>,
    automation_fragments: Vec<String>,
}

impl TagClassifier {
    pub fn new<L, F>(dev_test_labels: L, automation_fragments: F) -> Self
    where
        L: IntoIterator,
        L::Item: AsRef<str>,
        F: IntoIterator,
        F::Item: AsRef<str>,
    {
        Self {
            dev_test_labels: dev_test_labels
                .into_iter()
                .map(|l| l.as_ref().to_lowercase())
                .collect(),
            automation_fragments: automation_fragments
                .into_iter()
                .map(|f| f.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn from_rules(rules: &TagRules) -> Self {
        Self::new(&rules.dev_test_labels, &rules.automation_key_fragments)
    }

    /// True when any tag value equals one of the environment labels,
    /// ignoring case. Whole-value match only.
    pub fn is_dev_test(&self, tags: &TagSet) -> bool {
        tags.pairs().any(|(_, value)| {
            let value = value.to_lowercase();
            self.dev_test_labels.iter().any(|label| *label == value)
        })
    }

    /// True when any tag key contains one of the automation fragments,
    /// ignoring case.
    pub fn has_automation_tag(&self, tags: &TagSet) -> bool {
        tags.pairs().any(|(key, _)| {
            let key = key.to_lowercase();
            self.automation_fragments
                .iter()
                .any(|fragment| key.contains(fragment.as_str()))
        })
    }
}

impl Default for TagClassifier {
    fn default() -> Self {
        Self::from_rules(&TagRules::default())
    }
}

/// Render tags as `key=value; ns.key=value`, or `N/A` when there are none.
pub fn format_tags(tags: &TagSet) -> String {
    let mut parts: Vec<String> = tags
        .freeform()
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect();

    for (namespace, defined) in tags.defined() {
        for (k, v) in defined {
            parts.push(format!("{}.{}={}", namespace, k, v));
        }
    }

    if parts.is_empty() {
        NO_TAGS.to_string()
    } else {
        parts.join("; ")
    }
}
