use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod deployment;
pub mod ingress;
pub mod namespace;
pub mod service;

pub trait Object {
    fn kind(&self) -> &'static str;
    fn name(&self) -> &String;
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Name must be unique within a namespace.
    pub name: String,
    /// Namespace defines the space within which each name must be unique.
    /// Cluster-scoped objects (namespaces themselves) leave it empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// UID is the unique in time and space value for this object,
    /// populated by the cluster on creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<Uuid>,
    /// Map of string keys and values that can be used
    /// to organize and categorize objects.
    #[serde(default, skip_serializing_if = "Labels::is_empty")]
    pub labels: Labels,
    /// Timestamp of server-side object creation,
    /// in `yyyy-MM-ddTHH:mm:ssZ` form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<String>,
}

/// Labels are key-value pairs attached to object metadata,
/// matched by selectors.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct Labels(pub BTreeMap<String, String>);

impl Labels {
    pub fn new() -> Self {
        Self::default()
    }

    /// The conventional single-label selector `{app: <name>}`.
    pub fn app(name: &str) -> Self {
        let mut labels = BTreeMap::new();
        labels.insert("app".to_string(), name.to_string());
        Labels(labels)
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether every key-value pair of `selector` is present in this set.
    pub fn matches(&self, selector: &Labels) -> bool {
        selector
            .0
            .iter()
            .all(|(key, value)| self.0.get(key) == Some(value))
    }
}

impl fmt::Display for Labels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, value) in self.0.iter() {
            if !first {
                write!(f, ",")?;
            }
            write!(f, "{}={}", key, value)?;
            first = false;
        }
        Ok(())
    }
}
