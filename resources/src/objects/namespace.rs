use serde::{Deserialize, Serialize};

use super::{Metadata, Object};

/// Namespace provides a scope for names.
/// Workloads and services live inside exactly one namespace.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Namespace {
    pub metadata: Metadata,
}

impl Namespace {
    pub fn new(name: &str) -> Self {
        Namespace {
            metadata: Metadata {
                name: name.to_string(),
                ..Default::default()
            },
        }
    }
}

impl Object for Namespace {
    fn kind(&self) -> &'static str {
        "Namespace"
    }

    fn name(&self) -> &String {
        &self.metadata.name
    }
}
