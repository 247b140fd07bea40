use serde::{Deserialize, Serialize};

use super::{Labels, Metadata, Object};

/// Ingress multiplexes many services behind one public address,
/// routing by path prefix.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Ingress {
    pub metadata: Metadata,
    pub spec: IngressSpec,
}

impl Ingress {
    /// An empty shared ingress, labeled `{app: <name>}` so it can later be
    /// found by label rather than by a remembered identifier.
    pub fn new(namespace: &str, name: &str) -> Self {
        Ingress {
            metadata: Metadata {
                name: name.to_string(),
                namespace: Some(namespace.to_string()),
                labels: Labels::app(name),
                ..Default::default()
            },
            spec: IngressSpec {
                paths: vec![],
            },
        }
    }
}

impl Object for Ingress {
    fn kind(&self) -> &'static str {
        "Ingress"
    }

    fn name(&self) -> &String {
        &self.metadata.name
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct IngressSpec {
    /// A collection of paths that map requests to services.
    pub paths: Vec<IngressPath>,
}

impl IngressSpec {
    /// Register `service_name` under the prefix `/<service_name>`.
    ///
    /// Idempotent: a path with the same prefix has its backend replaced
    /// instead of a duplicate entry being appended.
    pub fn add_path(&mut self, service_name: &str, port: u16) {
        let prefix = path_prefix(service_name);
        let backend = IngressBackend {
            name: service_name.to_string(),
            port,
        };
        match self.paths.iter_mut().find(|p| p.path == prefix) {
            Some(existing) => existing.service = backend,
            None => self.paths.push(IngressPath {
                path: prefix,
                service: backend,
            }),
        }
    }

    /// Remove every path whose prefix equals `/<service_name>`.
    pub fn remove_path(&mut self, service_name: &str) {
        let prefix = path_prefix(service_name);
        self.paths.retain(|p| p.path != prefix);
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// The path prefix a service is published under.
pub fn path_prefix(service_name: &str) -> String {
    format!("/{}", service_name)
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct IngressPath {
    /// Path is matched as a prefix against the path of an incoming request.
    pub path: String,
    /// Service references a Service as a backend.
    pub service: IngressBackend,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct IngressBackend {
    /// Name of the referenced service.
    /// The service must exist in the same namespace as the workload.
    pub name: String,
    /// Port of the referenced service.
    pub port: u16,
}
