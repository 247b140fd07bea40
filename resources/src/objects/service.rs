use serde::{Deserialize, Serialize};

use super::{Labels, Metadata, Object};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Service {
    pub metadata: Metadata,
    pub spec: ServiceSpec,
    /// Most recently observed status of the service.
    /// Populated by the system. Read-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ServiceStatus>,
}

impl Service {
    /// A service fronting a single-app workload: one port mapping,
    /// `{app: <name>}` selector.
    pub fn for_app(namespace: &str, name: &str, port: u16, target_port: u16) -> Self {
        Service {
            metadata: Metadata {
                name: name.to_string(),
                namespace: Some(namespace.to_string()),
                labels: Labels::app(name),
                ..Default::default()
            },
            spec: ServiceSpec {
                selector: Labels::app(name),
                ports: vec![ServicePort {
                    port,
                    target_port,
                }],
            },
            status: None,
        }
    }
}

impl Object for Service {
    fn kind(&self) -> &'static str {
        "Service"
    }

    fn name(&self) -> &String {
        &self.metadata.name
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSpec {
    /// Route service traffic to pods with label keys and values
    /// matching this selector.
    pub selector: Labels,
    /// The list of ports that are exposed by this service.
    pub ports: Vec<ServicePort>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServicePort {
    /// The port that will be exposed by this service.
    pub port: u16,
    /// Number of the port to access on the pods targeted by the service.
    pub target_port: u16,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatus {
    #[serde(default)]
    pub load_balancer: LoadBalancerStatus,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct LoadBalancerStatus {
    /// Ingress points assigned to the service by the load balancer,
    /// if the cluster exposes one.
    #[serde(default)]
    pub ingress: Vec<LoadBalancerIngress>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LoadBalancerIngress {
    /// IP (or hostname) the load balancer answers on.
    pub ip: String,
}
