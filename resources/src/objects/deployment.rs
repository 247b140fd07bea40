use serde::{Deserialize, Serialize};

use super::{Labels, Metadata, Object};

/// Deployment ensures that a specified number of identical pod replicas
/// are running at any given time.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Deployment {
    pub metadata: Metadata,
    /// Defines the specification of the desired behavior of the Deployment.
    pub spec: DeploymentSpec,
    /// The most recently observed status of the Deployment.
    /// This data may be out of date by some window of time.
    /// Populated by the system. Read-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DeploymentStatus>,
}

impl Deployment {
    /// The shape every deploy request produces: one container, one replica,
    /// `{app: <name>}` selector bound to matching template labels.
    pub fn single_container(
        namespace: &str,
        name: &str,
        image: &str,
        container_port: u16,
    ) -> Self {
        let labels = Labels::app(name);
        Deployment {
            metadata: Metadata {
                name: name.to_string(),
                namespace: Some(namespace.to_string()),
                labels: labels.clone(),
                ..Default::default()
            },
            spec: DeploymentSpec {
                replicas: 1,
                selector: labels.clone(),
                template: PodTemplateSpec {
                    metadata: Metadata {
                        name: name.to_string(),
                        labels,
                        ..Default::default()
                    },
                    spec: PodSpec {
                        containers: vec![Container {
                            name: name.to_string(),
                            image: image.to_string(),
                            ports: vec![ContainerPort {
                                container_port,
                            }],
                        }],
                    },
                },
            },
            status: None,
        }
    }
}

impl Object for Deployment {
    fn kind(&self) -> &'static str {
        "Deployment"
    }

    fn name(&self) -> &String {
        &self.metadata.name
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentSpec {
    /// The number of desired replicas. Defaults to 1.
    #[serde(default = "default_replicas")]
    pub replicas: u32,
    /// A label query over pods that should match the replica count.
    /// It must match the pod template's labels. Required.
    pub selector: Labels,
    /// The object that describes the pod
    /// that will be created if insufficient replicas are detected.
    pub template: PodTemplateSpec,
}

fn default_replicas() -> u32 {
    1
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PodTemplateSpec {
    pub metadata: Metadata,
    pub spec: PodSpec,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PodSpec {
    /// List of containers belonging to the pod.
    /// There must be at least one container in a Pod. Cannot be updated.
    pub containers: Vec<Container>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Container {
    /// Name of the container specified as a DNS_LABEL.
    /// Each container in a pod must have a unique name. Cannot be updated.
    pub name: String,
    /// Container image name.
    pub image: String,
    /// List of ports to expose from the container.
    pub ports: Vec<ContainerPort>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContainerPort {
    /// Number of port to expose on the pod's IP address.
    /// This must be a valid port number, 0 < x < 65536.
    pub container_port: u16,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentStatus {
    /// The most recently observed number of replicas.
    pub replicas: u32,
    /// The number of pods targeted by this Deployment with a Ready condition.
    pub ready_replicas: u32,
}
