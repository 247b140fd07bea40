use resources::objects::deployment::Deployment;
use serde::{Deserialize, Serialize};

use crate::age;

/// Read model of one deployed service, derived on demand from a Deployment
/// snapshot. Never persisted; absent fields are omitted from the JSON.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentDto {
    pub namespace: String,
    pub service_name: String,
    pub image: String,
    /// Raw creation timestamp as reported by the cluster.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployed: Option<String>,
    /// Age since creation, e.g. "4d".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime: Option<String>,
    /// 0 until the cluster reports a status for the workload.
    pub replicas: u32,
    /// Externally reachable URL, when the cluster has a public address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl DeploymentDto {
    /// Pure mapping; `base_url` is the cluster's public address
    /// (scheme included), if one was discovered.
    pub fn from_deployment(deployment: &Deployment, base_url: Option<&str>) -> Self {
        let metadata = &deployment.metadata;
        let image = deployment
            .spec
            .template
            .spec
            .containers
            .first()
            .map(|container| container.image.clone())
            .unwrap_or_default();
        DeploymentDto {
            namespace: metadata.namespace.clone().unwrap_or_default(),
            service_name: metadata.name.clone(),
            image,
            deployed: metadata.creation_timestamp.clone(),
            uptime: age::age(metadata.creation_timestamp.as_deref()),
            replicas: deployment
                .status
                .as_ref()
                .map(|status| status.replicas)
                .unwrap_or(0),
            url: base_url.map(|base| format!("{}/{}", base, metadata.name)),
        }
    }
}
