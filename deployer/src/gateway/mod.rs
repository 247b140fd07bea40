use async_trait::async_trait;
use resources::objects::{
    deployment::Deployment, ingress::Ingress, namespace::Namespace, service::Service,
};

use crate::error::GatewayError;

mod api;

pub use api::ApiGateway;

pub type Result<T> = std::result::Result<T, GatewayError>;

/// Mutation applied to the latest fetched object
/// immediately before the write-back.
pub type DeploymentMutator = Box<dyn FnOnce(&mut Deployment) + Send>;

/// Thin typed pass-through to the cluster API for the four resource kinds
/// this system touches. No orchestration policy lives here; every call is a
/// single remote operation against the cluster's current state.
#[async_trait]
pub trait ResourceGateway: Send + Sync {
    /// Create-or-reuse: an already existing namespace is success.
    async fn get_or_create_namespace(&self, name: &str) -> Result<Namespace>;

    /// Fails with `Conflict` if the (namespace, name) identity exists.
    async fn create_deployment(&self, deployment: &Deployment) -> Result<Deployment>;
    /// All namespaces. Empty cluster is an empty list, never a failure.
    async fn list_deployments(&self) -> Result<Vec<Deployment>>;
    /// Read-modify-write on a single deployment: fetch the latest version,
    /// apply `mutate`, replace. `NotFound` if absent.
    async fn edit_deployment(
        &self,
        namespace: &str,
        name: &str,
        mutate: DeploymentMutator,
    ) -> Result<Deployment>;
    /// `Ok(true)` if something was deleted, `Ok(false)` if already absent.
    async fn delete_deployment(&self, namespace: &str, name: &str) -> Result<bool>;

    async fn create_service(&self, service: &Service) -> Result<Service>;
    async fn list_services(&self) -> Result<Vec<Service>>;
    async fn delete_service(&self, namespace: &str, name: &str) -> Result<bool>;

    /// Ingresses in `namespace` carrying the given label.
    async fn list_ingresses(&self, namespace: &str, label: (&str, &str)) -> Result<Vec<Ingress>>;
    async fn create_ingress(&self, ingress: &Ingress) -> Result<Ingress>;
    /// Unconditional full replace: last writer wins. A registration read
    /// from a stale snapshot can overwrite a concurrent one.
    async fn replace_ingress(&self, ingress: &Ingress) -> Result<Ingress>;
    async fn delete_ingress(&self, namespace: &str, name: &str) -> Result<bool>;
}
