use std::sync::Arc;

use resources::objects::{
    deployment::Deployment,
    ingress::Ingress,
    service::Service,
};

use crate::{
    config::DeployerConfig,
    dto::DeploymentDto,
    error::{DeployError, GatewayError},
    gateway::ResourceGateway,
};

const APP_LABEL: &str = "app";

/// Sequences gateway calls to implement the deploy / scale / delete / list
/// intents and owns the shared-ingress path-list invariants: one path per
/// deployed service, and the ingress object exists iff its path list is
/// non-empty.
///
/// Every intent is a sequential chain of remote calls; the first failing
/// step aborts the rest, and nothing is rolled back.
pub struct Orchestrator {
    gateway: Arc<dyn ResourceGateway>,
    config: DeployerConfig,
}

impl Orchestrator {
    pub fn new(gateway: Arc<dyn ResourceGateway>, config: DeployerConfig) -> Self {
        Orchestrator {
            gateway,
            config,
        }
    }

    /// Run `image` as a reachable service: namespace, deployment (one
    /// replica), service (public port -> container port), shared-ingress
    /// path. A second deploy under the same name fails with a conflict on
    /// the deployment; delete before redeploying.
    pub async fn deploy(
        &self,
        namespace: &str,
        service_name: &str,
        image: &str,
        service_port: Option<u16>,
    ) -> Result<(), DeployError> {
        tracing::info!("Deploying {}/{}", namespace, service_name);
        self.gateway.get_or_create_namespace(namespace).await?;

        let container_port = service_port.unwrap_or(self.config.container_port);
        let deployment =
            Deployment::single_container(namespace, service_name, image, container_port);
        self.gateway.create_deployment(&deployment).await?;

        tracing::info!("Exposing {} as a service", service_name);
        let service = Service::for_app(
            namespace,
            service_name,
            self.config.service_port,
            container_port,
        );
        self.gateway.create_service(&service).await?;

        tracing::info!("Registering {} into the shared ingress", service_name);
        self.register_ingress(service_name).await?;
        Ok(())
    }

    /// Change the replica count and nothing else. Out-of-range counts are
    /// rejected before any remote call.
    pub async fn scale(
        &self,
        namespace: &str,
        service_name: &str,
        replicas: u32,
    ) -> Result<(), DeployError> {
        let (min, max) = (self.config.min_replicas, self.config.max_replicas);
        if replicas < min || replicas > max {
            return Err(DeployError::Validation(format!(
                "Number of replicas should be between {} and {}",
                min, max
            )));
        }

        tracing::info!("Scaling {}/{} to {}", namespace, service_name, replicas);
        self.gateway
            .edit_deployment(
                namespace,
                service_name,
                Box::new(move |deployment| deployment.spec.replicas = replicas),
            )
            .await?;
        Ok(())
    }

    /// Tear down everything a deploy created. Idempotent: every step runs
    /// whether or not its target still exists.
    pub async fn delete(&self, namespace: &str, service_name: &str) -> Result<(), DeployError> {
        tracing::info!("Removing deployment {}/{}", namespace, service_name);
        self.gateway.delete_deployment(namespace, service_name).await?;

        tracing::info!("Removing service {}/{}", namespace, service_name);
        self.gateway.delete_service(namespace, service_name).await?;

        tracing::info!("Unregistering {} from the shared ingress", service_name);
        self.unregister_ingress(service_name).await?;
        Ok(())
    }

    /// Summaries of every deployment in the cluster, with the public URL
    /// attached when an ingress controller address can be discovered.
    pub async fn list(&self) -> Result<Vec<DeploymentDto>, DeployError> {
        let deployments = self.gateway.list_deployments().await?;
        let base_url = self.public_url().await?;
        Ok(deployments
            .iter()
            .map(|deployment| DeploymentDto::from_deployment(deployment, base_url.as_deref()))
            .collect())
    }

    /// Add this service's path to the shared ingress, creating the ingress
    /// on first use. The read-replace cycle is unconditional: under
    /// concurrent registrations the last writer wins.
    async fn register_ingress(&self, service_name: &str) -> Result<(), GatewayError> {
        let mut ingresses = self.shared_ingresses().await?;
        match ingresses.first_mut() {
            None => {
                tracing::info!("Creating the shared ingress");
                let mut ingress =
                    Ingress::new(&self.config.ingress_namespace, &self.config.ingress_name);
                ingress.spec.add_path(service_name, self.config.service_port);
                self.gateway.create_ingress(&ingress).await?;
            }
            Some(ingress) => {
                ingress.spec.add_path(service_name, self.config.service_port);
                self.gateway.replace_ingress(ingress).await?;
            }
        }
        Ok(())
    }

    /// Drop this service's path; once the last path is gone the ingress
    /// object itself is deleted.
    async fn unregister_ingress(&self, service_name: &str) -> Result<(), GatewayError> {
        let ingresses = self.shared_ingresses().await?;
        let mut ingress = match ingresses.into_iter().next() {
            Some(ingress) => ingress,
            None => return Ok(()),
        };

        ingress.spec.remove_path(service_name);
        if ingress.spec.is_empty() {
            tracing::info!("Shared ingress has no paths left, deleting it");
            self.gateway
                .delete_ingress(&self.config.ingress_namespace, &ingress.metadata.name)
                .await?;
        } else {
            self.gateway.replace_ingress(&ingress).await?;
        }
        Ok(())
    }

    async fn shared_ingresses(&self) -> Result<Vec<Ingress>, GatewayError> {
        let ingresses = self
            .gateway
            .list_ingresses(
                &self.config.ingress_namespace,
                (APP_LABEL, &self.config.ingress_name),
            )
            .await?;
        if ingresses.len() > 1 {
            // degenerate state: operate on the first, leave the rest alone
            tracing::warn!(
                "Found {} ingresses labeled {}={}, using the first",
                ingresses.len(),
                APP_LABEL,
                self.config.ingress_name
            );
        }
        Ok(ingresses)
    }

    /// The cluster's public address, read off the ingress controller's
    /// service. Absence is a valid state, not an error.
    async fn public_url(&self) -> Result<Option<String>, GatewayError> {
        let services = self.gateway.list_services().await?;
        let address = services
            .iter()
            .find(|service| service.metadata.name == self.config.ingress_controller_service)
            .and_then(|service| service.status.as_ref())
            .and_then(|status| status.load_balancer.ingress.first())
            .map(|ingress| ingress.ip.clone());
        Ok(address.map(|addr| format!("{}://{}", self.config.url_scheme, addr)))
    }
}
