use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use resources::{
    models::Response,
    objects::{
        deployment::Deployment, ingress::Ingress, namespace::Namespace, service::Service, Labels,
        Object,
    },
};
use serde::{de::DeserializeOwned, Serialize};

use super::{DeploymentMutator, ResourceGateway, Result};
use crate::error::GatewayError;

/// Gateway backed by a miniK8s-style cluster API server speaking
/// `Response<T>` JSON envelopes under `/api/v1`.
pub struct ApiGateway {
    client: Client,
    base_url: Url,
}

impl ApiGateway {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|err| GatewayError::Remote(format!("invalid api server url: {}", err)))?;
        Ok(ApiGateway {
            client: Client::new(),
            base_url,
        })
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|err| GatewayError::Remote(format!("invalid url {}: {}", path, err)))
    }

    /// Map the response status onto the error taxonomy, dropping the body.
    async fn check(res: reqwest::Response, kind: &'static str, name: &str) -> Result<()> {
        match res.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(GatewayError::NotFound {
                kind,
                name: name.to_string(),
            }),
            StatusCode::CONFLICT => Err(GatewayError::Conflict {
                kind,
                name: name.to_string(),
            }),
            status => Err(GatewayError::Remote(format!(
                "{} on {} {}",
                status, kind, name
            ))),
        }
    }

    /// Like `check`, but the success body must carry a data payload.
    async fn expect<T: DeserializeOwned + Serialize>(
        res: reqwest::Response,
        kind: &'static str,
        name: &str,
    ) -> Result<T> {
        match res.status() {
            status if status.is_success() => {
                let body = res.json::<Response<T>>().await?;
                body.data.ok_or_else(|| {
                    GatewayError::Remote(format!("empty response for {} {}", kind, name))
                })
            }
            StatusCode::NOT_FOUND => Err(GatewayError::NotFound {
                kind,
                name: name.to_string(),
            }),
            StatusCode::CONFLICT => Err(GatewayError::Conflict {
                kind,
                name: name.to_string(),
            }),
            status => Err(GatewayError::Remote(format!(
                "{} on {} {}",
                status, kind, name
            ))),
        }
    }

    async fn list<T: DeserializeOwned + Serialize>(&self, path: &str) -> Result<Vec<T>> {
        let res = self.client.get(self.url(path)?).send().await?;
        match res.status() {
            status if status.is_success() => {
                let body = res.json::<Response<Vec<T>>>().await?;
                Ok(body.data.unwrap_or_default())
            }
            status => Err(GatewayError::Remote(format!("{} on {}", status, path))),
        }
    }

    async fn delete(&self, path: &str) -> Result<bool> {
        let res = self.client.delete(self.url(path)?).send().await?;
        match res.status() {
            status if status.is_success() => Ok(true),
            // already gone: target state achieved
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(GatewayError::Remote(format!("{} on {}", status, path))),
        }
    }
}

#[async_trait]
impl ResourceGateway for ApiGateway {
    async fn get_or_create_namespace(&self, name: &str) -> Result<Namespace> {
        let namespace = Namespace::new(name);
        let res = self
            .client
            .post(self.url("api/v1/namespaces")?)
            .json(&namespace)
            .send()
            .await?;
        match Self::check(res, "Namespace", name).await {
            // reuse on conflict
            Err(GatewayError::Conflict { .. }) | Ok(()) => Ok(namespace),
            Err(err) => Err(err),
        }
    }

    async fn create_deployment(&self, deployment: &Deployment) -> Result<Deployment> {
        let namespace = deployment.metadata.namespace.as_deref().unwrap_or_default();
        let path = format!("api/v1/namespaces/{}/deployments", namespace);
        let res = self
            .client
            .post(self.url(&path)?)
            .json(deployment)
            .send()
            .await?;
        Self::check(res, deployment.kind(), deployment.name()).await?;
        Ok(deployment.clone())
    }

    async fn list_deployments(&self) -> Result<Vec<Deployment>> {
        self.list("api/v1/deployments").await
    }

    async fn edit_deployment(
        &self,
        namespace: &str,
        name: &str,
        mutate: DeploymentMutator,
    ) -> Result<Deployment> {
        let path = format!("api/v1/namespaces/{}/deployments/{}", namespace, name);
        let url = self.url(&path)?;
        let res = self.client.get(url.clone()).send().await?;
        let mut deployment: Deployment = Self::expect(res, "Deployment", name).await?;
        // mutate the freshly fetched version right before the write-back
        mutate(&mut deployment);
        let res = self.client.put(url).json(&deployment).send().await?;
        Self::check(res, "Deployment", name).await?;
        Ok(deployment)
    }

    async fn delete_deployment(&self, namespace: &str, name: &str) -> Result<bool> {
        self.delete(&format!("api/v1/namespaces/{}/deployments/{}", namespace, name))
            .await
    }

    async fn create_service(&self, service: &Service) -> Result<Service> {
        let namespace = service.metadata.namespace.as_deref().unwrap_or_default();
        let path = format!("api/v1/namespaces/{}/services", namespace);
        let res = self
            .client
            .post(self.url(&path)?)
            .json(service)
            .send()
            .await?;
        Self::check(res, service.kind(), service.name()).await?;
        Ok(service.clone())
    }

    async fn list_services(&self) -> Result<Vec<Service>> {
        self.list("api/v1/services").await
    }

    async fn delete_service(&self, namespace: &str, name: &str) -> Result<bool> {
        self.delete(&format!("api/v1/namespaces/{}/services/{}", namespace, name))
            .await
    }

    async fn list_ingresses(&self, namespace: &str, label: (&str, &str)) -> Result<Vec<Ingress>> {
        let ingresses: Vec<Ingress> = self
            .list(&format!("api/v1/namespaces/{}/ingresses", namespace))
            .await?;
        let mut selector = Labels::new();
        selector.0.insert(label.0.to_string(), label.1.to_string());
        Ok(ingresses
            .into_iter()
            .filter(|ingress| ingress.metadata.labels.matches(&selector))
            .collect())
    }

    async fn create_ingress(&self, ingress: &Ingress) -> Result<Ingress> {
        let namespace = ingress.metadata.namespace.as_deref().unwrap_or_default();
        let path = format!("api/v1/namespaces/{}/ingresses", namespace);
        let res = self
            .client
            .post(self.url(&path)?)
            .json(ingress)
            .send()
            .await?;
        Self::check(res, ingress.kind(), ingress.name()).await?;
        Ok(ingress.clone())
    }

    async fn replace_ingress(&self, ingress: &Ingress) -> Result<Ingress> {
        let namespace = ingress.metadata.namespace.as_deref().unwrap_or_default();
        let path = format!(
            "api/v1/namespaces/{}/ingresses/{}",
            namespace, ingress.metadata.name
        );
        let res = self
            .client
            .put(self.url(&path)?)
            .json(ingress)
            .send()
            .await?;
        Self::check(res, ingress.kind(), ingress.name()).await?;
        Ok(ingress.clone())
    }

    async fn delete_ingress(&self, namespace: &str, name: &str) -> Result<bool> {
        self.delete(&format!("api/v1/namespaces/{}/ingresses/{}", namespace, name))
            .await
    }
}
