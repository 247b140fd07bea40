use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use deployer::{
    config::DeployerConfig,
    error::{DeployError, GatewayError},
    gateway::{DeploymentMutator, ResourceGateway},
    orchestrator::Orchestrator,
};
use resources::objects::{
    deployment::Deployment,
    ingress::Ingress,
    namespace::Namespace,
    service::{LoadBalancerIngress, LoadBalancerStatus, Service, ServiceStatus},
    Labels,
};

type Key = (String, String);

#[derive(Default)]
struct ClusterState {
    namespaces: BTreeMap<String, Namespace>,
    deployments: BTreeMap<Key, Deployment>,
    services: BTreeMap<Key, Service>,
    ingresses: BTreeMap<Key, Ingress>,
}

/// In-memory cluster with last-writer-wins replace semantics and a counter
/// over every remote call the orchestrator issues.
#[derive(Default)]
struct FakeGateway {
    state: Mutex<ClusterState>,
    calls: AtomicUsize,
}

impl FakeGateway {
    fn tick(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn deployment(&self, namespace: &str, name: &str) -> Option<Deployment> {
        self.state
            .lock()
            .unwrap()
            .deployments
            .get(&key(namespace, name))
            .cloned()
    }

    fn shared_ingress(&self, config: &DeployerConfig) -> Option<Ingress> {
        self.state
            .lock()
            .unwrap()
            .ingresses
            .get(&key(&config.ingress_namespace, &config.ingress_name))
            .cloned()
    }

    fn object_counts(&self) -> (usize, usize, usize) {
        let state = self.state.lock().unwrap();
        (
            state.deployments.len(),
            state.services.len(),
            state.ingresses.len(),
        )
    }
}

fn key(namespace: &str, name: &str) -> Key {
    (namespace.to_string(), name.to_string())
}

fn object_key(namespace: &Option<String>, name: &str) -> Key {
    (namespace.clone().unwrap_or_default(), name.to_string())
}

#[async_trait]
impl ResourceGateway for FakeGateway {
    async fn get_or_create_namespace(&self, name: &str) -> Result<Namespace, GatewayError> {
        self.tick();
        let mut state = self.state.lock().unwrap();
        Ok(state
            .namespaces
            .entry(name.to_string())
            .or_insert_with(|| Namespace::new(name))
            .clone())
    }

    async fn create_deployment(&self, deployment: &Deployment) -> Result<Deployment, GatewayError> {
        self.tick();
        let mut state = self.state.lock().unwrap();
        let key = object_key(&deployment.metadata.namespace, &deployment.metadata.name);
        if state.deployments.contains_key(&key) {
            return Err(GatewayError::Conflict {
                kind: "deployment",
                name: key.1,
            });
        }
        state.deployments.insert(key, deployment.clone());
        Ok(deployment.clone())
    }

    async fn list_deployments(&self) -> Result<Vec<Deployment>, GatewayError> {
        self.tick();
        let state = self.state.lock().unwrap();
        Ok(state.deployments.values().cloned().collect())
    }

    async fn edit_deployment(
        &self,
        namespace: &str,
        name: &str,
        mutate: DeploymentMutator,
    ) -> Result<Deployment, GatewayError> {
        self.tick();
        let mut state = self.state.lock().unwrap();
        match state.deployments.get_mut(&key(namespace, name)) {
            Some(deployment) => {
                mutate(deployment);
                Ok(deployment.clone())
            }
            None => Err(GatewayError::NotFound {
                kind: "deployment",
                name: name.to_string(),
            }),
        }
    }

    async fn delete_deployment(&self, namespace: &str, name: &str) -> Result<bool, GatewayError> {
        self.tick();
        let mut state = self.state.lock().unwrap();
        Ok(state.deployments.remove(&key(namespace, name)).is_some())
    }

    async fn create_service(&self, service: &Service) -> Result<Service, GatewayError> {
        self.tick();
        let mut state = self.state.lock().unwrap();
        let key = object_key(&service.metadata.namespace, &service.metadata.name);
        if state.services.contains_key(&key) {
            return Err(GatewayError::Conflict {
                kind: "service",
                name: key.1,
            });
        }
        state.services.insert(key, service.clone());
        Ok(service.clone())
    }

    async fn list_services(&self) -> Result<Vec<Service>, GatewayError> {
        self.tick();
        let state = self.state.lock().unwrap();
        Ok(state.services.values().cloned().collect())
    }

    async fn delete_service(&self, namespace: &str, name: &str) -> Result<bool, GatewayError> {
        self.tick();
        let mut state = self.state.lock().unwrap();
        Ok(state.services.remove(&key(namespace, name)).is_some())
    }

    async fn list_ingresses(
        &self,
        namespace: &str,
        label: (&str, &str),
    ) -> Result<Vec<Ingress>, GatewayError> {
        self.tick();
        let mut selector = Labels::new();
        selector.0.insert(label.0.to_string(), label.1.to_string());
        let state = self.state.lock().unwrap();
        Ok(state
            .ingresses
            .values()
            .filter(|ingress| {
                ingress.metadata.namespace.as_deref() == Some(namespace)
                    && ingress.metadata.labels.matches(&selector)
            })
            .cloned()
            .collect())
    }

    async fn create_ingress(&self, ingress: &Ingress) -> Result<Ingress, GatewayError> {
        self.tick();
        let mut state = self.state.lock().unwrap();
        let key = object_key(&ingress.metadata.namespace, &ingress.metadata.name);
        if state.ingresses.contains_key(&key) {
            return Err(GatewayError::Conflict {
                kind: "ingress",
                name: key.1,
            });
        }
        state.ingresses.insert(key, ingress.clone());
        Ok(ingress.clone())
    }

    async fn replace_ingress(&self, ingress: &Ingress) -> Result<Ingress, GatewayError> {
        self.tick();
        let mut state = self.state.lock().unwrap();
        let key = object_key(&ingress.metadata.namespace, &ingress.metadata.name);
        // unconditional overwrite: last writer wins
        state.ingresses.insert(key, ingress.clone());
        Ok(ingress.clone())
    }

    async fn delete_ingress(&self, namespace: &str, name: &str) -> Result<bool, GatewayError> {
        self.tick();
        let mut state = self.state.lock().unwrap();
        Ok(state.ingresses.remove(&key(namespace, name)).is_some())
    }
}

fn setup() -> (Arc<FakeGateway>, DeployerConfig, Orchestrator) {
    let gateway = Arc::new(FakeGateway::default());
    let config = DeployerConfig::default();
    let orchestrator = Orchestrator::new(gateway.clone(), config.clone());
    (gateway, config, orchestrator)
}

fn paths_of(ingress: &Ingress) -> Vec<&str> {
    ingress.spec.paths.iter().map(|p| p.path.as_str()).collect()
}

#[tokio::test]
async fn scale_out_of_range_makes_no_cluster_calls() {
    let (gateway, config, orchestrator) = setup();

    for replicas in [0, config.max_replicas + 1, 100] {
        let err = orchestrator.scale("ns", "svc1", replicas).await.unwrap_err();
        assert!(matches!(err, DeployError::Validation(_)));
    }
    assert_eq!(gateway.call_count(), 0);
}

#[tokio::test]
async fn scale_edits_only_the_replica_count() {
    let (gateway, _, orchestrator) = setup();
    orchestrator
        .deploy("ns", "svc1", "img:tag", Some(8080))
        .await
        .unwrap();

    orchestrator.scale("ns", "svc1", 5).await.unwrap();

    let before = Deployment::single_container("ns", "svc1", "img:tag", 8080);
    let after = gateway.deployment("ns", "svc1").unwrap();
    assert_eq!(after.spec.replicas, 5);
    // everything but the replica count is untouched
    assert_eq!(after.spec.selector, before.spec.selector);
    assert_eq!(after.spec.template, before.spec.template);
}

#[tokio::test]
async fn scale_of_missing_deployment_is_not_found() {
    let (_, _, orchestrator) = setup();
    let err = orchestrator.scale("ns", "ghost", 3).await.unwrap_err();
    assert!(matches!(
        err,
        DeployError::Gateway(GatewayError::NotFound { .. })
    ));
}

#[tokio::test]
async fn ingress_exists_iff_it_has_paths() {
    let (gateway, config, orchestrator) = setup();

    assert!(gateway.shared_ingress(&config).is_none());

    orchestrator.deploy("ns", "svc1", "a:1", None).await.unwrap();
    orchestrator.deploy("ns", "svc2", "b:1", None).await.unwrap();
    let ingress = gateway.shared_ingress(&config).unwrap();
    assert_eq!(paths_of(&ingress), vec!["/svc1", "/svc2"]);

    orchestrator.delete("ns", "svc1").await.unwrap();
    let ingress = gateway.shared_ingress(&config).unwrap();
    assert_eq!(paths_of(&ingress), vec!["/svc2"]);

    // last path gone: the object itself must go too
    orchestrator.delete("ns", "svc2").await.unwrap();
    assert!(gateway.shared_ingress(&config).is_none());
}

#[tokio::test]
async fn redeploying_an_existing_name_conflicts() {
    let (_, _, orchestrator) = setup();
    orchestrator.deploy("ns", "svc1", "a:1", None).await.unwrap();

    let err = orchestrator
        .deploy("ns", "svc1", "a:2", None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DeployError::Gateway(GatewayError::Conflict { .. })
    ));
}

#[tokio::test]
async fn delete_is_idempotent() {
    let (gateway, config, orchestrator) = setup();
    orchestrator.deploy("ns", "svc1", "a:1", None).await.unwrap();

    orchestrator.delete("ns", "svc1").await.unwrap();
    let counts = gateway.object_counts();

    // second delete succeeds despite everything already being absent
    orchestrator.delete("ns", "svc1").await.unwrap();
    assert_eq!(counts, (0, 0, 0));
    assert_eq!(gateway.object_counts(), counts);
    assert!(gateway.shared_ingress(&config).is_none());
}

#[tokio::test]
async fn deploy_then_list_round_trip() {
    let (_, _, orchestrator) = setup();
    orchestrator
        .deploy("ns", "svc1", "img:tag", Some(8080))
        .await
        .unwrap();

    let deployments = orchestrator.list().await.unwrap();
    assert_eq!(deployments.len(), 1);
    let dto = &deployments[0];
    assert_eq!(dto.namespace, "ns");
    assert_eq!(dto.service_name, "svc1");
    assert_eq!(dto.image, "img:tag");
    // no status reported yet
    assert_eq!(dto.replicas, 0);
    assert_eq!(dto.url, None);
}

#[tokio::test]
async fn list_attaches_the_public_url_when_discoverable() {
    let (gateway, config, orchestrator) = setup();
    orchestrator.deploy("ns", "svc1", "a:1", None).await.unwrap();

    let mut controller = Service::for_app(
        &config.ingress_namespace,
        &config.ingress_controller_service,
        80,
        80,
    );
    controller.status = Some(ServiceStatus {
        load_balancer: LoadBalancerStatus {
            ingress: vec![LoadBalancerIngress {
                ip: "10.0.0.1".to_string(),
            }],
        },
    });
    gateway.create_service(&controller).await.unwrap();

    let deployments = orchestrator.list().await.unwrap();
    assert_eq!(deployments[0].url.as_deref(), Some("http://10.0.0.1/svc1"));
}

#[tokio::test]
async fn registration_of_a_leftover_path_does_not_duplicate_it() {
    let (gateway, config, orchestrator) = setup();

    // a path survived an unregistration that never happened
    let mut leftover = Ingress::new(&config.ingress_namespace, &config.ingress_name);
    leftover.spec.add_path("svc1", config.service_port);
    gateway.create_ingress(&leftover).await.unwrap();

    orchestrator.deploy("ns", "svc1", "a:1", None).await.unwrap();

    let ingress = gateway.shared_ingress(&config).unwrap();
    assert_eq!(paths_of(&ingress), vec!["/svc1"]);
}

/// Documents the accepted last-writer-wins weakness: two registrations built
/// from the same ingress snapshot race, and the later replace erases the
/// earlier one. The cluster API offers no conditional replace, so the
/// orchestrator does not prevent this.
#[tokio::test]
async fn ingress_replace_is_last_writer_wins() {
    let (gateway, config, _) = setup();

    let mut base = Ingress::new(&config.ingress_namespace, &config.ingress_name);
    base.spec.add_path("base", config.service_port);
    gateway.create_ingress(&base).await.unwrap();

    // both writers read the same snapshot
    let snapshot = gateway
        .list_ingresses(&config.ingress_namespace, ("app", &config.ingress_name))
        .await
        .unwrap()
        .remove(0);

    let mut first = snapshot.clone();
    first.spec.add_path("svc1", config.service_port);
    gateway.replace_ingress(&first).await.unwrap();

    let mut second = snapshot;
    second.spec.add_path("svc2", config.service_port);
    gateway.replace_ingress(&second).await.unwrap();

    let ingress = gateway.shared_ingress(&config).unwrap();
    // svc1's registration is lost
    assert_eq!(paths_of(&ingress), vec!["/base", "/svc2"]);
}
