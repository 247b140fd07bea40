use std::env;

use anyhow::{Context, Result};
use config::Config;
use serde::Deserialize;

/// Every knob that differed across historical revisions of this system
/// (namespaces, ports, replica bounds) is plain configuration here.
#[derive(Debug, Deserialize, Clone)]
pub struct DeployerConfig {
    /// Base URL of the cluster API server.
    #[serde(default = "default_api_server_url")]
    pub api_server_url: String,
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Namespace the shared ingress lives in.
    #[serde(default = "default_ingress_namespace")]
    pub ingress_namespace: String,
    /// Name (and `app` label value) of the shared ingress object.
    #[serde(default = "default_ingress_name")]
    pub ingress_name: String,
    /// Public-facing port every deployed service exposes.
    #[serde(default = "default_service_port")]
    pub service_port: u16,
    /// Container port used when a deploy request does not name one.
    #[serde(default = "default_container_port")]
    pub container_port: u16,
    /// Scheme of the advertised public URL.
    #[serde(default = "default_url_scheme")]
    pub url_scheme: String,
    /// Service name the ingress controller registers itself under,
    /// used to discover the cluster's public address.
    #[serde(default = "default_ingress_controller_service")]
    pub ingress_controller_service: String,
    #[serde(default = "default_min_replicas")]
    pub min_replicas: u32,
    #[serde(default = "default_max_replicas")]
    pub max_replicas: u32,
}

impl Default for DeployerConfig {
    fn default() -> Self {
        // serde defaults double as the no-config-file configuration
        serde_json::from_str("{}").expect("default config must deserialize")
    }
}

/// Read config from the YAML file named by `DEPLOYER_CONFIG`
/// (default `/etc/rdeploy/deployer.yaml`); a missing file
/// leaves every field at its default.
pub fn load() -> Result<DeployerConfig> {
    let path =
        env::var("DEPLOYER_CONFIG").unwrap_or_else(|_| "/etc/rdeploy/deployer.yaml".to_string());
    Config::builder()
        .add_source(config::File::with_name(&path).required(false))
        .build()?
        .try_deserialize::<DeployerConfig>()
        .with_context(|| "Failed to parse config".to_string())
}

fn default_api_server_url() -> String {
    "http://127.0.0.1:8080/".to_string()
}

fn default_listen_addr() -> String {
    "0.0.0.0:8180".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_ingress_namespace() -> String {
    "ingress".to_string()
}

fn default_ingress_name() -> String {
    "rdeploy-ingress".to_string()
}

fn default_service_port() -> u16 {
    80
}

fn default_container_port() -> u16 {
    8080
}

fn default_url_scheme() -> String {
    "http".to_string()
}

fn default_ingress_controller_service() -> String {
    "ingress-nginx-controller".to_string()
}

fn default_min_replicas() -> u32 {
    1
}

fn default_max_replicas() -> u32 {
    10
}
