use std::sync::Arc;

use axum::{extract::Path, Extension, Json};
use axum_macros::debug_handler;
use resources::models::Response;
use serde::Deserialize;

use super::{response::HandlerResult, AppState};
use crate::dto::DeploymentDto;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployRequest {
    pub namespace: String,
    pub service_name: String,
    pub image: String,
    /// Container port; falls back to the configured default when absent.
    #[serde(default)]
    pub service_port: Option<u16>,
}

#[derive(Debug, Deserialize)]
pub struct ScaleRequest {
    pub replicas: u32,
}

#[debug_handler]
pub async fn list(
    Extension(app_state): Extension<Arc<AppState>>,
) -> HandlerResult<Vec<DeploymentDto>> {
    let deployments = app_state.orchestrator.list().await?;
    Ok(Json(Response::new(None, Some(deployments))))
}

#[debug_handler]
pub async fn deploy(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(payload): Json<DeployRequest>,
) -> HandlerResult<()> {
    app_state
        .orchestrator
        .deploy(
            &payload.namespace,
            &payload.service_name,
            &payload.image,
            payload.service_port,
        )
        .await?;
    let res = Response::new(
        Some(format!("deployments/{} created", payload.service_name)),
        None,
    );
    Ok(Json(res))
}

#[debug_handler]
pub async fn scale(
    Extension(app_state): Extension<Arc<AppState>>,
    Path((namespace, name)): Path<(String, String)>,
    Json(payload): Json<ScaleRequest>,
) -> HandlerResult<()> {
    app_state
        .orchestrator
        .scale(&namespace, &name, payload.replicas)
        .await?;
    let res = Response::new(Some(format!("deployments/{} scaled", name)), None);
    Ok(Json(res))
}

#[debug_handler]
pub async fn remove(
    Extension(app_state): Extension<Arc<AppState>>,
    Path((namespace, name)): Path<(String, String)>,
) -> HandlerResult<()> {
    app_state.orchestrator.delete(&namespace, &name).await?;
    let res = Response::new(Some(format!("deployments/{} deleted", name)), None);
    Ok(Json(res))
}
