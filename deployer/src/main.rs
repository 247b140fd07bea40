use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    routing::{delete, get, post},
    Extension, Router,
};
use deployer::{
    config,
    gateway::ApiGateway,
    handler::{self, AppState},
    orchestrator::Orchestrator,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load().with_context(|| "Failed to load config".to_string())?;

    std::env::set_var("RUST_LOG", format!("deployer={}", config.log_level));
    tracing_subscriber::fmt::init();

    let gateway =
        ApiGateway::new(&config.api_server_url).with_context(|| "Failed to create gateway")?;
    let listen_addr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address {}", config.listen_addr))?;
    let orchestrator = Orchestrator::new(Arc::new(gateway), config);
    let shared_state = Arc::new(AppState {
        orchestrator,
    });

    let app = Router::new()
        .route(
            "/api/v1/deployments",
            get(handler::deployment::list).post(handler::deployment::deploy),
        )
        .route(
            "/api/v1/deployments/:namespace/:name/scale",
            post(handler::deployment::scale),
        )
        .route(
            "/api/v1/deployments/:namespace/:name",
            delete(handler::deployment::remove),
        )
        .layer(Extension(shared_state));

    tracing::info!("Listening at {}", listen_addr);
    axum::Server::bind(&listen_addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown())
        .await?;

    Ok(())
}

async fn shutdown() {
    tokio::signal::ctrl_c()
        .await
        .expect("expect tokio signal ctrl-c");
    tracing::info!("Shutting Down");
}
