use crate::orchestrator::Orchestrator;

pub mod deployment;
pub mod response;

pub struct AppState {
    pub orchestrator: Orchestrator,
}
