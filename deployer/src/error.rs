use thiserror::Error;

/// Failures of a single cluster API call.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// An object with the same (namespace, name) identity already exists.
    #[error("{kind} {name} already exists")]
    Conflict { kind: &'static str, name: String },
    /// A specifically named object was required but absent.
    /// Absence during deletes is reported as `Ok(false)`, not this.
    #[error("{kind} {name} not found")]
    NotFound { kind: &'static str, name: String },
    /// Transport or cluster-side failure. Never retried.
    #[error("cluster api error: {0}")]
    Remote(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Remote(err.to_string())
    }
}

/// Failures of an orchestrator intent, surfaced to the caller as a single
/// terminal error describing the first failing step.
#[derive(Debug, Error)]
pub enum DeployError {
    /// Caller-supplied value outside policy. Rejected before any remote call.
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
