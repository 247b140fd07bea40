use axum::Json;
use resources::models::{ErrResponse, Response};

use crate::error::{DeployError, GatewayError};

pub type HandlerResult<T> = Result<Json<Response<T>>, ErrResponse>;

impl From<DeployError> for ErrResponse {
    fn from(err: DeployError) -> Self {
        match err {
            DeployError::Validation(msg) => {
                ErrResponse::bad_request("Invalid request".to_string(), Some(msg))
            }
            DeployError::Gateway(err) => err.into(),
        }
    }
}

impl From<GatewayError> for ErrResponse {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Conflict { .. } => {
                ErrResponse::conflict("Already exists".to_string(), Some(err.to_string()))
            }
            GatewayError::NotFound { .. } => {
                ErrResponse::not_found("Not found".to_string(), Some(err.to_string()))
            }
            GatewayError::Remote(cause) => {
                tracing::debug!("Cluster api error: {}", cause);
                // remote details stay out of client responses
                ErrResponse::bad_gateway("Cluster api error".to_string(), None)
            }
        }
    }
}
