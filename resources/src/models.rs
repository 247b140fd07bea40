use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Response<T: Serialize> {
    pub msg: Option<String>,
    pub data: Option<T>,
}

impl<T: Serialize> Response<T> {
    pub fn new(msg: Option<String>, data: Option<T>) -> Self {
        Response {
            msg,
            data,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrResponse {
    pub msg: String,
    pub cause: Option<String>,
    #[serde(skip)]
    status: u16,
}

impl ErrResponse {
    pub fn new(msg: String, cause: Option<String>) -> Self {
        Self::with_status(StatusCode::INTERNAL_SERVER_ERROR, msg, cause)
    }

    pub fn bad_request(msg: String, cause: Option<String>) -> Self {
        Self::with_status(StatusCode::BAD_REQUEST, msg, cause)
    }

    pub fn not_found(msg: String, cause: Option<String>) -> Self {
        Self::with_status(StatusCode::NOT_FOUND, msg, cause)
    }

    pub fn conflict(msg: String, cause: Option<String>) -> Self {
        Self::with_status(StatusCode::CONFLICT, msg, cause)
    }

    pub fn bad_gateway(msg: String, cause: Option<String>) -> Self {
        Self::with_status(StatusCode::BAD_GATEWAY, msg, cause)
    }

    pub fn with_status(status: StatusCode, msg: String, cause: Option<String>) -> Self {
        ErrResponse {
            msg,
            cause,
            status: status.as_u16(),
        }
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ErrResponse {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        (status, Json(self)).into_response()
    }
}
