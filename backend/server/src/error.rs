use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

pub const INVALID_PAYLOAD: &str = "Invalid payload";
pub const INTERNAL: &str = "Internal server error";

/// Every failure a gateway can report. Each variant owns exactly one status
/// code, so no other code can reach a client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),

    #[error("{0}")]
    BadGateway(String),
}

pub type Outcome<T> = Result<T, GatewayError>;

impl GatewayError {
    pub fn invalid_payload() -> Self {
        GatewayError::InvalidInput(INVALID_PAYLOAD.to_string())
    }

    pub fn internal() -> Self {
        GatewayError::Internal(INTERNAL.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::BadGateway(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FailureBody<'a> {
    ok: bool,
    status_code: u16,
    message: &'a str,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        let body = FailureBody {
            ok: false,
            status_code: status.as_u16(),
            message: &message,
        };

        (status, Json(body)).into_response()
    }
}
