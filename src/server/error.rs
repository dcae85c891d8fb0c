use crate::error::{PortalError, INVALID_MONTH_MESSAGE};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Malformed request body: {0}")]
    MalformedBody(String),
    #[error(transparent)]
    Portal(#[from] PortalError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::MalformedBody(msg) => (StatusCode::BAD_REQUEST, json!({ "message": msg })),
            ApiError::Portal(PortalError::Validation(errors)) => (
                StatusCode::BAD_REQUEST,
                json!({ "message": "Validation error", "errors": errors }),
            ),
            ApiError::Portal(PortalError::InvalidMonth(_)) => (
                StatusCode::BAD_REQUEST,
                json!({ "message": INVALID_MONTH_MESSAGE }),
            ),
            ApiError::Portal(PortalError::Store(e)) => {
                error!("Report store failure: {}", e);
                internal_error()
            }
            ApiError::Portal(PortalError::Overflow(e)) => {
                error!("Cannot aggregate month: {}", e);
                internal_error()
            }
        };
        (status, Json(body)).into_response()
    }
}

fn internal_error() -> (StatusCode, serde_json::Value) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "message": "Internal server error" }),
    )
}
