use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::client::connection::ConnectionErrorReason;
use crate::models::FieldErrors;

/// Failure talking to the upstream course API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure or 5xx; these send the user to the connection-error page.
    #[error("connection error ({reason}): {message}")]
    Connection {
        reason: ConnectionErrorReason,
        message: String,
    },

    /// 4xx answer, handled where the request was made.
    #[error("API responded {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode API response: {0}")]
    Decode(String),

    #[error("invalid API request: {0}")]
    Request(String),
}

impl ApiError {
    pub fn connection_reason(&self) -> Option<ConnectionErrorReason> {
        match self {
            ApiError::Connection { reason, .. } => Some(*reason),
            _ => None,
        }
    }

    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return ApiError::Decode(err.to_string());
        }
        if err.is_builder() {
            return ApiError::Request(err.to_string());
        }
        ApiError::Connection {
            reason: ConnectionErrorReason::from_transport(&err),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Not found")]
    NotFound,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation failed")]
    Validation(FieldErrors),

    /// Connection failure turned into a redirect to the connection-error page.
    #[error("Redirecting to {0}")]
    Redirect(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, fields) = match self {
            AppError::Redirect(location) => {
                return (StatusCode::SEE_OTHER, [(header::LOCATION, location)]).into_response();
            }
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not Found".to_string(), None),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::Validation(fields) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Validation failed".to_string(),
                Some(fields),
            ),
            AppError::Api(ApiError::Status { status, body }) => {
                let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                (status, body, None)
            }
            AppError::Api(err @ ApiError::Connection { .. }) => {
                error!("upstream unavailable: {}", err);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Course service unavailable".to_string(),
                    None,
                )
            }
            AppError::Api(err) => {
                error!("upstream error: {}", err);
                (StatusCode::BAD_GATEWAY, "Upstream error".to_string(), None)
            }
            AppError::Config(msg) => {
                error!("configuration error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: status.to_string(),
            message,
            fields,
        });

        (status, body).into_response()
    }
}
