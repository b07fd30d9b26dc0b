use crate::envelope::Envelope;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

pub const FAULT_MESSAGE: &str = "Something went wrong!";
pub const REDACTED_FAULT_DETAIL: &str = "Internal server error";
pub const ROUTE_NOT_FOUND_MESSAGE: &str = "Route not found";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Invalid query parameters: {0}")]
    InvalidQuery(String),

    #[error("Request body too large")]
    PayloadTooLarge,

    #[error("Bad request: {0}")]
    BadRequest(anyhow::Error),

    #[error("Not found: {0}")]
    NotFound(anyhow::Error),

    #[error("Route not found")]
    RouteNotFound,

    #[error("Conflict: {0}")]
    Conflict(anyhow::Error),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Database error: {0}")]
    DatabaseError(anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

/// Detail of a fault that produced a 500 response.
///
/// Attached to the response extensions so the outermost fault middleware can
/// log it and, in development, show it to the client. The body rendered by
/// [`AppError::into_response`] never contains it.
#[derive(Debug, Clone)]
pub struct FaultDetail(pub String);

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::DatabaseError(anyhow::Error::new(err))
    }
}

impl AppError {
    pub fn not_found(message: &'static str) -> Self {
        AppError::NotFound(anyhow::anyhow!(message))
    }

    pub fn conflict(message: &'static str) -> Self {
        AppError::Conflict(anyhow::anyhow!(message))
    }

    pub fn bad_request(message: &'static str) -> Self {
        AppError::BadRequest(anyhow::anyhow!(message))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::InvalidBody(_)
            | AppError::InvalidQuery(_)
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) | AppError::RouteNotFound => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::InternalError(_) | AppError::DatabaseError(_) | AppError::ConfigError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match self {
            AppError::ValidationError(err) => Envelope::failure("Validation error")
                .with_error(err.to_string())
                .status(status)
                .into_response(),
            AppError::InvalidBody(detail) => Envelope::failure("Invalid request body")
                .with_error(detail)
                .status(status)
                .into_response(),
            AppError::InvalidQuery(detail) => Envelope::failure("Invalid query parameters")
                .with_error(detail)
                .status(status)
                .into_response(),
            AppError::BadRequest(err) | AppError::NotFound(err) | AppError::Conflict(err) => {
                Envelope::failure(err.to_string())
                    .status(status)
                    .into_response()
            }
            AppError::PayloadTooLarge => Envelope::failure("Request body too large")
                .status(status)
                .into_response(),
            AppError::RouteNotFound => Envelope::failure(ROUTE_NOT_FOUND_MESSAGE)
                .status(status)
                .into_response(),
            AppError::InternalError(err)
            | AppError::DatabaseError(err)
            | AppError::ConfigError(err) => {
                let mut res = Envelope::failure(FAULT_MESSAGE)
                    .with_error(REDACTED_FAULT_DETAIL)
                    .status(status)
                    .into_response();
                res.extensions_mut().insert(FaultDetail(format!("{:#}", err)));
                res
            }
        }
    }
}
