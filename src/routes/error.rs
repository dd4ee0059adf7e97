use actix_web::{error, http::StatusCode, HttpRequest, HttpResponse, ResponseError};
use thiserror::Error;
use uuid::Uuid;
use validator::ValidationErrors;

use crate::models::{ErrorResponse, RequestError};
use crate::services::PostgresError;

/// Errors a handler can answer with
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    BadRequest(#[from] RequestError),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("{0}")]
    InvalidPayload(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(PostgresError),
}

impl From<PostgresError> for ApiError {
    fn from(err: PostgresError) -> Self {
        match err {
            PostgresError::NotFound(what) => ApiError::NotFound(format!("{} not found", what)),
            other => ApiError::Database(other),
        }
    }
}

impl ApiError {
    fn label(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) | ApiError::Validation(_) => "invalid_request",
            ApiError::InvalidPayload(_) => "invalid_payload",
            ApiError::NotFound(_) => "not_found",
            ApiError::Database(_) => "internal_error",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Validation(_) | ApiError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        // Database details stay in the logs
        let message = match self {
            ApiError::Database(err) => {
                tracing::error!("Database error: {}", err);
                "A database error occurred".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(status).json(ErrorResponse {
            error: self.label().to_string(),
            message,
            status_code: status.as_u16(),
        })
    }
}

/// Parse a path id, naming the entity in the error
pub fn parse_uuid(raw: &str, entity: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::InvalidPayload(format!("Invalid {} id: {}", entity, raw)))
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    ApiError::InvalidPayload(format!("Invalid JSON: {}", err)).into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("Query error on {}: {}", req.path(), err);
    ApiError::InvalidPayload(format!("Invalid query: {}", err)).into()
}
