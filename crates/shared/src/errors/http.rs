use crate::errors::{error::ErrorResponse, repository::RepositoryError, service::ServiceError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

#[derive(Debug)]
pub enum HttpError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    ServiceUnavailable(String),
    Internal(String),
}

impl From<ServiceError> for HttpError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(errors) => {
                HttpError::BadRequest(format!("Validation failed: {errors:?}"))
            }

            // Business-rule rejections surface their message verbatim as 409.
            ServiceError::EmptyCart
            | ServiceError::InvalidQuantity { .. }
            | ServiceError::ProductUnavailable { .. }
            | ServiceError::InsufficientStock { .. }
            | ServiceError::AlreadyPaid { .. }
            | ServiceError::NotPaid { .. }
            | ServiceError::AlreadyDelivered { .. }
            | ServiceError::AlreadyReviewed { .. } => HttpError::Conflict(err.to_string()),

            ServiceError::Repo(repo_err) => match repo_err {
                RepositoryError::NotFound => HttpError::NotFound("Not found".into()),
                RepositoryError::AlreadyExists(msg) => HttpError::Conflict(msg),
                RepositoryError::StockConflict { product_id } => {
                    HttpError::Conflict(format!("Insufficient stock for product {product_id}"))
                }
                RepositoryError::Serialization(msg) => {
                    HttpError::ServiceUnavailable(format!("Storage contention: {msg}"))
                }
                _ => HttpError::Internal("Repository error".into()),
            },

            ServiceError::Unauthorized(msg) => HttpError::Unauthorized(msg),
            ServiceError::Forbidden(msg) => HttpError::Forbidden(msg),

            ServiceError::Jwt(err) => HttpError::Unauthorized(format!("JWT error: {err}")),
            ServiceError::TokenExpired => HttpError::Unauthorized("Token expired".into()),
            ServiceError::InvalidTokenType => HttpError::Unauthorized("Invalid token type".into()),

            ServiceError::ConflictRetriesExhausted => {
                HttpError::ServiceUnavailable("Storage contention, retries exhausted".into())
            }

            ServiceError::Internal(msg) => HttpError::Internal(msg),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            HttpError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            HttpError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            HttpError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            HttpError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            HttpError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            HttpError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            HttpError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse {
            status: "error".into(),
            message: msg,
        });

        (status, body).into_response()
    }
}
