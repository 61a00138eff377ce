//! Error handling middleware - RFC 7807 compliant responses.

use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use quill_core::DomainError;
use quill_shared::{ErrorResponse, InvalidParam};
use std::fmt;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    Internal(String),
    Validation(Vec<InvalidParam>),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::Validation(params) => {
                let fields: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
                write!(f, "Validation errors on: {}", fields.join(", "))
            }
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Conflict(detail) => ErrorResponse::conflict(detail),
            AppError::Internal(detail) => {
                // Never leak storage details to the client
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
            AppError::Validation(params) => ErrorResponse::validation_failed(params.clone()),
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, key } => {
                AppError::NotFound(format!("{} '{}' not found", entity_type, key))
            }
            DomainError::Validation(fields) => AppError::Validation(
                fields
                    .into_iter()
                    .map(|f| InvalidParam {
                        name: f.field.to_string(),
                        reason: f.message,
                    })
                    .collect(),
            ),
            DomainError::Duplicate(msg) => AppError::Conflict(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Extractor error handler shared by `JsonConfig` and `QueryConfig`.
///
/// Malformed bodies, bad query strings and unknown fields all end up here.
pub fn reject_input<E: fmt::Display>(err: E, req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(path = %req.path(), "Rejected request input: {}", err);
    AppError::BadRequest(err.to_string()).into()
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_each_field() {
        let err: AppError = DomainError::Validation(vec![
            quill_core::FieldError::new("title", "must not be empty"),
            quill_core::FieldError::new("content", "must not be empty"),
        ])
        .into();

        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        match err {
            AppError::Validation(params) => {
                assert_eq!(params.len(), 2);
                assert_eq!(params[0].name, "title");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn not_found_names_the_key() {
        let err: AppError = DomainError::not_found("post", "missing-slug").into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Not found: post 'missing-slug' not found");
    }

    #[test]
    fn duplicate_is_conflict() {
        let err: AppError = DomainError::Duplicate("slug 'hello' taken".into()).into();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }
}
