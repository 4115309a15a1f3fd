// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for entire application

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Application-specific error types
/// DOCUMENTATION: Each variant maps to an HTTP status code and JSON error body.
/// Downstream failures (database, Google, file host) keep their detail for
/// logging only; the response body carries a generic message.
#[derive(Error, Debug)]
pub enum RestroomError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("External API error: {0}")]
    ExternalApiError(String),

    #[error("Photo error: {0}")]
    PhotoError(String),
}

impl RestroomError {
    fn code(&self) -> &'static str {
        match self {
            RestroomError::NotFound(_) => "NOT_FOUND",
            RestroomError::InvalidInput(_) => "INVALID_INPUT",
            RestroomError::ValidationError(_) => "VALIDATION_ERROR",
            RestroomError::Unauthorized => "UNAUTHORIZED",
            RestroomError::DatabaseError(_) => "DATABASE_ERROR",
            RestroomError::ExternalApiError(_) => "EXTERNAL_API_ERROR",
            RestroomError::PhotoError(_) => "PHOTO_ERROR",
        }
    }

    /// Message safe to return to the client
    pub fn public_message(&self) -> String {
        match self {
            RestroomError::DatabaseError(_) => "A database error occurred".to_string(),
            RestroomError::ExternalApiError(_) => "An upstream service failed".to_string(),
            other => other.to_string(),
        }
    }
}

/// Convert RestroomError to HTTP response
impl ResponseError for RestroomError {
    fn error_response(&self) -> HttpResponse {
        if matches!(
            self,
            RestroomError::DatabaseError(_) | RestroomError::ExternalApiError(_)
        ) {
            log::error!("{}", self);
        }

        let body = json!({
            "error": {
                "code": self.code(),
                "message": self.public_message(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            }
        });

        HttpResponse::build(self.status_code()).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            RestroomError::NotFound(_) => StatusCode::NOT_FOUND,
            RestroomError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            RestroomError::ValidationError(_) => StatusCode::BAD_REQUEST,
            RestroomError::Unauthorized => StatusCode::UNAUTHORIZED,
            RestroomError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RestroomError::ExternalApiError(_) => StatusCode::BAD_GATEWAY,
            RestroomError::PhotoError(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl From<sqlx::Error> for RestroomError {
    fn from(e: sqlx::Error) -> Self {
        RestroomError::DatabaseError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            RestroomError::InvalidInput("rating".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RestroomError::Unauthorized.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            RestroomError::NotFound("review 3".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            RestroomError::DatabaseError("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn test_database_detail_not_disclosed() {
        let err = RestroomError::DatabaseError("relation \"reviews\" does not exist".into());
        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();

        assert!(text.contains("DATABASE_ERROR"));
        assert!(!text.contains("relation"));
    }
}
