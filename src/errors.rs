use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error block embedded in the response envelope.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable error description
    pub message: String,
    /// Machine-readable error code
    pub code: String,
    /// Additional error details (field names, conflicting ids)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Envelope used for every failed response:
/// `{status: false, message, error: {message, code, details}}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub status: bool,
    pub message: String,
    pub error: ErrorBody,
}

/// Service-layer error taxonomy. `status_code()` and `error_code()` are the
/// single source of truth for the HTTP status and envelope code mapping.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::error::DbErr),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Email(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::Validation(err.to_string())
    }
}

impl ServiceError {
    pub fn not_found(entity: &str, id: i64) -> Self {
        ServiceError::NotFound(format!("{} with id {} not found", entity, id))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Email(_) => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Database(_) => "INTEGRITY_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "INTEGRITY_ERROR",
            Self::Unauthorized(_) => "INVALID_CREDENTIALS",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Email(_) => "EMAIL_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message suitable for HTTP responses. Internal failures return generic
    /// text to avoid leaking implementation details.
    pub fn response_message(&self) -> String {
        match self {
            Self::Database(_) => "Database error".to_string(),
            Self::Internal(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.response_message();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }

        let body = ErrorResponse {
            status: false,
            message: message.clone(),
            error: ErrorBody {
                message,
                code: self.error_code().to_string(),
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Handler-layer error type. Most handlers just bubble a `ServiceError`
/// through `?`; the extra variants cover boundary-only failures.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("{0}")]
    Validation(String),

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Authentication required")]
    Unauthorized,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Service(err) => err.into_response(),
            ApiError::Validation(msg) => ServiceError::Validation(msg).into_response(),
            ApiError::InvalidToken => {
                let body = ErrorResponse {
                    status: false,
                    message: "Invalid or expired token".to_string(),
                    error: ErrorBody {
                        message: "Invalid or expired token".to_string(),
                        code: "INVALID_TOKEN".to_string(),
                        details: None,
                    },
                };
                (StatusCode::UNAUTHORIZED, Json(body)).into_response()
            }
            ApiError::Unauthorized => {
                let body = ErrorResponse {
                    status: false,
                    message: "Authentication credentials were not provided".to_string(),
                    error: ErrorBody {
                        message: "Authentication credentials were not provided".to_string(),
                        code: "MISSING_CREDENTIALS".to_string(),
                        details: None,
                    },
                };
                (StatusCode::UNAUTHORIZED, Json(body)).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code_mapping() {
        assert_eq!(
            ServiceError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::Unauthorized("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ServiceError::Forbidden("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ServiceError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServiceError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_errors_hide_details() {
        assert_eq!(
            ServiceError::Internal("secret".into()).response_message(),
            "Internal server error"
        );
        assert_eq!(
            ServiceError::Database(sea_orm::DbErr::Custom("dsn".into())).response_message(),
            "Database error"
        );
        assert_eq!(
            ServiceError::NotFound("Dealer with id 7 not found".into()).response_message(),
            "Dealer with id 7 not found"
        );
    }
}
