/// Error types for Board Service
///
/// Every failure the service layer can produce is one of these variants.
/// The HTTP layer turns them into status codes through `ResponseError`;
/// nothing below the handlers retries.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};

/// Result type for board-service operations
pub type Result<T> = std::result::Result<T, AppError>;

/// SQLSTATE for foreign_key_violation
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Title/content rules failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Display name rejected on rename
    #[error("Invalid name: {0}")]
    InvalidName(String),

    /// Attachment is not an image
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// Attachment or request body over the configured ceiling
    #[error("Payload too large: {size} bytes exceeds limit of {limit} bytes")]
    PayloadTooLarge { size: usize, limit: usize },

    /// Attachment bytes are empty or unreadable
    #[error("Invalid content: {0}")]
    InvalidContent(String),

    /// Unknown post/comment
    #[error("Not found: {0}")]
    NotFound(String),

    /// Session token does not resolve to an identity
    #[error("Unknown session")]
    UnknownSession,

    /// Avatar catalog failed or timed out
    #[error("Avatar catalog unavailable: {0}")]
    AvatarUnavailable(String),

    /// Object storage failed or timed out
    #[error("Remote service unavailable: {0}")]
    RemoteUnavailable(String),

    /// Repository failure
    #[error("Persistence failure: {0}")]
    Persistence(String),

    /// Malformed HTTP input
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// True for failures caused by the client's input; these are never retried.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_)
                | AppError::InvalidName(_)
                | AppError::UnsupportedMediaType(_)
                | AppError::PayloadTooLarge { .. }
                | AppError::InvalidContent(_)
                | AppError::BadRequest(_)
        )
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::InvalidName(_)
            | AppError::InvalidContent(_)
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::UnknownSession => StatusCode::UNAUTHORIZED,
            AppError::AvatarUnavailable(_) | AppError::RemoteUnavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if !self.is_client_error() {
            tracing::warn!(status = status.as_u16(), error = %self, "Request failed");
        }
        // Repository details stay in the logs.
        let error_msg = match self {
            AppError::Persistence(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        HttpResponse::build(status).json(serde_json::json!({
            "error": error_msg,
            "status": status.as_u16(),
        }))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => AppError::NotFound("record not found".to_string()),
            sqlx::Error::Database(db_err)
                if db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) =>
            {
                AppError::NotFound(format!(
                    "referenced record does not exist ({})",
                    db_err.constraint().unwrap_or("unknown constraint")
                ))
            }
            _ => AppError::Persistence(err.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let fields: Vec<String> = errors
            .field_errors()
            .iter()
            .map(|(field, errs)| {
                let reasons: Vec<String> = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                format!("{}: {}", field, reasons.join(", "))
            })
            .collect();
        AppError::Validation(fields.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::Validation("title".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::PayloadTooLarge { size: 11, limit: 10 }.status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            AppError::UnsupportedMediaType("text/plain".into()).status_code(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(AppError::UnknownSession.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::AvatarUnavailable("down".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_client_errors() {
        assert!(AppError::InvalidContent("empty".into()).is_client_error());
        assert!(!AppError::Persistence("boom".into()).is_client_error());
        assert!(!AppError::RemoteUnavailable("storage".into()).is_client_error());
    }
}
