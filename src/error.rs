// Request-level error type for duplicate checks.
//
// Every failure on the check path ends up as one of three kinds, each with a
// fixed HTTP status. The JSON body is always {"error": "<message>"}.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckError {
    /// Malformed, missing or empty input. The caller can fix it.
    #[error("{0}")]
    InvalidRequest(String),

    /// A required artifact failed to load at startup. The operator can fix it.
    #[error("{0}")]
    ServiceUnavailable(String),

    /// Anything that went wrong while building features or classifying.
    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

impl CheckError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::ServiceUnavailable(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for CheckError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match &self {
            Self::InvalidRequest(_) => {
                tracing::debug!(error = %message, "Rejected check request");
            }
            Self::ServiceUnavailable(_) => {
                tracing::warn!(error = %message, "Check requested while service unavailable");
            }
            Self::Internal(_) => {
                tracing::error!(error = %message, "Duplicate check failed");
            }
        }
        crate::web::api_error(self.status(), &message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(CheckError::invalid("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            CheckError::unavailable("x").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        let internal: CheckError = anyhow::anyhow!("boom").into();
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_message_includes_context_chain() {
        let err = anyhow::anyhow!("tensor shape mismatch").context("Classifier inference failed");
        let check: CheckError = err.into();
        assert_eq!(
            check.to_string(),
            "Classifier inference failed: tensor shape mismatch"
        );
    }
}
