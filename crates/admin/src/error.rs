//! Unified error handling for admin.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::helper::HelperError;
use crate::middleware::token_store::TokenStoreError;

/// Response extension marking a request whose session the backend rejected.
///
/// Picked up by [`crate::middleware::auth_failure`], which clears the
/// session and redirects to the login page.
#[derive(Debug, Clone, Copy)]
pub struct AuthFailure;

/// Application-level error type for the admin panel.
#[derive(Debug, Error)]
pub enum AppError {
    /// Helper backend call failed.
    #[error("Helper API error: {0}")]
    Helper(#[from] HelperError),

    /// Session storage failed.
    #[error("Session error: {0}")]
    Session(#[from] TokenStoreError),

    /// The session is missing or no longer accepted.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Input rejected before reaching the backend.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this error should end the admin's session.
    #[must_use]
    pub const fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized(_) | Self::Helper(HelperError::Unauthorized)
        )
    }

    /// Status for a backend failure: its own 4xx/5xx, or 502 for transport
    /// and decoding problems.
    #[must_use]
    pub fn helper_status(err: &HelperError) -> StatusCode {
        match err {
            HelperError::Unauthorized => StatusCode::UNAUTHORIZED,
            HelperError::Status { status, .. } => StatusCode::from_u16(*status)
                .ok()
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            HelperError::Http(_) | HelperError::Parse(_) | HelperError::MissingData(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_auth_failure() {
            let mut response = StatusCode::UNAUTHORIZED.into_response();
            response.extensions_mut().insert(AuthFailure);
            return response;
        }

        // Log server errors with Sentry
        if matches!(self, Self::Session(_) | Self::Internal(_) | Self::Helper(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }

        let status = match &self {
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Helper(e) => Self::helper_status(e),
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Session(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Helper(e) => e.user_message(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for admin handlers.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        let response = AppError::NotFound("flag".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_validation_status() {
        let response = AppError::Validation("note required".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_internal_error_hides_details() {
        let response = AppError::Internal("pool exhausted".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_backend_401_is_marked_as_auth_failure() {
        let response = AppError::from(HelperError::Unauthorized).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.extensions().get::<AuthFailure>().is_some());
    }

    #[test]
    fn test_other_errors_are_not_auth_failures() {
        let response = AppError::BadRequest("bad".to_string()).into_response();
        assert!(response.extensions().get::<AuthFailure>().is_none());
    }

    #[test]
    fn test_helper_status_mapping() {
        let conflict = HelperError::Status {
            status: 409,
            message: "already reviewed".to_string(),
        };
        assert_eq!(AppError::helper_status(&conflict), StatusCode::CONFLICT);

        let odd = HelperError::Status {
            status: 302,
            message: "Found".to_string(),
        };
        assert_eq!(AppError::helper_status(&odd), StatusCode::BAD_GATEWAY);

        let missing = HelperError::MissingData("/x".to_string());
        assert_eq!(AppError::helper_status(&missing), StatusCode::BAD_GATEWAY);
    }
}
