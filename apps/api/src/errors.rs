use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::draft::lifecycle::SubmitError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Login required")]
    LoginRequired,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Already submitted: {0}")]
    AlreadySubmitted(String),

    #[error("Upstream error: {0}")]
    Upstream(String),
}

impl From<SubmitError> for AppError {
    fn from(err: SubmitError) -> Self {
        match err {
            e @ SubmitError::InFlight => AppError::Conflict(e.to_string()),
            e @ SubmitError::AlreadySubmitted => AppError::AlreadySubmitted(e.to_string()),
            SubmitError::Transport(e) => AppError::Upstream(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::LoginRequired => (
                StatusCode::UNAUTHORIZED,
                "LOGIN_REQUIRED",
                "Log in to save this resume".to_string(),
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "SUBMISSION_IN_FLIGHT", msg.clone()),
            AppError::AlreadySubmitted(msg) => {
                (StatusCode::CONFLICT, "ALREADY_SUBMITTED", msg.clone())
            }
            AppError::Upstream(msg) => {
                tracing::error!("Upstream error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    "The resume could not be saved; your draft is kept".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume_client::TransportError;

    #[test]
    fn test_submit_errors_map_to_status() {
        let conflict = AppError::from(SubmitError::InFlight).into_response();
        assert_eq!(conflict.status(), StatusCode::CONFLICT);

        let resubmit = AppError::from(SubmitError::AlreadySubmitted);
        assert!(matches!(resubmit, AppError::AlreadySubmitted(_)));
        assert_eq!(resubmit.into_response().status(), StatusCode::CONFLICT);

        let upstream = AppError::from(SubmitError::Transport(TransportError::Api {
            status: 500,
            message: "boom".into(),
        }))
        .into_response();
        assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_login_required_is_unauthorized() {
        assert_eq!(
            AppError::LoginRequired.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
