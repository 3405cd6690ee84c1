/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (401 は challenge header のみ、それ以外は JSON error body)
 * - AuthError / RepoError を統一的に変換
 */
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::auth::{AuthError, credentials::BASIC_SCHEME};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized")]
    Unauthorized,
    #[error(transparent)]
    Authentication(#[from] AuthError),
    #[error("service unavailable")]
    Unavailable,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            // Same response for every client-side reason (absent, malformed, wrong password).
            AppError::Unauthorized => {
                return (
                    StatusCode::UNAUTHORIZED,
                    [(header::WWW_AUTHENTICATE, HeaderValue::from_static(BASIC_SCHEME))],
                )
                    .into_response();
            }
            AppError::Authentication(AuthError::Enrichment { .. }) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CLAIMS_ENRICHMENT_FAILED",
            ),
            AppError::Authentication(AuthError::UserLookup { .. }) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "USER_LOOKUP_FAILED")
            }
            AppError::Unavailable => (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE"),
        };

        // Causes go to the log, not to the client.
        let body = ErrorResponse {
            error: ErrorBody {
                code,
                message: status
                    .canonical_reason()
                    .unwrap_or("error")
                    .to_ascii_lowercase(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Db(_) => AppError::Unavailable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::ValidatorError;

    #[test]
    fn unauthorized_is_a_bare_challenge() {
        let response = AppError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Basic");
        assert!(response.headers().get(header::CONTENT_TYPE).is_none());
    }

    #[test]
    fn auth_errors_are_server_errors() {
        let err = AppError::from(AuthError::UserLookup {
            username: "alice".into(),
            source: ValidatorError::UserNotFound("alice".into()),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
    }
}
