use std::convert::Infallible;

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::auth::AuthenticatedIdentity;

/// Handler で認証済み identity を受け取るための extractor
/// middleware が identity を request.extensions() に insert 済みである前提
/// 見つからない場合は 401 + `WWW-Authenticate: Basic`
#[derive(Debug, Clone)]
pub struct CurrentPrincipal(pub AuthenticatedIdentity);

impl<S> FromRequestParts<S> for CurrentPrincipal
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedIdentity>()
            .cloned()
            .map(CurrentPrincipal)
            .ok_or(AppError::Unauthorized)
    }
}

impl<S> OptionalFromRequestParts<S> for CurrentPrincipal
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<AuthenticatedIdentity>()
            .cloned()
            .map(CurrentPrincipal))
    }
}
