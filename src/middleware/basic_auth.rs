//! HTTP Basic authentication → `AuthenticatedIdentity` を extensions に入れる
//!
//! One stage for both policies:
//! - `issue_challenge_response = false` (default): missing/invalid credentials are
//!   forwarded without an identity, handlers decide what to do.
//! - `issue_challenge_response = true`: missing/invalid credentials get
//!   `401` + `WWW-Authenticate: Basic` and never reach the handler.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::config::BasicAuthConfig;
use crate::error::AppError;
use crate::services::auth::{
    AuthError, AuthOutcome, BasicAuthenticator, ClaimsEnricher, CredentialValidator, RejectReason,
};

/// Middleware state. Holds no per-request data; clone freely.
#[derive(Clone)]
pub struct BasicAuth {
    authenticator: BasicAuthenticator,
    issue_challenge_response: bool,
}

impl BasicAuth {
    pub fn new(validator: Arc<dyn CredentialValidator>) -> Self {
        Self {
            authenticator: BasicAuthenticator::new(validator),
            issue_challenge_response: false,
        }
    }

    pub fn from_config(validator: Arc<dyn CredentialValidator>, config: &BasicAuthConfig) -> Self {
        Self::new(validator).issue_challenge_response(config.issue_challenge_response)
    }

    pub fn issue_challenge_response(mut self, enabled: bool) -> Self {
        self.issue_challenge_response = enabled;
        self
    }

    pub fn with_claims_enricher(mut self, enricher: Arc<dyn ClaimsEnricher>) -> Self {
        self.authenticator = self.authenticator.with_claims_enricher(enricher);
        self
    }
}

/// Put Basic authentication in front of every route of `router`.
///
/// 例：
/// ```ignore
/// let auth = BasicAuth::new(Arc::new(PgMembership::new(db))).issue_challenge_response(true);
/// let v1 = middleware::basic_auth::apply(v1, auth);
/// ```
pub fn apply<S>(router: Router<S>, auth: BasicAuth) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(middleware::from_fn_with_state(auth, basic_auth_middleware))
}

async fn basic_auth_middleware(
    State(auth): State<BasicAuth>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let authorization = req.headers().get(header::AUTHORIZATION).cloned();

    let outcome = auth
        .authenticator
        .authenticate(authorization.as_ref())
        .await
        .map_err(|err| {
            log_server_failure(&err, auth.authenticator.backend_name());
            AppError::from(err)
        })?;

    match outcome {
        AuthOutcome::Authenticated(identity) => {
            tracing::debug!(
                user = identity.name(),
                roles = identity.roles().len(),
                "basic authentication succeeded"
            );
            // middleware → extractor への受け渡し
            req.extensions_mut().insert(identity);
            Ok(next.run(req).await)
        }
        AuthOutcome::Rejected(reason) => {
            log_rejection(&reason, auth.authenticator.backend_name());
            if auth.issue_challenge_response {
                Err(AppError::Unauthorized)
            } else {
                Ok(next.run(req).await)
            }
        }
    }
}

fn log_rejection(reason: &RejectReason, backend: &'static str) {
    let label = reason.as_str();
    match reason {
        RejectReason::NoCredentials | RejectReason::UnsupportedScheme => {
            tracing::debug!(reason = label, "no basic credentials");
        }
        RejectReason::Malformed(err) => {
            tracing::warn!(reason = label, error = %err, "malformed basic credentials");
        }
        RejectReason::InvalidCredentials { username } => {
            tracing::info!(reason = label, user = %username, "basic authentication rejected");
        }
        RejectReason::ProviderFailure { username, source } => {
            tracing::warn!(
                reason = label,
                user = %username,
                backend,
                error = %source,
                "credential validation failed"
            );
        }
    }
}

fn log_server_failure(err: &AuthError, backend: &'static str) {
    match err {
        AuthError::Enrichment { source } => {
            tracing::error!(error = %err, cause = %source, "claims enrichment failed");
        }
        AuthError::UserLookup { username, source } => {
            tracing::error!(
                error = %err,
                user = %username,
                backend,
                cause = %source,
                "user lookup failed after successful validation"
            );
        }
    }
}
