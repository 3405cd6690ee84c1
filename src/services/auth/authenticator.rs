//! Basic authentication decision: header → credentials → validator → identity.
//!
//! Framework-agnostic. The axum middleware (`middleware::basic_auth`) turns the
//! outcome into "forward", "forward with identity" or "401 challenge".

use std::sync::Arc;

use axum::http::HeaderValue;
use thiserror::Error;

use super::credentials::{self, AuthorizationHeader, Credentials, CredentialsError};
use super::enricher::{BoxError, ClaimsEnricher};
use super::identity::AuthenticatedIdentity;
use super::validator::{CredentialValidator, ValidatorError};

/// Failures after the password was already accepted.
///
/// These are server-side errors and must never become a 401.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("error getting additional claims from caller")]
    Enrichment {
        #[source]
        source: BoxError,
    },
    #[error("failed to load user {username} after successful validation")]
    UserLookup {
        username: String,
        #[source]
        source: ValidatorError,
    },
}

/// Why a request ends up on the "no credentials" path.
///
/// The client sees the same response for every variant.
#[derive(Debug)]
pub enum RejectReason {
    NoCredentials,
    UnsupportedScheme,
    Malformed(CredentialsError),
    InvalidCredentials { username: String },
    ProviderFailure { username: String, source: ValidatorError },
}

impl RejectReason {
    // Stable label for log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::NoCredentials => "no_credentials",
            RejectReason::UnsupportedScheme => "unsupported_scheme",
            RejectReason::Malformed(_) => "malformed",
            RejectReason::InvalidCredentials { .. } => "invalid_credentials",
            RejectReason::ProviderFailure { .. } => "provider_failure",
        }
    }
}

#[derive(Debug)]
pub enum AuthOutcome {
    Authenticated(AuthenticatedIdentity),
    Rejected(RejectReason),
}

/// Stateless; cheap to clone.
#[derive(Clone)]
pub struct BasicAuthenticator {
    validator: Arc<dyn CredentialValidator>,
    enricher: Option<Arc<dyn ClaimsEnricher>>,
}

impl BasicAuthenticator {
    pub fn new(validator: Arc<dyn CredentialValidator>) -> Self {
        Self {
            validator,
            enricher: None,
        }
    }

    pub fn with_claims_enricher(mut self, enricher: Arc<dyn ClaimsEnricher>) -> Self {
        self.enricher = Some(enricher);
        self
    }

    pub fn backend_name(&self) -> &'static str {
        self.validator.backend_name()
    }

    /// Decide on the value of the `Authorization` header.
    ///
    /// Returns:
    /// - `Ok(Authenticated(_))` after the validator accepted the credentials
    /// - `Ok(Rejected(_))` for missing, foreign, malformed or wrong credentials
    /// - `Err(_)` if building the identity failed after a successful validation
    pub async fn authenticate(
        &self,
        header: Option<&HeaderValue>,
    ) -> Result<AuthOutcome, AuthError> {
        let parameter = match credentials::classify(header) {
            AuthorizationHeader::Missing => {
                return Ok(AuthOutcome::Rejected(RejectReason::NoCredentials));
            }
            AuthorizationHeader::UnsupportedScheme => {
                return Ok(AuthOutcome::Rejected(RejectReason::UnsupportedScheme));
            }
            AuthorizationHeader::Basic(parameter) => parameter,
        };

        let Credentials { username, password } = match credentials::decode(parameter) {
            Ok(credentials) => credentials,
            Err(err) => return Ok(AuthOutcome::Rejected(RejectReason::Malformed(err))),
        };

        let valid = self.validator.validate_user(&username, &password).await;
        drop(password);

        match valid {
            Ok(true) => {}
            Ok(false) => {
                return Ok(AuthOutcome::Rejected(RejectReason::InvalidCredentials {
                    username,
                }));
            }
            Err(source) => {
                return Ok(AuthOutcome::Rejected(RejectReason::ProviderFailure {
                    username,
                    source,
                }));
            }
        }

        self.build_identity(&username)
            .await
            .map(AuthOutcome::Authenticated)
    }

    async fn build_identity(&self, username: &str) -> Result<AuthenticatedIdentity, AuthError> {
        let lookup_failed = |source| AuthError::UserLookup {
            username: username.to_string(),
            source,
        };

        let roles = self
            .validator
            .roles_for_user(username)
            .await
            .map_err(lookup_failed)?;
        let user = self
            .validator
            .get_user(username)
            .await
            .map_err(lookup_failed)?;

        let mut identity = AuthenticatedIdentity::new(&user, roles);

        if let Some(enricher) = &self.enricher {
            let claims = enricher
                .enrich(&user)
                .await
                .map_err(|source| AuthError::Enrichment { source })?;
            identity.add_claims(claims);
        }

        Ok(identity)
    }
}
