//! Credential store interface consumed by the Basic authenticator.
use async_trait::async_trait;
use thiserror::Error;

use super::identity::AuthenticatedUser;

/// Credential-store errors.
///
/// Note:
/// - A wrong password is NOT an error; `validate_user` returns `Ok(false)`.
#[derive(Debug, Error)]
pub enum ValidatorError {
    #[error("user {0} not found")]
    UserNotFound(String),
    #[error("credential store error: {0}")]
    Backend(String),
}

/// Answers "is this username/password valid?" and supplies roles and profile data.
///
/// The authenticator calls `validate_user` exactly once per request and only asks
/// for roles/profile after it returned `Ok(true)`.
/// Implementations must be safe to share across concurrent requests.
#[async_trait]
pub trait CredentialValidator: Send + Sync + 'static {
    // Backend name (for logging).
    fn backend_name(&self) -> &'static str;

    async fn validate_user(&self, username: &str, password: &str) -> Result<bool, ValidatorError>;

    async fn roles_for_user(&self, username: &str) -> Result<Vec<String>, ValidatorError>;

    // Returns `ValidatorError::UserNotFound` for an unknown username.
    async fn get_user(&self, username: &str) -> Result<AuthenticatedUser, ValidatorError>;
}
