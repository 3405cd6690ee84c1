//! Default credential store: users and roles in Postgres.
//!
//! Kept outside the authenticator; anything implementing `CredentialValidator`
//! can replace it.
use async_trait::async_trait;
use sqlx::PgPool;

use crate::repos::{error::RepoError, user_repo};
use crate::services::auth::{AuthenticatedUser, CredentialValidator, ValidatorError};

#[derive(Clone, Debug)]
pub struct PgMembership {
    db: PgPool,
}

impl PgMembership {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

impl From<RepoError> for ValidatorError {
    fn from(e: RepoError) -> Self {
        ValidatorError::Backend(e.to_string())
    }
}

#[async_trait]
impl CredentialValidator for PgMembership {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn validate_user(&self, username: &str, password: &str) -> Result<bool, ValidatorError> {
        Ok(user_repo::verify_password(&self.db, username, password).await?)
    }

    async fn roles_for_user(&self, username: &str) -> Result<Vec<String>, ValidatorError> {
        Ok(user_repo::roles_for(&self.db, username).await?)
    }

    async fn get_user(&self, username: &str) -> Result<AuthenticatedUser, ValidatorError> {
        let row = user_repo::get_by_user_name(&self.db, username)
            .await?
            .ok_or_else(|| ValidatorError::UserNotFound(username.to_string()))?;

        Ok(AuthenticatedUser {
            user_id: row.id.to_string(),
            username: row.user_name,
            email: row.email,
        })
    }
}
