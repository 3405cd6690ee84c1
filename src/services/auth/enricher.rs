//! Optional hook producing extra claims for an already-validated user.
use async_trait::async_trait;

use super::identity::{AuthenticatedUser, Claim};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Runs only after the password check succeeded.
/// A returned error aborts the request with a server error, never a 401.
#[async_trait]
pub trait ClaimsEnricher: Send + Sync + 'static {
    async fn enrich(&self, user: &AuthenticatedUser) -> Result<Vec<Claim>, BoxError>;
}

/// Plain functions and closures work as enrichers.
#[async_trait]
impl<F> ClaimsEnricher for F
where
    F: Fn(&AuthenticatedUser) -> Result<Vec<Claim>, BoxError> + Send + Sync + 'static,
{
    async fn enrich(&self, user: &AuthenticatedUser) -> Result<Vec<Claim>, BoxError> {
        self(user)
    }
}
