/*
 * Responsibility
 * - 認証済み主体 (identity / roles / claims) の型
 * - middleware が組み立てて request extensions に格納し、handler はこの型だけを見る
 */
use std::collections::BTreeSet;

use serde::Serialize;

use super::credentials::BASIC_SCHEME;

/// Well-known claim kinds. Enrichers may use any other string.
pub mod claim_types {
    pub const SUBJECT_ID: &str = "subject-id";
    pub const EMAIL: &str = "email";
    pub const NAME: &str = "name";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Claim {
    #[serde(rename = "type")]
    pub claim_type: String,
    pub value: String,
}

impl Claim {
    pub fn new(claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            claim_type: claim_type.into(),
            value: value.into(),
        }
    }
}

/// User record handed back by the credential store for a validated username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub username: String,
    pub email: String,
}

/// Identity attached to a request after a successful `Basic` login.
///
/// Built fresh for every request and owned by that request's extensions.
/// `subject-id` and `email` are always the first two claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    name: String,
    roles: BTreeSet<String>,
    claims: Vec<Claim>,
}

impl AuthenticatedIdentity {
    pub fn new(user: &AuthenticatedUser, roles: impl IntoIterator<Item = String>) -> Self {
        Self {
            name: user.username.clone(),
            roles: roles.into_iter().collect(),
            claims: vec![
                Claim::new(claim_types::SUBJECT_ID, user.user_id.clone()),
                Claim::new(claim_types::EMAIL, user.email.clone()),
            ],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scheme(&self) -> &'static str {
        BASIC_SCHEME
    }

    pub fn roles(&self) -> &BTreeSet<String> {
        &self.roles
    }

    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    pub fn is_in_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// First claim of the given kind.
    pub fn find_claim(&self, claim_type: &str) -> Option<&str> {
        self.claims
            .iter()
            .find(|c| c.claim_type == claim_type)
            .map(|c| c.value.as_str())
    }

    pub fn add_claims(&mut self, claims: impl IntoIterator<Item = Claim>) {
        self.claims.extend(claims);
    }
}
