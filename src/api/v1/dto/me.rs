use serde::Serialize;

use crate::services::auth::{AuthenticatedIdentity, Claim};

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub authenticated: bool,
    #[serde(flatten)]
    pub principal: Option<PrincipalResponse>,
}

#[derive(Debug, Serialize)]
pub struct PrincipalResponse {
    pub name: String,
    pub scheme: &'static str,
    pub roles: Vec<String>,
    pub claims: Vec<Claim>,
}

impl MeResponse {
    pub fn anonymous() -> Self {
        Self {
            authenticated: false,
            principal: None,
        }
    }
}

impl From<&AuthenticatedIdentity> for MeResponse {
    fn from(identity: &AuthenticatedIdentity) -> Self {
        Self {
            authenticated: true,
            principal: Some(PrincipalResponse {
                name: identity.name().to_string(),
                scheme: identity.scheme(),
                roles: identity.roles().iter().cloned().collect(),
                claims: identity.claims().to_vec(),
            }),
        }
    }
}
