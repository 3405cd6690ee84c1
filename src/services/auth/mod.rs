pub mod authenticator;
pub mod credentials;
pub mod enricher;
pub mod identity;
pub mod validator;

pub use authenticator::{AuthError, AuthOutcome, BasicAuthenticator, RejectReason};
pub use enricher::{BoxError, ClaimsEnricher};
pub use identity::{AuthenticatedIdentity, AuthenticatedUser, Claim, claim_types};
pub use validator::{CredentialValidator, ValidatorError};
