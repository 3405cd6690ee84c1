#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Router-level tests for the Basic auth stage.
//!
//! The stage is mounted in front of the real `/me` handler plus a counting
//! handler, with an in-memory credential store.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    response::Response,
    routing::get,
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};
use tower::ServiceExt;

use basic_auth_api::api::v1::extractors::CurrentPrincipal;
use basic_auth_api::api::v1::handlers::me::me;
use basic_auth_api::middleware::basic_auth::{self, BasicAuth};
use basic_auth_api::services::auth::{
    AuthenticatedUser, BoxError, Claim, CredentialValidator, ValidatorError,
};

struct Account {
    password: &'static str,
    user: AuthenticatedUser,
    roles: Vec<String>,
}

#[derive(Default)]
struct InMemoryMembership {
    accounts: HashMap<&'static str, Account>,
    validations: AtomicUsize,
    // Accept the password but forget the user afterwards.
    forget_after_validation: bool,
    // Accept the password but fail to load roles.
    roles_unavailable: bool,
}

impl InMemoryMembership {
    fn with_fixtures() -> Self {
        let mut accounts = HashMap::new();
        accounts.insert(
            "alice",
            Account {
                password: "secret",
                user: AuthenticatedUser {
                    user_id: "8d7c7a52-5b3e-4a6e-9c55-2f0e6c1b1a01".into(),
                    username: "alice".into(),
                    email: "alice@example.com".into(),
                },
                roles: vec!["admin".into(), "reader".into()],
            },
        );
        accounts.insert(
            "carol",
            Account {
                password: "sec:ret",
                user: AuthenticatedUser {
                    user_id: "c-3".into(),
                    username: "carol".into(),
                    email: "carol@example.com".into(),
                },
                roles: vec![],
            },
        );
        Self {
            accounts,
            ..Default::default()
        }
    }
}

#[async_trait]
impl CredentialValidator for InMemoryMembership {
    fn backend_name(&self) -> &'static str {
        "in-memory"
    }

    async fn validate_user(&self, username: &str, password: &str) -> Result<bool, ValidatorError> {
        self.validations.fetch_add(1, Ordering::SeqCst);
        if username == "outage" {
            return Err(ValidatorError::Backend("connection reset".into()));
        }
        Ok(self
            .accounts
            .get(username)
            .is_some_and(|a| a.password == password))
    }

    async fn roles_for_user(&self, username: &str) -> Result<Vec<String>, ValidatorError> {
        if self.roles_unavailable {
            return Err(ValidatorError::Backend("roles query timed out".into()));
        }
        Ok(self
            .accounts
            .get(username)
            .map(|a| a.roles.clone())
            .unwrap_or_default())
    }

    async fn get_user(&self, username: &str) -> Result<AuthenticatedUser, ValidatorError> {
        if self.forget_after_validation {
            return Err(ValidatorError::UserNotFound(username.to_string()));
        }
        self.accounts
            .get(username)
            .map(|a| a.user.clone())
            .ok_or_else(|| ValidatorError::UserNotFound(username.to_string()))
    }
}

/// `/me` echoes the principal, `/hits` counts how often the downstream ran.
fn router(auth: BasicAuth, hits: Arc<AtomicUsize>) -> Router {
    let protected = Router::new().route("/me", get(me)).route(
        "/hits",
        get(move || {
            let hits = hits.clone();
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                "ok"
            }
        }),
    );

    basic_auth::apply(protected, auth)
}

fn auth(challenge: bool) -> BasicAuth {
    BasicAuth::new(Arc::new(InMemoryMembership::with_fixtures())).issue_challenge_response(challenge)
}

fn basic(raw: &str) -> String {
    format!("Basic {}", STANDARD.encode(raw))
}

async fn send(router: &Router, uri: &str, authorization: Option<&str>) -> Response {
    let mut builder = Request::builder().uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    router
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .expect("request failed")
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn assert_challenge(response: Response) {
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Basic");
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn no_header_passes_through_unauthenticated() {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = router(auth(false), hits.clone());

    let response = send(&app, "/me", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({"authenticated": false}));

    let response = send(&app, "/hits", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn no_header_is_challenged_when_enabled() {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = router(auth(true), hits.clone());

    assert_challenge(send(&app, "/hits", None).await).await;
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn other_schemes_behave_like_no_header() {
    for challenge in [false, true] {
        let app = router(auth(challenge), Arc::new(AtomicUsize::new(0)));

        let without = send(&app, "/me", None).await;
        let bearer = send(&app, "/me", Some("Bearer xyz")).await;
        let lowercase = send(&app, "/me", Some(&basic("alice:secret").to_lowercase())).await;

        assert_eq!(without.status(), bearer.status());
        assert_eq!(without.status(), lowercase.status());
        if challenge {
            assert_challenge(bearer).await;
        } else {
            assert_eq!(json_body(bearer).await, json!({"authenticated": false}));
        }
    }
}

#[tokio::test]
async fn valid_credentials_install_identity() {
    let app = router(auth(true), Arc::new(AtomicUsize::new(0)));

    let response = send(&app, "/me", Some(&basic("alice:secret"))).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({
            "authenticated": true,
            "name": "alice",
            "scheme": "Basic",
            "roles": ["admin", "reader"],
            "claims": [
                {"type": "subject-id", "value": "8d7c7a52-5b3e-4a6e-9c55-2f0e6c1b1a01"},
                {"type": "email", "value": "alice@example.com"},
            ],
        })
    );
}

#[tokio::test]
async fn password_may_contain_separator() {
    let app = router(auth(true), Arc::new(AtomicUsize::new(0)));

    let response = send(&app, "/me", Some(&basic("carol:sec:ret"))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["name"], "carol");
}

#[tokio::test]
async fn malformed_base64_is_treated_as_invalid_credentials() {
    let membership = Arc::new(InMemoryMembership::with_fixtures());

    let app = router(
        BasicAuth::new(membership.clone()).issue_challenge_response(true),
        Arc::new(AtomicUsize::new(0)),
    );
    assert_challenge(send(&app, "/me", Some("Basic !!not-base64!!")).await).await;

    let app = router(BasicAuth::new(membership.clone()), Arc::new(AtomicUsize::new(0)));
    let response = send(&app, "/me", Some("Basic !!not-base64!!")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({"authenticated": false}));

    // Never reached the credential store.
    assert_eq!(membership.validations.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn wrong_password_matches_no_header_under_both_policies() {
    for challenge in [false, true] {
        let app = router(auth(challenge), Arc::new(AtomicUsize::new(0)));

        let without = send(&app, "/me", None).await;
        let wrong = send(&app, "/me", Some(&basic("bob:wrongpass"))).await;

        assert_eq!(without.status(), wrong.status());
        assert_eq!(
            without.headers().get(header::WWW_AUTHENTICATE),
            wrong.headers().get(header::WWW_AUTHENTICATE)
        );
        let without = to_bytes(without.into_body(), usize::MAX).await.unwrap();
        let wrong = to_bytes(wrong.into_body(), usize::MAX).await.unwrap();
        assert_eq!(without, wrong);
    }
}

#[tokio::test]
async fn credential_store_failure_is_a_failed_login() {
    let app = router(auth(true), Arc::new(AtomicUsize::new(0)));

    assert_challenge(send(&app, "/me", Some(&basic("outage:whatever"))).await).await;
}

#[tokio::test]
async fn enrichment_claims_are_appended() {
    let enricher = |user: &AuthenticatedUser| -> Result<Vec<Claim>, BoxError> {
        Ok(vec![Claim::new("tenant", format!("{}-tenant", user.username))])
    };
    let auth = auth(false).with_claims_enricher(Arc::new(enricher));
    let app = router(auth, Arc::new(AtomicUsize::new(0)));

    let body = json_body(send(&app, "/me", Some(&basic("alice:secret"))).await).await;

    assert_eq!(body["claims"][2], json!({"type": "tenant", "value": "alice-tenant"}));
}

#[tokio::test]
async fn enrichment_failure_is_a_server_error() {
    let hits = Arc::new(AtomicUsize::new(0));
    let enricher = |_: &AuthenticatedUser| -> Result<Vec<Claim>, BoxError> {
        Err("directory unavailable".into())
    };
    let auth = auth(true).with_claims_enricher(Arc::new(enricher));
    let app = router(auth, hits.clone());

    let response = send(&app, "/hits", Some(&basic("alice:secret"))).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
    assert_eq!(
        json_body(response).await["error"]["code"],
        "CLAIMS_ENRICHMENT_FAILED"
    );
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn lookup_failure_after_validation_is_a_server_error() {
    let membership = InMemoryMembership {
        forget_after_validation: true,
        ..InMemoryMembership::with_fixtures()
    };
    let app = router(BasicAuth::new(Arc::new(membership)), Arc::new(AtomicUsize::new(0)));

    let response = send(&app, "/me", Some(&basic("alice:secret"))).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await["error"]["code"], "USER_LOOKUP_FAILED");
}

#[tokio::test]
async fn role_lookup_failure_after_validation_is_a_server_error() {
    let hits = Arc::new(AtomicUsize::new(0));
    let membership = InMemoryMembership {
        roles_unavailable: true,
        ..InMemoryMembership::with_fixtures()
    };
    let app = router(BasicAuth::new(Arc::new(membership)), hits.clone());

    let response = send(&app, "/hits", Some(&basic("alice:secret"))).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
    assert_eq!(json_body(response).await["error"]["code"], "USER_LOOKUP_FAILED");
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn required_principal_is_challenged_in_pass_through_mode() {
    async fn strict(CurrentPrincipal(identity): CurrentPrincipal) -> String {
        identity.name().to_string()
    }

    let app = basic_auth::apply(Router::new().route("/strict", get(strict)), auth(false));

    for authorization in [None, Some("Basic"), Some("Basic    "), Some("Bearer xyz")] {
        let response = send(&app, "/strict", authorization).await;
        assert_challenge(response).await;
    }

    let wrong = basic("bob:wrongpass");
    assert_challenge(send(&app, "/strict", Some(&wrong)).await).await;

    let response = send(&app, "/strict", Some(&basic("alice:secret"))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"alice");
}

#[tokio::test]
async fn same_request_twice_yields_same_identity() {
    let membership = Arc::new(InMemoryMembership::with_fixtures());
    let app = router(BasicAuth::new(membership.clone()), Arc::new(AtomicUsize::new(0)));

    let first = json_body(send(&app, "/me", Some(&basic("alice:secret"))).await).await;
    let second = json_body(send(&app, "/me", Some(&basic("alice:secret"))).await).await;

    assert_eq!(first, second);
    assert_eq!(first["claims"].as_array().unwrap().len(), 2);
    assert_eq!(membership.validations.load(Ordering::SeqCst), 2);
}
