//! `Authorization: Basic <base64(username:password)>` parsing (RFC 7617).
//!
//! This module knows nothing about axum middleware or the credential store:
//! it only turns a header value into `Credentials` or tells the caller why it can't.

use std::fmt;

use axum::http::HeaderValue;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

/// Scheme token. Compared case-sensitively.
pub const BASIC_SCHEME: &str = "Basic";

/// Only the first occurrence splits username from password.
pub const CREDENTIALS_SEPARATOR: char = ':';

/// Username/password pair decoded from a single request.
///
/// Never stored; the authenticator drops it right after the validator call.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Why a `Basic` parameter could not be turned into credentials.
///
/// These are client errors. The response is the same as for a wrong password,
/// but they are logged separately from a clean rejection.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialsError {
    #[error("credentials are not valid base64")]
    InvalidBase64,
    #[error("decoded credentials are not valid UTF-8")]
    InvalidEncoding,
    #[error("decoded credentials are not in `username:password` form")]
    Malformed,
}

/// What the `Authorization` header says before anything is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationHeader<'a> {
    /// No header, or a header that is not visible ASCII.
    Missing,
    /// Some other scheme (`Bearer ...`, `basic ...`, ...).
    UnsupportedScheme,
    /// `Basic` scheme; holds the raw parameter.
    Basic(&'a str),
}

pub fn classify(value: Option<&HeaderValue>) -> AuthorizationHeader<'_> {
    let Some(raw) = value.and_then(|v| v.to_str().ok()) else {
        return AuthorizationHeader::Missing;
    };

    let (scheme, parameter) = raw.split_once(' ').unwrap_or((raw, ""));
    if scheme != BASIC_SCHEME {
        return AuthorizationHeader::UnsupportedScheme;
    }

    AuthorizationHeader::Basic(parameter.trim())
}

/// Decode a `Basic` parameter into credentials.
///
/// Both parts are trimmed and must be non-empty afterwards. Passwords may contain `:`.
pub fn decode(parameter: &str) -> Result<Credentials, CredentialsError> {
    let bytes = STANDARD
        .decode(parameter)
        .map_err(|_| CredentialsError::InvalidBase64)?;
    let text = String::from_utf8(bytes).map_err(|_| CredentialsError::InvalidEncoding)?;

    let (username, password) = text
        .split_once(CREDENTIALS_SEPARATOR)
        .ok_or(CredentialsError::Malformed)?;
    let (username, password) = (username.trim(), password.trim());

    if username.is_empty() || password.is_empty() {
        return Err(CredentialsError::Malformed);
    }

    Ok(Credentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}
