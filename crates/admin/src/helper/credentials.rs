//! Per-request credentials passed explicitly to every backend call.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};

/// An access token issued by `/api/v1/auth/login`.
#[derive(Clone)]
pub struct BearerToken(SecretString);

impl BearerToken {
    /// Wrap a raw token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// The raw token, for the `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken([REDACTED])")
    }
}

/// Identifies whose data a cached response belongs to without keeping the
/// token itself around.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionScope(String);

impl SessionScope {
    const ANONYMOUS: &'static str = "anonymous";

    /// Scope derived from a token: the first 16 hex chars of its SHA-256.
    #[must_use]
    pub fn for_token(token: &BearerToken) -> Self {
        let digest = Sha256::digest(token.expose().as_bytes());
        let mut fingerprint = hex::encode(digest);
        fingerprint.truncate(16);
        Self(fingerprint)
    }

    /// Scope for requests made without a token.
    #[must_use]
    pub fn anonymous() -> Self {
        Self(Self::ANONYMOUS.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The bearer token (if any) and cache scope for one request.
#[derive(Debug, Clone)]
pub struct Credentials {
    token: Option<BearerToken>,
    scope: SessionScope,
}

impl Credentials {
    /// Credentials carrying `token`.
    #[must_use]
    pub fn bearer(token: BearerToken) -> Self {
        let scope = SessionScope::for_token(&token);
        Self {
            token: Some(token),
            scope,
        }
    }

    /// No token. The backend decides whether that is acceptable.
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            token: None,
            scope: SessionScope::anonymous(),
        }
    }

    #[must_use]
    pub const fn token(&self) -> Option<&BearerToken> {
        self.token.as_ref()
    }

    #[must_use]
    pub const fn scope(&self) -> &SessionScope {
        &self.scope
    }
}
