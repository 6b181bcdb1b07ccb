//! The admin's bearer token slot.
//!
//! The token and identity live in the server-side session. The token is
//! mirrored into the `helper_admin_token` cookie, whose presence is what
//! the route guard checks.

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use thiserror::Error;
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::{AdminSession, session_keys};
use crate::state::AppState;

/// Cookie mirroring the session token.
pub const TOKEN_COOKIE_NAME: &str = "helper_admin_token";

/// Cookie lifetime in seconds (15 minutes).
pub const TOKEN_COOKIE_MAX_AGE_SECS: i64 = 15 * 60;

/// Errors from reading or writing the token slot.
#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("Session store error: {0}")]
    Session(#[from] tower_sessions::session::Error),
    #[error("Session layer not installed")]
    MissingSession,
}

/// Handle on one browser session's token slot.
#[derive(Clone)]
pub struct TokenStore {
    session: Session,
    secure: bool,
}

impl TokenStore {
    /// `secure` controls the cookie's `Secure` attribute.
    #[must_use]
    pub const fn new(session: Session, secure: bool) -> Self {
        Self { session, secure }
    }

    /// Store a fresh sign-in and set the token cookie.
    ///
    /// The session ID is cycled first so a pre-login session ID cannot be
    /// reused.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn save(
        &self,
        jar: CookieJar,
        admin: &AdminSession,
    ) -> Result<CookieJar, TokenStoreError> {
        self.session.cycle_id().await?;
        self.session
            .insert(session_keys::ADMIN_SESSION, admin)
            .await?;
        Ok(jar.add(token_cookie(admin.token().expose(), self.secure)))
    }

    /// The stored sign-in, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn get(&self) -> Result<Option<AdminSession>, TokenStoreError> {
        Ok(self.session.get(session_keys::ADMIN_SESSION).await?)
    }

    /// Forget the sign-in and expire the token cookie.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn clear(&self, jar: CookieJar) -> Result<CookieJar, TokenStoreError> {
        self.session.flush().await?;
        Ok(jar.add(expired_token_cookie()))
    }
}

impl FromRequestParts<AppState> for TokenStore {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(TokenStoreError::MissingSession)?;
        Ok(Self::new(session, state.config().is_secure()))
    }
}

/// The token cookie as set at login.
#[must_use]
pub fn token_cookie(token: &str, secure: bool) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE_NAME, token.to_string()))
        .path("/")
        .max_age(time::Duration::seconds(TOKEN_COOKIE_MAX_AGE_SECS))
        .same_site(SameSite::Strict)
        .http_only(true)
        .secure(secure)
        .build()
}

/// A cookie that makes the browser drop the token cookie.
#[must_use]
pub fn expired_token_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build((TOKEN_COOKIE_NAME, ""))
        .path("/")
        .same_site(SameSite::Strict)
        .http_only(true)
        .build();
    cookie.make_removal();
    cookie
}

/// Whether the request carries a non-empty token cookie.
#[must_use]
pub fn has_token_cookie(jar: &CookieJar) -> bool {
    jar.get(TOKEN_COOKIE_NAME)
        .is_some_and(|cookie| !cookie.value().is_empty())
}
