//! Extractors for the signed-in admin.

use axum::{extract::FromRequestParts, http::request::Parts};
use helper_admin_core::AdminIdentity;
use tower_sessions::Session;

use crate::error::AppError;
use crate::helper::Credentials;
use crate::middleware::token_store::TokenStoreError;
use crate::models::{AdminSession, session_keys};

/// The admin behind a request and the credentials to act for them.
///
/// Never rejects a request for lacking a sign-in: with no stored token the
/// backend calls go out anonymously and the backend's 401 signs the browser
/// out.
///
/// ```rust,ignore
/// async fn handler(ctx: AdminContext) -> impl IntoResponse {
///     let stats = queries::stats::users(&state, &ctx.credentials).await;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AdminContext {
    /// Who is signed in, if the session knows.
    pub admin: Option<AdminIdentity>,
    /// Token and cache scope for backend calls.
    pub credentials: Credentials,
}

impl AdminContext {
    /// Email shown in the top bar.
    #[must_use]
    pub fn email(&self) -> &str {
        self.admin.as_ref().map_or("", |a| a.email.as_str())
    }
}

impl From<Option<AdminSession>> for AdminContext {
    fn from(session: Option<AdminSession>) -> Self {
        match session {
            Some(session) => Self {
                credentials: session.credentials(),
                admin: Some(session.admin),
            },
            None => Self {
                admin: None,
                credentials: Credentials::anonymous(),
            },
        }
    }
}

impl<S> FromRequestParts<S> for AdminContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(TokenStoreError::MissingSession)?;

        let stored: Option<AdminSession> = session
            .get(session_keys::ADMIN_SESSION)
            .await
            .map_err(TokenStoreError::from)?;

        Ok(Self::from(stored))
    }
}
