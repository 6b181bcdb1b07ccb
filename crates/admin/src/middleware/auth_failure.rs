//! Sign-out when the backend rejects the session token.
//!
//! Handlers turn a backend 401 into [`AppError::Unauthorized`], whose
//! response carries the [`AuthFailure`] marker. This middleware is the one
//! place that reacts to it: the session is cleared, the session's cached
//! reads are purged, the token cookie is expired and the browser is sent to
//! the login page. A request produces at most one such redirect.
//!
//! [`AppError::Unauthorized`]: crate::error::AppError::Unauthorized

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tower_sessions::Session;

use super::route_guard::LOGIN_PATH;
use super::token_store::{TokenStore, expired_token_cookie};
use crate::error::AuthFailure;
use crate::state::AppState;

/// Replace auth-failure responses with a sign-out redirect.
pub async fn auth_failure_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let session = request.extensions().get::<Session>().cloned();
    let response = next.run(request).await;

    if response.extensions().get::<AuthFailure>().is_none() {
        return response;
    }

    let jar = match session {
        Some(session) => sign_out(&state, TokenStore::new(session, state.config().is_secure())).await,
        None => CookieJar::new().add(expired_token_cookie()),
    };

    tracing::info!("Helper API rejected the session, signing out");
    (jar, Redirect::to(LOGIN_PATH)).into_response()
}

async fn sign_out(state: &AppState, store: TokenStore) -> CookieJar {
    match store.get().await {
        Ok(Some(admin)) => state.cache().purge_scope(admin.credentials().scope()),
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "Could not read session during sign-out"),
    }

    store.clear(CookieJar::new()).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to clear session during sign-out");
        CookieJar::new().add(expired_token_cookie())
    })
}
