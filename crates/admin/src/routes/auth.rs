//! Authentication route handlers for admin.
//!
//! Email and password are checked by the Helper API; only accounts with the
//! `ADMIN` role may sign in here. The returned bearer token is kept in the
//! server-side session and mirrored into the token cookie.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;

use helper_admin_core::{LoginRequest, LoginResponse, UserRole};

use crate::error::Result;
use crate::helper::{Credentials, HelperError};
use crate::middleware::TokenStore;
use crate::middleware::route_guard::{LOGIN_PATH, LOGOUT_PATH, is_local_path};
use crate::models::AdminSession;
use crate::state::AppState;

/// Helper API login endpoint.
pub const LOGIN_ENDPOINT: &str = "/api/v1/auth/login";

/// Shown when a non-admin account signs in successfully.
pub const ACCESS_DENIED: &str = "Access denied. This panel is for administrators only.";

/// Shown when the backend gives no better reason.
pub const LOGIN_FAILED: &str = "Login failed. Please check your credentials.";

// =============================================================================
// Form Types
// =============================================================================

/// Login form data. Not `Debug`: it carries the password.
#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub from: Option<String>,
}

/// Query parameters of the login page.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub from: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub email: String,
    pub from: String,
    pub error: Option<String>,
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(LOGIN_PATH, get(login_page).post(login))
        .route(LOGOUT_PATH, post(logout))
}

/// Where to go after signing in: `from` when it is a path on this site
/// other than the sign-out endpoint.
fn return_target(from: Option<&str>) -> &str {
    from.filter(|target| is_local_path(target))
        .filter(|target| target.split(['?', '#']).next() != Some(LOGOUT_PATH))
        .unwrap_or("/")
}

/// Render the login page.
///
/// GET /login
pub async fn login_page(Query(query): Query<LoginQuery>) -> impl IntoResponse {
    LoginTemplate {
        email: String::new(),
        from: return_target(query.from.as_deref()).to_string(),
        error: None,
    }
}

/// Handle login form submission.
///
/// POST /login
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    store: TokenStore,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let from = return_target(form.from.as_deref()).to_string();
    let request = LoginRequest {
        email: form.email.trim().to_string(),
        password: form.password,
    };

    let retry = |status: StatusCode, error: &str| {
        (
            status,
            LoginTemplate {
                email: request.email.clone(),
                from: from.clone(),
                error: Some(error.to_string()),
            },
        )
            .into_response()
    };

    let login: LoginResponse = match state
        .client()
        .post(&Credentials::anonymous(), LOGIN_ENDPOINT, &request)
        .await
    {
        Ok(login) => login,
        Err(e) => {
            tracing::warn!(error = %e, "Login failed");
            let (status, message) = match &e {
                HelperError::Unauthorized => (StatusCode::UNAUTHORIZED, LOGIN_FAILED.to_string()),
                HelperError::Status { status, message } if !message.is_empty() => (
                    StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
                    message.clone(),
                ),
                _ => (StatusCode::BAD_GATEWAY, LOGIN_FAILED.to_string()),
            };
            return Ok(retry(status, &message));
        }
    };

    if login.user.role != UserRole::Admin {
        tracing::warn!(role = %login.user.role, "Non-admin account tried to sign in");
        return Ok(retry(StatusCode::FORBIDDEN, ACCESS_DENIED));
    }

    let session = AdminSession::from_login(&login, Utc::now());
    let jar = store.save(jar, &session).await?;

    tracing::info!(admin_id = %session.admin.id, "Admin signed in");
    Ok((jar, Redirect::to(&from)).into_response())
}

/// Logout and clear session.
///
/// POST /logout
#[instrument(skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    store: TokenStore,
    jar: CookieJar,
) -> Result<impl IntoResponse> {
    if let Some(session) = store.get().await? {
        state.cache().purge_scope(session.credentials().scope());
    }
    let jar = store.clear(jar).await?;
    Ok((jar, Redirect::to(LOGIN_PATH)))
}
