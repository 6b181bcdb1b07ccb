//! Platform user list and account status changes.

use helper_admin_core::{AccountAction, Page, PlatformUser, UserId, UserRole, VerificationStatus};
use tracing::instrument;

use super::{QueryFamily, QueryKey, read, write};
use crate::helper::{Credentials, HelperError};
use crate::state::AppState;

const USERS_PATH: &str = "/api/v1/admin/users";

/// Rows per page on the users screen.
pub const PAGE_SIZE: u32 = 20;

/// Which slice of the user list to fetch. `None` means "all".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserFilter {
    pub role: Option<UserRole>,
    pub status: Option<VerificationStatus>,
    pub page: u32,
    pub size: u32,
}

impl Default for UserFilter {
    fn default() -> Self {
        Self {
            role: None,
            status: None,
            page: 0,
            size: PAGE_SIZE,
        }
    }
}

impl UserFilter {
    /// Query parameters in the backend's naming. Unset filters are omitted.
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("page", self.page.to_string()),
            ("size", self.size.to_string()),
        ];
        if let Some(role) = self.role {
            query.push(("role", role.as_str().to_string()));
        }
        if let Some(status) = self.status {
            query.push(("verificationStatus", status.as_str().to_string()));
        }
        query
    }
}

/// `GET /api/v1/admin/users`
///
/// # Errors
///
/// Returns the backend error after one retry.
#[instrument(skip(state, creds))]
pub async fn list(
    state: &AppState,
    creds: &Credentials,
    filter: UserFilter,
) -> Result<Page<PlatformUser>, HelperError> {
    read(
        state,
        creds,
        QueryKey::Users(filter),
        USERS_PATH,
        &filter.to_query(),
    )
    .await
}

/// `PUT /api/v1/admin/users/{id}/activate` or `/deactivate`.
///
/// # Errors
///
/// Returns the backend error; the request is never retried.
#[instrument(skip(state, creds, user_id), fields(user_id = %user_id))]
pub async fn set_account_status(
    state: &AppState,
    creds: &Credentials,
    user_id: &UserId,
    action: AccountAction,
) -> Result<String, HelperError> {
    let path = format!(
        "{USERS_PATH}/{}/{}",
        urlencoding::encode(user_id.as_str()),
        action.as_str()
    );
    let message = write::<()>(state, creds, &path, None, QueryFamily::Users).await?;
    tracing::info!(%action, "Account status changed");
    Ok(message)
}
