//! Platform user management.
//!
//! The list is filtered by role and verification status and paged by the
//! backend. Suspending or re-activating an account is a two-step flow:
//! `GET /users?confirm=<id>&action=<a>` renders the confirmation dialog,
//! whose form posts to `/users/{id}/{action}`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::instrument;

use helper_admin_core::{AccountAction, Page, PlatformUser, UserId, UserRole, VerificationStatus};

use super::{Layout, UNAVAILABLE, loaded, rejected, selected};
use crate::components::{Pagination, SelectFilter};
use crate::error::{AppError, Result};
use crate::middleware::AdminContext;
use crate::queries::users::{self, UserFilter};
use crate::state::AppState;

/// Query string of the users page. Also posted back by the dialog form so
/// the list can be restored after the change.
#[derive(Debug, Default, Deserialize)]
pub struct UsersQuery {
    pub role: Option<String>,
    pub status: Option<String>,
    pub page: Option<u32>,
    pub confirm: Option<String>,
    pub action: Option<String>,
}

impl UsersQuery {
    /// The backend filter. Unknown values are treated as "all".
    #[must_use]
    pub fn filter(&self) -> UserFilter {
        UserFilter {
            role: selected(self.role.as_deref()).and_then(|r| r.parse().ok()),
            status: selected(self.status.as_deref()).and_then(|s| s.parse().ok()),
            page: self.page.unwrap_or(0),
            ..UserFilter::default()
        }
    }
}

/// `/users` URL showing `page` of `filter`.
#[must_use]
pub fn list_href(filter: &UserFilter, page: u32) -> String {
    let mut params = Vec::new();
    if let Some(role) = filter.role {
        params.push(format!("role={role}"));
    }
    if let Some(status) = filter.status {
        params.push(format!("status={status}"));
    }
    params.push(format!("page={page}"));
    format!("/users?{}", params.join("&"))
}

const fn action_label(action: AccountAction) -> &'static str {
    match action {
        AccountAction::Activate => "Activate",
        AccountAction::Deactivate => "Suspend",
    }
}

/// Row button opening the confirmation dialog.
#[derive(Debug, Clone)]
pub struct RowAction {
    pub label: &'static str,
    pub href: String,
    pub destructive: bool,
}

/// One user in the table.
#[derive(Debug, Clone)]
pub struct UserRow {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: &'static str,
    pub status: &'static str,
    pub status_label: &'static str,
    pub joined: String,
    /// `None` for admin accounts.
    pub action: Option<RowAction>,
}

impl UserRow {
    fn new(user: &PlatformUser, filter: &UserFilter) -> Self {
        let action = (!user.is_admin()).then(|| {
            let action = AccountAction::for_status(user.verification_status);
            RowAction {
                label: action_label(action),
                href: format!(
                    "{}&confirm={}&action={action}",
                    list_href(filter, filter.page),
                    urlencoding::encode(user.user_id.as_str())
                ),
                destructive: action == AccountAction::Deactivate,
            }
        });

        Self {
            name: user.full_name.clone(),
            email: user.email.clone(),
            phone: user
                .phone
                .clone()
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| UNAVAILABLE.to_string()),
            role: user.role.label(),
            status: user.verification_status.as_str(),
            status_label: user.verification_status.label(),
            joined: user
                .created_at
                .map_or_else(|| UNAVAILABLE.to_string(), |t| t.date_label()),
            action,
        }
    }
}

/// Confirmation dialog for an account status change.
#[derive(Debug, Clone)]
pub struct ConfirmDialog {
    pub title: &'static str,
    pub message: String,
    pub form_action: String,
    pub cancel_href: String,
    pub destructive: bool,
    pub error: Option<String>,
}

impl ConfirmDialog {
    fn new(user: &PlatformUser, action: AccountAction, filter: &UserFilter) -> Self {
        let (title, message) = match action {
            AccountAction::Activate => (
                "Activate User",
                format!(
                    "Are you sure you want to activate {}? They will regain access to the platform.",
                    user.full_name
                ),
            ),
            AccountAction::Deactivate => (
                "Suspend User",
                format!(
                    "Are you sure you want to suspend {}? They will lose access to the platform.",
                    user.full_name
                ),
            ),
        };

        Self {
            title,
            message,
            form_action: format!(
                "/users/{}/{action}",
                urlencoding::encode(user.user_id.as_str())
            ),
            cancel_href: list_href(filter, filter.page),
            destructive: action == AccountAction::Deactivate,
            error: None,
        }
    }
}

/// The dialog a request asks for.
struct DialogRequest<'a> {
    user_id: &'a str,
    action: AccountAction,
    error: Option<String>,
}

/// Users page template.
#[derive(Template, WebTemplate)]
#[template(path = "users.html")]
pub struct UsersTemplate {
    pub layout: Layout,
    pub filters: Vec<SelectFilter>,
    /// `None` when the list failed to load.
    pub users: Option<Vec<UserRow>>,
    pub count_label: String,
    pub pagination: Option<Pagination>,
    pub dialog: Option<ConfirmDialog>,
    /// Mutation error with no matching row left to show a dialog for.
    pub notice: Option<String>,
    /// Current filter, posted back by the dialog form.
    pub role: String,
    pub status: String,
    pub page: u32,
}

fn filter_bar(filter: &UserFilter) -> Vec<SelectFilter> {
    let roles = UserRole::ALL.iter().fold(
        SelectFilter::new("role", "Role").with_all("All roles", filter.role.is_none()),
        |f, role| f.option(role.as_str(), role.label(), filter.role == Some(*role)),
    );
    let statuses = VerificationStatus::ALL.iter().fold(
        SelectFilter::new("status", "Status").with_all("All statuses", filter.status.is_none()),
        |f, status| f.option(status.as_str(), status.label(), filter.status == Some(*status)),
    );
    vec![roles, statuses]
}

fn count_label(total: u64) -> String {
    if total == 1 {
        "1 user found".to_string()
    } else {
        format!("{total} users found")
    }
}

/// Find the row a dialog was requested for. Admin rows and actions that
/// do not match the row's status never get a dialog.
fn dialog_for(
    page: &Page<PlatformUser>,
    request: Option<DialogRequest<'_>>,
    filter: &UserFilter,
) -> (Option<ConfirmDialog>, Option<String>) {
    let Some(request) = request else {
        return (None, None);
    };

    let dialog = page
        .content
        .iter()
        .find(|u| u.user_id.as_str() == request.user_id)
        .filter(|u| !u.is_admin())
        .filter(|u| AccountAction::for_status(u.verification_status) == request.action)
        .map(|u| ConfirmDialog {
            error: request.error.clone(),
            ..ConfirmDialog::new(u, request.action, filter)
        });

    match dialog {
        Some(dialog) => (Some(dialog), None),
        None => (None, request.error),
    }
}

async fn render(
    state: &AppState,
    ctx: &AdminContext,
    filter: UserFilter,
    request: Option<DialogRequest<'_>>,
) -> Result<UsersTemplate> {
    let result = users::list(state, &ctx.credentials, filter).await;
    let page = loaded(result, "users")?;

    let (users, count_label, pagination, (dialog, notice)) = match &page {
        Some(page) => (
            Some(page.content.iter().map(|u| UserRow::new(u, &filter)).collect()),
            count_label(page.total_elements),
            Some(Pagination::new(page, |n| list_href(&filter, n))),
            dialog_for(page, request, &filter),
        ),
        None => (
            None,
            String::new(),
            None,
            (None, request.and_then(|r| r.error)),
        ),
    };

    Ok(UsersTemplate {
        layout: Layout::new(ctx, "/users"),
        filters: filter_bar(&filter),
        users,
        count_label,
        pagination,
        dialog,
        notice,
        role: filter.role.map(|r| r.as_str().to_string()).unwrap_or_default(),
        status: filter.status.map(|s| s.as_str().to_string()).unwrap_or_default(),
        page: filter.page,
    })
}

/// Build the users router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(index))
        .route("/users/{id}/{action}", post(change_status))
}

/// User list, with the confirmation dialog when `confirm` is set.
///
/// GET /users
#[instrument(skip(state, ctx))]
pub async fn index(
    State(state): State<AppState>,
    ctx: AdminContext,
    Query(query): Query<UsersQuery>,
) -> Result<UsersTemplate> {
    let request = query.confirm.as_deref().and_then(|user_id| {
        let action = query.action.as_deref()?.parse().ok()?;
        Some(DialogRequest {
            user_id,
            action,
            error: None,
        })
    });

    render(&state, &ctx, query.filter(), request).await
}

/// Activate or suspend an account, then return to the list.
///
/// POST /users/{id}/activate, POST /users/{id}/deactivate
#[instrument(skip(state, ctx, form))]
pub async fn change_status(
    State(state): State<AppState>,
    ctx: AdminContext,
    Path((id, action)): Path<(String, String)>,
    Form(form): Form<UsersQuery>,
) -> Result<Response> {
    let action: AccountAction = action
        .parse()
        .map_err(|e| AppError::Validation(format!("{e}")))?;
    let filter = form.filter();
    let user_id = UserId::new(id);

    match users::set_account_status(&state, &ctx.credentials, &user_id, action).await {
        Ok(_) => Ok(Redirect::to(&list_href(&filter, filter.page)).into_response()),
        Err(e) => {
            let (status, message) = rejected(e)?;
            let request = DialogRequest {
                user_id: user_id.as_str(),
                action,
                error: Some(message),
            };
            let page = render(&state, &ctx, filter, Some(request)).await?;
            Ok((status, page).into_response())
        }
    }
}
