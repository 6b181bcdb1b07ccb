//! Flags and disputes raised against ratings.
//!
//! `GET /flags?review=<id>&action=DISMISS|ACTION_TAKEN` opens the review
//! dialog for a pending flag; the dialog posts to `/flags/{id}/review`.

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

use helper_admin_core::{FlagAction, FlagId, FlagReviewRequest, FlagStatus, RatingFlag};

use super::{Layout, UNAVAILABLE, loaded, rejected};
use crate::components::SelectFilter;
use crate::error::{AppError, Result};
use crate::middleware::AdminContext;
use crate::queries::flags;
use crate::state::AppState;

/// Query string of the flags page.
#[derive(Debug, Default, Deserialize)]
pub struct FlagsQuery {
    pub status: Option<String>,
    pub review: Option<String>,
    pub action: Option<String>,
}

/// Review dialog form. `hide_rating` is an HTML checkbox: present when
/// ticked.
#[derive(Debug, Deserialize)]
pub struct FlagReviewForm {
    pub action: String,
    #[serde(default)]
    pub hide_rating: Option<String>,
    #[serde(default)]
    pub admin_note: String,
    /// Queue the dialog was opened from.
    #[serde(default)]
    pub status: Option<String>,
}

impl FlagReviewForm {
    fn hide_rating(&self) -> bool {
        self.hide_rating
            .as_deref()
            .is_some_and(|v| matches!(v, "true" | "on" | "1"))
    }
}

/// Queue status from a query value; unknown or missing means pending.
fn queue_status(value: Option<&str>) -> FlagStatus {
    value.and_then(|v| v.parse().ok()).unwrap_or_default()
}

/// `/flags` URL for the `status` queue.
#[must_use]
pub fn list_href(status: FlagStatus) -> String {
    format!("/flags?status={status}")
}

/// One flag in the queue table.
#[derive(Debug, Clone)]
pub struct FlagRow {
    pub flagged_by: String,
    pub target_user: String,
    pub rating: String,
    pub reason: String,
    pub status: &'static str,
    pub status_label: &'static str,
    pub created: String,
    /// Dismiss and take-action links, for pending flags only.
    pub dismiss_href: Option<String>,
    pub action_href: Option<String>,
}

fn score_label(score: Option<f64>) -> String {
    score.map_or_else(|| UNAVAILABLE.to_string(), |s| format!("{s:.1}"))
}

impl FlagRow {
    fn new(flag: &RatingFlag, queue: FlagStatus) -> Self {
        let review_href = |action: FlagAction| {
            flag.is_reviewable().then(|| {
                format!(
                    "{}&review={}&action={action}",
                    list_href(queue),
                    urlencoding::encode(flag.id.as_str())
                )
            })
        };

        Self {
            flagged_by: flag.flagged_by_name.clone(),
            target_user: flag.target_user_name.clone(),
            rating: score_label(flag.rating_score),
            reason: flag.reason.clone(),
            status: flag.status.as_str(),
            status_label: flag.status.label(),
            created: flag
                .created_at
                .map_or_else(|| UNAVAILABLE.to_string(), |t| t.date_label()),
            dismiss_href: review_href(FlagAction::Dismiss),
            action_href: review_href(FlagAction::ActionTaken),
        }
    }
}

/// Dismiss / take-action dialog.
#[derive(Debug, Clone)]
pub struct ReviewDialog {
    pub title: &'static str,
    pub description: &'static str,
    pub flagged_by: String,
    pub target_user: String,
    pub reason: String,
    pub rating_comment: Option<String>,
    pub action: &'static str,
    /// Whether the hide-rating checkbox is offered.
    pub offers_hide: bool,
    pub hide_rating: bool,
    pub note: String,
    pub submit_label: &'static str,
    pub destructive: bool,
    pub form_action: String,
    pub cancel_href: String,
    pub error: Option<String>,
}

impl ReviewDialog {
    fn new(flag: &RatingFlag, action: FlagAction, queue: FlagStatus) -> Self {
        let (title, description, submit_label) = match action {
            FlagAction::Dismiss => (
                "Dismiss Flag",
                "Dismiss this flag. The rating will remain visible.",
                "Dismiss Flag",
            ),
            FlagAction::ActionTaken => (
                "Take Action on Flag",
                "Take action against this flag. You can optionally hide the offending rating.",
                "Take Action",
            ),
        };

        Self {
            title,
            description,
            flagged_by: flag.flagged_by_name.clone(),
            target_user: flag.target_user_name.clone(),
            reason: flag.reason.clone(),
            rating_comment: flag.rating_comment.clone().filter(|c| !c.trim().is_empty()),
            action: action.as_str(),
            offers_hide: action == FlagAction::ActionTaken,
            hide_rating: false,
            note: String::new(),
            submit_label,
            destructive: action == FlagAction::ActionTaken,
            form_action: format!("/flags/{}/review", urlencoding::encode(flag.id.as_str())),
            cancel_href: list_href(queue),
            error: None,
        }
    }
}

/// The dialog a request asks for, with whatever was entered into it.
struct DialogRequest<'a> {
    id: &'a str,
    action: FlagAction,
    hide_rating: bool,
    note: String,
    error: Option<String>,
}

/// Flags page template.
#[derive(Template, WebTemplate)]
#[template(path = "flags.html")]
pub struct FlagsTemplate {
    pub layout: Layout,
    pub filter: SelectFilter,
    pub queue_label: String,
    /// `None` when the queue failed to load.
    pub flags: Option<Vec<FlagRow>>,
    pub count_label: String,
    pub dialog: Option<ReviewDialog>,
    pub notice: Option<String>,
    pub status: &'static str,
}

fn filter_bar(queue: FlagStatus) -> SelectFilter {
    FlagStatus::ALL.iter().fold(SelectFilter::new("status", "Status"), |f, s| {
        f.option(s.as_str(), s.label(), *s == queue)
    })
}

fn count_label(count: usize) -> String {
    if count == 1 {
        "1 flag".to_string()
    } else {
        format!("{count} flags")
    }
}

fn dialog_for(
    flags: &[RatingFlag],
    request: Option<DialogRequest<'_>>,
    queue: FlagStatus,
) -> (Option<ReviewDialog>, Option<String>) {
    let Some(request) = request else {
        return (None, None);
    };

    let dialog = flags
        .iter()
        .find(|f| f.id.as_str() == request.id)
        .filter(|f| f.is_reviewable())
        .map(|f| {
            let base = ReviewDialog::new(f, request.action, queue);
            ReviewDialog {
                hide_rating: base.offers_hide && request.hide_rating,
                note: request.note.clone(),
                error: request.error.clone(),
                ..base
            }
        });

    match dialog {
        Some(dialog) => (Some(dialog), None),
        None => (None, request.error),
    }
}

async fn render(
    state: &AppState,
    ctx: &AdminContext,
    queue: FlagStatus,
    request: Option<DialogRequest<'_>>,
) -> Result<FlagsTemplate> {
    let result = flags::queue(state, &ctx.credentials, queue).await;
    let items = loaded(result, "flags")?;

    let (rows, count_label, (dialog, notice)) = match &items {
        Some(items) => (
            Some(items.iter().map(|f| FlagRow::new(f, queue)).collect()),
            count_label(items.len()),
            dialog_for(items, request, queue),
        ),
        None => (None, String::new(), (None, request.and_then(|r| r.error))),
    };

    Ok(FlagsTemplate {
        layout: Layout::new(ctx, "/flags"),
        filter: filter_bar(queue),
        queue_label: queue.label().to_lowercase(),
        flags: rows,
        count_label,
        dialog,
        notice,
        status: queue.as_str(),
    })
}

/// Build the flags router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/flags", get(index))
        .route("/flags/{id}/review", post(review))
}

/// Flag queue, with the review dialog when `review` is set.
///
/// GET /flags
#[instrument(skip(state, ctx))]
pub async fn index(
    State(state): State<AppState>,
    ctx: AdminContext,
    Query(query): Query<FlagsQuery>,
) -> Result<FlagsTemplate> {
    let queue = queue_status(query.status.as_deref());
    let request = query.review.as_deref().and_then(|id| {
        let action = query.action.as_deref()?.parse().ok()?;
        Some(DialogRequest {
            id,
            action,
            hide_rating: false,
            note: String::new(),
            error: None,
        })
    });

    render(&state, &ctx, queue, request).await
}

/// Dismiss or action a flag, then return to the queue.
///
/// POST /flags/{id}/review
#[instrument(skip(state, ctx, form))]
pub async fn review(
    State(state): State<AppState>,
    ctx: AdminContext,
    Path(id): Path<String>,
    Form(form): Form<FlagReviewForm>,
) -> Result<Response> {
    let action: FlagAction = form
        .action
        .parse()
        .map_err(|e| AppError::Validation(format!("{e}")))?;
    let queue = queue_status(form.status.as_deref());
    let hide_rating = form.hide_rating();

    let request = FlagReviewRequest::new(action, hide_rating, Some(form.admin_note.clone()));
    match flags::review(&state, &ctx.credentials, &FlagId::new(id.as_str()), &request).await {
        Ok(_) => Ok(Redirect::to(&list_href(queue)).into_response()),
        Err(e) => {
            let (status, message) = rejected(e)?;
            let request = DialogRequest {
                id: &id,
                action,
                hide_rating,
                note: form.admin_note,
                error: Some(message),
            };
            let page = render(&state, &ctx, queue, Some(request)).await?;
            Ok((status, page).into_response())
        }
    }
}
