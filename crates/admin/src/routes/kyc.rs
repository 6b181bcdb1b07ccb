//! KYC approvals.
//!
//! `GET /kyc?review=<id>&action=APPROVED|REJECTED` opens the review dialog
//! for a pending document; the dialog posts to `/kyc/{id}/review`.
//! Rejections must carry a note and are refused locally without one.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::instrument;

use helper_admin_core::{KycDecision, KycDocument, KycDocumentId, KycReviewRequest, KycStatus};

use super::{Layout, UNAVAILABLE, loaded, rejected};
use crate::components::SelectFilter;
use crate::error::{AppError, Result};
use crate::middleware::AdminContext;
use crate::queries::kyc;
use crate::state::AppState;

/// Shown when a rejection is submitted without a reason.
pub const NOTE_REQUIRED: &str = "Please provide a reason for rejection.";

/// Query string of the KYC page.
#[derive(Debug, Default, Deserialize)]
pub struct KycQuery {
    pub status: Option<String>,
    pub review: Option<String>,
    pub action: Option<String>,
}

/// Review dialog form.
#[derive(Debug, Deserialize)]
pub struct KycReviewForm {
    pub action: String,
    #[serde(default)]
    pub admin_notes: String,
    /// Queue the dialog was opened from.
    #[serde(default)]
    pub status: Option<String>,
}

/// Queue status from a query value; unknown or missing means pending.
fn queue_status(value: Option<&str>) -> KycStatus {
    value.and_then(|v| v.parse().ok()).unwrap_or_default()
}

/// `/kyc` URL for the `status` queue.
#[must_use]
pub fn list_href(status: KycStatus) -> String {
    format!("/kyc?status={status}")
}

/// Document link, only for `http`/`https` URLs.
fn document_link(raw: &str) -> Option<String> {
    url::Url::parse(raw)
        .ok()
        .filter(|u| matches!(u.scheme(), "http" | "https"))
        .map(String::from)
}

/// One document in the queue table.
#[derive(Debug, Clone)]
pub struct KycRow {
    pub user_name: String,
    pub email: String,
    pub document_type: String,
    pub status: &'static str,
    pub status_label: &'static str,
    pub submitted: String,
    pub document_url: Option<String>,
    /// Approve and reject links, for pending documents only.
    pub approve_href: Option<String>,
    pub reject_href: Option<String>,
}

impl KycRow {
    fn new(doc: &KycDocument, queue: KycStatus) -> Self {
        let review_href = |decision: KycDecision| {
            doc.is_reviewable().then(|| {
                format!(
                    "{}&review={}&action={decision}",
                    list_href(queue),
                    urlencoding::encode(doc.id.as_str())
                )
            })
        };

        Self {
            user_name: doc.user_name.clone(),
            email: doc.email.clone(),
            document_type: doc.document_type.clone(),
            status: doc.status.as_str(),
            status_label: doc.status.label(),
            submitted: doc
                .submitted_at
                .map_or_else(|| UNAVAILABLE.to_string(), |t| t.date_label()),
            document_url: document_link(&doc.document_url),
            approve_href: review_href(KycDecision::Approved),
            reject_href: review_href(KycDecision::Rejected),
        }
    }
}

/// Approve/reject dialog.
#[derive(Debug, Clone)]
pub struct ReviewDialog {
    pub title: &'static str,
    pub description: String,
    pub document_type: String,
    pub action: &'static str,
    pub notes: String,
    pub notes_required: bool,
    pub notes_placeholder: &'static str,
    pub submit_label: &'static str,
    pub destructive: bool,
    pub form_action: String,
    pub cancel_href: String,
    pub error: Option<String>,
}

impl ReviewDialog {
    fn new(doc: &KycDocument, decision: KycDecision, queue: KycStatus) -> Self {
        let (title, description, submit_label) = match decision {
            KycDecision::Approved => (
                "Approve KYC Document",
                format!(
                    "Approve identity document for {}. This will verify their account.",
                    doc.user_name
                ),
                "Approve",
            ),
            KycDecision::Rejected => (
                "Reject KYC Document",
                format!(
                    "Reject identity document for {}. Please provide a reason.",
                    doc.user_name
                ),
                "Reject",
            ),
        };

        Self {
            title,
            description,
            document_type: doc.document_type.clone(),
            action: decision.as_str(),
            notes: String::new(),
            notes_required: decision.requires_note(),
            notes_placeholder: if decision.requires_note() {
                "Reason for rejection..."
            } else {
                "Optional notes..."
            },
            submit_label,
            destructive: decision == KycDecision::Rejected,
            form_action: format!("/kyc/{}/review", urlencoding::encode(doc.id.as_str())),
            cancel_href: list_href(queue),
            error: None,
        }
    }
}

/// The dialog a request asks for, with whatever was typed into it.
struct DialogRequest<'a> {
    id: &'a str,
    decision: KycDecision,
    notes: String,
    error: Option<String>,
}

/// KYC page template.
#[derive(Template, WebTemplate)]
#[template(path = "kyc.html")]
pub struct KycTemplate {
    pub layout: Layout,
    pub filter: SelectFilter,
    pub queue_label: String,
    /// `None` when the queue failed to load.
    pub documents: Option<Vec<KycRow>>,
    pub count_label: String,
    pub dialog: Option<ReviewDialog>,
    pub notice: Option<String>,
    pub status: &'static str,
}

fn filter_bar(queue: KycStatus) -> SelectFilter {
    KycStatus::ALL.iter().fold(SelectFilter::new("status", "Status"), |f, s| {
        f.option(s.as_str(), s.label(), *s == queue)
    })
}

fn count_label(count: usize) -> String {
    if count == 1 {
        "1 document".to_string()
    } else {
        format!("{count} documents")
    }
}

fn dialog_for(
    documents: &[KycDocument],
    request: Option<DialogRequest<'_>>,
    queue: KycStatus,
) -> (Option<ReviewDialog>, Option<String>) {
    let Some(request) = request else {
        return (None, None);
    };

    let dialog = documents
        .iter()
        .find(|d| d.id.as_str() == request.id)
        .filter(|d| d.is_reviewable())
        .map(|d| ReviewDialog {
            notes: request.notes.clone(),
            error: request.error.clone(),
            ..ReviewDialog::new(d, request.decision, queue)
        });

    match dialog {
        Some(dialog) => (Some(dialog), None),
        None => (None, request.error),
    }
}

async fn render(
    state: &AppState,
    ctx: &AdminContext,
    queue: KycStatus,
    request: Option<DialogRequest<'_>>,
) -> Result<KycTemplate> {
    let result = kyc::queue(state, &ctx.credentials, queue).await;
    let documents = loaded(result, "KYC queue")?;

    let (rows, count_label, (dialog, notice)) = match &documents {
        Some(docs) => (
            Some(docs.iter().map(|d| KycRow::new(d, queue)).collect()),
            count_label(docs.len()),
            dialog_for(docs, request, queue),
        ),
        None => (None, String::new(), (None, request.and_then(|r| r.error))),
    };

    Ok(KycTemplate {
        layout: Layout::new(ctx, "/kyc"),
        filter: filter_bar(queue),
        queue_label: queue.label().to_lowercase(),
        documents: rows,
        count_label,
        dialog,
        notice,
        status: queue.as_str(),
    })
}

/// Build the KYC router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/kyc", get(index))
        .route("/kyc/{id}/review", post(review))
}

/// KYC queue, with the review dialog when `review` is set.
///
/// GET /kyc
#[instrument(skip(state, ctx))]
pub async fn index(
    State(state): State<AppState>,
    ctx: AdminContext,
    Query(query): Query<KycQuery>,
) -> Result<KycTemplate> {
    let queue = queue_status(query.status.as_deref());
    let request = query.review.as_deref().and_then(|id| {
        let decision = query.action.as_deref()?.parse().ok()?;
        Some(DialogRequest {
            id,
            decision,
            notes: String::new(),
            error: None,
        })
    });

    render(&state, &ctx, queue, request).await
}

/// Approve or reject a document, then return to the queue.
///
/// POST /kyc/{id}/review
#[instrument(skip(state, ctx, form))]
pub async fn review(
    State(state): State<AppState>,
    ctx: AdminContext,
    Path(id): Path<String>,
    Form(form): Form<KycReviewForm>,
) -> Result<Response> {
    let decision: KycDecision = form
        .action
        .parse()
        .map_err(|e| AppError::Validation(format!("{e}")))?;
    let queue = queue_status(form.status.as_deref());
    let notes = form.admin_notes.trim().to_string();

    if decision.requires_note() && notes.is_empty() {
        let request = DialogRequest {
            id: &id,
            decision,
            notes: form.admin_notes,
            error: Some(NOTE_REQUIRED.to_string()),
        };
        let page = render(&state, &ctx, queue, Some(request)).await?;
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
    }

    let request = KycReviewRequest::new(decision, Some(notes));
    match kyc::review(&state, &ctx.credentials, &KycDocumentId::new(id.as_str()), &request).await {
        Ok(_) => Ok(Redirect::to(&list_href(queue)).into_response()),
        Err(e) => {
            let (status, message) = rejected(e)?;
            let request = DialogRequest {
                id: &id,
                decision,
                notes: form.admin_notes,
                error: Some(message),
            };
            let page = render(&state, &ctx, queue, Some(request)).await?;
            Ok((status, page).into_response())
        }
    }
}
