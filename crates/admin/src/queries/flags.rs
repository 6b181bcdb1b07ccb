//! Rating flag (dispute) queue.

use helper_admin_core::{FlagId, FlagReviewRequest, FlagStatus, RatingFlag};
use tracing::instrument;

use super::{QueryFamily, QueryKey, read, write};
use crate::helper::{Credentials, HelperError};
use crate::state::AppState;

const FLAGS_PATH: &str = "/api/v1/admin/flags";

/// `GET /api/v1/admin/flags/pending?status=`
///
/// # Errors
///
/// Returns the backend error after one retry.
#[instrument(skip(state, creds))]
pub async fn queue(
    state: &AppState,
    creds: &Credentials,
    status: FlagStatus,
) -> Result<Vec<RatingFlag>, HelperError> {
    read(
        state,
        creds,
        QueryKey::Flags(status),
        &format!("{FLAGS_PATH}/pending"),
        &[("status", status.as_str().to_string())],
    )
    .await
}

/// `PUT /api/v1/admin/flags/{id}/review`
///
/// # Errors
///
/// Returns the backend error; the request is never retried.
#[instrument(skip(state, creds, id, request), fields(flag_id = %id, action = %request.action))]
pub async fn review(
    state: &AppState,
    creds: &Credentials,
    id: &FlagId,
    request: &FlagReviewRequest,
) -> Result<String, HelperError> {
    let path = format!("{FLAGS_PATH}/{}/review", urlencoding::encode(id.as_str()));
    let message = write(state, creds, &path, Some(request), QueryFamily::Flags).await?;
    tracing::info!(hide_rating = request.hide_rating, "Rating flag reviewed");
    Ok(message)
}
