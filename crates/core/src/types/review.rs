//! Review decision payloads sent with `PUT .../review`.

use serde::Serialize;

use super::status::{FlagAction, KycDecision};

/// Returns `None` for blank input so empty notes are omitted on the wire.
fn non_blank(note: Option<String>) -> Option<String> {
    note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}

/// Body of `PUT /api/v1/admin/kyc/{id}/review`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KycReviewRequest {
    pub status: KycDecision,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_notes: Option<String>,
}

impl KycReviewRequest {
    /// Build a request, dropping blank notes.
    ///
    /// Whether a rejection may be sent without notes is decided by the
    /// review dialog, not here.
    #[must_use]
    pub fn new(status: KycDecision, admin_notes: Option<String>) -> Self {
        Self {
            status,
            admin_notes: non_blank(admin_notes),
        }
    }
}

/// Body of `PUT /api/v1/admin/flags/{id}/review`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagReviewRequest {
    pub action: FlagAction,
    pub hide_rating: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_note: Option<String>,
}

impl FlagReviewRequest {
    /// Build a request. `hide_rating` only applies to `ACTION_TAKEN` and is
    /// forced off for dismissals.
    #[must_use]
    pub fn new(action: FlagAction, hide_rating: bool, admin_note: Option<String>) -> Self {
        Self {
            action,
            hide_rating: hide_rating && action == FlagAction::ActionTaken,
            admin_note: non_blank(admin_note),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kyc_blank_notes_omitted() {
        let req = KycReviewRequest::new(KycDecision::Approved, Some("   ".to_string()));
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"status": "APPROVED"})
        );
    }

    #[test]
    fn test_kyc_notes_trimmed() {
        let req = KycReviewRequest::new(KycDecision::Rejected, Some(" blurry scan ".to_string()));
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"status": "REJECTED", "adminNotes": "blurry scan"})
        );
    }

    #[test]
    fn test_flag_dismiss_never_hides_rating() {
        let req = FlagReviewRequest::new(FlagAction::Dismiss, true, None);
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"action": "DISMISS", "hideRating": false})
        );
    }

    #[test]
    fn test_flag_action_taken_keeps_hide_rating() {
        let req = FlagReviewRequest::new(FlagAction::ActionTaken, true, Some("spam".to_string()));
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"action": "ACTION_TAKEN", "hideRating": true, "adminNote": "spam"})
        );
    }
}
