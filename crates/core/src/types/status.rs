//! Role and status enums mirrored from the Helper backend.
//!
//! All of these travel as `SCREAMING_SNAKE_CASE` strings on the wire and in
//! query strings (`?role=WORKER&verificationStatus=SUSPENDED`).

use serde::{Deserialize, Serialize};

/// Error returned when a role or status string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: {value}")]
pub struct ParseStatusError {
    /// Which enum failed to parse.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

/// Implements `as_str`, `Display` and `FromStr` over a fixed wire mapping.
macro_rules! wire_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $name {
            /// Every variant, in display order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The wire representation.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ParseStatusError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok(Self::$variant),)+
                    _ => Err(ParseStatusError {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

/// Platform account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    Customer,
    Worker,
}

wire_enum!(UserRole, "user role", {
    Customer => "CUSTOMER",
    Worker => "WORKER",
    Admin => "ADMIN",
});

impl UserRole {
    /// Human label for filters and badges.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Customer => "Customer",
            Self::Worker => "Worker",
        }
    }
}

/// Account verification status.
///
/// `Suspended` is what the users page shows for deactivated accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    #[default]
    Pending,
    Verified,
    Rejected,
    Suspended,
}

wire_enum!(VerificationStatus, "verification status", {
    Pending => "PENDING",
    Verified => "VERIFIED",
    Rejected => "REJECTED",
    Suspended => "SUSPENDED",
});

impl VerificationStatus {
    /// Human label for filters and badges.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Verified => "Verified",
            Self::Rejected => "Rejected",
            Self::Suspended => "Suspended",
        }
    }
}

/// KYC document review status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KycStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

wire_enum!(KycStatus, "KYC status", {
    Pending => "PENDING",
    Approved => "APPROVED",
    Rejected => "REJECTED",
});

impl KycStatus {
    /// Human label for filters and badges.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }
}

/// Rating flag status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlagStatus {
    #[default]
    Pending,
    Dismissed,
    ActionTaken,
}

wire_enum!(FlagStatus, "flag status", {
    Pending => "PENDING",
    Dismissed => "DISMISSED",
    ActionTaken => "ACTION_TAKEN",
});

impl FlagStatus {
    /// Human label for filters and badges.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Dismissed => "Dismissed",
            Self::ActionTaken => "Action Taken",
        }
    }
}

/// Decision an admin can take on a pending flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlagAction {
    Dismiss,
    ActionTaken,
}

wire_enum!(FlagAction, "flag action", {
    Dismiss => "DISMISS",
    ActionTaken => "ACTION_TAKEN",
});

/// Decision an admin can take on a pending KYC document.
///
/// Serializes as the resulting [`KycStatus`] (`APPROVED` / `REJECTED`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KycDecision {
    Approved,
    Rejected,
}

wire_enum!(KycDecision, "KYC decision", {
    Approved => "APPROVED",
    Rejected => "REJECTED",
});

impl KycDecision {
    /// Whether this decision needs a written reason.
    #[must_use]
    pub const fn requires_note(self) -> bool {
        matches!(self, Self::Rejected)
    }
}

/// Account status change on the users page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountAction {
    Activate,
    Deactivate,
}

wire_enum!(AccountAction, "account action", {
    Activate => "activate",
    Deactivate => "deactivate",
});

impl AccountAction {
    /// The action offered for a user in the given status.
    ///
    /// Suspended accounts can be reactivated; everything else can be suspended.
    #[must_use]
    pub const fn for_status(status: VerificationStatus) -> Self {
        match status {
            VerificationStatus::Suspended => Self::Activate,
            _ => Self::Deactivate,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_status_wire_format() {
        assert_eq!(FlagStatus::ActionTaken.as_str(), "ACTION_TAKEN");
        assert_eq!(
            serde_json::to_string(&FlagStatus::ActionTaken).unwrap(),
            "\"ACTION_TAKEN\""
        );
        assert_eq!("DISMISSED".parse::<FlagStatus>(), Ok(FlagStatus::Dismissed));
    }

    #[test]
    fn test_parse_rejects_unknown_values() {
        let err = "janitor".parse::<UserRole>().unwrap_err();
        assert_eq!(err.to_string(), "invalid user role: janitor");
        assert!("pending".parse::<KycStatus>().is_err());
    }

    #[test]
    fn test_account_action_for_status() {
        assert_eq!(
            AccountAction::for_status(VerificationStatus::Suspended),
            AccountAction::Activate
        );
        assert_eq!(
            AccountAction::for_status(VerificationStatus::Verified),
            AccountAction::Deactivate
        );
        assert_eq!(
            AccountAction::for_status(VerificationStatus::Pending),
            AccountAction::Deactivate
        );
    }

    #[test]
    fn test_kyc_decision_serializes_as_status() {
        assert_eq!(
            serde_json::to_string(&KycDecision::Rejected).unwrap(),
            "\"REJECTED\""
        );
        assert!(KycDecision::Rejected.requires_note());
        assert!(!KycDecision::Approved.requires_note());
    }
}
