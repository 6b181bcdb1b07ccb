//! Read-only aggregate snapshots shown on the dashboard.
//!
//! Every counter defaults to zero when the backend omits it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::money::Rupees;

/// `GET /api/v1/admin/stats`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserStats {
    pub total_users: u64,
    pub total_customers: u64,
    pub total_workers: u64,
    pub total_admins: u64,
}

/// `GET /api/v1/tasks/admin/stats`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskStats {
    pub tasks_by_status: BTreeMap<String, u64>,
    pub tasks_by_domain: BTreeMap<String, u64>,
    pub total_tasks: u64,
}

impl TaskStats {
    /// `(status, count)` pairs, largest first.
    #[must_use]
    pub fn status_breakdown(&self) -> Vec<(&str, u64)> {
        sorted_desc(&self.tasks_by_status)
    }

    /// `(domain, count)` pairs, largest first.
    #[must_use]
    pub fn domain_breakdown(&self) -> Vec<(&str, u64)> {
        sorted_desc(&self.tasks_by_domain)
    }
}

fn sorted_desc(map: &BTreeMap<String, u64>) -> Vec<(&str, u64)> {
    let mut entries: Vec<(&str, u64)> = map.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    // Stable sort keeps ties in key order.
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries
}

/// Rounded percentage share, `"0%"` when the total is zero.
#[must_use]
pub fn share_label(value: u64, total: u64) -> String {
    if total == 0 {
        return "0%".to_string();
    }
    let (value, total) = (u128::from(value), u128::from(total));
    let pct = (value * 200 + total) / (total * 2);
    format!("{pct}%")
}

/// `GET /api/v1/admin/payments/stats`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentStats {
    pub total_revenue: Rupees,
    pub total_commission: Rupees,
    pub total_tax: Rupees,
    pub total_tips: Rupees,
    pub completed_payments: u64,
    pub pending_payments: u64,
}

/// `GET /api/v1/admin/ratings/stats`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RatingStats {
    pub total_ratings: u64,
    pub platform_average: f64,
    pub hidden_count: u64,
    pub pending_flags: u64,
    pub dismissed_flags: u64,
    pub action_taken_flags: u64,
}

impl RatingStats {
    /// `4.37 / 5`
    #[must_use]
    pub fn average_label(&self) -> String {
        format!("{:.2} / 5", self.platform_average)
    }
}

/// `GET /api/v1/admin/kyc/stats`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KycStats {
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
    pub total: u64,
}

/// `GET /api/v1/admin/notifications/stats`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationStats {
    pub total: u64,
    pub sent: u64,
    pub pending: u64,
    pub failed: u64,
    pub active_device_tokens: u64,
}
