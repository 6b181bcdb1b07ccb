//! Dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Router, extract::State, routing::get};
use tracing::instrument;

use helper_admin_core::{KycStats, NotificationStats, PaymentStats, RatingStats, TaskStats, UserStats};

use super::{Layout, UNAVAILABLE, loaded};
use crate::error::Result;
use crate::middleware::AdminContext;
use crate::queries::stats;
use crate::state::AppState;

/// One statistic card.
#[derive(Debug, Clone)]
pub struct StatCard {
    pub label: &'static str,
    pub value: String,
    pub hint: &'static str,
}

/// A titled group of cards.
#[derive(Debug, Clone)]
pub struct StatSection {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub cards: Vec<StatCard>,
}

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub layout: Layout,
    pub sections: Vec<StatSection>,
}

/// Every stats family, each `None` when its read failed.
#[derive(Debug, Default)]
pub struct Snapshot {
    pub users: Option<UserStats>,
    pub tasks: Option<TaskStats>,
    pub payments: Option<PaymentStats>,
    pub ratings: Option<RatingStats>,
    pub kyc: Option<KycStats>,
    pub notifications: Option<NotificationStats>,
}

fn card<T>(label: &'static str, hint: &'static str, source: Option<&T>, value: impl Fn(&T) -> String) -> StatCard {
    StatCard {
        label,
        value: source.map_or_else(|| UNAVAILABLE.to_string(), value),
        hint,
    }
}

impl Snapshot {
    /// The four dashboard sections.
    #[must_use]
    pub fn sections(&self) -> Vec<StatSection> {
        let users = self.users.as_ref();
        let tasks = self.tasks.as_ref();
        let payments = self.payments.as_ref();
        let ratings = self.ratings.as_ref();
        let kyc = self.kyc.as_ref();
        let notifications = self.notifications.as_ref();

        vec![
            StatSection {
                title: "Users",
                subtitle: "Registered accounts by role",
                cards: vec![
                    card("Total Users", "All registered accounts", users, |s| s.total_users.to_string()),
                    card("Customers", "Task posters", users, |s| s.total_customers.to_string()),
                    card("Workers", "Service providers", users, |s| s.total_workers.to_string()),
                    card("Admins", "Platform administrators", users, |s| s.total_admins.to_string()),
                ],
            },
            StatSection {
                title: "Operations",
                subtitle: "Active tasks, KYC queue, and content flags",
                cards: vec![
                    card("Total Tasks", "All platform tasks", tasks, |s| s.total_tasks.to_string()),
                    card("Pending KYC", "Awaiting admin review", kyc, |s| s.pending.to_string()),
                    card("Pending Flags", "Content flags to review", ratings, |s| s.pending_flags.to_string()),
                ],
            },
            StatSection {
                title: "Financial",
                subtitle: "Revenue and commission overview",
                cards: vec![
                    card("Total Revenue", "Gross transaction value", payments, |s| s.total_revenue.to_string()),
                    card("Commission Earned", "2% platform commission", payments, |s| {
                        s.total_commission.to_string()
                    }),
                    card("GST Collected", "18% on platform commission", payments, |s| s.total_tax.to_string()),
                    card("Tips Collected", "100% passed to workers", payments, |s| s.total_tips.to_string()),
                ],
            },
            StatSection {
                title: "Platform Health",
                subtitle: "Ratings and notification delivery",
                cards: vec![
                    card("Total Ratings", "Submitted by both parties", ratings, |s| s.total_ratings.to_string()),
                    card("Avg. Platform Score", "Weighted average rating", ratings, RatingStats::average_label),
                    card("Notifications Sent", "Delivered to users", notifications, |s| s.sent.to_string()),
                    card("Active Device Tokens", "Push-enabled devices", notifications, |s| {
                        s.active_device_tokens.to_string()
                    }),
                ],
            },
        ]
    }
}

/// Build the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(dashboard))
}

/// Dashboard page handler.
///
/// The six stats families load concurrently and independently; a family
/// that fails renders its cards as a dash.
#[instrument(skip_all)]
pub async fn dashboard(State(state): State<AppState>, ctx: AdminContext) -> Result<DashboardTemplate> {
    let creds = &ctx.credentials;
    let (users, tasks, payments, ratings, kyc, notifications) = tokio::join!(
        stats::users(&state, creds),
        stats::tasks(&state, creds),
        stats::payments(&state, creds),
        stats::ratings(&state, creds),
        stats::kyc(&state, creds),
        stats::notifications(&state, creds),
    );

    let snapshot = Snapshot {
        users: loaded(users, "user stats")?,
        tasks: loaded(tasks, "task stats")?,
        payments: loaded(payments, "payment stats")?,
        ratings: loaded(ratings, "rating stats")?,
        kyc: loaded(kyc, "KYC stats")?,
        notifications: loaded(notifications, "notification stats")?,
    };

    Ok(DashboardTemplate {
        layout: Layout::new(&ctx, "/"),
        sections: snapshot.sections(),
    })
}
