//! Task statistics page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Router, extract::State, routing::get};
use tracing::instrument;

use helper_admin_core::TaskStats;
use helper_admin_core::types::stats::share_label;

use super::{Layout, loaded};
use crate::error::Result;
use crate::filters;
use crate::middleware::AdminContext;
use crate::queries::stats;
use crate::state::AppState;

/// One row of a breakdown table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakdownRow {
    pub key: String,
    pub count: u64,
    pub share: String,
}

/// Task statistics, ready to render.
#[derive(Debug, Clone)]
pub struct TaskBreakdown {
    pub total: u64,
    pub by_status: Vec<BreakdownRow>,
    pub by_domain: Vec<BreakdownRow>,
}

fn rows(entries: Vec<(&str, u64)>, total: u64) -> Vec<BreakdownRow> {
    entries
        .into_iter()
        .map(|(key, count)| BreakdownRow {
            key: key.to_string(),
            count,
            share: share_label(count, total),
        })
        .collect()
}

impl From<&TaskStats> for TaskBreakdown {
    fn from(stats: &TaskStats) -> Self {
        Self {
            total: stats.total_tasks,
            by_status: rows(stats.status_breakdown(), stats.total_tasks),
            by_domain: rows(stats.domain_breakdown(), stats.total_tasks),
        }
    }
}

/// Tasks page template. `stats` is `None` when the read failed.
#[derive(Template, WebTemplate)]
#[template(path = "tasks.html")]
pub struct TasksTemplate {
    pub layout: Layout,
    pub stats: Option<TaskBreakdown>,
}

/// Build the tasks router.
pub fn router() -> Router<AppState> {
    Router::new().route("/tasks", get(tasks))
}

/// Task statistics page handler.
#[instrument(skip_all)]
pub async fn tasks(State(state): State<AppState>, ctx: AdminContext) -> Result<TasksTemplate> {
    let result = stats::tasks(&state, &ctx.credentials).await;
    let stats = loaded(result, "task stats")?;

    Ok(TasksTemplate {
        layout: Layout::new(&ctx, "/tasks"),
        stats: stats.as_ref().map(TaskBreakdown::from),
    })
}
