//! Read models for the progress dashboard.

use checkforge_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::user_progress::UserProgressWithTechnology;

/// Aggregate project counts for one user.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_projects: i64,
    pub completed_projects: i64,
    /// Distinct technologies among the user's favorite templates.
    pub technologies_used: i64,
    /// Completed / total as a percentage; 0 when there are no projects.
    pub completion_rate: f64,
}

/// A recently touched project.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RecentProject {
    pub id: DbId,
    pub name: String,
    pub status: String,
    pub progress_percentage: i16,
    pub updated_at: Timestamp,
}

/// A favorited template reference.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FavoriteTemplateRef {
    pub id: DbId,
    pub name: String,
}

/// Full dashboard payload.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub progress_by_technology: Vec<UserProgressWithTechnology>,
    pub recent_projects: Vec<RecentProject>,
    pub favorite_templates: Vec<FavoriteTemplateRef>,
}

/// Completion percentage; 0 when `total` is 0.
pub fn completion_rate(completed: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    completed as f64 * 100.0 / total as f64
}
