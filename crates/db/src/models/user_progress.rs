//! Per-technology user progress model and DTOs.

use checkforge_core::gamification::MAX_HOURS_PER_ENTRY;
use checkforge_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `user_progress` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserProgress {
    pub id: DbId,
    pub user_id: DbId,
    pub technology_id: DbId,
    pub projects_completed: i32,
    pub total_hours: i32,
    pub level: i32,
    pub badges: Vec<String>,
    pub last_activity: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Progress row joined with its technology for display.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserProgressWithTechnology {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub progress: UserProgress,
    pub technology_name: String,
    pub technology_icon: String,
    pub technology_color: String,
}

/// Request body for logging study hours on a technology.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LogHours {
    pub technology_id: DbId,
    #[validate(range(min = 1, max = MAX_HOURS_PER_ENTRY))]
    pub hours: i32,
}
