//! Project response model and DTOs.

use checkforge_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `project_responses` table: one answer per
/// (project, step).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectResponse {
    pub id: DbId,
    pub project_id: DbId,
    pub template_step_id: DbId,
    pub answer: String,
    pub comment: String,
    pub is_completed: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for `add_response`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddResponse {
    pub template_step_id: DbId,
    pub answer: String,
    #[serde(default)]
    pub comment: String,
}

/// A response joined with the step it answers, for guide rendering.
#[derive(Debug, Clone, FromRow)]
pub struct AnsweredStep {
    pub template_step_id: DbId,
    pub step_order: i32,
    pub question: String,
    pub answer: String,
    pub comment: String,
}
