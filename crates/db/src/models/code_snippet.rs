//! Code snippet model and DTOs.

use checkforge_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `code_snippets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CodeSnippet {
    pub id: DbId,
    pub template_step_id: DbId,
    pub language: String,
    pub code: String,
    pub description: String,
    pub is_example: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for attaching a snippet to a step.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCodeSnippet {
    #[validate(length(min = 1, max = 50))]
    pub language: String,
    #[validate(length(min = 1))]
    pub code: String,
    #[serde(default)]
    pub description: String,
    pub is_example: Option<bool>,
}
