//! Template model and DTOs.

use checkforge_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `templates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Template {
    pub id: DbId,
    pub technology_id: DbId,
    pub name: String,
    pub description: String,
    pub version: String,
    pub is_public: bool,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A template joined with its technology, author and step count.
///
/// `is_favorited` is relative to the viewer and is always `false` for
/// anonymous requests.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TemplateSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub template: Template,
    pub technology_name: String,
    pub technology_icon: String,
    pub technology_color: String,
    pub created_by_username: String,
    pub steps_count: i64,
    pub is_favorited: bool,
}

/// DTO for creating a template. `created_by` comes from the caller.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTemplate {
    pub technology_id: DbId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub version: Option<String>,
    pub is_public: Option<bool>,
}

/// Sort orders accepted by the template list endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum TemplateOrdering {
    #[serde(rename = "name")]
    NameAsc,
    #[serde(rename = "-name")]
    NameDesc,
    #[serde(rename = "created_at")]
    CreatedAsc,
    #[default]
    #[serde(rename = "-created_at")]
    CreatedDesc,
}

impl TemplateOrdering {
    pub fn order_by(self) -> &'static str {
        match self {
            Self::NameAsc => "t.name ASC, t.id ASC",
            Self::NameDesc => "t.name DESC, t.id DESC",
            Self::CreatedAsc => "t.created_at ASC, t.id ASC",
            Self::CreatedDesc => "t.created_at DESC, t.id DESC",
        }
    }
}

/// Filters for listing templates.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateListFilter {
    pub technology_id: Option<DbId>,
    pub created_by: Option<DbId>,
    pub search: Option<String>,
    #[serde(default)]
    pub ordering: TemplateOrdering,
}
