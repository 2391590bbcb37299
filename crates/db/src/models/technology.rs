//! Technology catalog model and DTOs.

use checkforge_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `technologies` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Technology {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub color: String,
    pub documentation_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A technology plus the number of public templates filed under it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TechnologyWithCount {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub technology: Technology,
    pub templates_count: i64,
}

/// DTO for creating a technology.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTechnology {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    pub color: String,
    #[validate(url)]
    pub documentation_url: Option<String>,
}

/// Result of `TechnologyRepo::delete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TechnologyDelete {
    Deleted,
    NotFound,
    /// Templates or progress rows still point at the technology.
    InUse,
}

/// Sort orders accepted by the technology list endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum TechnologyOrdering {
    #[default]
    #[serde(rename = "name")]
    NameAsc,
    #[serde(rename = "-name")]
    NameDesc,
    #[serde(rename = "created_at")]
    CreatedAsc,
    #[serde(rename = "-created_at")]
    CreatedDesc,
}

impl TechnologyOrdering {
    /// SQL `ORDER BY` clause for this ordering.
    pub fn order_by(self) -> &'static str {
        match self {
            Self::NameAsc => "t.name ASC",
            Self::NameDesc => "t.name DESC",
            Self::CreatedAsc => "t.created_at ASC, t.id ASC",
            Self::CreatedDesc => "t.created_at DESC, t.id DESC",
        }
    }
}
