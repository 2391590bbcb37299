//! Favorite model and DTOs.

use checkforge_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::template::TemplateSummary;

/// A row from the `favorites` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Favorite {
    pub id: DbId,
    pub user_id: DbId,
    pub template_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A favorite with the bookmarked template's summary.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FavoriteEntry {
    pub favorite_id: DbId,
    pub favorited_at: Timestamp,
    #[sqlx(flatten)]
    pub template: TemplateSummary,
}

/// Request body for adding a favorite.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFavorite {
    pub template_id: DbId,
}

/// Result of a favorite toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FavoriteToggle {
    pub favorited: bool,
}
