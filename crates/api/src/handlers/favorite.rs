//! Handlers for `/favorites`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use checkforge_core::types::DbId;
use checkforge_db::models::favorite::{CreateFavorite, Favorite, FavoriteEntry};
use checkforge_db::repositories::FavoriteRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::template::find_visible;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/favorites
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Vec<FavoriteEntry>>> {
    let favorites = FavoriteRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(favorites))
}

/// POST /api/v1/favorites
///
/// Idempotent: 201 when the favorite is new, 200 when it already existed.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateFavorite>,
) -> AppResult<(StatusCode, Json<Favorite>)> {
    find_visible(&state, input.template_id, Some(auth.user_id)).await?;
    let (favorite, created) = FavoriteRepo::add(&state.pool, auth.user_id, input.template_id).await?;
    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(favorite)))
}

/// DELETE /api/v1/favorites/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !FavoriteRepo::delete(&state.pool, id, auth.user_id).await? {
        return Err(AppError::not_found("Favorite", id));
    }
    Ok(StatusCode::NO_CONTENT)
}
