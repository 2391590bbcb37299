//! Handlers for `/progress`: per-technology levels, study hours and the
//! dashboard.

use axum::extract::State;
use axum::Json;
use checkforge_db::models::dashboard::Dashboard;
use checkforge_db::models::user_progress::{LogHours, UserProgress, UserProgressWithTechnology};
use checkforge_db::repositories::{DashboardRepo, TechnologyRepo, UserProgressRepo};

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/progress
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Vec<UserProgressWithTechnology>>> {
    let progress = UserProgressRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(progress))
}

/// POST /api/v1/progress/hours
pub async fn log_hours(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<LogHours>,
) -> AppResult<Json<UserProgress>> {
    TechnologyRepo::find_by_id(&state.pool, input.technology_id)
        .await?
        .ok_or_else(|| AppError::not_found("Technology", input.technology_id))?;

    let progress =
        UserProgressRepo::log_hours(&state.pool, auth.user_id, input.technology_id, input.hours)
            .await?;
    tracing::info!(
        user_id = auth.user_id,
        technology_id = input.technology_id,
        hours = input.hours,
        total_hours = progress.total_hours,
        "Study hours logged",
    );
    Ok(Json(progress))
}

/// GET /api/v1/progress/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Dashboard>> {
    let dashboard = DashboardRepo::load(&state.pool, auth.user_id).await?;
    Ok(Json(dashboard))
}
