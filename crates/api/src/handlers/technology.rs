//! Handlers for `/technologies`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use checkforge_core::catalog::{
    validate_color, validate_required_text, MAX_ICON_LENGTH, MAX_TECHNOLOGY_NAME_LENGTH,
};
use checkforge_core::error::CoreError;
use checkforge_core::types::DbId;
use checkforge_db::models::technology::{
    CreateTechnology, Technology, TechnologyDelete, TechnologyOrdering, TechnologyWithCount,
};
use checkforge_db::models::template::TemplateSummary;
use checkforge_db::repositories::{TechnologyRepo, TemplateRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::query::SearchParams;
use crate::state::AppState;

/// A technology with its public templates, oldest first.
#[derive(Debug, Serialize)]
pub struct Roadmap {
    pub technology: Technology,
    pub templates: Vec<TemplateSummary>,
}

fn validate_icon(icon: &str) -> Result<(), CoreError> {
    let len = icon.chars().count();
    if len > MAX_ICON_LENGTH {
        return Err(CoreError::Validation(format!(
            "Icon must not exceed {MAX_ICON_LENGTH} characters, got {len}"
        )));
    }
    Ok(())
}

/// GET /api/v1/technologies
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<SearchParams<TechnologyOrdering>>,
) -> AppResult<Json<Vec<TechnologyWithCount>>> {
    let technologies = TechnologyRepo::list(
        &state.pool,
        params.search_term(),
        params.ordering.unwrap_or_default(),
    )
    .await?;
    Ok(Json(technologies))
}

/// POST /api/v1/technologies
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<CreateTechnology>,
) -> AppResult<(StatusCode, Json<Technology>)> {
    validate_required_text("Name", &input.name, MAX_TECHNOLOGY_NAME_LENGTH)?;
    validate_icon(&input.icon)?;
    validate_color(&input.color)?;

    let technology = TechnologyRepo::create(&state.pool, &input).await?;
    tracing::info!(
        technology_id = technology.id,
        name = %technology.name,
        user_id = auth.user_id,
        "Technology created",
    );
    Ok((StatusCode::CREATED, Json(technology)))
}

/// GET /api/v1/technologies/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<TechnologyWithCount>> {
    let technology = TechnologyRepo::find_with_count(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Technology", id))?;
    Ok(Json(technology))
}

/// DELETE /api/v1/technologies/{id}
///
/// Technologies are shared reference data: one that any template or
/// progress row points at answers 409 instead of being removed.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    match TechnologyRepo::delete(&state.pool, id).await? {
        TechnologyDelete::Deleted => {}
        TechnologyDelete::NotFound => return Err(AppError::not_found("Technology", id)),
        TechnologyDelete::InUse => {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "Technology {id} is still referenced by templates or progress"
            ))))
        }
    }
    tracing::info!(technology_id = id, user_id = auth.user_id, "Technology deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/technologies/{id}/templates
pub async fn templates(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<TemplateSummary>>> {
    ensure_exists(&state, id).await?;
    let templates =
        TemplateRepo::list_public_for_technology(&state.pool, id, viewer.user_id(), false).await?;
    Ok(Json(templates))
}

/// GET /api/v1/technologies/{id}/roadmap
pub async fn roadmap(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Roadmap>> {
    let technology = ensure_exists(&state, id).await?;
    let templates =
        TemplateRepo::list_public_for_technology(&state.pool, id, viewer.user_id(), true).await?;
    Ok(Json(Roadmap {
        technology,
        templates,
    }))
}

async fn ensure_exists(state: &AppState, id: DbId) -> AppResult<Technology> {
    TechnologyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Technology", id))
}
