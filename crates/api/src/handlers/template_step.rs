//! Handlers for steps and code snippets nested under `/templates/{id}`.
//!
//! Reads follow template visibility; every mutation requires the template
//! owner.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use checkforge_core::catalog::{validate_required_text, validate_step_order, MAX_QUESTION_LENGTH};
use checkforge_core::conditional::validate_parent_chain;
use checkforge_core::step_type::{validate_choices, validate_step_type, DEFAULT_STEP_TYPE};
use checkforge_core::types::DbId;
use checkforge_db::models::code_snippet::{CodeSnippet, CreateCodeSnippet};
use checkforge_db::models::template_step::{
    CreateTemplateStep, StepUpdate, TemplateStep, UpdateTemplateStep,
};
use checkforge_db::repositories::{CodeSnippetRepo, TemplateStepRepo};

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::handlers::template::{find_owned, find_visible};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::state::AppState;

/// GET /api/v1/templates/{id}/steps
pub async fn list_steps(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Path(template_id): Path<DbId>,
) -> AppResult<Json<Vec<TemplateStep>>> {
    find_visible(&state, template_id, viewer.user_id()).await?;
    let steps = TemplateStepRepo::list_for_template(&state.pool, template_id).await?;
    Ok(Json(steps))
}

/// POST /api/v1/templates/{id}/steps
pub async fn create_step(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(template_id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<CreateTemplateStep>,
) -> AppResult<(StatusCode, Json<TemplateStep>)> {
    find_owned(&state, template_id, auth.user_id).await?;

    validate_required_text("Question", &input.question, MAX_QUESTION_LENGTH)?;
    validate_step_order(input.order)?;
    let step_type = input.step_type.as_deref().unwrap_or(DEFAULT_STEP_TYPE);
    validate_step_type(step_type)?;
    validate_choices(step_type, input.choices.as_ref())?;

    if input.parent_step_id.is_some() {
        let parents = TemplateStepRepo::parent_map(&state.pool, template_id).await?;
        validate_parent_chain(None, input.parent_step_id, &parents)?;
    }

    let step = TemplateStepRepo::create(&state.pool, template_id, &input).await?;
    Ok((StatusCode::CREATED, Json(step)))
}

/// PUT /api/v1/templates/{id}/steps/{step_id}
///
/// Type and choices are validated against the merged result, so changing
/// a `choice` step to another type must also send `"choices": null`. A new
/// parent is checked by the repository under a lock.
pub async fn update_step(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((template_id, step_id)): Path<(DbId, DbId)>,
    ValidatedJson(input): ValidatedJson<UpdateTemplateStep>,
) -> AppResult<Json<TemplateStep>> {
    find_owned(&state, template_id, auth.user_id).await?;
    let existing = find_step(&state, template_id, step_id).await?;

    if let Some(question) = &input.question {
        validate_required_text("Question", question, MAX_QUESTION_LENGTH)?;
    }
    if let Some(order) = input.order {
        validate_step_order(order)?;
    }

    let step_type = input.step_type.as_deref().unwrap_or(&existing.step_type);
    validate_step_type(step_type)?;
    let choices = match &input.choices {
        Some(new) => new.as_ref(),
        None => existing.choices.as_ref(),
    };
    validate_choices(step_type, choices)?;

    let step = match TemplateStepRepo::update(&state.pool, template_id, step_id, &input).await? {
        StepUpdate::Applied(step) => step,
        StepUpdate::NotFound => return Err(AppError::not_found("TemplateStep", step_id)),
        StepUpdate::Rejected(err) => return Err(AppError::Core(err)),
    };
    tracing::info!(template_id, step_id, user_id = auth.user_id, "Template step updated");
    Ok(Json(step))
}

/// DELETE /api/v1/templates/{id}/steps/{step_id}
pub async fn delete_step(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((template_id, step_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    find_owned(&state, template_id, auth.user_id).await?;
    if !TemplateStepRepo::delete(&state.pool, template_id, step_id).await? {
        return Err(AppError::not_found("TemplateStep", step_id));
    }
    tracing::info!(template_id, step_id, user_id = auth.user_id, "Template step deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/templates/{id}/steps/{step_id}/snippets
pub async fn create_snippet(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((template_id, step_id)): Path<(DbId, DbId)>,
    ValidatedJson(input): ValidatedJson<CreateCodeSnippet>,
) -> AppResult<(StatusCode, Json<CodeSnippet>)> {
    find_owned(&state, template_id, auth.user_id).await?;
    find_step(&state, template_id, step_id).await?;

    let snippet = CodeSnippetRepo::create(&state.pool, step_id, &input).await?;
    tracing::info!(
        template_id,
        step_id,
        snippet_id = snippet.id,
        language = %snippet.language,
        "Code snippet added",
    );
    Ok((StatusCode::CREATED, Json(snippet)))
}

/// DELETE /api/v1/templates/{id}/steps/{step_id}/snippets/{snippet_id}
pub async fn delete_snippet(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((template_id, step_id, snippet_id)): Path<(DbId, DbId, DbId)>,
) -> AppResult<StatusCode> {
    find_owned(&state, template_id, auth.user_id).await?;
    find_step(&state, template_id, step_id).await?;

    if !CodeSnippetRepo::delete(&state.pool, step_id, snippet_id).await? {
        return Err(AppError::not_found("CodeSnippet", snippet_id));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn find_step(state: &AppState, template_id: DbId, step_id: DbId) -> AppResult<TemplateStep> {
    let mut conn = state.pool.acquire().await?;
    TemplateStepRepo::find_in_template(&mut conn, template_id, step_id)
        .await?
        .ok_or_else(|| AppError::not_found("TemplateStep", step_id))
}
