//! Handlers for `/templates`: catalog, favorites toggle, project start and
//! markdown export.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use checkforge_core::catalog::{
    validate_required_text, validate_version, MAX_TEMPLATE_NAME_LENGTH,
};
use checkforge_core::error::CoreError;
use checkforge_core::markdown::{attachment_filename, render_template, SnippetDoc, StepDoc, TemplateDoc};
use checkforge_core::project_status::ProjectStatus;
use checkforge_core::types::DbId;
use checkforge_db::models::code_snippet::CodeSnippet;
use checkforge_db::models::favorite::FavoriteToggle;
use checkforge_db::models::project::{CreateProject, ProjectSummary, StartProjectRequest};
use checkforge_db::models::template::{CreateTemplate, Template, TemplateListFilter, TemplateSummary};
use checkforge_db::models::template_step::TemplateStep;
use checkforge_db::repositories::{
    CodeSnippetRepo, FavoriteRepo, ProjectRepo, TechnologyRepo, TemplateRepo, TemplateStepRepo,
};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::state::AppState;

/// A step with its code snippets.
#[derive(Debug, Serialize)]
pub struct StepWithSnippets {
    #[serde(flatten)]
    pub step: TemplateStep,
    pub snippets: Vec<CodeSnippet>,
}

/// Template detail: summary plus ordered steps.
#[derive(Debug, Serialize)]
pub struct TemplateDetail {
    #[serde(flatten)]
    pub template: TemplateSummary,
    pub steps: Vec<StepWithSnippets>,
}

pub const MARKDOWN_CONTENT_TYPE: &str = "text/markdown; charset=utf-8";

/// Load a template the viewer may see: public, or owned by the viewer.
/// Anything else is reported as missing.
pub async fn find_visible(
    state: &AppState,
    id: DbId,
    viewer: Option<DbId>,
) -> AppResult<TemplateSummary> {
    TemplateRepo::find_summary(&state.pool, id, viewer)
        .await?
        .filter(|t| t.template.is_public || Some(t.template.created_by) == viewer)
        .ok_or_else(|| AppError::not_found("Template", id))
}

/// Load a template for modification by its owner: 404 when not visible,
/// 403 when visible but owned by someone else.
pub async fn find_owned(state: &AppState, id: DbId, user_id: DbId) -> AppResult<Template> {
    let summary = find_visible(state, id, Some(user_id)).await?;
    if summary.template.created_by != user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the template owner can modify it".into(),
        )));
    }
    Ok(summary.template)
}

/// Group a template's snippets by step id.
pub fn snippets_by_step(snippets: Vec<CodeSnippet>) -> HashMap<DbId, Vec<CodeSnippet>> {
    let mut grouped: HashMap<DbId, Vec<CodeSnippet>> = HashMap::new();
    for snippet in snippets {
        grouped.entry(snippet.template_step_id).or_default().push(snippet);
    }
    grouped
}

pub fn snippet_docs(snippets: &[CodeSnippet]) -> Vec<SnippetDoc<'_>> {
    snippets
        .iter()
        .map(|s| SnippetDoc {
            language: &s.language,
            code: &s.code,
            is_example: s.is_example,
        })
        .collect()
}

/// A markdown file download response.
pub fn markdown_attachment(filename: &str, body: String) -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, MARKDOWN_CONTENT_TYPE.to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
}

/// GET /api/v1/templates
pub async fn list(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Query(filter): Query<TemplateListFilter>,
) -> AppResult<Json<Vec<TemplateSummary>>> {
    let templates = TemplateRepo::list_visible(&state.pool, viewer.user_id(), &filter).await?;
    Ok(Json(templates))
}

/// POST /api/v1/templates
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<CreateTemplate>,
) -> AppResult<(StatusCode, Json<TemplateSummary>)> {
    validate_required_text("Name", &input.name, MAX_TEMPLATE_NAME_LENGTH)?;
    if let Some(version) = &input.version {
        validate_version(version)?;
    }
    if TechnologyRepo::find_by_id(&state.pool, input.technology_id)
        .await?
        .is_none()
    {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Technology {} does not exist",
            input.technology_id
        ))));
    }

    let template = TemplateRepo::create(&state.pool, auth.user_id, &input).await?;
    tracing::info!(
        template_id = template.id,
        technology_id = template.technology_id,
        user_id = auth.user_id,
        "Template created",
    );

    let summary = TemplateRepo::find_summary(&state.pool, template.id, Some(auth.user_id))
        .await?
        .ok_or_else(|| AppError::not_found("Template", template.id))?;
    Ok((StatusCode::CREATED, Json(summary)))
}

/// GET /api/v1/templates/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<TemplateDetail>> {
    let template = find_visible(&state, id, viewer.user_id()).await?;
    let steps = TemplateStepRepo::list_for_template(&state.pool, id).await?;
    let mut snippets = snippets_by_step(CodeSnippetRepo::list_for_template(&state.pool, id).await?);

    let steps = steps
        .into_iter()
        .map(|step| StepWithSnippets {
            snippets: snippets.remove(&step.id).unwrap_or_default(),
            step,
        })
        .collect();
    Ok(Json(TemplateDetail { template, steps }))
}

/// DELETE /api/v1/templates/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    find_owned(&state, id, auth.user_id).await?;
    TemplateRepo::delete(&state.pool, id).await?;
    tracing::info!(template_id = id, user_id = auth.user_id, "Template deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/templates/{id}/favorite
pub async fn toggle_favorite(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<FavoriteToggle>> {
    find_visible(&state, id, Some(auth.user_id)).await?;
    let favorited = FavoriteRepo::toggle(&state.pool, auth.user_id, id).await?;
    Ok(Json(FavoriteToggle { favorited }))
}

/// POST /api/v1/templates/{id}/start_project
///
/// Creates an in-progress project for the caller. The body is optional.
pub async fn start_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    body: Option<ValidatedJson<StartProjectRequest>>,
) -> AppResult<(StatusCode, Json<ProjectSummary>)> {
    let template = find_visible(&state, id, Some(auth.user_id)).await?;
    let input = body.map(|ValidatedJson(b)| b).unwrap_or_default();

    let name = input
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| template.template.name.clone());

    let project = ProjectRepo::create(
        &state.pool,
        &CreateProject {
            user_id: auth.user_id,
            template_id: id,
            name,
            description: input.description.unwrap_or_default(),
            status_id: ProjectStatus::InProgress.id(),
        },
    )
    .await?;
    tracing::info!(project_id = project.id, template_id = id, user_id = auth.user_id, "Project started");

    let summary = ProjectRepo::find_summary(&state.pool, project.id, auth.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Project", project.id))?;
    Ok((StatusCode::CREATED, Json(summary)))
}

/// GET /api/v1/templates/{id}/export_markdown
pub async fn export_markdown(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let summary = find_visible(&state, id, viewer.user_id()).await?;
    let steps = TemplateStepRepo::list_for_template(&state.pool, id).await?;
    let snippets = snippets_by_step(CodeSnippetRepo::list_for_template(&state.pool, id).await?);

    let doc = TemplateDoc {
        name: &summary.template.name,
        technology: &summary.technology_name,
        description: &summary.template.description,
        steps: steps
            .iter()
            .map(|step| StepDoc {
                order: step.step_order,
                question: &step.question,
                description: &step.description,
                snippets: snippets
                    .get(&step.id)
                    .map(|s| snippet_docs(s))
                    .unwrap_or_default(),
            })
            .collect(),
    };
    let body = render_template(&doc);
    let filename = attachment_filename("", &summary.template.name);
    Ok(markdown_attachment(&filename, body))
}
