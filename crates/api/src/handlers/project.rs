//! Handlers for `/projects`. Every route is scoped to the caller: other
//! users' projects answer 404.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use checkforge_core::conditional::is_step_visible;
use checkforge_core::error::CoreError;
use checkforge_core::markdown::{attachment_filename, render_guide, GuideDoc, GuideEntry};
use checkforge_core::progress::is_complete;
use checkforge_core::project_status::ProjectStatus;
use checkforge_core::types::DbId;
use checkforge_db::models::code_snippet::CodeSnippet;
use checkforge_db::models::project::{
    CreateProject, CreateProjectRequest, ProjectListFilter, ProjectListParams, ProjectSummary,
    ProjectUpdate, UpdateProject, UpdateProjectRequest,
};
use checkforge_db::models::project_response::{AddResponse, ProjectResponse};
use checkforge_db::models::template_step::TemplateStep;
use checkforge_db::repositories::{
    CodeSnippetRepo, ProjectRepo, ProjectResponseRepo, TemplateStepRepo,
};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::handlers::template::{find_visible, markdown_attachment, snippet_docs, snippets_by_step};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// A template step as seen from a project: its snippets, the project's
/// answer if any, and whether the conditional rules show it.
#[derive(Debug, Serialize)]
pub struct ProjectStep {
    #[serde(flatten)]
    pub step: TemplateStep,
    pub snippets: Vec<CodeSnippet>,
    pub response: Option<ProjectResponse>,
    pub visible: bool,
}

#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: ProjectSummary,
    pub steps: Vec<ProjectStep>,
}

#[derive(Debug, Serialize)]
pub struct ResponseRecorded {
    pub response: ProjectResponse,
    pub progress_percentage: i16,
}

#[derive(Debug, Serialize)]
pub struct GuideResponse {
    pub project: ProjectSummary,
    pub guide_markdown: String,
}

/// Statuses a project may be created in. Completion goes through an update
/// so progress bookkeeping runs.
const INITIAL_STATUSES: [ProjectStatus; 2] = [ProjectStatus::Draft, ProjectStatus::InProgress];

async fn find_summary(state: &AppState, id: DbId, user_id: DbId) -> AppResult<ProjectSummary> {
    ProjectRepo::find_summary(&state.pool, id, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Project", id))
}

/// GET /api/v1/projects
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ProjectListParams>,
) -> AppResult<Json<Vec<ProjectSummary>>> {
    let status_id = params
        .status
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(ProjectStatus::parse)
        .transpose()?
        .map(ProjectStatus::id);

    let filter = ProjectListFilter {
        status_id,
        technology_id: params.technology_id,
        search: params.search,
        ordering: params.ordering,
    };
    let projects = ProjectRepo::list_for_user(&state.pool, auth.user_id, &filter).await?;
    Ok(Json(projects))
}

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<CreateProjectRequest>,
) -> AppResult<(StatusCode, Json<ProjectSummary>)> {
    let status = match input.status.as_deref() {
        Some(name) => ProjectStatus::parse(name)?,
        None => ProjectStatus::Draft,
    };
    if !INITIAL_STATUSES.contains(&status) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Projects cannot be created with status '{status}'"
        ))));
    }
    find_visible(&state, input.template_id, Some(auth.user_id)).await?;

    let project = ProjectRepo::create(
        &state.pool,
        &CreateProject {
            user_id: auth.user_id,
            template_id: input.template_id,
            name: input.name,
            description: input.description,
            status_id: status.id(),
        },
    )
    .await?;
    tracing::info!(
        project_id = project.id,
        template_id = project.template_id,
        user_id = auth.user_id,
        status = %status,
        "Project created",
    );

    let summary = find_summary(&state, project.id, auth.user_id).await?;
    Ok((StatusCode::CREATED, Json(summary)))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProjectDetail>> {
    let project = find_summary(&state, id, auth.user_id).await?;
    let template_id = project.project.template_id;

    let steps = TemplateStepRepo::list_for_template(&state.pool, template_id).await?;
    let mut snippets =
        snippets_by_step(CodeSnippetRepo::list_for_template(&state.pool, template_id).await?);
    let mut responses: HashMap<DbId, ProjectResponse> =
        ProjectResponseRepo::list_for_project(&state.pool, id)
            .await?
            .into_iter()
            .map(|r| (r.template_step_id, r))
            .collect();

    let visibility: HashMap<DbId, bool> = steps
        .iter()
        .map(|step| {
            let parent_answer = step
                .parent_step_id
                .and_then(|parent| responses.get(&parent))
                .map(|r| r.answer.as_str());
            let visible = is_step_visible(
                step.parent_step_id.is_some(),
                &step.condition_value,
                parent_answer,
            );
            (step.id, visible)
        })
        .collect();

    let steps = steps
        .into_iter()
        .map(|step| ProjectStep {
            snippets: snippets.remove(&step.id).unwrap_or_default(),
            response: responses.remove(&step.id),
            visible: visibility.get(&step.id).copied().unwrap_or(true),
            step,
        })
        .collect();
    Ok(Json(ProjectDetail { project, steps }))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateProjectRequest>,
) -> AppResult<Json<ProjectSummary>> {
    find_summary(&state, id, auth.user_id).await?;
    let status = input
        .status
        .as_deref()
        .map(ProjectStatus::parse)
        .transpose()?;

    let changes = UpdateProject {
        name: input.name,
        description: input.description,
        status,
    };
    match ProjectRepo::update(&state.pool, id, &changes).await? {
        ProjectUpdate::Applied(_) => {}
        ProjectUpdate::NotFound => return Err(AppError::not_found("Project", id)),
        ProjectUpdate::Rejected(err) => return Err(AppError::Core(err)),
    }

    let summary = find_summary(&state, id, auth.user_id).await?;
    tracing::info!(project_id = id, user_id = auth.user_id, status = %summary.status, "Project updated");
    Ok(Json(summary))
}

/// DELETE /api/v1/projects/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    find_summary(&state, id, auth.user_id).await?;
    ProjectRepo::delete(&state.pool, id).await?;
    tracing::info!(project_id = id, user_id = auth.user_id, "Project deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/projects/{id}/add_response
///
/// Upserts the answer for one step and returns the refreshed progress.
/// A step from another template answers 404.
pub async fn add_response(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<AddResponse>,
) -> AppResult<Json<ResponseRecorded>> {
    find_summary(&state, id, auth.user_id).await?;
    let (response, progress_percentage) =
        ProjectResponseRepo::add_response(&state.pool, id, &input)
            .await?
            .ok_or_else(|| AppError::not_found("TemplateStep", input.template_step_id))?;
    if is_complete(progress_percentage) {
        tracing::info!(project_id = id, user_id = auth.user_id, "All required steps answered");
    }
    Ok(Json(ResponseRecorded {
        response,
        progress_percentage,
    }))
}

async fn build_guide(state: &AppState, project: &ProjectSummary) -> AppResult<String> {
    let answered = ProjectResponseRepo::answered_steps(&state.pool, project.project.id).await?;
    let snippets = snippets_by_step(
        CodeSnippetRepo::list_for_template(&state.pool, project.project.template_id).await?,
    );

    let doc = GuideDoc {
        project_name: &project.project.name,
        template_name: &project.template_name,
        technology: &project.technology_name,
        status: &project.status,
        progress: project.project.progress_percentage,
        description: &project.project.description,
        entries: answered
            .iter()
            .map(|a| GuideEntry {
                order: a.step_order,
                question: &a.question,
                answer: &a.answer,
                comment: &a.comment,
                snippets: snippets
                    .get(&a.template_step_id)
                    .map(|s| snippet_docs(s))
                    .unwrap_or_default(),
            })
            .collect(),
    };
    Ok(render_guide(&doc))
}

/// GET /api/v1/projects/{id}/generate_guide
pub async fn generate_guide(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<GuideResponse>> {
    let project = find_summary(&state, id, auth.user_id).await?;
    let guide_markdown = build_guide(&state, &project).await?;
    Ok(Json(GuideResponse {
        project,
        guide_markdown,
    }))
}

/// GET /api/v1/projects/{id}/export_guide
pub async fn export_guide(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let project = find_summary(&state, id, auth.user_id).await?;
    let body = build_guide(&state, &project).await?;
    let filename = attachment_filename("guide_", &project.project.name);
    Ok(markdown_attachment(&filename, body))
}
