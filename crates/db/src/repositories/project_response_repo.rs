//! Repository for the `project_responses` table.

use checkforge_core::types::DbId;
use sqlx::PgPool;

use crate::models::project_response::{AddResponse, AnsweredStep, ProjectResponse};
use crate::repositories::{ProjectRepo, TemplateStepRepo};

const COLUMNS: &str = "id, project_id, template_step_id, answer, comment, is_completed, \
                       created_at, updated_at";

pub struct ProjectResponseRepo;

impl ProjectResponseRepo {
    /// Upsert the answer to one step and recompute the project's progress,
    /// all in one transaction.
    ///
    /// The project row is locked first so concurrent answers to the same
    /// project serialize. Returns `None` when the project does not exist or
    /// the step is not part of the project's template.
    pub async fn add_response(
        pool: &PgPool,
        project_id: DbId,
        input: &AddResponse,
    ) -> Result<Option<(ProjectResponse, i16)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let template_id: Option<DbId> =
            sqlx::query_scalar("SELECT template_id FROM projects WHERE id = $1 FOR UPDATE")
                .bind(project_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(template_id) = template_id else {
            return Ok(None);
        };

        if TemplateStepRepo::find_in_template(&mut *tx, template_id, input.template_step_id)
            .await?
            .is_none()
        {
            return Ok(None);
        }

        let query = format!(
            "INSERT INTO project_responses (project_id, template_step_id, answer, comment, is_completed)
             VALUES ($1, $2, $3, $4, true)
             ON CONFLICT (project_id, template_step_id) DO UPDATE SET
                answer = EXCLUDED.answer,
                comment = EXCLUDED.comment,
                is_completed = true
             RETURNING {COLUMNS}"
        );
        let response = sqlx::query_as::<_, ProjectResponse>(&query)
            .bind(project_id)
            .bind(input.template_step_id)
            .bind(&input.answer)
            .bind(&input.comment)
            .fetch_one(&mut *tx)
            .await?;

        let Some(progress) = ProjectRepo::recalculate_progress(&mut *tx, project_id).await? else {
            return Ok(None);
        };
        tx.commit().await?;

        tracing::info!(
            project_id,
            template_step_id = input.template_step_id,
            progress,
            "Response recorded",
        );
        Ok(Some((response, progress)))
    }

    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ProjectResponse>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_responses WHERE project_id = $1 ORDER BY id ASC"
        );
        sqlx::query_as::<_, ProjectResponse>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Responses joined with their step, in checklist order.
    pub async fn answered_steps(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<AnsweredStep>, sqlx::Error> {
        sqlx::query_as::<_, AnsweredStep>(
            "SELECT r.template_step_id, s.step_order, s.question, r.answer, r.comment
             FROM project_responses r
             JOIN template_steps s ON s.id = r.template_step_id
             WHERE r.project_id = $1
             ORDER BY s.step_order ASC, s.id ASC",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }
}
