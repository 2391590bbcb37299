//! Repository for the `projects` table, including progress recomputation.

use checkforge_core::progress::progress_percentage;
use checkforge_core::project_status::{is_completion, validate_transition, ProjectStatus, StatusId};
use checkforge_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::project::{
    CreateProject, Project, ProjectListFilter, ProjectSummary, ProjectUpdate, UpdateProject,
};
use crate::repositories::UserProgressRepo;

const COLUMNS: &str = "id, user_id, template_id, name, description, status_id, \
                       progress_percentage, created_at, updated_at";

const SUMMARY_SELECT: &str = "SELECT p.id, p.user_id, p.template_id, p.name, p.description, \
        p.status_id, p.progress_percentage, p.created_at, p.updated_at, \
        ps.name AS status, t.name AS template_name, tech.id AS technology_id, \
        tech.name AS technology_name, tech.color AS technology_color \
     FROM projects p \
     JOIN project_statuses ps ON ps.id = p.status_id \
     JOIN templates t ON t.id = p.template_id \
     JOIN technologies tech ON tech.id = t.technology_id";

pub struct ProjectRepo;

impl ProjectRepo {
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (user_id, template_id, name, description, status_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(input.user_id)
            .bind(input.template_id)
            .bind(input.name.trim())
            .bind(&input.description)
            .bind(input.status_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a project only if it belongs to `user_id`.
    pub async fn find_owned(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Joined summary of an owned project.
    pub async fn find_summary(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<ProjectSummary>, sqlx::Error> {
        let query = format!("{SUMMARY_SELECT} WHERE p.id = $1 AND p.user_id = $2");
        sqlx::query_as::<_, ProjectSummary>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// A user's projects, filtered and sorted.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        filter: &ProjectListFilter,
    ) -> Result<Vec<ProjectSummary>, sqlx::Error> {
        let query = format!(
            "{SUMMARY_SELECT}
             WHERE p.user_id = $1
               AND ($2::SMALLINT IS NULL OR p.status_id = $2)
               AND ($3::BIGINT IS NULL OR tech.id = $3)
               AND ($4::TEXT IS NULL
                    OR p.name ILIKE '%' || $4 || '%'
                    OR p.description ILIKE '%' || $4 || '%')
             ORDER BY {}",
            filter.ordering.order_by()
        );
        sqlx::query_as::<_, ProjectSummary>(&query)
            .bind(user_id)
            .bind(filter.status_id)
            .bind(filter.technology_id)
            .bind(filter.search.as_deref().filter(|s| !s.trim().is_empty()))
            .fetch_all(pool)
            .await
    }

    /// Apply the non-`None` fields of `input`.
    ///
    /// The row is locked before a requested status is checked against the
    /// transition table, so concurrent updates are judged against the
    /// status they will actually replace. A transition into `completed`
    /// re-derives the owner's per-technology progress in the same
    /// transaction.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<ProjectUpdate, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let current: Option<StatusId> =
            sqlx::query_scalar("SELECT status_id FROM projects WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(current) = current else {
            return Ok(ProjectUpdate::NotFound);
        };

        let mut completes = false;
        if let Some(to) = input.status {
            let from = ProjectStatus::from_id(current).ok_or_else(|| {
                sqlx::Error::Decode(format!("unknown project status id {current}").into())
            })?;
            if let Err(err) = validate_transition(from, to) {
                return Ok(ProjectUpdate::Rejected(err));
            }
            completes = is_completion(from, to);
        }

        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                status_id = COALESCE($4, status_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.description)
            .bind(input.status.map(ProjectStatus::id))
            .fetch_one(&mut *tx)
            .await?;

        if completes {
            let technology_id: DbId =
                sqlx::query_scalar("SELECT technology_id FROM templates WHERE id = $1")
                    .bind(project.template_id)
                    .fetch_one(&mut *tx)
                    .await?;
            let progress =
                UserProgressRepo::sync_completion(&mut *tx, project.user_id, technology_id)
                    .await?;
            tracing::info!(
                project_id = project.id,
                user_id = project.user_id,
                technology_id,
                projects_completed = progress.projects_completed,
                level = progress.level,
                "Project completed",
            );
        }
        tx.commit().await?;
        Ok(ProjectUpdate::Applied(project))
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Recompute and store a project's completion percentage.
    ///
    /// Only completed responses to required steps of the project's own
    /// template count. Returns `None` if the project does not exist.
    pub async fn recalculate_progress(
        conn: &mut PgConnection,
        project_id: DbId,
    ) -> Result<Option<i16>, sqlx::Error> {
        let counts: Option<(i64, i64)> = sqlx::query_as(
            "SELECT
                (SELECT COUNT(*) FROM template_steps s
                  WHERE s.template_id = p.template_id AND s.is_required),
                (SELECT COUNT(*) FROM project_responses r
                  JOIN template_steps s ON s.id = r.template_step_id
                  WHERE r.project_id = p.id
                    AND r.is_completed
                    AND s.is_required
                    AND s.template_id = p.template_id)
             FROM projects p
             WHERE p.id = $1",
        )
        .bind(project_id)
        .fetch_optional(&mut *conn)
        .await?;

        let Some((total_required, completed)) = counts else {
            return Ok(None);
        };
        let percentage = progress_percentage(completed, total_required);

        sqlx::query("UPDATE projects SET progress_percentage = $2 WHERE id = $1")
            .bind(project_id)
            .bind(percentage)
            .execute(&mut *conn)
            .await?;

        tracing::debug!(project_id, completed, total_required, percentage, "Progress recalculated");
        Ok(Some(percentage))
    }

    /// Recompute progress of every project on a template. Returns how many
    /// projects were refreshed.
    pub async fn recalculate_for_template(
        conn: &mut PgConnection,
        template_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let ids: Vec<DbId> =
            sqlx::query_scalar("SELECT id FROM projects WHERE template_id = $1 ORDER BY id FOR UPDATE")
                .bind(template_id)
                .fetch_all(&mut *conn)
                .await?;
        for id in &ids {
            Self::recalculate_progress(&mut *conn, *id).await?;
        }
        Ok(ids.len() as u64)
    }
}
