//! Read-only aggregates for the progress dashboard.

use checkforge_core::project_status::ProjectStatus;
use checkforge_core::types::DbId;
use sqlx::PgPool;

use crate::models::dashboard::{
    completion_rate, Dashboard, DashboardStats, FavoriteTemplateRef, RecentProject,
};
use crate::repositories::UserProgressRepo;

/// Number of projects shown under "recent".
pub const RECENT_PROJECTS_LIMIT: i64 = 5;

pub struct DashboardRepo;

impl DashboardRepo {
    pub async fn stats(pool: &PgPool, user_id: DbId) -> Result<DashboardStats, sqlx::Error> {
        let (total_projects, completed_projects, technologies_used): (i64, i64, i64) =
            sqlx::query_as(
                "SELECT
                    (SELECT COUNT(*) FROM projects WHERE user_id = $1),
                    (SELECT COUNT(*) FROM projects WHERE user_id = $1 AND status_id = $2),
                    (SELECT COUNT(DISTINCT t.technology_id)
                       FROM favorites f JOIN templates t ON t.id = f.template_id
                      WHERE f.user_id = $1)",
            )
            .bind(user_id)
            .bind(ProjectStatus::Completed.id())
            .fetch_one(pool)
            .await?;

        Ok(DashboardStats {
            total_projects,
            completed_projects,
            technologies_used,
            completion_rate: completion_rate(completed_projects, total_projects),
        })
    }

    pub async fn recent_projects(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<RecentProject>, sqlx::Error> {
        sqlx::query_as::<_, RecentProject>(
            "SELECT p.id, p.name, ps.name AS status, p.progress_percentage, p.updated_at
             FROM projects p
             JOIN project_statuses ps ON ps.id = p.status_id
             WHERE p.user_id = $1
             ORDER BY p.updated_at DESC, p.id DESC
             LIMIT $2",
        )
        .bind(user_id)
        .bind(RECENT_PROJECTS_LIMIT)
        .fetch_all(pool)
        .await
    }

    pub async fn favorite_templates(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<FavoriteTemplateRef>, sqlx::Error> {
        sqlx::query_as::<_, FavoriteTemplateRef>(
            "SELECT t.id, t.name
             FROM favorites f JOIN templates t ON t.id = f.template_id
             WHERE f.user_id = $1
             ORDER BY f.created_at DESC, f.id DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Assemble the full dashboard for one user.
    pub async fn load(pool: &PgPool, user_id: DbId) -> Result<Dashboard, sqlx::Error> {
        Ok(Dashboard {
            stats: Self::stats(pool, user_id).await?,
            progress_by_technology: UserProgressRepo::list_for_user(pool, user_id).await?,
            recent_projects: Self::recent_projects(pool, user_id).await?,
            favorite_templates: Self::favorite_templates(pool, user_id).await?,
        })
    }
}
