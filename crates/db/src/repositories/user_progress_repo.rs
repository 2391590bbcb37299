//! Repository for the `user_progress` table.

use checkforge_core::gamification::{calculate_level, merge_earned_badges};
use checkforge_core::project_status::ProjectStatus;
use checkforge_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::user_progress::{UserProgress, UserProgressWithTechnology};

const COLUMNS: &str = "id, user_id, technology_id, projects_completed, total_hours, level, \
                       badges, last_activity, created_at, updated_at";

pub struct UserProgressRepo;

impl UserProgressRepo {
    /// Re-derive the (user, technology) row from the user's completed
    /// projects: count, level and milestone badges. Existing badges are
    /// kept.
    pub async fn sync_completion(
        conn: &mut PgConnection,
        user_id: DbId,
        technology_id: DbId,
    ) -> Result<UserProgress, sqlx::Error> {
        let completed: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM projects p
             JOIN templates t ON t.id = p.template_id
             WHERE p.user_id = $1 AND t.technology_id = $2 AND p.status_id = $3",
        )
        .bind(user_id)
        .bind(technology_id)
        .bind(ProjectStatus::Completed.id())
        .fetch_one(&mut *conn)
        .await?;
        let completed = i32::try_from(completed).unwrap_or(i32::MAX);

        let existing: Option<Vec<String>> = sqlx::query_scalar(
            "SELECT badges FROM user_progress
             WHERE user_id = $1 AND technology_id = $2
             FOR UPDATE",
        )
        .bind(user_id)
        .bind(technology_id)
        .fetch_optional(&mut *conn)
        .await?;

        let mut badges = existing.unwrap_or_default();
        let added = merge_earned_badges(&mut badges, completed);
        let level = calculate_level(completed);

        let query = format!(
            "INSERT INTO user_progress
                (user_id, technology_id, projects_completed, level, badges, last_activity)
             VALUES ($1, $2, $3, $4, $5, NOW())
             ON CONFLICT (user_id, technology_id) DO UPDATE SET
                projects_completed = EXCLUDED.projects_completed,
                level = EXCLUDED.level,
                badges = EXCLUDED.badges,
                last_activity = NOW()
             RETURNING {COLUMNS}"
        );
        let progress = sqlx::query_as::<_, UserProgress>(&query)
            .bind(user_id)
            .bind(technology_id)
            .bind(completed)
            .bind(level)
            .bind(&badges)
            .fetch_one(&mut *conn)
            .await?;

        if !added.is_empty() {
            tracing::info!(user_id, technology_id, badges = ?added, "Badges awarded");
        }
        Ok(progress)
    }

    /// Add study hours to the (user, technology) row, creating it if needed.
    pub async fn log_hours(
        pool: &PgPool,
        user_id: DbId,
        technology_id: DbId,
        hours: i32,
    ) -> Result<UserProgress, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_progress (user_id, technology_id, total_hours, last_activity)
             VALUES ($1, $2, $3, NOW())
             ON CONFLICT (user_id, technology_id) DO UPDATE SET
                total_hours = user_progress.total_hours + EXCLUDED.total_hours,
                last_activity = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserProgress>(&query)
            .bind(user_id)
            .bind(technology_id)
            .bind(hours)
            .fetch_one(pool)
            .await
    }

    pub async fn find(
        pool: &PgPool,
        user_id: DbId,
        technology_id: DbId,
    ) -> Result<Option<UserProgress>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_progress WHERE user_id = $1 AND technology_id = $2"
        );
        sqlx::query_as::<_, UserProgress>(&query)
            .bind(user_id)
            .bind(technology_id)
            .fetch_optional(pool)
            .await
    }

    /// All progress rows of a user with technology display fields.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<UserProgressWithTechnology>, sqlx::Error> {
        sqlx::query_as::<_, UserProgressWithTechnology>(
            "SELECT up.id, up.user_id, up.technology_id, up.projects_completed,
                    up.total_hours, up.level, up.badges, up.last_activity,
                    up.created_at, up.updated_at,
                    tech.name AS technology_name, tech.icon AS technology_icon,
                    tech.color AS technology_color
             FROM user_progress up
             JOIN technologies tech ON tech.id = up.technology_id
             WHERE up.user_id = $1
             ORDER BY tech.name ASC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
