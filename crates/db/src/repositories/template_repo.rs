//! Repository for the `templates` table.

use checkforge_core::catalog::DEFAULT_TEMPLATE_VERSION;
use checkforge_core::types::DbId;
use sqlx::PgPool;

use crate::models::template::{CreateTemplate, Template, TemplateListFilter, TemplateSummary};

const COLUMNS: &str = "id, technology_id, name, description, version, is_public, \
                       created_by, created_at, updated_at";

/// Template summary projection. `$1` is the viewing user (NULL when
/// anonymous) and drives `is_favorited`.
pub(crate) const SUMMARY_SELECT: &str = "SELECT t.id, t.technology_id, t.name, t.description, \
        t.version, t.is_public, t.created_by, t.created_at, t.updated_at, \
        tech.name AS technology_name, tech.icon AS technology_icon, \
        tech.color AS technology_color, u.username AS created_by_username, \
        (SELECT COUNT(*) FROM template_steps s WHERE s.template_id = t.id) AS steps_count, \
        EXISTS (SELECT 1 FROM favorites f \
                 WHERE f.template_id = t.id AND f.user_id = $1) AS is_favorited";

pub(crate) const SUMMARY_FROM: &str = "FROM templates t \
     JOIN technologies tech ON tech.id = t.technology_id \
     JOIN users u ON u.id = t.created_by";

pub struct TemplateRepo;

impl TemplateRepo {
    /// Insert a template owned by `created_by`. Missing version and
    /// visibility fall back to `"1.0"` and public.
    pub async fn create(
        pool: &PgPool,
        created_by: DbId,
        input: &CreateTemplate,
    ) -> Result<Template, sqlx::Error> {
        let query = format!(
            "INSERT INTO templates (technology_id, name, description, version, is_public, created_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(input.technology_id)
            .bind(input.name.trim())
            .bind(&input.description)
            .bind(input.version.as_deref().unwrap_or(DEFAULT_TEMPLATE_VERSION))
            .bind(input.is_public.unwrap_or(true))
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Template>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM templates WHERE id = $1");
        sqlx::query_as::<_, Template>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Summary of a single template regardless of visibility; callers
    /// decide whether the viewer may see it.
    pub async fn find_summary(
        pool: &PgPool,
        id: DbId,
        viewer: Option<DbId>,
    ) -> Result<Option<TemplateSummary>, sqlx::Error> {
        let query = format!("{SUMMARY_SELECT} {SUMMARY_FROM} WHERE t.id = $2");
        sqlx::query_as::<_, TemplateSummary>(&query)
            .bind(viewer)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Templates the viewer may see: all public ones plus their own.
    pub async fn list_visible(
        pool: &PgPool,
        viewer: Option<DbId>,
        filter: &TemplateListFilter,
    ) -> Result<Vec<TemplateSummary>, sqlx::Error> {
        let query = format!(
            "{SUMMARY_SELECT} {SUMMARY_FROM}
             WHERE (t.is_public OR t.created_by = $1)
               AND ($2::BIGINT IS NULL OR t.technology_id = $2)
               AND ($3::BIGINT IS NULL OR t.created_by = $3)
               AND ($4::TEXT IS NULL
                    OR t.name ILIKE '%' || $4 || '%'
                    OR t.description ILIKE '%' || $4 || '%')
             ORDER BY {}",
            filter.ordering.order_by()
        );
        sqlx::query_as::<_, TemplateSummary>(&query)
            .bind(viewer)
            .bind(filter.technology_id)
            .bind(filter.created_by)
            .bind(filter.search.as_deref().filter(|s| !s.trim().is_empty()))
            .fetch_all(pool)
            .await
    }

    /// Public templates of one technology, oldest first when
    /// `oldest_first` is set (roadmap order), otherwise by name.
    pub async fn list_public_for_technology(
        pool: &PgPool,
        technology_id: DbId,
        viewer: Option<DbId>,
        oldest_first: bool,
    ) -> Result<Vec<TemplateSummary>, sqlx::Error> {
        let order = if oldest_first {
            "t.created_at ASC, t.id ASC"
        } else {
            "t.name ASC, t.id ASC"
        };
        let query = format!(
            "{SUMMARY_SELECT} {SUMMARY_FROM}
             WHERE t.technology_id = $2 AND t.is_public
             ORDER BY {order}"
        );
        sqlx::query_as::<_, TemplateSummary>(&query)
            .bind(viewer)
            .bind(technology_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a template with its steps, snippets, projects and favorites.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM templates WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
