//! Repository for the `technologies` table.

use checkforge_core::types::DbId;
use sqlx::PgPool;

use crate::models::technology::{
    CreateTechnology, Technology, TechnologyDelete, TechnologyOrdering, TechnologyWithCount,
};

const COLUMNS: &str =
    "id, name, description, icon, color, documentation_url, created_at, updated_at";

/// Technology columns prefixed with `t.` plus the public template count.
const COUNTED_SELECT: &str = "SELECT t.id, t.name, t.description, t.icon, t.color, \
        t.documentation_url, t.created_at, t.updated_at, \
        (SELECT COUNT(*) FROM templates tp \
          WHERE tp.technology_id = t.id AND tp.is_public) AS templates_count \
     FROM technologies t";

pub struct TechnologyRepo;

impl TechnologyRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateTechnology,
    ) -> Result<Technology, sqlx::Error> {
        let query = format!(
            "INSERT INTO technologies (name, description, icon, color, documentation_url)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Technology>(&query)
            .bind(input.name.trim())
            .bind(&input.description)
            .bind(&input.icon)
            .bind(&input.color)
            .bind(&input.documentation_url)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Technology>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM technologies WHERE id = $1");
        sqlx::query_as::<_, Technology>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a technology together with its public template count.
    pub async fn find_with_count(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<TechnologyWithCount>, sqlx::Error> {
        let query = format!("{COUNTED_SELECT} WHERE t.id = $1");
        sqlx::query_as::<_, TechnologyWithCount>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List technologies, optionally filtered by a case-insensitive
    /// substring of name or description.
    pub async fn list(
        pool: &PgPool,
        search: Option<&str>,
        ordering: TechnologyOrdering,
    ) -> Result<Vec<TechnologyWithCount>, sqlx::Error> {
        let query = format!(
            "{COUNTED_SELECT}
             WHERE ($1::TEXT IS NULL
                    OR t.name ILIKE '%' || $1 || '%'
                    OR t.description ILIKE '%' || $1 || '%')
             ORDER BY {}",
            ordering.order_by()
        );
        sqlx::query_as::<_, TechnologyWithCount>(&query)
            .bind(search)
            .fetch_all(pool)
            .await
    }

    /// Delete a technology nothing refers to.
    ///
    /// The row lock blocks concurrent template or progress inserts, whose
    /// foreign key checks need a share lock on it, until the reference
    /// check and the delete are done.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<TechnologyDelete, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let locked: Option<DbId> =
            sqlx::query_scalar("SELECT id FROM technologies WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Ok(TechnologyDelete::NotFound);
        }

        let in_use: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM templates WHERE technology_id = $1)
                 OR EXISTS (SELECT 1 FROM user_progress WHERE technology_id = $1)",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
        if in_use {
            return Ok(TechnologyDelete::InUse);
        }

        sqlx::query("DELETE FROM technologies WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(TechnologyDelete::Deleted)
    }
}
