//! Repository for the `code_snippets` table.

use checkforge_core::types::DbId;
use sqlx::PgPool;

use crate::models::code_snippet::{CodeSnippet, CreateCodeSnippet};

const COLUMNS: &str =
    "id, template_step_id, language, code, description, is_example, created_at, updated_at";

pub struct CodeSnippetRepo;

impl CodeSnippetRepo {
    pub async fn create(
        pool: &PgPool,
        template_step_id: DbId,
        input: &CreateCodeSnippet,
    ) -> Result<CodeSnippet, sqlx::Error> {
        let query = format!(
            "INSERT INTO code_snippets (template_step_id, language, code, description, is_example)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CodeSnippet>(&query)
            .bind(template_step_id)
            .bind(input.language.trim().to_lowercase())
            .bind(&input.code)
            .bind(&input.description)
            .bind(input.is_example.unwrap_or(true))
            .fetch_one(pool)
            .await
    }

    /// All snippets of a template's steps, grouped by step then id.
    pub async fn list_for_template(
        pool: &PgPool,
        template_id: DbId,
    ) -> Result<Vec<CodeSnippet>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM code_snippets c
             JOIN template_steps s ON s.id = c.template_step_id
             WHERE s.template_id = $1
             ORDER BY s.step_order ASC, c.id ASC",
            prefixed("c")
        );
        sqlx::query_as::<_, CodeSnippet>(&query)
            .bind(template_id)
            .fetch_all(pool)
            .await
    }

    /// Remove a snippet only if it hangs off `template_step_id`.
    pub async fn delete(
        pool: &PgPool,
        template_step_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM code_snippets WHERE id = $1 AND template_step_id = $2")
                .bind(id)
                .bind(template_step_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn prefixed(alias: &str) -> String {
    COLUMNS
        .split(", ")
        .map(|col| format!("{alias}.{col}"))
        .collect::<Vec<_>>()
        .join(", ")
}
