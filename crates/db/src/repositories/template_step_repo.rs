//! Repository for the `template_steps` table.
//!
//! Every mutation recomputes progress for all projects on the template in
//! the same transaction, since adding, removing or toggling a required step
//! changes the denominator.

use std::collections::HashMap;

use checkforge_core::conditional::validate_parent_chain;
use checkforge_core::step_type::DEFAULT_STEP_TYPE;
use checkforge_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::template_step::{
    CreateTemplateStep, StepUpdate, TemplateStep, UpdateTemplateStep,
};
use crate::repositories::ProjectRepo;

const COLUMNS: &str = "id, template_id, question, description, step_type, is_required, \
                       step_order, parent_step_id, condition_value, choices, created_at, updated_at";

pub struct TemplateStepRepo;

impl TemplateStepRepo {
    /// Steps of a template in checklist order.
    pub async fn list_for_template(
        pool: &PgPool,
        template_id: DbId,
    ) -> Result<Vec<TemplateStep>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM template_steps
             WHERE template_id = $1
             ORDER BY step_order ASC, id ASC"
        );
        sqlx::query_as::<_, TemplateStep>(&query)
            .bind(template_id)
            .fetch_all(pool)
            .await
    }

    /// Find a step only if it belongs to `template_id`.
    pub async fn find_in_template(
        conn: &mut PgConnection,
        template_id: DbId,
        step_id: DbId,
    ) -> Result<Option<TemplateStep>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM template_steps WHERE id = $1 AND template_id = $2");
        sqlx::query_as::<_, TemplateStep>(&query)
            .bind(step_id)
            .bind(template_id)
            .fetch_optional(conn)
            .await
    }

    /// Map of every step in the template to its parent, for cycle checks.
    pub async fn parent_map(
        pool: &PgPool,
        template_id: DbId,
    ) -> Result<HashMap<DbId, Option<DbId>>, sqlx::Error> {
        let rows: Vec<(DbId, Option<DbId>)> =
            sqlx::query_as("SELECT id, parent_step_id FROM template_steps WHERE template_id = $1")
                .bind(template_id)
                .fetch_all(pool)
                .await?;
        Ok(rows.into_iter().collect())
    }

    /// Like [`Self::parent_map`], but row-locks every step of the template
    /// so parent reassignments on it run one at a time.
    async fn lock_parent_map(
        conn: &mut PgConnection,
        template_id: DbId,
    ) -> Result<HashMap<DbId, Option<DbId>>, sqlx::Error> {
        let rows: Vec<(DbId, Option<DbId>)> = sqlx::query_as(
            "SELECT id, parent_step_id FROM template_steps
             WHERE template_id = $1
             ORDER BY id
             FOR UPDATE",
        )
        .bind(template_id)
        .fetch_all(conn)
        .await?;
        Ok(rows.into_iter().collect())
    }

    /// Insert a step and refresh progress of the template's projects.
    pub async fn create(
        pool: &PgPool,
        template_id: DbId,
        input: &CreateTemplateStep,
    ) -> Result<TemplateStep, sqlx::Error> {
        let query = format!(
            "INSERT INTO template_steps
                (template_id, question, description, step_type, is_required,
                 step_order, parent_step_id, condition_value, choices)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        let mut tx = pool.begin().await?;
        let step = sqlx::query_as::<_, TemplateStep>(&query)
            .bind(template_id)
            .bind(input.question.trim())
            .bind(&input.description)
            .bind(input.step_type.as_deref().unwrap_or(DEFAULT_STEP_TYPE))
            .bind(input.is_required.unwrap_or(true))
            .bind(input.order)
            .bind(input.parent_step_id)
            .bind(input.condition_value.trim())
            .bind(&input.choices)
            .fetch_one(&mut *tx)
            .await?;
        let refreshed = ProjectRepo::recalculate_for_template(&mut *tx, template_id).await?;
        tx.commit().await?;

        tracing::info!(template_id, step_id = step.id, refreshed, "Template step created");
        Ok(step)
    }

    /// Apply the provided fields of `input`. `parent_step_id` and `choices`
    /// are cleared by an explicit `null`.
    ///
    /// A new parent is checked for membership and cycles against the
    /// template's locked parent links before anything is written.
    pub async fn update(
        pool: &PgPool,
        template_id: DbId,
        step_id: DbId,
        input: &UpdateTemplateStep,
    ) -> Result<StepUpdate, sqlx::Error> {
        let query = format!(
            "UPDATE template_steps SET
                question = COALESCE($3, question),
                description = COALESCE($4, description),
                step_type = COALESCE($5, step_type),
                is_required = COALESCE($6, is_required),
                step_order = COALESCE($7, step_order),
                parent_step_id = CASE WHEN $8 THEN $9 ELSE parent_step_id END,
                condition_value = COALESCE($10, condition_value),
                choices = CASE WHEN $11 THEN $12 ELSE choices END
             WHERE template_id = $1 AND id = $2
             RETURNING {COLUMNS}"
        );
        let mut tx = pool.begin().await?;
        if let Some(new_parent) = input.parent_step_id {
            let parents = Self::lock_parent_map(&mut *tx, template_id).await?;
            if !parents.contains_key(&step_id) {
                return Ok(StepUpdate::NotFound);
            }
            if let Err(err) = validate_parent_chain(Some(step_id), new_parent, &parents) {
                return Ok(StepUpdate::Rejected(err));
            }
        }

        let step = sqlx::query_as::<_, TemplateStep>(&query)
            .bind(template_id)
            .bind(step_id)
            .bind(input.question.as_deref().map(str::trim))
            .bind(&input.description)
            .bind(&input.step_type)
            .bind(input.is_required)
            .bind(input.order)
            .bind(input.parent_step_id.is_some())
            .bind(input.parent_step_id.flatten())
            .bind(input.condition_value.as_deref().map(str::trim))
            .bind(input.choices.is_some())
            .bind(input.choices.clone().flatten())
            .fetch_optional(&mut *tx)
            .await?;

        let Some(step) = step else {
            return Ok(StepUpdate::NotFound);
        };
        ProjectRepo::recalculate_for_template(&mut *tx, template_id).await?;
        tx.commit().await?;
        Ok(StepUpdate::Applied(step))
    }

    /// Delete a step (children and responses cascade) and refresh progress.
    pub async fn delete(
        pool: &PgPool,
        template_id: DbId,
        step_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let result = sqlx::query("DELETE FROM template_steps WHERE template_id = $1 AND id = $2")
            .bind(template_id)
            .bind(step_id)
            .execute(&mut *tx)
            .await?;
        let deleted = result.rows_affected() > 0;
        if deleted {
            ProjectRepo::recalculate_for_template(&mut *tx, template_id).await?;
        }
        tx.commit().await?;
        Ok(deleted)
    }
}
