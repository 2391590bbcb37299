//! Repository for the `favorites` table.

use checkforge_core::types::DbId;
use sqlx::{FromRow, PgPool};

use crate::models::favorite::{Favorite, FavoriteEntry};
use crate::repositories::template_repo::{SUMMARY_FROM, SUMMARY_SELECT};

const COLUMNS: &str = "id, user_id, template_id, created_at, updated_at";

#[derive(FromRow)]
struct UpsertedFavorite {
    #[sqlx(flatten)]
    favorite: Favorite,
    created: bool,
}

pub struct FavoriteRepo;

impl FavoriteRepo {
    /// Flip the bookmark for (user, template). Returns the new state:
    /// `true` if the template is now favorited.
    pub async fn toggle(
        pool: &PgPool,
        user_id: DbId,
        template_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let removed = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND template_id = $2")
            .bind(user_id)
            .bind(template_id)
            .execute(&mut *tx)
            .await?
            .rows_affected()
            > 0;

        if !removed {
            // A concurrent toggle may have inserted first; either way the
            // row exists afterwards.
            sqlx::query(
                "INSERT INTO favorites (user_id, template_id) VALUES ($1, $2)
                 ON CONFLICT (user_id, template_id) DO NOTHING",
            )
            .bind(user_id)
            .bind(template_id)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        let favorited = !removed;
        tracing::info!(user_id, template_id, favorited, "Favorite toggled");
        Ok(favorited)
    }

    /// Idempotently add a favorite. The flag is `true` when a new row was
    /// created.
    ///
    /// A single upsert, so a concurrent toggle cannot remove the row
    /// between the insert and the read. Re-adding touches `updated_at`.
    pub async fn add(
        pool: &PgPool,
        user_id: DbId,
        template_id: DbId,
    ) -> Result<(Favorite, bool), sqlx::Error> {
        let query = format!(
            "INSERT INTO favorites (user_id, template_id) VALUES ($1, $2)
             ON CONFLICT (user_id, template_id) DO UPDATE SET user_id = EXCLUDED.user_id
             RETURNING {COLUMNS}, (xmax = 0) AS created"
        );
        let row = sqlx::query_as::<_, UpsertedFavorite>(&query)
            .bind(user_id)
            .bind(template_id)
            .fetch_one(pool)
            .await?;
        Ok((row.favorite, row.created))
    }

    pub async fn exists(
        pool: &PgPool,
        user_id: DbId,
        template_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM favorites WHERE user_id = $1 AND template_id = $2)",
        )
        .bind(user_id)
        .bind(template_id)
        .fetch_one(pool)
        .await
    }

    /// A user's favorites with template summaries, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<FavoriteEntry>, sqlx::Error> {
        let query = format!(
            "{SUMMARY_SELECT}, f.id AS favorite_id, f.created_at AS favorited_at
             {SUMMARY_FROM}
             JOIN favorites f ON f.template_id = t.id
             WHERE f.user_id = $1
             ORDER BY f.created_at DESC, f.id DESC"
        );
        sqlx::query_as::<_, FavoriteEntry>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Remove a favorite owned by `user_id`.
    pub async fn delete(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM favorites WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
