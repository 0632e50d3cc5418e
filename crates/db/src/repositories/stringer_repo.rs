//! Repository for the `stringers` table.

use sqlx::PgPool;
use stringdesk_core::types::DbId;

use crate::models::catalog::{CreateStringer, Stringer, UpdateStringer};

/// Column list for `stringers` queries.
const COLUMNS: &str = "id, name, paid_in_shop, created_at, updated_at";

pub struct StringerRepo;

impl StringerRepo {
    pub async fn create(pool: &PgPool, input: &CreateStringer) -> Result<Stringer, sqlx::Error> {
        let query = format!(
            "INSERT INTO stringers (name, paid_in_shop) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Stringer>(&query)
            .bind(input.name.trim())
            .bind(input.paid_in_shop)
            .fetch_one(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Stringer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stringers ORDER BY name");
        sqlx::query_as::<_, Stringer>(&query).fetch_all(pool).await
    }

    /// Returns `None` if no stringer with the given ID exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateStringer,
    ) -> Result<Option<Stringer>, sqlx::Error> {
        let query = format!(
            "UPDATE stringers SET \
                paid_in_shop = COALESCE($2, paid_in_shop), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Stringer>(&query)
            .bind(id)
            .bind(input.paid_in_shop)
            .fetch_optional(pool)
            .await
    }
}
