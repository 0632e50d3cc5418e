//! Repository for the `cordages` table.

use sqlx::PgPool;
use stringdesk_core::types::DbId;

use crate::models::catalog::{Cordage, CreateCordage, UpdateCordage};

/// Column list for `cordages` queries.
const COLUMNS: &str = "\
    id, name, is_base_class, tournament_gain_cents, magasin_gain_cents, \
    created_at, updated_at";

pub struct CordageRepo;

impl CordageRepo {
    pub async fn create(pool: &PgPool, input: &CreateCordage) -> Result<Cordage, sqlx::Error> {
        let query = format!(
            "INSERT INTO cordages (name, is_base_class, tournament_gain_cents, magasin_gain_cents) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Cordage>(&query)
            .bind(input.name.trim())
            .bind(input.is_base_class)
            .bind(input.tournament_gain_cents)
            .bind(input.magasin_gain_cents)
            .fetch_one(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Cordage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cordages ORDER BY name");
        sqlx::query_as::<_, Cordage>(&query).fetch_all(pool).await
    }

    /// Returns `None` if no cordage with the given ID exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCordage,
    ) -> Result<Option<Cordage>, sqlx::Error> {
        let query = format!(
            "UPDATE cordages SET \
                is_base_class = COALESCE($2, is_base_class), \
                tournament_gain_cents = COALESCE($3, tournament_gain_cents), \
                magasin_gain_cents = COALESCE($4, magasin_gain_cents), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Cordage>(&query)
            .bind(id)
            .bind(input.is_base_class)
            .bind(input.tournament_gain_cents)
            .bind(input.magasin_gain_cents)
            .fetch_optional(pool)
            .await
    }
}
