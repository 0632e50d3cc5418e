//! Repository for the `clubs` table.

use sqlx::PgPool;
use stringdesk_core::keys::canonical_key;
use stringdesk_core::types::DbId;

use crate::models::catalog::{Club, CreateClub, UpdateClub};

/// Column list for `clubs` queries.
const COLUMNS: &str =
    "id, name, supplies_base_reel, supplies_specific_reel, created_at, updated_at";

pub struct ClubRepo;

impl ClubRepo {
    pub async fn create(pool: &PgPool, input: &CreateClub) -> Result<Club, sqlx::Error> {
        let query = format!(
            "INSERT INTO clubs (name, supplies_base_reel, supplies_specific_reel) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Club>(&query)
            .bind(input.name.trim())
            .bind(input.supplies_base_reel)
            .bind(input.supplies_specific_reel)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Club>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clubs WHERE id = $1");
        sqlx::query_as::<_, Club>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a club by name, ignoring case, accents and punctuation.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Club>, sqlx::Error> {
        let key = canonical_key(name);
        Ok(Self::list(pool)
            .await?
            .into_iter()
            .find(|club| canonical_key(&club.name) == key))
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Club>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clubs ORDER BY name");
        sqlx::query_as::<_, Club>(&query).fetch_all(pool).await
    }

    /// Returns `None` if no club with the given ID exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateClub,
    ) -> Result<Option<Club>, sqlx::Error> {
        let query = format!(
            "UPDATE clubs SET \
                supplies_base_reel = COALESCE($2, supplies_base_reel), \
                supplies_specific_reel = COALESCE($3, supplies_specific_reel), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Club>(&query)
            .bind(id)
            .bind(input.supplies_base_reel)
            .bind(input.supplies_specific_reel)
            .fetch_optional(pool)
            .await
    }
}
