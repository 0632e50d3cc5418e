//! Repository for the `tournaments` table.

use sqlx::PgPool;
use stringdesk_core::types::{DbId, Timestamp};

use crate::models::tournament::{CreateTournament, Tournament};

/// Column list for `tournaments` queries.
const COLUMNS: &str =
    "id, name, start_date, end_date, locked, locked_at, created_at, updated_at";

pub struct TournamentRepo;

impl TournamentRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateTournament,
    ) -> Result<Tournament, sqlx::Error> {
        let query = format!(
            "INSERT INTO tournaments (name, start_date, end_date) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tournament>(&query)
            .bind(input.name.trim())
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Tournament>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tournaments WHERE id = $1");
        sqlx::query_as::<_, Tournament>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_name(
        pool: &PgPool,
        name: &str,
    ) -> Result<Option<Tournament>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tournaments WHERE name = $1");
        sqlx::query_as::<_, Tournament>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// All tournaments, newest first. Undated tournaments come last.
    pub async fn list(pool: &PgPool) -> Result<Vec<Tournament>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tournaments ORDER BY start_date DESC NULLS LAST, name"
        );
        sqlx::query_as::<_, Tournament>(&query).fetch_all(pool).await
    }

    /// `Some` locks the tournament at that time, `None` unlocks it.
    pub async fn set_locked(
        pool: &PgPool,
        name: &str,
        locked_at: Option<Timestamp>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE tournaments SET locked = $2, locked_at = $3, updated_at = NOW() \
             WHERE name = $1",
        )
        .bind(name)
        .bind(locked_at.is_some())
        .bind(locked_at)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
