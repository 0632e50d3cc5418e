//! Repository for the `tariff_matrix` table.

use sqlx::PgPool;
use stringdesk_core::tariff::TariffKey;

use crate::models::tariff::TariffRow;

/// Column list for `tariff_matrix` queries.
const COLUMNS: &str = "\
    id, club_supplies_base, club_supplies_specific, cordage_is_base, price_cents, updated_at";

pub struct TariffRepo;

impl TariffRepo {
    pub async fn list(pool: &PgPool) -> Result<Vec<TariffRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tariff_matrix \
             ORDER BY club_supplies_base, club_supplies_specific, cordage_is_base"
        );
        sqlx::query_as::<_, TariffRow>(&query).fetch_all(pool).await
    }

    /// Set the price of one matrix cell, creating the row if missing.
    pub async fn upsert(
        pool: &PgPool,
        key: TariffKey,
        price_cents: i64,
    ) -> Result<TariffRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO tariff_matrix \
                (club_supplies_base, club_supplies_specific, cordage_is_base, price_cents) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT ON CONSTRAINT uq_tariff_matrix_key \
             DO UPDATE SET price_cents = EXCLUDED.price_cents, updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TariffRow>(&query)
            .bind(key.club_supplies_base)
            .bind(key.club_supplies_specific)
            .bind(key.cordage_is_base)
            .bind(price_cents)
            .fetch_one(pool)
            .await
    }

    /// Remove one matrix cell. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, key: TariffKey) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM tariff_matrix \
             WHERE club_supplies_base = $1 AND club_supplies_specific = $2 AND cordage_is_base = $3",
        )
        .bind(key.club_supplies_base)
        .bind(key.club_supplies_specific)
        .bind(key.cordage_is_base)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
