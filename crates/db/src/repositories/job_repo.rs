//! Repository for the `jobs` table.
//!
//! Reads join `clubs` and `tournaments` so rows carry names. Writes that
//! return a row use a data-modifying CTE named `j` and the same join.

use chrono::NaiveDate;
use sqlx::PgPool;
use stringdesk_core::freeze::FrozenValues;
use stringdesk_core::money::Cents;
use stringdesk_core::status::StatusUpdate;
use stringdesk_core::types::{DbId, Timestamp};

use crate::models::job::{Job, JobFilter, JobPatch, NewJob};

/// Column list for joined `jobs` queries. Expects the job row aliased `j`.
const COLUMNS: &str = "\
    j.id, j.tournament_id, t.name AS tournament, j.club_id, c.name AS club, \
    j.cordage, j.stringer, j.job_date, j.supplied_by_customer, j.complimentary, \
    j.express, j.payment_mode, j.notified_at, j.returned_at, j.status, \
    j.price_cents, j.commission_cents, j.commission_frozen_at, j.exported, \
    j.created_at, j.updated_at";

/// Joins that resolve club and tournament names.
const JOINS: &str = "\
    JOIN clubs c ON c.id = j.club_id \
    LEFT JOIN tournaments t ON t.id = j.tournament_id";

pub struct JobRepo;

impl JobRepo {
    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Job>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM jobs j {JOINS} WHERE j.id = $1");
        sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List jobs matching every provided filter, newest first.
    pub async fn list(pool: &PgPool, filter: &JobFilter) -> Result<Vec<Job>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM jobs j {JOINS} \
             WHERE ($1::DATE IS NULL OR j.job_date >= $1) \
               AND ($2::DATE IS NULL OR j.job_date <= $2) \
               AND ($3::BIGINT IS NULL OR j.club_id = $3) \
               AND ($4::TEXT IS NULL OR UPPER(j.cordage) = UPPER($4)) \
               AND ($5::TEXT IS NULL OR j.status = $5) \
               AND ($6::BIGINT IS NULL OR j.tournament_id = $6) \
               AND ($7::BOOL IS NULL OR (j.tournament_id IS NULL) = $7) \
             ORDER BY j.job_date DESC, j.id DESC"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(filter.from)
            .bind(filter.to)
            .bind(filter.club_id)
            .bind(filter.cordage.as_deref())
            .bind(filter.status.as_deref())
            .bind(filter.tournament_id)
            .bind(filter.magasin)
            .fetch_all(pool)
            .await
    }

    /// Every job of a tournament, in id order.
    pub async fn list_by_tournament(
        pool: &PgPool,
        tournament: &str,
    ) -> Result<Vec<Job>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM jobs j {JOINS} WHERE t.name = $1 ORDER BY j.id"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(tournament)
            .fetch_all(pool)
            .await
    }

    /// Every job dated within `[from, to]`, oldest first.
    pub async fn list_between(
        pool: &PgPool,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Job>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM jobs j {JOINS} \
             WHERE j.job_date BETWEEN $1 AND $2 \
             ORDER BY j.job_date, j.id"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    pub async fn create(pool: &PgPool, input: &NewJob) -> Result<Job, sqlx::Error> {
        let query = format!(
            "WITH j AS ( \
                INSERT INTO jobs (tournament_id, club_id, cordage, stringer, job_date, \
                    supplied_by_customer, complimentary, express, payment_mode, \
                    notified_at, returned_at, status, price_cents) \
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
                RETURNING * \
             ) \
             SELECT {COLUMNS} FROM j {JOINS}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(input.tournament_id)
            .bind(input.club_id)
            .bind(input.cordage.trim())
            .bind(input.stringer.as_deref())
            .bind(input.job_date)
            .bind(input.supplied_by_customer)
            .bind(input.complimentary)
            .bind(input.express)
            .bind(input.payment_mode.map(|m| m.as_str()))
            .bind(input.notified_at)
            .bind(input.returned_at)
            .bind(input.status.as_str())
            .bind(input.price.map(|p| p.0))
            .fetch_one(pool)
            .await
    }

    /// Patch a job's facts. Returns `None` if the job does not exist.
    ///
    /// `None` fields keep their value; the stringer can also be cleared.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        patch: &JobPatch,
    ) -> Result<Option<Job>, sqlx::Error> {
        let query = format!(
            "WITH j AS ( \
                UPDATE jobs SET \
                    club_id = COALESCE($2, club_id), \
                    cordage = COALESCE($3, cordage), \
                    stringer = CASE WHEN $9 THEN $4 ELSE stringer END, \
                    job_date = COALESCE($5, job_date), \
                    supplied_by_customer = COALESCE($6, supplied_by_customer), \
                    complimentary = COALESCE($7, complimentary), \
                    express = COALESCE($8, express), \
                    updated_at = NOW() \
                WHERE id = $1 \
                RETURNING * \
             ) \
             SELECT {COLUMNS} FROM j {JOINS}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .bind(patch.club_id)
            .bind(patch.cordage.as_deref())
            .bind(patch.stringer.clone().flatten())
            .bind(patch.job_date)
            .bind(patch.supplied_by_customer)
            .bind(patch.complimentary)
            .bind(patch.express)
            .bind(patch.stringer.is_some())
            .fetch_optional(pool)
            .await
    }

    /// Write the outcome of a status toggle.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        update: &StatusUpdate,
    ) -> Result<Option<Job>, sqlx::Error> {
        let query = format!(
            "WITH j AS ( \
                UPDATE jobs SET \
                    status = $2, \
                    payment_mode = $3, \
                    notified_at = $4, \
                    returned_at = $5, \
                    updated_at = NOW() \
                WHERE id = $1 \
                RETURNING * \
             ) \
             SELECT {COLUMNS} FROM j {JOINS}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .bind(update.status.as_str())
            .bind(update.payment_mode.map(|m| m.as_str()))
            .bind(update.notified_at)
            .bind(update.returned_at)
            .fetch_optional(pool)
            .await
    }

    /// Persist the latest computed price of a live job.
    pub async fn set_price(pool: &PgPool, id: DbId, price: Cents) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE jobs SET price_cents = $2 WHERE id = $1 AND commission_frozen_at IS NULL",
        )
        .bind(id)
        .bind(price.0)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Freeze one job's commission. Already frozen jobs are left untouched.
    pub async fn freeze(
        pool: &PgPool,
        id: DbId,
        frozen: FrozenValues,
        at: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE jobs SET \
                price_cents = $2, \
                commission_cents = $3, \
                commission_frozen_at = $4, \
                updated_at = NOW() \
             WHERE id = $1 AND commission_frozen_at IS NULL",
        )
        .bind(id)
        .bind(frozen.price.0)
        .bind(frozen.commission.0)
        .bind(at)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Clear every frozen commission of a tournament's jobs.
    pub async fn clear_snapshots(pool: &PgPool, tournament: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE jobs SET commission_cents = NULL, commission_frozen_at = NULL, \
                updated_at = NOW() \
             WHERE commission_frozen_at IS NOT NULL \
               AND tournament_id = (SELECT id FROM tournaments WHERE name = $1)",
        )
        .bind(tournament)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Flag tournament jobs as copied into the shop ledger.
    pub async fn mark_exported(pool: &PgPool, ids: &[DbId]) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE jobs SET exported = TRUE, updated_at = NOW() WHERE id = ANY($1)",
        )
        .bind(ids)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
