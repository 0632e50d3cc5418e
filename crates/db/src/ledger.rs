//! PostgreSQL-backed [`TournamentLedger`].

use async_trait::async_trait;
use sqlx::PgPool;
use stringdesk_core::freeze::{FrozenValues, TournamentLedger};
use stringdesk_core::job::{Job, Tournament};
use stringdesk_core::types::{DbId, Timestamp};

use crate::models::job::Job as JobRow;
use crate::repositories::{JobRepo, TournamentRepo};

/// Runs the freeze lifecycle against the `tournaments` and `jobs` tables.
#[derive(Clone)]
pub struct PgTournamentLedger {
    pool: PgPool,
}

impl PgTournamentLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Convert joined rows to domain jobs. A row with an unreadable label is
/// reported as a decode error.
pub fn rows_into_domain(rows: Vec<JobRow>) -> Result<Vec<Job>, sqlx::Error> {
    rows.into_iter()
        .map(|row| row.into_domain().map_err(|e| sqlx::Error::Decode(Box::new(e))))
        .collect()
}

#[async_trait]
impl TournamentLedger for PgTournamentLedger {
    type Error = sqlx::Error;

    async fn load_tournament(&self, name: &str) -> Result<Option<Tournament>, sqlx::Error> {
        Ok(TournamentRepo::find_by_name(&self.pool, name)
            .await?
            .map(|t| t.into_domain()))
    }

    async fn list_jobs(&self, tournament: &str) -> Result<Vec<Job>, sqlx::Error> {
        rows_into_domain(JobRepo::list_by_tournament(&self.pool, tournament).await?)
    }

    async fn freeze_job(
        &self,
        job_id: DbId,
        frozen: FrozenValues,
        at: Timestamp,
    ) -> Result<(), sqlx::Error> {
        if !JobRepo::freeze(&self.pool, job_id, frozen, at).await? {
            tracing::debug!(job_id, "Job already frozen, left untouched");
        }
        Ok(())
    }

    async fn clear_snapshots(&self, tournament: &str) -> Result<u64, sqlx::Error> {
        JobRepo::clear_snapshots(&self.pool, tournament).await
    }

    async fn set_locked(
        &self,
        tournament: &str,
        locked_at: Option<Timestamp>,
    ) -> Result<(), sqlx::Error> {
        if TournamentRepo::set_locked(&self.pool, tournament, locked_at).await? {
            Ok(())
        } else {
            Err(sqlx::Error::RowNotFound)
        }
    }
}
