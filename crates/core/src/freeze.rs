//! Tournament freeze lifecycle.
//!
//! Finalizing a tournament records each strung job's tournament commission
//! as a frozen amount, then locks the tournament. Unfreezing clears every
//! snapshot and unlocks it. Storage is reached only through
//! [`TournamentLedger`].

use async_trait::async_trait;
use serde::Serialize;

use crate::commission::resolve_commission;
use crate::error::CoreError;
use crate::job::{Job, SaleContext, Tournament};
use crate::money::Cents;
use crate::pricing::quote_price;
use crate::settings::EngineSnapshot;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Store seam
// ---------------------------------------------------------------------------

/// The storage operations the freeze lifecycle needs.
#[async_trait]
pub trait TournamentLedger: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn load_tournament(&self, name: &str) -> Result<Option<Tournament>, Self::Error>;

    /// Every job of the tournament, in id order.
    async fn list_jobs(&self, tournament: &str) -> Result<Vec<Job>, Self::Error>;

    /// Persist one frozen commission with the price it was computed from.
    /// A single-row patch.
    async fn freeze_job(&self, job_id: DbId, frozen: FrozenValues, at: Timestamp)
        -> Result<(), Self::Error>;

    /// Clear the frozen commission of every job of the tournament. Returns
    /// the number of jobs that were frozen.
    async fn clear_snapshots(&self, tournament: &str) -> Result<u64, Self::Error>;

    /// `Some` locks the tournament at that time, `None` unlocks it.
    async fn set_locked(&self, tournament: &str, locked_at: Option<Timestamp>)
        -> Result<(), Self::Error>;
}

/// What finalizing records on one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrozenValues {
    pub price: Cents,
    pub commission: Cents,
}

// ---------------------------------------------------------------------------
// Errors and reports
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum FreezeError<E: std::error::Error + 'static> {
    #[error("Tournament not found: {0}")]
    TournamentNotFound(String),

    #[error("Store error: {0}")]
    Store(#[source] E),

    /// Jobs before `job_id` keep their snapshot; the tournament stays
    /// unlocked until a re-run completes.
    #[error("Freeze stopped after {frozen} job(s): job {job_id} failed: {source}")]
    PartialFreeze {
        frozen: usize,
        job_id: DbId,
        #[source]
        source: E,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FreezeReport {
    /// Jobs frozen by this run.
    pub frozen: usize,
    /// Jobs already frozen by an earlier run.
    pub already_frozen: usize,
    /// Jobs left live because the racket is not strung.
    pub not_strung: usize,
    /// Sum of the commissions frozen by this run.
    pub frozen_total: Cents,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnfreezeReport {
    pub cleared: u64,
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// The price and tournament commission a job would be frozen at.
///
/// Rejects jobs whose racket is not strung yet.
pub fn freeze_values_for(job: &Job, snapshot: &EngineSnapshot) -> Result<FrozenValues, CoreError> {
    if !job.is_strung() {
        return Err(CoreError::Validation(format!(
            "Job {} is not strung and cannot be frozen",
            job.id
        )));
    }
    let price = quote_price(job, snapshot);
    let commission = resolve_commission(job, &price, SaleContext::Tournament, &snapshot.config);
    Ok(FrozenValues {
        price: price.total,
        commission: commission.amount,
    })
}

/// Freeze every strung, live job of the tournament, then lock it.
///
/// Jobs are processed one at a time. On a write failure the jobs already
/// frozen keep their snapshot and the tournament is not locked. Running it
/// again skips frozen jobs.
pub async fn finalize_tournament<L>(
    ledger: &L,
    snapshot: &EngineSnapshot,
    name: &str,
    now: Timestamp,
) -> Result<FreezeReport, FreezeError<L::Error>>
where
    L: TournamentLedger + ?Sized,
{
    let tournament = ledger
        .load_tournament(name)
        .await
        .map_err(FreezeError::Store)?
        .ok_or_else(|| FreezeError::TournamentNotFound(name.to_string()))?;

    let jobs = ledger.list_jobs(name).await.map_err(FreezeError::Store)?;

    let mut report = FreezeReport::default();
    for job in &jobs {
        if job.commission.is_frozen() {
            report.already_frozen += 1;
            continue;
        }
        let Ok(frozen) = freeze_values_for(job, snapshot) else {
            report.not_strung += 1;
            continue;
        };
        ledger
            .freeze_job(job.id, frozen, now)
            .await
            .map_err(|source| FreezeError::PartialFreeze {
                frozen: report.frozen,
                job_id: job.id,
                source,
            })?;
        report.frozen += 1;
        report.frozen_total += frozen.commission;
    }

    ledger
        .set_locked(name, Some(tournament.locked_at.unwrap_or(now)))
        .await
        .map_err(FreezeError::Store)?;

    Ok(report)
}

/// Clear every snapshot of the tournament and unlock it.
pub async fn unfreeze_tournament<L>(
    ledger: &L,
    name: &str,
) -> Result<UnfreezeReport, FreezeError<L::Error>>
where
    L: TournamentLedger + ?Sized,
{
    ledger
        .load_tournament(name)
        .await
        .map_err(FreezeError::Store)?
        .ok_or_else(|| FreezeError::TournamentNotFound(name.to_string()))?;

    let cleared = ledger
        .clear_snapshots(name)
        .await
        .map_err(FreezeError::Store)?;
    ledger.set_locked(name, None).await.map_err(FreezeError::Store)?;

    Ok(UnfreezeReport { cleared })
}
