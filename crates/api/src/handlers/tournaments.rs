//! Handlers for the `/tournaments` resource: CRUD, freeze lifecycle and
//! export to the shop ledger.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use stringdesk_core::error::CoreError;
use stringdesk_core::export::plan_export;
use stringdesk_core::freeze::{finalize_tournament, unfreeze_tournament, FreezeReport, UnfreezeReport};
use stringdesk_core::report::{tournament_summaries, TournamentSummary};
use stringdesk_core::types::DbId;
use stringdesk_db::ledger::{rows_into_domain, PgTournamentLedger};
use stringdesk_db::models::job::{JobFilter, NewJob};
use stringdesk_db::models::tournament::{CreateTournament, Tournament};
use stringdesk_db::repositories::{JobRepo, TournamentRepo};

use crate::error::{AppError, AppResult};
use crate::query::ExportParams;
use crate::response::DataResponse;
use crate::state::AppState;

async fn find_tournament(state: &AppState, id: DbId) -> AppResult<Tournament> {
    TournamentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Tournament",
            id,
        }))
}

/// POST /api/v1/tournaments
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateTournament>,
) -> AppResult<(StatusCode, Json<Tournament>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Tournament name must not be empty".to_string(),
        )));
    }
    if let (Some(start), Some(end)) = (input.start_date, input.end_date) {
        if end < start {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Tournament ends ({end}) before it starts ({start})"
            ))));
        }
    }
    let tournament = TournamentRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(tournament)))
}

/// GET /api/v1/tournaments
pub async fn list(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Tournament>>>> {
    let tournaments = TournamentRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: tournaments }))
}

/// GET /api/v1/tournaments/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Tournament>> {
    Ok(Json(find_tournament(&state, id).await?))
}

/// GET /api/v1/tournaments/summaries
///
/// Job count, revenue, commission and per-club counts, newest first.
pub async fn summaries(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<TournamentSummary>>>> {
    let tournaments: Vec<_> = TournamentRepo::list(&state.pool)
        .await?
        .into_iter()
        .map(|t| t.into_domain())
        .collect();
    let filter = JobFilter {
        magasin: Some(false),
        ..Default::default()
    };
    let jobs = rows_into_domain(JobRepo::list(&state.pool, &filter).await?)?;
    let engine = state.engine().await;
    Ok(Json(DataResponse {
        data: tournament_summaries(&tournaments, &jobs, &engine),
    }))
}

/// POST /api/v1/tournaments/{id}/finalize
///
/// Freezes the commission of every strung job and locks the tournament.
/// Safe to call again after a partial failure.
pub async fn finalize(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<FreezeReport>> {
    let tournament = find_tournament(&state, id).await?;
    let ledger = PgTournamentLedger::new(state.pool.clone());
    let engine = state.engine().await;

    let report = finalize_tournament(&ledger, &engine, &tournament.name, Utc::now()).await?;
    tracing::info!(
        tournament = %tournament.name,
        frozen = report.frozen,
        skipped = report.already_frozen + report.not_strung,
        commission_cents = report.frozen_total.0,
        "Tournament finalized"
    );
    Ok(Json(report))
}

/// POST /api/v1/tournaments/{id}/unfreeze
pub async fn unfreeze(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<UnfreezeReport>> {
    let tournament = find_tournament(&state, id).await?;
    let ledger = PgTournamentLedger::new(state.pool.clone());

    let report = unfreeze_tournament(&ledger, &tournament.name).await?;
    tracing::info!(
        tournament = %tournament.name,
        cleared = report.cleared,
        "Tournament unfrozen"
    );
    Ok(Json(report))
}

/// Outcome of an export to the shop ledger.
#[derive(Debug, Serialize)]
pub struct ExportReport {
    /// Ids of the shop jobs created by this run.
    pub created: Vec<DbId>,
    pub already_exported: usize,
}

/// POST /api/v1/tournaments/{id}/export
///
/// Copies the tournament's jobs into the shop ledger. Jobs copied by an
/// earlier run are skipped unless `?force=true`.
pub async fn export(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<ExportParams>,
) -> AppResult<Json<ExportReport>> {
    let tournament = find_tournament(&state, id).await?;
    let rows = JobRepo::list_by_tournament(&state.pool, &tournament.name).await?;
    let club_ids: HashMap<DbId, DbId> = rows.iter().map(|r| (r.id, r.club_id)).collect();
    let jobs = rows_into_domain(rows)?;
    let engine = state.engine().await;

    let plan = plan_export(&jobs, &engine, params.force);
    let mut created = Vec::with_capacity(plan.entries.len());
    for entry in &plan.entries {
        let club_id = club_ids.get(&entry.source_job_id).copied().ok_or_else(|| {
            AppError::InternalError(format!("Job {} vanished during export", entry.source_job_id))
        })?;
        let copy = JobRepo::create(&state.pool, &NewJob::from_shop_entry(entry, club_id)).await?;
        JobRepo::mark_exported(&state.pool, &[entry.source_job_id]).await?;
        created.push(copy.id);
    }

    tracing::info!(
        tournament = %tournament.name,
        exported = created.len(),
        skipped = plan.already_exported,
        "Tournament exported to shop ledger"
    );
    Ok(Json(ExportReport {
        created,
        already_exported: plan.already_exported,
    }))
}
