//! Handlers for the `/jobs` resource.
//!
//! Every write goes through the locked-tournament guard and persists the
//! freshly computed price. Responses carry the live quote and any
//! configuration gaps it ran into.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use stringdesk_core::commission::{quote_job, JobQuote};
use stringdesk_core::error::CoreError;
use stringdesk_core::job::{self, ensure_tournament_unlocked, validate_job_flags, Commission};
use stringdesk_core::payment::PaymentMode;
use stringdesk_core::pricing::quote_price;
use stringdesk_core::settings::{ConfigGap, EngineSnapshot};
use stringdesk_core::status::{apply_toggle, decide_status, FlagToggle, JobStatus, StatusFlags};
use stringdesk_core::types::DbId;
use stringdesk_db::models::catalog::Club;
use stringdesk_db::models::job::{CreateJob, Job, JobFilter, JobPatch, NewJob, UpdateJob};
use stringdesk_db::models::tournament::Tournament;
use stringdesk_db::repositories::{ClubRepo, JobRepo, TournamentRepo};

use crate::error::{AppError, AppResult};
use crate::response::{DataResponse, WarnedResponse};
use crate::state::AppState;

/// A stored job with its live quote.
#[derive(Debug, Serialize)]
pub struct JobView {
    #[serde(flatten)]
    pub job: Job,
    pub quote: JobQuote,
    pub warnings: Vec<ConfigGap>,
}

fn quote_with_warnings(job: &job::Job, engine: &EngineSnapshot) -> (JobQuote, Vec<ConfigGap>) {
    let quote = quote_job(job, engine);
    let warnings = quote.warnings();
    for gap in &warnings {
        tracing::warn!(job_id = job.id, gap = %gap.message(), "Job quoted with incomplete configuration");
    }
    (quote, warnings)
}

fn job_view(row: Job, engine: &EngineSnapshot) -> AppResult<JobView> {
    let domain = row.clone().into_domain()?;
    let (quote, warnings) = quote_with_warnings(&domain, engine);
    Ok(JobView {
        job: row,
        quote,
        warnings,
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_job(state: &AppState, id: DbId) -> AppResult<Job> {
    JobRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Job", id }))
}

async fn find_tournament(state: &AppState, id: DbId) -> AppResult<Tournament> {
    TournamentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Tournament",
            id,
        }))
}

/// Reject writes to jobs of a locked tournament.
async fn ensure_unlocked(state: &AppState, tournament_id: Option<DbId>) -> AppResult<()> {
    if let Some(id) = tournament_id {
        let tournament = find_tournament(state, id).await?;
        ensure_tournament_unlocked(&tournament.into_domain())?;
    }
    Ok(())
}

async fn resolve_club(state: &AppState, name: &str) -> AppResult<Club> {
    ClubRepo::find_by_name(&state.pool, name).await?.ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!("Unknown club '{}'", name.trim())))
    })
}

fn parse_payment(raw: Option<&str>) -> AppResult<Option<PaymentMode>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => PaymentMode::parse(value)
            .map(Some)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown payment mode '{value}'"))),
    }
}

fn clean_cordage(raw: &str) -> AppResult<String> {
    let cordage = raw.trim();
    if cordage.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Cordage must not be empty".to_string(),
        )));
    }
    Ok(cordage.to_string())
}

fn clean_stringer(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Validate a creation payload and build both the insert values and the
/// domain job they describe.
async fn resolve_draft(
    state: &AppState,
    input: &CreateJob,
) -> AppResult<(NewJob, job::Job, Option<Tournament>)> {
    validate_job_flags(input.supplied_by_customer, input.complimentary)?;
    let tournament = match input.tournament_id {
        Some(id) => Some(find_tournament(state, id).await?),
        None => None,
    };
    let club = resolve_club(state, &input.club).await?;
    let cordage = clean_cordage(&input.cordage)?;
    let payment_mode = parse_payment(input.payment_mode.as_deref())?;
    let date = input.date.unwrap_or_else(|| Utc::now().date_naive());
    let status = decide_status(StatusFlags {
        racket_done: input.racket_done,
        billed: payment_mode.is_some() || input.complimentary,
        messaged: false,
        returned: false,
    });

    let new_job = NewJob {
        tournament_id: tournament.as_ref().map(|t| t.id),
        club_id: club.id,
        cordage: cordage.clone(),
        stringer: clean_stringer(input.stringer.as_deref()),
        job_date: date,
        supplied_by_customer: input.supplied_by_customer,
        complimentary: input.complimentary,
        express: input.express,
        payment_mode,
        notified_at: None,
        returned_at: None,
        status,
        price: None,
    };
    let draft = job::Job {
        id: 0,
        tournament: tournament.as_ref().map(|t| t.name.clone()),
        club: club.name,
        cordage,
        stringer: new_job.stringer.clone(),
        date,
        supplied_by_customer: input.supplied_by_customer,
        complimentary: input.complimentary,
        express: input.express,
        payment_mode,
        notified_at: None,
        returned_at: None,
        status,
        price: None,
        commission: Commission::Live,
        exported: false,
    };
    Ok((new_job, draft, tournament))
}

/// Store the current price of a live job. Frozen jobs keep theirs.
async fn reprice(state: &AppState, mut row: Job, engine: &EngineSnapshot) -> AppResult<Job> {
    if row.commission_frozen_at.is_some() {
        return Ok(row);
    }
    let domain = row.clone().into_domain()?;
    let total = quote_price(&domain, engine).total;
    if row.price_cents != Some(total.0) {
        JobRepo::set_price(&state.pool, row.id, total).await?;
        tracing::debug!(job_id = row.id, price_cents = total.0, "Job price updated");
        row.price_cents = Some(total.0);
    }
    Ok(row)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/jobs
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateJob>,
) -> AppResult<(StatusCode, Json<JobView>)> {
    let (mut new_job, draft, tournament) = resolve_draft(&state, &input).await?;
    if let Some(tournament) = tournament {
        ensure_tournament_unlocked(&tournament.into_domain())?;
    }

    let engine = state.engine().await;
    new_job.price = Some(quote_price(&draft, &engine).total);
    let row = JobRepo::create(&state.pool, &new_job).await?;
    tracing::info!(
        job_id = row.id,
        tournament = ?row.tournament,
        price_cents = ?row.price_cents,
        "Job created"
    );
    Ok((StatusCode::CREATED, Json(job_view(row, &engine)?)))
}

/// POST /api/v1/jobs/quote
///
/// Prices a job without storing it.
pub async fn preview(
    State(state): State<AppState>,
    Json(input): Json<CreateJob>,
) -> AppResult<Json<WarnedResponse<JobQuote>>> {
    let (_, draft, _) = resolve_draft(&state, &input).await?;
    let engine = state.engine().await;
    let (quote, warnings) = quote_with_warnings(&draft, &engine);
    Ok(Json(WarnedResponse {
        data: quote,
        warnings,
    }))
}

/// GET /api/v1/jobs
pub async fn list(
    State(state): State<AppState>,
    Query(mut filter): Query<JobFilter>,
) -> AppResult<Json<DataResponse<Vec<Job>>>> {
    if let Some(raw) = filter.status.take() {
        let status = JobStatus::from_label(&raw)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown status '{raw}'")))?;
        filter.status = Some(status.as_str().to_string());
    }
    let jobs = JobRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: jobs }))
}

/// GET /api/v1/jobs/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<JobView>> {
    let row = find_job(&state, id).await?;
    let engine = state.engine().await;
    Ok(Json(job_view(row, &engine)?))
}

/// GET /api/v1/jobs/{id}/quote
pub async fn quote(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<WarnedResponse<JobQuote>>> {
    let domain = find_job(&state, id).await?.into_domain()?;
    let engine = state.engine().await;
    let (quote, warnings) = quote_with_warnings(&domain, &engine);
    Ok(Json(WarnedResponse {
        data: quote,
        warnings,
    }))
}

/// PUT /api/v1/jobs/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateJob>,
) -> AppResult<Json<JobView>> {
    let existing = find_job(&state, id).await?;
    ensure_unlocked(&state, existing.tournament_id).await?;
    validate_job_flags(
        input
            .supplied_by_customer
            .unwrap_or(existing.supplied_by_customer),
        input.complimentary.unwrap_or(existing.complimentary),
    )?;

    let club_id = match input.club.as_deref() {
        Some(name) => Some(resolve_club(&state, name).await?.id),
        None => None,
    };
    let cordage = input.cordage.as_deref().map(clean_cordage).transpose()?;
    let patch = JobPatch {
        club_id,
        cordage,
        stringer: input.stringer.as_deref().map(|s| clean_stringer(Some(s))),
        job_date: input.date,
        supplied_by_customer: input.supplied_by_customer,
        complimentary: input.complimentary,
        express: input.express,
    };

    let row = JobRepo::update(&state.pool, id, &patch)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Job", id }))?;
    let engine = state.engine().await;
    let row = reprice(&state, row, &engine).await?;
    Ok(Json(job_view(row, &engine)?))
}

/// POST /api/v1/jobs/{id}/toggle
///
/// Body: `{ "flag": "billed", "value": "CB" }`. The status is recomputed
/// from all four flags after the change.
pub async fn toggle(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(toggle): Json<FlagToggle>,
) -> AppResult<Json<JobView>> {
    let existing = find_job(&state, id).await?;
    ensure_unlocked(&state, existing.tournament_id).await?;

    let domain = existing.into_domain()?;
    let update = apply_toggle(&domain, toggle, Utc::now());
    let row = JobRepo::update_status(&state.pool, id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Job", id }))?;
    tracing::info!(
        job_id = id,
        ?toggle,
        from = domain.status.as_str(),
        to = update.status.as_str(),
        "Job status toggled"
    );

    let engine = state.engine().await;
    let row = reprice(&state, row, &engine).await?;
    Ok(Json(job_view(row, &engine)?))
}

/// DELETE /api/v1/jobs/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let existing = find_job(&state, id).await?;
    ensure_unlocked(&state, existing.tournament_id).await?;
    if JobRepo::delete(&state.pool, id).await? {
        tracing::info!(job_id = id, "Job deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Job", id }))
    }
}
