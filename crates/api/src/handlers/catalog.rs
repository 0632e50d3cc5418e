//! Handlers for the `/clubs`, `/cordages` and `/stringers` resources.
//!
//! Names are unique on their canonical key, the one the engine looks them
//! up by. Every successful write reloads the engine snapshot so quotes see
//! the change immediately.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use stringdesk_core::catalog::ensure_distinct_name;
use stringdesk_core::error::CoreError;
use stringdesk_core::types::DbId;
use stringdesk_db::models::catalog::{
    Club, Cordage, CreateClub, CreateCordage, CreateStringer, Stringer, UpdateClub, UpdateCordage,
    UpdateStringer,
};
use stringdesk_db::repositories::{ClubRepo, CordageRepo, StringerRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

fn require_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Name must not be empty".to_string(),
        )));
    }
    Ok(())
}

fn require_rate(rate: Option<i64>) -> AppResult<()> {
    match rate {
        Some(cents) if cents < 0 => Err(AppError::Core(CoreError::Validation(format!(
            "Commission rate must be non-negative, got {cents}"
        )))),
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Clubs
// ---------------------------------------------------------------------------

/// POST /api/v1/clubs
pub async fn create_club(
    State(state): State<AppState>,
    Json(input): Json<CreateClub>,
) -> AppResult<(StatusCode, Json<Club>)> {
    require_name(&input.name)?;
    let clubs = ClubRepo::list(&state.pool).await?;
    ensure_distinct_name("Club", &input.name, clubs.iter().map(|c| c.name.as_str()))?;
    let club = ClubRepo::create(&state.pool, &input).await?;
    state.reload_engine().await?;
    Ok((StatusCode::CREATED, Json(club)))
}

/// GET /api/v1/clubs
pub async fn list_clubs(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Club>>>> {
    let clubs = ClubRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: clubs }))
}

/// GET /api/v1/clubs/{id}
pub async fn get_club(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<Json<Club>> {
    let club = ClubRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Club", id }))?;
    Ok(Json(club))
}

/// PUT /api/v1/clubs/{id}
pub async fn update_club(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateClub>,
) -> AppResult<Json<Club>> {
    let club = ClubRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Club", id }))?;
    state.reload_engine().await?;
    Ok(Json(club))
}

// ---------------------------------------------------------------------------
// Cordages
// ---------------------------------------------------------------------------

/// POST /api/v1/cordages
pub async fn create_cordage(
    State(state): State<AppState>,
    Json(input): Json<CreateCordage>,
) -> AppResult<(StatusCode, Json<Cordage>)> {
    require_name(&input.name)?;
    require_rate(input.tournament_gain_cents)?;
    require_rate(input.magasin_gain_cents)?;
    let cordages = CordageRepo::list(&state.pool).await?;
    ensure_distinct_name("Cordage", &input.name, cordages.iter().map(|c| c.name.as_str()))?;
    let cordage = CordageRepo::create(&state.pool, &input).await?;
    state.reload_engine().await?;
    Ok((StatusCode::CREATED, Json(cordage)))
}

/// GET /api/v1/cordages
pub async fn list_cordages(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Cordage>>>> {
    let cordages = CordageRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: cordages }))
}

/// PUT /api/v1/cordages/{id}
///
/// Rate edits never touch frozen tournament commissions.
pub async fn update_cordage(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCordage>,
) -> AppResult<Json<Cordage>> {
    require_rate(input.tournament_gain_cents)?;
    require_rate(input.magasin_gain_cents)?;
    let cordage = CordageRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Cordage",
            id,
        }))?;
    state.reload_engine().await?;
    Ok(Json(cordage))
}

// ---------------------------------------------------------------------------
// Stringers
// ---------------------------------------------------------------------------

/// POST /api/v1/stringers
pub async fn create_stringer(
    State(state): State<AppState>,
    Json(input): Json<CreateStringer>,
) -> AppResult<(StatusCode, Json<Stringer>)> {
    require_name(&input.name)?;
    let stringers = StringerRepo::list(&state.pool).await?;
    ensure_distinct_name("Stringer", &input.name, stringers.iter().map(|s| s.name.as_str()))?;
    let stringer = StringerRepo::create(&state.pool, &input).await?;
    state.reload_engine().await?;
    Ok((StatusCode::CREATED, Json(stringer)))
}

/// GET /api/v1/stringers
pub async fn list_stringers(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Stringer>>>> {
    let stringers = StringerRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: stringers }))
}

/// PUT /api/v1/stringers/{id}
pub async fn update_stringer(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStringer>,
) -> AppResult<Json<Stringer>> {
    let stringer = StringerRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Stringer",
            id,
        }))?;
    state.reload_engine().await?;
    Ok(Json(stringer))
}
