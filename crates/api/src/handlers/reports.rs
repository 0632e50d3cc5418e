//! Handlers for the `/reports` resource.

use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use stringdesk_core::report::{season_report, Season, SeasonReport};
use stringdesk_db::ledger::rows_into_domain;
use stringdesk_db::repositories::JobRepo;

use crate::error::{AppError, AppResult};
use crate::query::SeasonParams;
use crate::state::AppState;

/// GET /api/v1/reports/season?season=2024-2025
///
/// Month-by-month totals for one September-to-August season. Defaults to
/// the current season.
pub async fn season(
    State(state): State<AppState>,
    Query(params): Query<SeasonParams>,
) -> AppResult<Json<SeasonReport>> {
    let season = match params.season.as_deref() {
        Some(raw) => Season::parse(raw)?,
        None => Season::for_date(Utc::now().date_naive()),
    };
    let (Some(from), Some(to)) = (season.first_day(), season.last_day()) else {
        return Err(AppError::BadRequest(format!("Season {season} is out of range")));
    };

    let jobs = rows_into_domain(JobRepo::list_between(&state.pool, from, to).await?)?;
    let engine = state.engine().await;
    let report = season_report(&jobs, &engine, season);
    for gap in &report.warnings {
        tracing::warn!(season = %season, gap = %gap.message(), "Season report with incomplete configuration");
    }
    Ok(Json(report))
}
