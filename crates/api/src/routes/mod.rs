pub mod catalog;
pub mod health;
pub mod jobs;
pub mod reports;
pub mod settings;
pub mod tournaments;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /clubs                          list, create
/// /clubs/{id}                     get, update
/// /cordages                       list, create
/// /cordages/{id}                  update (commission rates)
/// /stringers                      list, create
/// /stringers/{id}                 update
///
/// /jobs                           list (filtered), create
/// /jobs/quote                     price a draft job (POST)
/// /jobs/{id}                      get, update, delete
/// /jobs/{id}/quote                live price and commission
/// /jobs/{id}/toggle               flip one status flag (POST)
///
/// /tournaments                    list, create
/// /tournaments/summaries          per-tournament totals
/// /tournaments/{id}               get
/// /tournaments/{id}/finalize      freeze commissions and lock (POST)
/// /tournaments/{id}/unfreeze      clear snapshots and unlock (POST)
/// /tournaments/{id}/export        copy into the shop ledger (POST)
///
/// /reports/season                 season report
///
/// /settings                       effective configuration and gaps
/// /settings/{key}                 set one setting (PUT)
/// /settings/tariff                set one tariff cell (PUT)
/// /settings/reload                reload configuration (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/clubs", catalog::clubs_router())
        .nest("/cordages", catalog::cordages_router())
        .nest("/stringers", catalog::stringers_router())
        .nest("/jobs", jobs::router())
        .nest("/tournaments", tournaments::router())
        .nest("/reports", reports::router())
        .nest("/settings", settings::router())
}
