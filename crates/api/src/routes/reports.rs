use axum::routing::get;
use axum::Router;

use crate::handlers::reports;
use crate::state::AppState;

/// Routes mounted at `/reports`.
///
/// ```text
/// GET    /season   -> season (?season=2024-2025)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/season", get(reports::season))
}
