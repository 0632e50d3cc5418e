//! Route definitions for the `/tournaments` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::tournaments;
use crate::state::AppState;

/// Routes mounted at `/tournaments`.
///
/// ```text
/// GET    /                -> list
/// POST   /                -> create
/// GET    /summaries       -> summaries
/// GET    /{id}            -> get_by_id
/// POST   /{id}/finalize   -> finalize
/// POST   /{id}/unfreeze   -> unfreeze
/// POST   /{id}/export     -> export (?force=true)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tournaments::list).post(tournaments::create))
        .route("/summaries", get(tournaments::summaries))
        .route("/{id}", get(tournaments::get_by_id))
        .route("/{id}/finalize", post(tournaments::finalize))
        .route("/{id}/unfreeze", post(tournaments::unfreeze))
        .route("/{id}/export", post(tournaments::export))
}
