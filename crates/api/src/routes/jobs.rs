//! Route definitions for the `/jobs` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::jobs;
use crate::state::AppState;

/// Routes mounted at `/jobs`.
///
/// ```text
/// GET    /              -> list (?from=&to=&club_id=&cordage=&status=&tournament_id=&magasin=)
/// POST   /              -> create
/// POST   /quote         -> preview
/// GET    /{id}          -> get_by_id
/// PUT    /{id}          -> update
/// DELETE /{id}          -> delete
/// GET    /{id}/quote    -> quote
/// POST   /{id}/toggle   -> toggle
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(jobs::list).post(jobs::create))
        .route("/quote", post(jobs::preview))
        .route(
            "/{id}",
            get(jobs::get_by_id).put(jobs::update).delete(jobs::delete),
        )
        .route("/{id}/quote", get(jobs::quote))
        .route("/{id}/toggle", post(jobs::toggle))
}
