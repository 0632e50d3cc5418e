//! Route definitions for the catalog: clubs, cordages and stringers.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

/// Routes mounted at `/clubs`.
///
/// ```text
/// GET    /        -> list_clubs
/// POST   /        -> create_club
/// GET    /{id}    -> get_club
/// PUT    /{id}    -> update_club
/// ```
pub fn clubs_router() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::list_clubs).post(catalog::create_club))
        .route("/{id}", get(catalog::get_club).put(catalog::update_club))
}

/// Routes mounted at `/cordages`.
///
/// ```text
/// GET    /        -> list_cordages
/// POST   /        -> create_cordage
/// PUT    /{id}    -> update_cordage
/// ```
pub fn cordages_router() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::list_cordages).post(catalog::create_cordage))
        .route("/{id}", put(catalog::update_cordage))
}

/// Routes mounted at `/stringers`.
///
/// ```text
/// GET    /        -> list_stringers
/// POST   /        -> create_stringer
/// PUT    /{id}    -> update_stringer
/// ```
pub fn stringers_router() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::list_stringers).post(catalog::create_stringer))
        .route("/{id}", put(catalog::update_stringer))
}
