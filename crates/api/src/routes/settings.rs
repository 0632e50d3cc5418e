use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::settings;
use crate::state::AppState;

/// Routes mounted at `/settings`.
///
/// ```text
/// GET    /          -> get_settings
/// PUT    /tariff    -> put_tariff_row
/// POST   /reload    -> reload
/// PUT    /{key}     -> put_setting
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(settings::get_settings))
        .route("/tariff", put(settings::put_tariff_row))
        .route("/reload", post(settings::reload))
        .route("/{key}", put(settings::put_setting))
}
