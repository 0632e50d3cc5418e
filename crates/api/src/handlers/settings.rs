//! Handlers for the `/settings` resource: scalar engine settings, the
//! tariff matrix and the configuration reload signal.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use stringdesk_core::error::CoreError;
use stringdesk_core::settings::{ConfigGap, EngineConfig};
use stringdesk_core::tariff::TariffRow;
use stringdesk_db::models::setting::UpsertSetting;
use stringdesk_db::models::tariff::UpsertTariffRow;
use stringdesk_db::repositories::{SettingRepo, TariffRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// One effective setting value.
#[derive(Debug, Serialize)]
pub struct SettingValue {
    pub key: &'static str,
    pub value: String,
}

/// The engine configuration as currently loaded.
#[derive(Debug, Serialize)]
pub struct SettingsView {
    pub settings: Vec<SettingValue>,
    pub tariff: Vec<TariffRow>,
    /// Gaps found when the configuration was loaded.
    pub gaps: Vec<ConfigGap>,
}

async fn current_view(state: &AppState) -> SettingsView {
    let engine = state.engine().await;
    SettingsView {
        settings: engine
            .config
            .settings()
            .into_iter()
            .map(|(key, value)| SettingValue { key, value })
            .collect(),
        tariff: engine.config.tariff.rows(),
        gaps: engine.gaps.clone(),
    }
}

/// GET /api/v1/settings
pub async fn get_settings(State(state): State<AppState>) -> AppResult<Json<SettingsView>> {
    Ok(Json(current_view(&state).await))
}

/// PUT /api/v1/settings/{key}
///
/// The value is validated against the setting's type and stored in
/// canonical form (`"4,50 €"` becomes `"450"`).
pub async fn put_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(input): Json<UpsertSetting>,
) -> AppResult<Json<SettingsView>> {
    let value = EngineConfig::normalize_setting(&key, &input.value)?;
    SettingRepo::upsert(&state.pool, &key, &value).await?;
    tracing::info!(key = %key, value = %value, "Engine setting updated");
    state.reload_engine().await?;
    Ok(Json(current_view(&state).await))
}

/// PUT /api/v1/settings/tariff
pub async fn put_tariff_row(
    State(state): State<AppState>,
    Json(input): Json<UpsertTariffRow>,
) -> AppResult<Json<SettingsView>> {
    let key = input.key();
    if !key.is_reachable() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Tariff key {key:?} can never be selected"
        ))));
    }
    if input.price_cents < 0 {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Tariff price must be non-negative, got {}",
            input.price_cents
        ))));
    }
    TariffRepo::upsert(&state.pool, key, input.price_cents).await?;
    tracing::info!(?key, price_cents = input.price_cents, "Tariff row updated");
    state.reload_engine().await?;
    Ok(Json(current_view(&state).await))
}

/// POST /api/v1/settings/reload
pub async fn reload(State(state): State<AppState>) -> AppResult<Json<SettingsView>> {
    state.reload_engine().await?;
    Ok(Json(current_view(&state).await))
}
