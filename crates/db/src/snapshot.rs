//! Loading the pricing engine's configuration from the database.

use sqlx::PgPool;
use stringdesk_core::catalog::Catalog;
use stringdesk_core::settings::{EngineConfig, EngineSnapshot};
use stringdesk_core::tariff::TariffTable;

use crate::repositories::{
    ClubRepo, CordageRepo, SettingRepo, StringerRepo, TariffRepo,
};

/// Read settings, tariff matrix and catalog into one [`EngineSnapshot`].
///
/// Unusable configuration never fails the load: invalid settings keep
/// their default and every gap is logged once and kept on the snapshot.
pub async fn load_snapshot(pool: &PgPool) -> Result<EngineSnapshot, sqlx::Error> {
    let settings = SettingRepo::list(pool).await?;
    let tariff_rows = TariffRepo::list(pool).await?;
    let clubs = ClubRepo::list(pool).await?;
    let cordages = CordageRepo::list(pool).await?;
    let stringers = StringerRepo::list(pool).await?;

    let tariff = match TariffTable::new(tariff_rows.into_iter().map(|r| r.into_domain())) {
        Ok(table) => table,
        Err(e) => {
            tracing::error!(error = %e, "Tariff matrix unusable, using standard prices");
            TariffTable::standard()
        }
    };

    let (config, setting_gaps) =
        EngineConfig::from_settings(settings.into_iter().map(|s| (s.key, s.value)), tariff);

    let catalog = Catalog::new(
        clubs.into_iter().map(|c| c.into_domain()),
        cordages.into_iter().map(|c| c.into_domain()),
        stringers.into_iter().map(|s| s.into_domain()),
    );

    let snapshot = EngineSnapshot::build(config, catalog).with_gaps(setting_gaps);
    for gap in &snapshot.gaps {
        tracing::warn!(gap = %gap.message(), "Configuration gap");
    }
    tracing::info!(gaps = snapshot.gaps.len(), "Engine configuration loaded");

    Ok(snapshot)
}
