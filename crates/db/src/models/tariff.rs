//! Tariff matrix rows.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stringdesk_core::money::Cents;
use stringdesk_core::tariff::{TariffKey, TariffRow as CoreTariffRow};
use stringdesk_core::types::{DbId, Timestamp};

/// A row from the `tariff_matrix` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TariffRow {
    pub id: DbId,
    pub club_supplies_base: bool,
    pub club_supplies_specific: bool,
    pub cordage_is_base: bool,
    pub price_cents: i64,
    pub updated_at: Timestamp,
}

impl TariffRow {
    pub fn key(&self) -> TariffKey {
        TariffKey::new(
            self.club_supplies_base,
            self.club_supplies_specific,
            self.cordage_is_base,
        )
    }

    pub fn into_domain(self) -> CoreTariffRow {
        CoreTariffRow {
            key: self.key(),
            price: Cents(self.price_cents),
        }
    }
}

/// DTO for setting the price of one matrix cell.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertTariffRow {
    pub club_supplies_base: bool,
    pub club_supplies_specific: bool,
    pub cordage_is_base: bool,
    pub price_cents: i64,
}

impl UpsertTariffRow {
    pub fn key(&self) -> TariffKey {
        TariffKey::new(
            self.club_supplies_base,
            self.club_supplies_specific,
            self.cordage_is_base,
        )
    }
}
