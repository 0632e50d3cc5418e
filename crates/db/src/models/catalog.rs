//! Club, cordage and stringer models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stringdesk_core::catalog;
use stringdesk_core::money::Cents;
use stringdesk_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `clubs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Club {
    pub id: DbId,
    pub name: String,
    pub supplies_base_reel: bool,
    pub supplies_specific_reel: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Club {
    pub fn into_domain(self) -> catalog::Club {
        catalog::Club {
            name: self.name,
            supplies_base_reel: self.supplies_base_reel,
            supplies_specific_reel: self.supplies_specific_reel,
        }
    }
}

/// A row from the `cordages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Cordage {
    pub id: DbId,
    pub name: String,
    pub is_base_class: bool,
    pub tournament_gain_cents: Option<i64>,
    pub magasin_gain_cents: Option<i64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Cordage {
    pub fn into_domain(self) -> catalog::Cordage {
        catalog::Cordage {
            name: self.name,
            is_base_class: self.is_base_class,
            tournament_gain: self.tournament_gain_cents.map(Cents),
            magasin_gain: self.magasin_gain_cents.map(Cents),
        }
    }
}

/// A row from the `stringers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Stringer {
    pub id: DbId,
    pub name: String,
    pub paid_in_shop: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Stringer {
    pub fn into_domain(self) -> catalog::Stringer {
        catalog::Stringer {
            name: self.name,
            paid_in_shop: self.paid_in_shop,
        }
    }
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CreateClub {
    pub name: String,
    #[serde(default)]
    pub supplies_base_reel: bool,
    #[serde(default)]
    pub supplies_specific_reel: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateClub {
    pub supplies_base_reel: Option<bool>,
    pub supplies_specific_reel: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCordage {
    pub name: String,
    #[serde(default)]
    pub is_base_class: bool,
    pub tournament_gain_cents: Option<i64>,
    pub magasin_gain_cents: Option<i64>,
}

/// Patch for a cordage. A rate can be changed but not cleared.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCordage {
    pub is_base_class: Option<bool>,
    pub tournament_gain_cents: Option<i64>,
    pub magasin_gain_cents: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateStringer {
    pub name: String,
    #[serde(default)]
    pub paid_in_shop: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStringer {
    pub paid_in_shop: Option<bool>,
}
