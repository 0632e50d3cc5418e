//! Engine configuration and the loaded snapshot the resolvers run against.
//!
//! Scalar settings are stored as key/value rows. Unknown keys and
//! unparseable values never prevent the engine from starting: they are
//! reported as [`ConfigGap`]s and the documented default is kept.
//!
//! | Key                             | Default     |
//! |---------------------------------|-------------|
//! | `express_surcharge_cents`       | `400`       |
//! | `supplied_price_cents`          | `1200`      |
//! | `express_on_complimentary`      | `true`      |
//! | `tier_selection`                | `by_rule`   |
//! | `partner_club`                  | `FABREGUES` |
//! | `tournament_gain_offert_cents`  | `1100`      |
//! | `tournament_gain_12_cents`      | `1000`      |
//! | `tournament_gain_14_cents`      | `1166`      |
//! | `tournament_gain_default_cents` | `600`       |
//! | `magasin_gain_offert_cents`     | `500`       |
//! | `magasin_gain_12_cents`         | `500`       |
//! | `magasin_gain_14_cents`         | `580`       |
//! | `magasin_gain_default_cents`    | `600`       |

use serde::Serialize;

use crate::catalog::Catalog;
use crate::commission::{CommissionTable, FixedRates, TierSelection};
use crate::error::CoreError;
use crate::job::SaleContext;
use crate::money::{parse_money, Cents};
use crate::tariff::{TariffKey, TariffTable};

// ---------------------------------------------------------------------------
// Keys and defaults
// ---------------------------------------------------------------------------

pub const SETTING_EXPRESS_SURCHARGE: &str = "express_surcharge_cents";
pub const SETTING_SUPPLIED_PRICE: &str = "supplied_price_cents";
pub const SETTING_EXPRESS_ON_COMPLIMENTARY: &str = "express_on_complimentary";
pub const SETTING_TIER_SELECTION: &str = "tier_selection";
pub const SETTING_PARTNER_CLUB: &str = "partner_club";

pub const DEFAULT_EXPRESS_SURCHARGE: Cents = Cents(400);
pub const DEFAULT_SUPPLIED_PRICE: Cents = Cents(1200);
pub const DEFAULT_PARTNER_CLUB: &str = "FABREGUES";

/// Which field of [`FixedRates`] a fixed-commission key sets.
#[derive(Debug, Clone, Copy)]
enum FixedField {
    Complimentary,
    Tier12,
    Tier14,
    Default,
}

const FIXED_RATE_KEYS: [(&str, SaleContext, FixedField); 8] = [
    ("tournament_gain_offert_cents", SaleContext::Tournament, FixedField::Complimentary),
    ("tournament_gain_12_cents", SaleContext::Tournament, FixedField::Tier12),
    ("tournament_gain_14_cents", SaleContext::Tournament, FixedField::Tier14),
    ("tournament_gain_default_cents", SaleContext::Tournament, FixedField::Default),
    ("magasin_gain_offert_cents", SaleContext::Magasin, FixedField::Complimentary),
    ("magasin_gain_12_cents", SaleContext::Magasin, FixedField::Tier12),
    ("magasin_gain_14_cents", SaleContext::Magasin, FixedField::Tier14),
    ("magasin_gain_default_cents", SaleContext::Magasin, FixedField::Default),
];

impl FixedField {
    fn slot(self, rates: &mut FixedRates) -> &mut Cents {
        match self {
            Self::Complimentary => &mut rates.complimentary,
            Self::Tier12 => &mut rates.tier_12,
            Self::Tier14 => &mut rates.tier_14,
            Self::Default => &mut rates.default_rate,
        }
    }

    fn get(self, rates: &FixedRates) -> Cents {
        match self {
            Self::Complimentary => rates.complimentary,
            Self::Tier12 => rates.tier_12,
            Self::Tier14 => rates.tier_14,
            Self::Default => rates.default_rate,
        }
    }
}

/// Plain integers are cents. Anything carrying a decimal separator or a
/// currency mark is read as euros (`"11,66 €"`).
fn parse_cents(key: &str, value: &str) -> Result<Cents, CoreError> {
    let trimmed = value.trim();
    let parsed = match trimmed.parse::<i64>() {
        Ok(cents) => Some(Cents(cents)),
        Err(_) if trimmed.contains([',', '.', '€']) => parse_money(trimmed),
        Err(_) => None,
    };
    match parsed {
        Some(cents) if cents.0 >= 0 => Ok(cents),
        _ => Err(CoreError::Validation(format!(
            "Setting '{key}' expects a non-negative amount, got '{value}'"
        ))),
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, CoreError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(CoreError::Validation(format!(
            "Setting '{key}' expects true or false, got '{value}'"
        ))),
    }
}

// ---------------------------------------------------------------------------
// EngineConfig
// ---------------------------------------------------------------------------

/// Everything the price and commission resolvers read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub tariff: TariffTable,
    pub commissions: CommissionTable,
    pub supplied_price: Cents,
    pub express_surcharge: Cents,
    pub express_on_complimentary: bool,
    pub partner_club: Option<String>,
    pub tier_selection: TierSelection,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tariff: TariffTable::standard(),
            commissions: CommissionTable::default(),
            supplied_price: DEFAULT_SUPPLIED_PRICE,
            express_surcharge: DEFAULT_EXPRESS_SURCHARGE,
            express_on_complimentary: true,
            partner_club: Some(DEFAULT_PARTNER_CLUB.to_string()),
            tier_selection: TierSelection::ByRule,
        }
    }
}

impl EngineConfig {
    /// Build a config from stored setting rows and tariff matrix.
    ///
    /// Invalid rows keep their default and come back as gaps.
    pub fn from_settings<K, V>(
        rows: impl IntoIterator<Item = (K, V)>,
        tariff: TariffTable,
    ) -> (Self, Vec<ConfigGap>)
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self {
            tariff,
            ..Self::default()
        };
        let mut gaps = Vec::new();
        for (key, value) in rows {
            let (key, value) = (key.as_ref(), value.as_ref());
            if config.apply_setting(key, value).is_err() {
                gaps.push(ConfigGap::InvalidSetting {
                    key: key.to_string(),
                    value: value.to_string(),
                });
            }
        }
        (config, gaps)
    }

    /// Set one scalar setting from its stored string form.
    pub fn apply_setting(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        match key {
            SETTING_EXPRESS_SURCHARGE => self.express_surcharge = parse_cents(key, value)?,
            SETTING_SUPPLIED_PRICE => self.supplied_price = parse_cents(key, value)?,
            SETTING_EXPRESS_ON_COMPLIMENTARY => {
                self.express_on_complimentary = parse_bool(key, value)?
            }
            SETTING_TIER_SELECTION => {
                self.tier_selection = TierSelection::parse(value).ok_or_else(|| {
                    CoreError::Validation(format!(
                        "Setting '{key}' expects by_rule or by_price, got '{value}'"
                    ))
                })?
            }
            SETTING_PARTNER_CLUB => {
                let trimmed = value.trim();
                self.partner_club = (!trimmed.is_empty()).then(|| trimmed.to_string());
            }
            _ => {
                let (_, context, field) = FIXED_RATE_KEYS
                    .iter()
                    .find(|(k, _, _)| *k == key)
                    .ok_or_else(|| CoreError::Validation(format!("Unknown setting '{key}'")))?;
                let cents = parse_cents(key, value)?;
                *field.slot(self.commissions.fixed_mut(*context)) = cents;
            }
        }
        Ok(())
    }

    /// Validate one setting and return the string form it is stored in.
    pub fn normalize_setting(key: &str, value: &str) -> Result<String, CoreError> {
        let mut config = Self::default();
        config.apply_setting(key, value)?;
        config
            .settings()
            .into_iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
            .ok_or_else(|| CoreError::Validation(format!("Unknown setting '{key}'")))
    }

    /// Current value of every scalar setting, in stored string form.
    pub fn settings(&self) -> Vec<(&'static str, String)> {
        let mut out = vec![
            (SETTING_EXPRESS_SURCHARGE, self.express_surcharge.0.to_string()),
            (SETTING_SUPPLIED_PRICE, self.supplied_price.0.to_string()),
            (
                SETTING_EXPRESS_ON_COMPLIMENTARY,
                self.express_on_complimentary.to_string(),
            ),
            (SETTING_TIER_SELECTION, self.tier_selection.as_str().to_string()),
            (
                SETTING_PARTNER_CLUB,
                self.partner_club.clone().unwrap_or_default(),
            ),
        ];
        for (key, context, field) in FIXED_RATE_KEYS {
            out.push((key, field.get(self.commissions.fixed(context)).0.to_string()));
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Configuration gaps
// ---------------------------------------------------------------------------

/// A data-quality problem surfaced to the operator. Never blocks pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfigGap {
    MissingTariffRow { key: TariffKey },
    UnknownClub { name: String },
    UnknownCordage { name: String },
    MissingCommissionRate { cordage: String, context: SaleContext },
    InvalidSetting { key: String, value: String },
}

impl ConfigGap {
    pub fn message(&self) -> String {
        match self {
            Self::MissingTariffRow { key } => format!(
                "No tariff row for club base reel={}, specific reel={}, base cordage={}",
                key.club_supplies_base, key.club_supplies_specific, key.cordage_is_base
            ),
            Self::UnknownClub { name } => format!("Unknown club '{name}'"),
            Self::UnknownCordage { name } => format!("Unknown cordage '{name}'"),
            Self::MissingCommissionRate { cordage, context } => format!(
                "Cordage '{cordage}' has no {} commission rate",
                context.as_str()
            ),
            Self::InvalidSetting { key, value } => {
                format!("Setting '{key}' has invalid value '{value}'")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Configuration and catalog as loaded at one point in time.
#[derive(Debug, Clone)]
pub struct EngineSnapshot {
    pub config: EngineConfig,
    pub catalog: Catalog,
    /// Gaps found while loading, reported once per load.
    pub gaps: Vec<ConfigGap>,
}

impl EngineSnapshot {
    /// Attach the catalog's per-cordage rates to the config and collect the
    /// structural gaps (missing tariff rows, cordages without rates).
    pub fn build(mut config: EngineConfig, catalog: Catalog) -> Self {
        config.commissions.load_cordages(catalog.cordages());

        let mut gaps: Vec<ConfigGap> = config
            .tariff
            .missing_keys()
            .into_iter()
            .map(|key| ConfigGap::MissingTariffRow { key })
            .collect();

        let mut cordages: Vec<_> = catalog.cordages().collect();
        cordages.sort_by(|a, b| a.name.cmp(&b.name));
        for cordage in cordages {
            for (rate, context) in [
                (cordage.tournament_gain, SaleContext::Tournament),
                (cordage.magasin_gain, SaleContext::Magasin),
            ] {
                if rate.is_none() {
                    gaps.push(ConfigGap::MissingCommissionRate {
                        cordage: cordage.name.clone(),
                        context,
                    });
                }
            }
        }

        Self {
            config,
            catalog,
            gaps,
        }
    }

    pub fn with_gaps(mut self, gaps: impl IntoIterator<Item = ConfigGap>) -> Self {
        self.gaps.extend(gaps);
        self
    }
}
