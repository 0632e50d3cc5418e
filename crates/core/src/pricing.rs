//! Customer price resolution.
//!
//! The price is chosen by an ordered list of named rules ([`PRICE_RULES`]);
//! the first rule that yields a price wins and is recorded on the quote.
//! The express surcharge is added afterwards.

use serde::{Deserialize, Serialize};

use crate::catalog::{Club, Cordage};
use crate::job::Job;
use crate::keys::canonical_key;
use crate::money::Cents;
use crate::settings::{ConfigGap, EngineConfig, EngineSnapshot};
use crate::tariff::TariffKey;

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceRule {
    Complimentary,
    CustomerSupplied,
    PartnerClubException,
    Tariff,
    MissingTariff,
}

/// Evaluation order. The last rule always matches.
pub const PRICE_RULES: [PriceRule; 5] = [
    PriceRule::Complimentary,
    PriceRule::CustomerSupplied,
    PriceRule::PartnerClubException,
    PriceRule::Tariff,
    PriceRule::MissingTariff,
];

/// The facts one price resolution looks at.
#[derive(Debug, Clone, Copy)]
pub struct PriceInput<'a> {
    pub job: &'a Job,
    pub club: Option<&'a Club>,
    pub cordage: Option<&'a Cordage>,
}

impl PriceInput<'_> {
    /// Tariff key from the club's reels and the cordage class, when both are
    /// known.
    pub fn tariff_key(&self) -> Option<TariffKey> {
        let club = self.club?;
        let cordage = self.cordage?;
        Some(TariffKey::new(
            club.supplies_base_reel,
            club.supplies_specific_reel,
            cordage.is_base_class,
        ))
    }

    /// The named partner club, owning both reels, stringing a non-base
    /// cordage.
    pub fn is_partner_exception(&self, config: &EngineConfig) -> bool {
        let (Some(club), Some(cordage), Some(partner)) =
            (self.club, self.cordage, config.partner_club.as_deref())
        else {
            return false;
        };
        canonical_key(&club.name) == canonical_key(partner)
            && club.supplies_base_reel
            && club.supplies_specific_reel
            && !cordage.is_base_class
    }

    /// The key actually priced: the partner exception uses the base-class
    /// row of a both-reels club.
    fn effective_key(&self, config: &EngineConfig) -> Option<TariffKey> {
        if self.is_partner_exception(config) {
            return Some(TariffKey::new(true, true, true));
        }
        self.tariff_key()
    }
}

impl PriceRule {
    /// The price this rule yields, or `None` if it does not apply.
    pub fn evaluate(self, input: &PriceInput<'_>, config: &EngineConfig) -> Option<Cents> {
        match self {
            Self::Complimentary => input.job.is_complimentary().then_some(Cents::ZERO),
            Self::CustomerSupplied => input
                .job
                .supplied_by_customer
                .then_some(config.supplied_price),
            Self::PartnerClubException => {
                if !input.is_partner_exception(config) {
                    return None;
                }
                config.tariff.lookup(input.effective_key(config)?)
            }
            Self::Tariff => {
                if input.is_partner_exception(config) {
                    return None;
                }
                config.tariff.lookup(input.tariff_key()?)
            }
            Self::MissingTariff => Some(Cents::ZERO),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Complimentary => "complimentary",
            Self::CustomerSupplied => "customer_supplied",
            Self::PartnerClubException => "partner_club_exception",
            Self::Tariff => "tariff",
            Self::MissingTariff => "missing_tariff",
        }
    }
}

// ---------------------------------------------------------------------------
// Reel usage
// ---------------------------------------------------------------------------

/// Which club-owned reel a job consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReelUsage {
    #[default]
    None,
    Base,
    Specific,
}

impl ReelUsage {
    pub fn for_input(input: &PriceInput<'_>) -> Self {
        if input.job.supplied_by_customer {
            return Self::None;
        }
        let (Some(club), Some(cordage)) = (input.club, input.cordage) else {
            return Self::None;
        };
        match (cordage.is_base_class, club.supplies_base_reel, club.supplies_specific_reel) {
            (true, true, _) => Self::Base,
            (false, _, true) => Self::Specific,
            _ => Self::None,
        }
    }
}

// ---------------------------------------------------------------------------
// Quote
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceQuote {
    pub rule: PriceRule,
    /// Price before the express surcharge.
    pub base: Cents,
    pub express_surcharge: Cents,
    pub total: Cents,
    pub reel: ReelUsage,
    pub warnings: Vec<ConfigGap>,
}

/// Resolve the price owed by the customer for one job.
pub fn resolve_price(
    job: &Job,
    club: Option<&Club>,
    cordage: Option<&Cordage>,
    config: &EngineConfig,
) -> PriceQuote {
    let input = PriceInput { job, club, cordage };

    let (rule, base) = PRICE_RULES
        .iter()
        .find_map(|rule| rule.evaluate(&input, config).map(|price| (*rule, price)))
        .unwrap_or((PriceRule::MissingTariff, Cents::ZERO));

    let mut warnings = Vec::new();
    if rule == PriceRule::MissingTariff {
        if club.is_none() {
            warnings.push(ConfigGap::UnknownClub {
                name: job.club.clone(),
            });
        }
        if cordage.is_none() {
            warnings.push(ConfigGap::UnknownCordage {
                name: job.cordage.clone(),
            });
        }
        if let Some(key) = input.effective_key(config) {
            warnings.push(ConfigGap::MissingTariffRow { key });
        }
    }

    let express_surcharge =
        if job.express && (rule != PriceRule::Complimentary || config.express_on_complimentary) {
            config.express_surcharge
        } else {
            Cents::ZERO
        };

    PriceQuote {
        rule,
        base,
        express_surcharge,
        total: base + express_surcharge,
        reel: ReelUsage::for_input(&input),
        warnings,
    }
}

/// Resolve a job's price against a loaded snapshot.
pub fn quote_price(job: &Job, snapshot: &EngineSnapshot) -> PriceQuote {
    resolve_price(
        job,
        snapshot.catalog.club(&job.club),
        snapshot.catalog.cordage(&job.cordage),
        &snapshot.config,
    )
}
