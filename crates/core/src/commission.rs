//! Stringer commission resolution.
//!
//! Like pricing, the commission comes from an ordered list of named rules
//! ([`COMMISSION_RULES`]). A frozen snapshot on the job short-circuits
//! everything else.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::catalog::Cordage;
use crate::job::{Commission, Job, SaleContext};
use crate::keys::canonical_key;
use crate::money::Cents;
use crate::pricing::{quote_price, PriceQuote, PriceRule, ReelUsage};
use crate::settings::{ConfigGap, EngineConfig, EngineSnapshot};
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Rate tables
// ---------------------------------------------------------------------------

/// Fixed commissions of one sale context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedRates {
    pub complimentary: Cents,
    /// Jobs at the 12.00 price point: supplied cordage or club base reel.
    pub tier_12: Cents,
    /// Jobs at the 14.00 price point: club specific reel.
    pub tier_14: Cents,
    /// Used when the cordage is unknown or has no rate.
    pub default_rate: Cents,
}

pub const TOURNAMENT_FIXED_RATES: FixedRates = FixedRates {
    complimentary: Cents(1100),
    tier_12: Cents(1000),
    tier_14: Cents(1166),
    default_rate: Cents(600),
};

pub const MAGASIN_FIXED_RATES: FixedRates = FixedRates {
    complimentary: Cents(500),
    tier_12: Cents(500),
    tier_14: Cents(580),
    default_rate: Cents(600),
};

/// Price points the legacy tier selection compares against.
pub const TIER_12_PRICE: Cents = Cents(1200);
pub const TIER_14_PRICE: Cents = Cents(1400);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CordageRates {
    pub tournament: Option<Cents>,
    pub magasin: Option<Cents>,
}

impl CordageRates {
    pub fn get(&self, context: SaleContext) -> Option<Cents> {
        match context {
            SaleContext::Tournament => self.tournament,
            SaleContext::Magasin => self.magasin,
        }
    }
}

/// Per-cordage rates plus the fixed rates of both contexts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommissionTable {
    rates: HashMap<String, CordageRates>,
    pub tournament: FixedRates,
    pub magasin: FixedRates,
}

impl Default for CommissionTable {
    fn default() -> Self {
        Self {
            rates: HashMap::new(),
            tournament: TOURNAMENT_FIXED_RATES,
            magasin: MAGASIN_FIXED_RATES,
        }
    }
}

impl CommissionTable {
    pub fn set_rates(&mut self, cordage: &str, rates: CordageRates) {
        self.rates.insert(canonical_key(cordage), rates);
    }

    /// Replace per-cordage rates with the catalog's current values.
    pub fn load_cordages<'a>(&mut self, cordages: impl IntoIterator<Item = &'a Cordage>) {
        self.rates.clear();
        for cordage in cordages {
            self.set_rates(
                &cordage.name,
                CordageRates {
                    tournament: cordage.tournament_gain,
                    magasin: cordage.magasin_gain,
                },
            );
        }
    }

    pub fn rate(&self, cordage: &str, context: SaleContext) -> Option<Cents> {
        self.rates.get(&canonical_key(cordage))?.get(context)
    }

    pub fn knows_cordage(&self, cordage: &str) -> bool {
        self.rates.contains_key(&canonical_key(cordage))
    }

    pub fn fixed(&self, context: SaleContext) -> &FixedRates {
        match context {
            SaleContext::Tournament => &self.tournament,
            SaleContext::Magasin => &self.magasin,
        }
    }

    pub fn fixed_mut(&mut self, context: SaleContext) -> &mut FixedRates {
        match context {
            SaleContext::Tournament => &mut self.tournament,
            SaleContext::Magasin => &mut self.magasin,
        }
    }
}

/// How the 12/14 tiers are recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierSelection {
    /// From the price rule and reel recorded on the quote.
    #[default]
    ByRule,
    /// From the charged price, express included, within one cent
    /// (legacy behaviour).
    ByPrice,
}

impl TierSelection {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "by_rule" | "rule" => Some(Self::ByRule),
            "by_price" | "price" => Some(Self::ByPrice),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ByRule => "by_rule",
            Self::ByPrice => "by_price",
        }
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommissionRule {
    Frozen,
    Complimentary,
    SuppliedTier,
    BaseReelTier,
    SpecificReelTier,
    CordageRate,
    DefaultRate,
}

/// Evaluation order. The last rule always matches.
pub const COMMISSION_RULES: [CommissionRule; 7] = [
    CommissionRule::Frozen,
    CommissionRule::Complimentary,
    CommissionRule::SuppliedTier,
    CommissionRule::BaseReelTier,
    CommissionRule::SpecificReelTier,
    CommissionRule::CordageRate,
    CommissionRule::DefaultRate,
];

#[derive(Debug, Clone, Copy)]
pub struct CommissionInput<'a> {
    pub job: &'a Job,
    pub quote: &'a PriceQuote,
    pub context: SaleContext,
}

/// Legacy tier match on the charged price, express included.
fn at_price(price: Cents, tier: Cents) -> bool {
    (price.0 - tier.0).abs() <= 1
}

impl CommissionRule {
    pub fn evaluate(self, input: &CommissionInput<'_>, config: &EngineConfig) -> Option<Cents> {
        let fixed = config.commissions.fixed(input.context);
        let quote = input.quote;
        let by_rule = config.tier_selection == TierSelection::ByRule;
        match self {
            Self::Frozen => input.job.commission.frozen_amount(),
            Self::Complimentary => input.job.is_complimentary().then_some(fixed.complimentary),
            Self::SuppliedTier => {
                let hit = if by_rule {
                    quote.rule == PriceRule::CustomerSupplied
                } else {
                    input.job.supplied_by_customer && at_price(quote.total, TIER_12_PRICE)
                };
                hit.then_some(fixed.tier_12)
            }
            Self::BaseReelTier => {
                let hit = if by_rule {
                    quote.rule == PriceRule::PartnerClubException
                        || (quote.rule == PriceRule::Tariff && quote.reel == ReelUsage::Base)
                } else {
                    at_price(quote.total, TIER_12_PRICE)
                };
                hit.then_some(fixed.tier_12)
            }
            Self::SpecificReelTier => {
                let hit = if by_rule {
                    quote.rule == PriceRule::Tariff && quote.reel == ReelUsage::Specific
                } else {
                    at_price(quote.total, TIER_14_PRICE)
                };
                hit.then_some(fixed.tier_14)
            }
            Self::CordageRate => config.commissions.rate(&input.job.cordage, input.context),
            Self::DefaultRate => Some(fixed.default_rate),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Frozen => "frozen",
            Self::Complimentary => "complimentary",
            Self::SuppliedTier => "supplied_tier",
            Self::BaseReelTier => "base_reel_tier",
            Self::SpecificReelTier => "specific_reel_tier",
            Self::CordageRate => "cordage_rate",
            Self::DefaultRate => "default_rate",
        }
    }
}

// ---------------------------------------------------------------------------
// Quote
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommissionQuote {
    pub rule: CommissionRule,
    pub amount: Cents,
    pub frozen_at: Option<Timestamp>,
    pub warnings: Vec<ConfigGap>,
}

/// Resolve the stringer's commission for one job in the given context.
pub fn resolve_commission(
    job: &Job,
    quote: &PriceQuote,
    context: SaleContext,
    config: &EngineConfig,
) -> CommissionQuote {
    let input = CommissionInput {
        job,
        quote,
        context,
    };

    let (rule, amount) = COMMISSION_RULES
        .iter()
        .find_map(|rule| rule.evaluate(&input, config).map(|amount| (*rule, amount)))
        .unwrap_or((CommissionRule::DefaultRate, config.commissions.fixed(context).default_rate));

    let mut warnings = Vec::new();
    if rule == CommissionRule::DefaultRate {
        if config.commissions.knows_cordage(&job.cordage) {
            warnings.push(ConfigGap::MissingCommissionRate {
                cordage: job.cordage.clone(),
                context,
            });
        } else {
            warnings.push(ConfigGap::UnknownCordage {
                name: job.cordage.clone(),
            });
        }
    }

    let frozen_at = match job.commission {
        Commission::Frozen { at, .. } => Some(at),
        Commission::Live => None,
    };

    CommissionQuote {
        rule,
        amount,
        frozen_at,
        warnings,
    }
}

/// Price and commission of one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobQuote {
    pub price: PriceQuote,
    /// Absent while the racket is not strung.
    pub commission: Option<CommissionQuote>,
}

impl JobQuote {
    /// Price and commission warnings, without duplicates.
    pub fn warnings(&self) -> Vec<ConfigGap> {
        let mut all = self.price.warnings.clone();
        if let Some(commission) = &self.commission {
            for gap in &commission.warnings {
                if !all.contains(gap) {
                    all.push(gap.clone());
                }
            }
        }
        all
    }
}

/// Quote a job in its own context against a loaded snapshot.
pub fn quote_job(job: &Job, snapshot: &EngineSnapshot) -> JobQuote {
    let price = quote_price(job, snapshot);
    let commission = job
        .is_strung()
        .then(|| resolve_commission(job, &price, job.context(), &snapshot.config));
    JobQuote { price, commission }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Utc;

    use super::*;
    use crate::catalog::{Catalog, Club};
    use crate::job::fixtures::{job, tournament_job};
    use crate::status::JobStatus;

    fn snapshot() -> EngineSnapshot {
        let catalog = Catalog::new(
            [
                Club {
                    name: "Plain Club".to_string(),
                    supplies_base_reel: false,
                    supplies_specific_reel: false,
                },
                Club {
                    name: "Both Reels".to_string(),
                    supplies_base_reel: true,
                    supplies_specific_reel: true,
                },
                Club {
                    name: "Fabregues".to_string(),
                    supplies_base_reel: true,
                    supplies_specific_reel: true,
                },
            ],
            [
                Cordage {
                    name: "Base Poly".to_string(),
                    is_base_class: true,
                    tournament_gain: Some(Cents(700)),
                    magasin_gain: Some(Cents(650)),
                },
                Cordage {
                    name: "Pro Multi".to_string(),
                    is_base_class: false,
                    tournament_gain: Some(Cents(900)),
                    magasin_gain: None,
                },
            ],
            [],
        );
        EngineSnapshot::build(EngineConfig::default(), catalog)
    }

    // -- magasin --

    #[test]
    fn plain_club_base_cordage_earns_magasin_rate() {
        let snap = snapshot();
        let q = quote_job(&job(1), &snap);
        assert_eq!(q.price.total, Cents(1800));
        let c = q.commission.unwrap();
        assert_eq!(c.rule, CommissionRule::CordageRate);
        assert_eq!(c.amount, Cents(650));
    }

    #[test]
    fn missing_magasin_rate_falls_back_to_default_with_warning() {
        let snap = snapshot();
        let mut j = job(1);
        j.cordage = "pro multi".to_string();
        let c = quote_job(&j, &snap).commission.unwrap();
        assert_eq!(c.rule, CommissionRule::DefaultRate);
        assert_eq!(c.amount, Cents(600));
        assert_matches!(
            c.warnings.as_slice(),
            [ConfigGap::MissingCommissionRate { context: SaleContext::Magasin, .. }]
        );
    }

    #[test]
    fn unknown_cordage_warns_unknown() {
        let snap = snapshot();
        let mut j = job(1);
        j.cordage = "Mystery".to_string();
        let q = quote_job(&j, &snap);
        assert_eq!(q.commission.as_ref().unwrap().rule, CommissionRule::DefaultRate);
        assert_eq!(q.warnings(), vec![ConfigGap::UnknownCordage { name: "Mystery".to_string() }]);
    }

    // -- tournament tiers --

    #[test]
    fn supplied_tournament_job_earns_fixed_twelve_tier() {
        let snap = snapshot();
        let mut j = tournament_job(1, "Open");
        j.supplied_by_customer = true;
        let q = quote_job(&j, &snap);
        assert_eq!(q.price.total, Cents(1200));
        let c = q.commission.unwrap();
        assert_eq!(c.rule, CommissionRule::SuppliedTier);
        assert_eq!(c.amount, Cents(1000));
    }

    #[test]
    fn specific_reel_earns_fourteen_tier() {
        let snap = snapshot();
        let mut j = tournament_job(1, "Open");
        j.club = "Both Reels".to_string();
        j.cordage = "Pro Multi".to_string();
        let c = quote_job(&j, &snap).commission.unwrap();
        assert_eq!(c.rule, CommissionRule::SpecificReelTier);
        assert_eq!(c.amount, Cents(1166));
    }

    #[test]
    fn partner_exception_earns_base_reel_tier() {
        let snap = snapshot();
        let mut j = tournament_job(1, "Open");
        j.club = "FABREGUES".to_string();
        j.cordage = "Pro Multi".to_string();
        let q = quote_job(&j, &snap);
        assert_eq!(q.price.rule, PriceRule::PartnerClubException);
        assert_eq!(q.commission.unwrap().rule, CommissionRule::BaseReelTier);
    }

    #[test]
    fn complimentary_earns_fixed_rate_in_each_context() {
        let snap = snapshot();
        let mut shop = job(1);
        shop.complimentary = true;
        let mut stand = tournament_job(2, "Open");
        stand.complimentary = true;
        assert_eq!(quote_job(&shop, &snap).commission.unwrap().amount, Cents(500));
        assert_eq!(quote_job(&stand, &snap).commission.unwrap().amount, Cents(1100));
    }

    #[test]
    fn by_price_compares_charged_price() {
        let mut snap = snapshot();
        snap.config.tier_selection = TierSelection::ByPrice;
        let mut j = tournament_job(1, "Open");
        j.club = "Both Reels".to_string();
        j.cordage = "Pro Multi".to_string();
        let c = quote_job(&j, &snap).commission.unwrap();
        assert_eq!(c.rule, CommissionRule::SpecificReelTier);

        j.express = true;
        let q = quote_job(&j, &snap);
        assert_eq!(q.price.total, Cents(1800));
        let c = q.commission.unwrap();
        assert_eq!(c.rule, CommissionRule::CordageRate);
        assert_eq!(c.amount, Cents(900));
    }

    #[test]
    fn by_price_express_supplied_job_earns_cordage_rate() {
        let mut snap = snapshot();
        snap.config.tier_selection = TierSelection::ByPrice;
        let mut j = job(1);
        j.supplied_by_customer = true;
        j.express = true;
        let q = quote_job(&j, &snap);
        assert_eq!(q.price.total, Cents(1600));
        let c = q.commission.unwrap();
        assert_eq!(c.rule, CommissionRule::CordageRate);
        assert_eq!(c.amount, Cents(650));

        j.express = false;
        assert_eq!(
            quote_job(&j, &snap).commission.unwrap().rule,
            CommissionRule::SuppliedTier
        );
    }

    // -- frozen --

    #[test]
    fn frozen_amount_survives_rate_edits() {
        let mut snap = snapshot();
        let at = Utc::now();
        let mut j = tournament_job(1, "Open");
        j.commission = Commission::Frozen {
            amount: Cents(700),
            at,
        };
        snap.config.commissions.set_rates(
            "Base Poly",
            CordageRates {
                tournament: Some(Cents(9999)),
                magasin: None,
            },
        );
        let c = quote_job(&j, &snap).commission.unwrap();
        assert_eq!(c.rule, CommissionRule::Frozen);
        assert_eq!(c.amount, Cents(700));
        assert_eq!(c.frozen_at, Some(at));
    }

    #[test]
    fn not_strung_job_has_no_commission() {
        let snap = snapshot();
        let mut j = job(1);
        j.status = JobStatus::NotStrung;
        assert!(quote_job(&j, &snap).commission.is_none());
    }

    #[test]
    fn tier_selection_parses() {
        assert_eq!(TierSelection::parse(" BY_PRICE "), Some(TierSelection::ByPrice));
        assert_eq!(TierSelection::parse("rule"), Some(TierSelection::ByRule));
        assert_eq!(TierSelection::parse("random"), None);
    }
}
