//! Copying tournament jobs into the shop ledger.
//!
//! A copy keeps the job's facts and the price computed at the stand. The
//! source job is then flagged `exported`; the season report recognizes the
//! copies by fingerprint and keeps them out of magasin totals.

use serde::Serialize;

use crate::job::Job;
use crate::money::Cents;
use crate::payment::PaymentMode;
use crate::pricing::quote_price;
use crate::settings::EngineSnapshot;
use crate::status::{decide_status, JobStatus, StatusFlags};
use crate::types::{DbId, JobDate, Timestamp};

/// A shop-ledger row to insert for one tournament job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShopEntry {
    pub source_job_id: DbId,
    pub club: String,
    pub cordage: String,
    pub stringer: Option<String>,
    pub date: JobDate,
    pub supplied_by_customer: bool,
    pub complimentary: bool,
    pub express: bool,
    pub payment_mode: Option<PaymentMode>,
    pub notified_at: Option<Timestamp>,
    pub returned_at: Option<Timestamp>,
    pub status: JobStatus,
    pub price: Cents,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExportPlan {
    pub entries: Vec<ShopEntry>,
    /// Jobs skipped because an earlier export already copied them.
    pub already_exported: usize,
}

/// Shop entry for one tournament job.
pub fn shop_entry(job: &Job, snapshot: &EngineSnapshot) -> ShopEntry {
    let price = job
        .price
        .unwrap_or_else(|| quote_price(job, snapshot).total);
    ShopEntry {
        source_job_id: job.id,
        club: job.club.clone(),
        cordage: job.cordage.clone(),
        stringer: job.stringer.clone(),
        date: job.date,
        supplied_by_customer: job.supplied_by_customer,
        complimentary: job.complimentary,
        express: job.express,
        payment_mode: job.payment_mode,
        notified_at: job.notified_at,
        returned_at: job.returned_at,
        status: decide_status(StatusFlags::from_job(job)),
        price,
    }
}

/// Entries to insert for a tournament's jobs. Exported jobs are skipped
/// unless `force` is set.
pub fn plan_export(jobs: &[Job], snapshot: &EngineSnapshot, force: bool) -> ExportPlan {
    let mut plan = ExportPlan::default();
    for job in jobs.iter().filter(|j| j.tournament.is_some()) {
        if job.exported && !force {
            plan.already_exported += 1;
            continue;
        }
        plan.entries.push(shop_entry(job, snapshot));
    }
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Club, Cordage};
    use crate::job::fixtures::{job, tournament_job};
    use crate::settings::EngineConfig;

    fn snapshot() -> EngineSnapshot {
        EngineSnapshot::build(
            EngineConfig::default(),
            Catalog::new(
                [Club {
                    name: "Plain Club".to_string(),
                    supplies_base_reel: false,
                    supplies_specific_reel: false,
                }],
                [Cordage {
                    name: "Base Poly".to_string(),
                    is_base_class: true,
                    tournament_gain: Some(Cents(700)),
                    magasin_gain: Some(Cents(500)),
                }],
                [],
            ),
        )
    }

    #[test]
    fn copies_facts_and_stand_price() {
        let mut j = tournament_job(7, "Open");
        j.express = true;
        j.payment_mode = Some(PaymentMode::Card);
        let entry = shop_entry(&j, &snapshot());
        assert_eq!(entry.source_job_id, 7);
        assert_eq!(entry.price, Cents(2200));
        assert_eq!(entry.status, JobStatus::Paid);
        assert_eq!(entry.payment_mode, Some(PaymentMode::Card));
    }

    #[test]
    fn persisted_price_wins_over_live_quote() {
        let mut j = tournament_job(7, "Open");
        j.price = Some(Cents(1500));
        assert_eq!(shop_entry(&j, &snapshot()).price, Cents(1500));
    }

    #[test]
    fn exported_jobs_skipped_unless_forced() {
        let mut done = tournament_job(1, "Open");
        done.exported = true;
        let jobs = vec![done, tournament_job(2, "Open"), job(3)];

        let plan = plan_export(&jobs, &snapshot(), false);
        assert_eq!(plan.entries.len(), 1);
        assert_eq!(plan.entries[0].source_job_id, 2);
        assert_eq!(plan.already_exported, 1);

        let forced = plan_export(&jobs, &snapshot(), true);
        assert_eq!(forced.entries.len(), 2);
        assert_eq!(forced.already_exported, 0);
    }
}
