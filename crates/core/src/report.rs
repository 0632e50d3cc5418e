//! Season reports and tournament summaries.
//!
//! A season runs from September 1st of year N to August 31st of year N+1.
//! Only strung jobs are counted. Shop jobs that are copies of a tournament
//! job (same fingerprint) are left out so the work is not counted twice.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};

use crate::commission::{quote_job, JobQuote};
use crate::error::CoreError;
use crate::job::{Job, SaleContext, Tournament};
use crate::keys::canonical_key;
use crate::money::Cents;
use crate::settings::{ConfigGap, EngineSnapshot};
use crate::status::JobStatus;
use crate::types::JobDate;

const SEASON_START_MONTH: u32 = 9;

/// Breakdown key for jobs without a stringer.
pub const UNASSIGNED_STRINGER: &str = "unassigned";

// ---------------------------------------------------------------------------
// Season
// ---------------------------------------------------------------------------

/// A September-to-August season, identified by its first year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Season {
    pub start_year: i32,
}

impl Season {
    pub fn for_date(date: JobDate) -> Self {
        let start_year = if date.month() >= SEASON_START_MONTH {
            date.year()
        } else {
            date.year() - 1
        };
        Self { start_year }
    }

    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.start_year, SEASON_START_MONTH, 1)
    }

    pub fn last_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.start_year.checked_add(1)?, 8, 31)
    }

    pub fn contains(self, date: JobDate) -> bool {
        Self::for_date(date) == self
    }

    /// Parse `"2024-2025"` or `"2024"`. Seasons must fall within the
    /// calendar's date range.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let invalid = || CoreError::Validation(format!("Invalid season '{raw}', expected YYYY-YYYY"));
        let mut parts = raw.trim().splitn(2, '-');
        let start_year: i32 = parts
            .next()
            .and_then(|y| y.parse().ok())
            .ok_or_else(invalid)?;
        if let Some(end) = parts.next() {
            let end_year: i32 = end.parse().map_err(|_| invalid())?;
            if start_year.checked_add(1) != Some(end_year) {
                return Err(invalid());
            }
        }
        let season = Self { start_year };
        if season.first_day().is_none() || season.last_day().is_none() {
            return Err(CoreError::Validation(format!(
                "Season starting in {start_year} is out of range"
            )));
        }
        Ok(season)
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start_year, self.start_year.saturating_add(1))
    }
}

impl Serialize for Season {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ---------------------------------------------------------------------------
// Fingerprint
// ---------------------------------------------------------------------------

/// Identity of a job's work, shared by a tournament job and its shop copy.
pub fn fingerprint(job: &Job) -> String {
    format!(
        "{}|{}|{}|{}|{}|{}",
        job.date,
        canonical_key(&job.club),
        canonical_key(&job.cordage),
        canonical_key(job.stringer.as_deref().unwrap_or_default()),
        job.supplied_by_customer,
        job.complimentary,
    )
}

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BreakdownLine {
    pub name: String,
    pub jobs: usize,
    pub revenue: Cents,
    pub commission: Cents,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub jobs: usize,
    pub revenue: Cents,
    pub magasin_commission: Cents,
    pub tournament_commission: Cents,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthReport {
    /// `YYYY-MM`.
    pub month: String,
    pub totals: Totals,
    pub cordages: Vec<BreakdownLine>,
    pub stringers: Vec<BreakdownLine>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Outstanding {
    pub jobs: usize,
    pub amount: Cents,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeasonReport {
    pub season: Season,
    pub totals: Totals,
    /// Oldest month first.
    pub months: Vec<MonthReport>,
    /// Strung jobs still waiting for payment.
    pub outstanding: Outstanding,
    /// Shop jobs left out as copies of a tournament job.
    pub duplicate_exports: usize,
    pub warnings: Vec<ConfigGap>,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Customer price of a job for reporting: the price frozen with the
/// commission when there is one, else the live quote.
fn reported_price(job: &Job, quote: &JobQuote) -> Cents {
    match (job.commission.is_frozen(), job.price) {
        (true, Some(price)) => price,
        _ => quote.price.total,
    }
}

#[derive(Default)]
struct MonthAcc {
    totals: Totals,
    cordages: BTreeMap<String, BreakdownLine>,
    stringers: BTreeMap<String, BreakdownLine>,
}

fn add_line(lines: &mut BTreeMap<String, BreakdownLine>, name: &str, revenue: Cents, commission: Cents) {
    let line = lines
        .entry(canonical_key(name))
        .or_insert_with(|| BreakdownLine {
            name: name.to_string(),
            ..BreakdownLine::default()
        });
    line.jobs += 1;
    line.revenue += revenue;
    line.commission += commission;
}

fn sorted_lines(lines: BTreeMap<String, BreakdownLine>) -> Vec<BreakdownLine> {
    let mut out: Vec<_> = lines.into_values().collect();
    out.sort_by(|a, b| b.jobs.cmp(&a.jobs).then_with(|| a.name.cmp(&b.name)));
    out
}

/// Aggregate every strung job dated inside the season, month by month.
pub fn season_report(jobs: &[Job], snapshot: &EngineSnapshot, season: Season) -> SeasonReport {
    let in_season: Vec<&Job> = jobs
        .iter()
        .filter(|j| j.is_strung() && season.contains(j.date))
        .collect();

    let tournament_prints: HashSet<String> = in_season
        .iter()
        .filter(|j| j.context() == SaleContext::Tournament)
        .map(|j| fingerprint(j))
        .collect();

    let mut months: BTreeMap<String, MonthAcc> = BTreeMap::new();
    let mut outstanding = Outstanding::default();
    let mut duplicate_exports = 0;
    let mut warnings: Vec<ConfigGap> = Vec::new();

    for job in in_season {
        let context = job.context();
        if context == SaleContext::Magasin && tournament_prints.contains(&fingerprint(job)) {
            duplicate_exports += 1;
            continue;
        }

        let quote = quote_job(job, snapshot);
        for gap in quote.warnings() {
            if !warnings.contains(&gap) {
                warnings.push(gap);
            }
        }
        let revenue = reported_price(job, &quote);
        let commission = match (&quote.commission, context) {
            (Some(c), SaleContext::Tournament) => c.amount,
            (Some(c), SaleContext::Magasin)
                if job
                    .stringer
                    .as_deref()
                    .is_some_and(|s| snapshot.catalog.is_shop_payee(s)) =>
            {
                c.amount
            }
            _ => Cents::ZERO,
        };

        if job.status == JobStatus::ToBeSettled {
            outstanding.jobs += 1;
            outstanding.amount += revenue;
        }

        let month = format!("{:04}-{:02}", job.date.year(), job.date.month());
        let acc = months.entry(month).or_default();
        acc.totals.jobs += 1;
        acc.totals.revenue += revenue;
        match context {
            SaleContext::Tournament => acc.totals.tournament_commission += commission,
            SaleContext::Magasin => acc.totals.magasin_commission += commission,
        }
        add_line(&mut acc.cordages, &job.cordage, revenue, commission);
        add_line(
            &mut acc.stringers,
            job.stringer.as_deref().unwrap_or(UNASSIGNED_STRINGER),
            revenue,
            commission,
        );
    }

    let mut totals = Totals::default();
    let months: Vec<MonthReport> = months
        .into_iter()
        .map(|(month, acc)| {
            totals.jobs += acc.totals.jobs;
            totals.revenue += acc.totals.revenue;
            totals.magasin_commission += acc.totals.magasin_commission;
            totals.tournament_commission += acc.totals.tournament_commission;
            MonthReport {
                month,
                totals: acc.totals,
                cordages: sorted_lines(acc.cordages),
                stringers: sorted_lines(acc.stringers),
            }
        })
        .collect();

    SeasonReport {
        season,
        totals,
        months,
        outstanding,
        duplicate_exports,
        warnings,
    }
}

// ---------------------------------------------------------------------------
// Tournament summaries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClubCount {
    pub club: String,
    pub jobs: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TournamentSummary {
    pub name: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub locked: bool,
    pub jobs: usize,
    pub revenue: Cents,
    pub commission: Cents,
    pub clubs: Vec<ClubCount>,
}

/// One summary per tournament, newest first. Only strung jobs count.
pub fn tournament_summaries(
    tournaments: &[Tournament],
    jobs: &[Job],
    snapshot: &EngineSnapshot,
) -> Vec<TournamentSummary> {
    let mut summaries: Vec<TournamentSummary> = tournaments
        .iter()
        .map(|t| {
            let mut summary = TournamentSummary {
                name: t.name.clone(),
                start_date: t.start_date,
                end_date: t.end_date,
                locked: t.locked,
                jobs: 0,
                revenue: Cents::ZERO,
                commission: Cents::ZERO,
                clubs: Vec::new(),
            };
            let mut clubs: BTreeMap<String, ClubCount> = BTreeMap::new();
            for job in jobs
                .iter()
                .filter(|j| j.is_strung() && j.tournament.as_deref() == Some(t.name.as_str()))
            {
                let quote = quote_job(job, snapshot);
                summary.jobs += 1;
                summary.revenue += reported_price(job, &quote);
                summary.commission += quote.commission.map_or(Cents::ZERO, |c| c.amount);
                clubs
                    .entry(canonical_key(&job.club))
                    .or_insert_with(|| ClubCount {
                        club: job.club.clone(),
                        jobs: 0,
                    })
                    .jobs += 1;
            }
            summary.clubs = clubs.into_values().collect();
            summary.clubs.sort_by(|a, b| b.jobs.cmp(&a.jobs).then_with(|| a.club.cmp(&b.club)));
            summary
        })
        .collect();

    // Undated tournaments sort last.
    summaries.sort_by(|a, b| b.start_date.cmp(&a.start_date));
    summaries
}
