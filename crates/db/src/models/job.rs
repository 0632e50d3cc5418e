//! Stringing job models and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stringdesk_core::error::CoreError;
use stringdesk_core::export::ShopEntry;
use stringdesk_core::job::{self, Commission};
use stringdesk_core::money::Cents;
use stringdesk_core::payment::PaymentMode;
use stringdesk_core::status::JobStatus;
use stringdesk_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Entity struct (database row)
// ---------------------------------------------------------------------------

/// A row from the `jobs` table joined with its club and tournament names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Job {
    pub id: DbId,
    pub tournament_id: Option<DbId>,
    pub tournament: Option<String>,
    pub club_id: DbId,
    pub club: String,
    pub cordage: String,
    pub stringer: Option<String>,
    pub job_date: NaiveDate,
    pub supplied_by_customer: bool,
    pub complimentary: bool,
    pub express: bool,
    pub payment_mode: Option<String>,
    pub notified_at: Option<Timestamp>,
    pub returned_at: Option<Timestamp>,
    pub status: String,
    pub price_cents: Option<i64>,
    pub commission_cents: Option<i64>,
    pub commission_frozen_at: Option<Timestamp>,
    pub exported: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Job {
    /// Convert to the domain job. Stored labels outside the canonical set
    /// are reported as internal errors.
    pub fn into_domain(self) -> Result<job::Job, CoreError> {
        let status = JobStatus::from_label(&self.status).ok_or_else(|| {
            CoreError::Internal(format!("Job {} has unknown status '{}'", self.id, self.status))
        })?;
        let payment_mode = match self.payment_mode.as_deref() {
            None => None,
            Some(raw) => Some(PaymentMode::parse(raw).ok_or_else(|| {
                CoreError::Internal(format!("Job {} has unknown payment mode '{raw}'", self.id))
            })?),
        };
        Ok(job::Job {
            id: self.id,
            tournament: self.tournament,
            club: self.club,
            cordage: self.cordage,
            stringer: self.stringer,
            date: self.job_date,
            supplied_by_customer: self.supplied_by_customer,
            complimentary: self.complimentary,
            express: self.express,
            payment_mode,
            notified_at: self.notified_at,
            returned_at: self.returned_at,
            status,
            price: self.price_cents.map(Cents),
            commission: Commission::from_columns(self.commission_cents, self.commission_frozen_at),
            exported: self.exported,
        })
    }
}

// ---------------------------------------------------------------------------
// Insert values
// ---------------------------------------------------------------------------

/// Fully resolved values for inserting a job.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub tournament_id: Option<DbId>,
    pub club_id: DbId,
    pub cordage: String,
    pub stringer: Option<String>,
    pub job_date: NaiveDate,
    pub supplied_by_customer: bool,
    pub complimentary: bool,
    pub express: bool,
    pub payment_mode: Option<PaymentMode>,
    pub notified_at: Option<Timestamp>,
    pub returned_at: Option<Timestamp>,
    pub status: JobStatus,
    pub price: Option<Cents>,
}

impl NewJob {
    /// Shop-ledger copy of an exported tournament job.
    pub fn from_shop_entry(entry: &ShopEntry, club_id: DbId) -> Self {
        Self {
            tournament_id: None,
            club_id,
            cordage: entry.cordage.clone(),
            stringer: entry.stringer.clone(),
            job_date: entry.date,
            supplied_by_customer: entry.supplied_by_customer,
            complimentary: entry.complimentary,
            express: entry.express,
            payment_mode: entry.payment_mode,
            notified_at: entry.notified_at,
            returned_at: entry.returned_at,
            status: entry.status,
            price: Some(entry.price),
        }
    }
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// DTO for creating a job. Names are matched against the catalog; the
/// status is derived from `racket_done` and `payment_mode`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateJob {
    pub tournament_id: Option<DbId>,
    pub club: String,
    pub cordage: String,
    pub stringer: Option<String>,
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub supplied_by_customer: bool,
    #[serde(default)]
    pub complimentary: bool,
    #[serde(default)]
    pub express: bool,
    /// Free-form payment input (`"carte"`, `"espèces"`, ...).
    pub payment_mode: Option<String>,
    #[serde(default)]
    pub racket_done: bool,
}

/// DTO for editing a job's facts. Status flags go through the toggle
/// endpoint instead.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateJob {
    pub club: Option<String>,
    pub cordage: Option<String>,
    /// An empty string unassigns the stringer.
    pub stringer: Option<String>,
    pub date: Option<NaiveDate>,
    pub supplied_by_customer: Option<bool>,
    pub complimentary: Option<bool>,
    pub express: Option<bool>,
}

/// Resolved patch values for [`UpdateJob`].
#[derive(Debug, Clone)]
pub struct JobPatch {
    pub club_id: Option<DbId>,
    pub cordage: Option<String>,
    /// `Some(None)` clears the stringer.
    pub stringer: Option<Option<String>>,
    pub job_date: Option<NaiveDate>,
    pub supplied_by_customer: Option<bool>,
    pub complimentary: Option<bool>,
    pub express: Option<bool>,
}

/// Query filters for listing jobs. All optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub club_id: Option<DbId>,
    pub cordage: Option<String>,
    pub status: Option<String>,
    pub tournament_id: Option<DbId>,
    /// `true` for shop jobs only, `false` for tournament jobs only.
    pub magasin: Option<bool>,
}
