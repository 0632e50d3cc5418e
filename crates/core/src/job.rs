//! Stringing jobs and tournaments.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::money::Cents;
use crate::payment::PaymentMode;
use crate::status::JobStatus;
use crate::types::{DbId, JobDate, Timestamp};

// ---------------------------------------------------------------------------
// Commission snapshot
// ---------------------------------------------------------------------------

/// Stringer commission state of a job.
///
/// A `Frozen` amount is authoritative forever; only an explicit tournament
/// unfreeze returns a job to `Live`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Commission {
    #[default]
    Live,
    Frozen { amount: Cents, at: Timestamp },
}

impl Commission {
    /// Rebuild the variant from the two nullable store columns. Both must be
    /// present for the job to count as frozen.
    pub fn from_columns(amount: Option<i64>, at: Option<Timestamp>) -> Self {
        match (amount, at) {
            (Some(amount), Some(at)) => Self::Frozen {
                amount: Cents(amount),
                at,
            },
            _ => Self::Live,
        }
    }

    pub fn is_frozen(&self) -> bool {
        matches!(self, Self::Frozen { .. })
    }

    pub fn frozen_amount(&self) -> Option<Cents> {
        match self {
            Self::Frozen { amount, .. } => Some(*amount),
            Self::Live => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Sale context
// ---------------------------------------------------------------------------

/// Where a job was strung, which selects the commission rate family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleContext {
    Tournament,
    Magasin,
}

impl SaleContext {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tournament => "tournament",
            Self::Magasin => "magasin",
        }
    }
}

// ---------------------------------------------------------------------------
// Job
// ---------------------------------------------------------------------------

/// One racket stringing job, in the shop ledger or at a tournament stand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: DbId,
    /// Set for tournament-stand jobs.
    pub tournament: Option<String>,
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
    /// Last computed price, persisted for display.
    pub price: Option<Cents>,
    pub commission: Commission,
    /// Tournament job already copied into the shop ledger.
    pub exported: bool,
}

impl Job {
    pub fn context(&self) -> SaleContext {
        if self.tournament.is_some() {
            SaleContext::Tournament
        } else {
            SaleContext::Magasin
        }
    }

    /// Complimentary by flag or by recorded payment mode.
    pub fn is_complimentary(&self) -> bool {
        self.complimentary || self.payment_mode == Some(PaymentMode::Complimentary)
    }

    pub fn is_strung(&self) -> bool {
        self.status != JobStatus::NotStrung
    }
}

/// Reject flag combinations that cannot be priced consistently.
pub fn validate_job_flags(supplied_by_customer: bool, complimentary: bool) -> Result<(), CoreError> {
    if supplied_by_customer && complimentary {
        return Err(CoreError::Validation(
            "A job cannot be both supplied by the customer and complimentary".to_string(),
        ));
    }
    Ok(())
}

/// Reject edits to the jobs of a locked tournament.
pub fn ensure_tournament_unlocked(tournament: &Tournament) -> Result<(), CoreError> {
    if tournament.locked {
        return Err(CoreError::Conflict(format!(
            "Tournament '{}' is locked; unfreeze it before editing its jobs",
            tournament.name
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tournament
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tournament {
    pub name: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub locked: bool,
    pub locked_at: Option<Timestamp>,
}


#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Utc;

    use super::fixtures::*;
    use super::*;

    #[test]
    fn supplied_and_complimentary_are_exclusive() {
        assert_matches!(validate_job_flags(true, true), Err(CoreError::Validation(_)));
        assert!(validate_job_flags(true, false).is_ok());
        assert!(validate_job_flags(false, true).is_ok());
    }

    #[test]
    fn offert_payment_counts_as_complimentary() {
        let mut j = job(1);
        assert!(!j.is_complimentary());
        j.payment_mode = Some(PaymentMode::Complimentary);
        assert!(j.is_complimentary());
    }

    #[test]
    fn context_follows_tournament() {
        assert_eq!(job(1).context(), SaleContext::Magasin);
        assert_eq!(tournament_job(1, "Open").context(), SaleContext::Tournament);
    }

    #[test]
    fn frozen_needs_both_columns() {
        let now = Utc::now();
        assert_eq!(Commission::from_columns(Some(1000), None), Commission::Live);
        assert_eq!(Commission::from_columns(None, Some(now)), Commission::Live);
        assert_eq!(
            Commission::from_columns(Some(1000), Some(now)).frozen_amount(),
            Some(Cents(1000))
        );
    }

    #[test]
    fn locked_tournament_rejects_edits() {
        let t = Tournament {
            name: "Open".to_string(),
            start_date: None,
            end_date: None,
            locked: true,
            locked_at: Some(Utc::now()),
        };
        assert_matches!(ensure_tournament_unlocked(&t), Err(CoreError::Conflict(_)));
    }
}
