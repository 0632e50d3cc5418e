//! Job status derivation.
//!
//! The stored status label is always recomputed from four flags (racket
//! done, billed, messaged, returned). Toggling a flag patches the fact
//! behind it and then rebuilds the whole label with [`decide_status`]; the
//! label itself is never edited directly.

use serde::{Deserialize, Serialize};

use crate::job::Job;
use crate::keys::canonical_key;
use crate::payment::PaymentMode;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

pub const STATUS_NOT_STRUNG: &str = "A FAIRE";
pub const STATUS_TO_BE_SETTLED: &str = "A REGLER";
pub const STATUS_MESSAGE_SENT: &str = "MESSAGE ENVOYE";
pub const STATUS_PAID: &str = "PAYE";
pub const STATUS_RETURNED: &str = "RENDU";

/// All valid stored status labels.
pub const STATUS_LABELS: &[&str] = &[
    STATUS_NOT_STRUNG,
    STATUS_TO_BE_SETTLED,
    STATUS_MESSAGE_SENT,
    STATUS_PAID,
    STATUS_RETURNED,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum JobStatus {
    #[default]
    #[serde(rename = "A FAIRE")]
    NotStrung,
    #[serde(rename = "A REGLER")]
    ToBeSettled,
    #[serde(rename = "MESSAGE ENVOYE")]
    AwaitingPickupMessage,
    #[serde(rename = "PAYE")]
    Paid,
    #[serde(rename = "RENDU")]
    Returned,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStrung => STATUS_NOT_STRUNG,
            Self::ToBeSettled => STATUS_TO_BE_SETTLED,
            Self::AwaitingPickupMessage => STATUS_MESSAGE_SENT,
            Self::Paid => STATUS_PAID,
            Self::Returned => STATUS_RETURNED,
        }
    }

    /// Parse a stored or typed label, ignoring case, accents and spacing.
    pub fn from_label(label: &str) -> Option<Self> {
        match canonical_key(label).as_str() {
            "AFAIRE" => Some(Self::NotStrung),
            "AREGLER" => Some(Self::ToBeSettled),
            "MESSAGEENVOYE" => Some(Self::AwaitingPickupMessage),
            "PAYE" => Some(Self::Paid),
            "RENDU" => Some(Self::Returned),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Flags
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatusFlags {
    pub racket_done: bool,
    pub billed: bool,
    pub messaged: bool,
    pub returned: bool,
}

impl StatusFlags {
    /// Read the four flags off a job's stored facts.
    pub fn from_job(job: &Job) -> Self {
        Self {
            racket_done: job.status != JobStatus::NotStrung,
            billed: job.payment_mode.is_some() || job.is_complimentary(),
            messaged: job.notified_at.is_some()
                || job.status == JobStatus::AwaitingPickupMessage,
            returned: job.returned_at.is_some() || job.status == JobStatus::Returned,
        }
    }
}

/// Canonical status for a flag combination.
pub fn decide_status(flags: StatusFlags) -> JobStatus {
    if !flags.racket_done {
        return JobStatus::NotStrung;
    }
    if flags.returned {
        return if flags.billed {
            JobStatus::Returned
        } else {
            JobStatus::ToBeSettled
        };
    }
    if flags.messaged {
        return JobStatus::AwaitingPickupMessage;
    }
    if flags.billed {
        return JobStatus::Paid;
    }
    JobStatus::ToBeSettled
}

// ---------------------------------------------------------------------------
// Toggles
// ---------------------------------------------------------------------------

/// One operator action on a job's status flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "flag", content = "value", rename_all = "snake_case")]
pub enum FlagToggle {
    RacketDone(bool),
    /// `None` clears the recorded payment.
    Billed(Option<PaymentMode>),
    Messaged(bool),
    Returned(bool),
}

/// The fields a toggle writes back to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusUpdate {
    pub status: JobStatus,
    pub payment_mode: Option<PaymentMode>,
    pub notified_at: Option<Timestamp>,
    pub returned_at: Option<Timestamp>,
}

impl StatusUpdate {
    pub fn apply_to(&self, job: &mut Job) {
        job.status = self.status;
        job.payment_mode = self.payment_mode;
        job.notified_at = self.notified_at;
        job.returned_at = self.returned_at;
    }
}

/// Apply a toggle to a job and recompute its status from all four flags.
pub fn apply_toggle(job: &Job, toggle: FlagToggle, now: Timestamp) -> StatusUpdate {
    let mut flags = StatusFlags::from_job(job);
    let mut payment_mode = job.payment_mode;
    let mut notified_at = job.notified_at;
    let mut returned_at = job.returned_at;

    match toggle {
        FlagToggle::RacketDone(done) => flags.racket_done = done,
        FlagToggle::Billed(mode) => {
            payment_mode = mode;
            flags.billed = mode.is_some() || job.complimentary;
        }
        FlagToggle::Messaged(on) => {
            notified_at = if on { notified_at.or(Some(now)) } else { None };
            flags.messaged = on;
        }
        FlagToggle::Returned(on) => {
            returned_at = if on { returned_at.or(Some(now)) } else { None };
            flags.returned = on;
        }
    }

    StatusUpdate {
        status: decide_status(flags),
        payment_mode,
        notified_at,
        returned_at,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::job::fixtures::job;

    fn all_flags() -> impl Iterator<Item = StatusFlags> {
        (0u8..16).map(|bits| StatusFlags {
            racket_done: bits & 1 != 0,
            billed: bits & 2 != 0,
            messaged: bits & 4 != 0,
            returned: bits & 8 != 0,
        })
    }

    // -- decide_status --

    #[test]
    fn not_done_always_not_strung() {
        for flags in all_flags().filter(|f| !f.racket_done) {
            assert_eq!(decide_status(flags), JobStatus::NotStrung);
        }
    }

    #[test]
    fn returned_requires_billing() {
        let mut flags = StatusFlags {
            racket_done: true,
            billed: false,
            messaged: true,
            returned: true,
        };
        assert_eq!(decide_status(flags), JobStatus::ToBeSettled);
        flags.billed = true;
        assert_eq!(decide_status(flags), JobStatus::Returned);
    }

    #[test]
    fn messaged_wins_over_billed() {
        let flags = StatusFlags {
            racket_done: true,
            billed: true,
            messaged: true,
            returned: false,
        };
        assert_eq!(decide_status(flags), JobStatus::AwaitingPickupMessage);
    }

    #[test]
    fn billed_only_is_paid() {
        let flags = StatusFlags {
            racket_done: true,
            billed: true,
            ..StatusFlags::default()
        };
        assert_eq!(decide_status(flags), JobStatus::Paid);
    }

    #[test]
    fn decision_is_idempotent_over_all_inputs() {
        let now = Utc::now();
        for flags in all_flags() {
            let first = decide_status(flags);
            // Store the facts, re-read the flags and decide again.
            let mut j = job(1);
            j.status = first;
            j.payment_mode = flags.billed.then_some(PaymentMode::Card);
            j.notified_at = flags.messaged.then_some(now);
            j.returned_at = (flags.racket_done && flags.returned).then_some(now);
            let reread = StatusFlags::from_job(&j);
            if flags.racket_done {
                assert_eq!(decide_status(reread), first, "flags {flags:?}");
            } else {
                assert_eq!(first, JobStatus::NotStrung);
            }
        }
    }

    // -- labels --

    #[test]
    fn labels_parse_tolerantly() {
        assert_eq!(JobStatus::from_label("à régler"), Some(JobStatus::ToBeSettled));
        assert_eq!(
            JobStatus::from_label("Message envoyé"),
            Some(JobStatus::AwaitingPickupMessage)
        );
        assert_eq!(JobStatus::from_label("payé"), Some(JobStatus::Paid));
        assert_eq!(JobStatus::from_label("perdu"), None);
        for label in STATUS_LABELS {
            assert_eq!(JobStatus::from_label(label).unwrap().as_str(), *label);
        }
    }

    // -- toggles --

    #[test]
    fn returning_unbilled_racket_stays_to_settle_then_billing_returns_it() {
        let now = Utc::now();
        let mut j = job(1);

        let update = apply_toggle(&j, FlagToggle::Returned(true), now);
        assert_eq!(update.status, JobStatus::ToBeSettled);
        assert_eq!(update.returned_at, Some(now));
        update.apply_to(&mut j);

        let update = apply_toggle(&j, FlagToggle::Billed(Some(PaymentMode::Cash)), now);
        assert_eq!(update.status, JobStatus::Returned);
        assert_eq!(update.payment_mode, Some(PaymentMode::Cash));
    }

    #[test]
    fn messaging_sets_timestamp_once() {
        let earlier = Utc::now() - chrono::Duration::hours(2);
        let now = Utc::now();
        let mut j = job(1);
        j.notified_at = Some(earlier);
        let update = apply_toggle(&j, FlagToggle::Messaged(true), now);
        assert_eq!(update.notified_at, Some(earlier));
        assert_eq!(update.status, JobStatus::AwaitingPickupMessage);
    }

    #[test]
    fn unmessaging_clears_status_derived_flag() {
        let mut j = job(1);
        j.status = JobStatus::AwaitingPickupMessage;
        let update = apply_toggle(&j, FlagToggle::Messaged(false), Utc::now());
        assert_eq!(update.notified_at, None);
        assert_eq!(update.status, JobStatus::ToBeSettled);
    }

    #[test]
    fn undoing_racket_resets_to_not_strung() {
        let mut j = job(1);
        j.payment_mode = Some(PaymentMode::Card);
        j.status = JobStatus::Paid;
        let update = apply_toggle(&j, FlagToggle::RacketDone(false), Utc::now());
        assert_eq!(update.status, JobStatus::NotStrung);
        assert_eq!(update.payment_mode, Some(PaymentMode::Card));
    }

    #[test]
    fn complimentary_job_stays_billed_without_payment() {
        let mut j = job(1);
        j.complimentary = true;
        let update = apply_toggle(&j, FlagToggle::Billed(None), Utc::now());
        assert_eq!(update.status, JobStatus::Paid);
    }
}
