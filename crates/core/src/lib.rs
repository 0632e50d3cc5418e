//! Pure domain logic for the stringing shop: pricing, stringer commission,
//! job status derivation, tournament freeze lifecycle and season reports.
//!
//! This crate has no database dependencies. Callers load records and the
//! engine configuration, then pass them in. The only seam towards storage is
//! the [`freeze::TournamentLedger`] trait.

pub mod catalog;
pub mod commission;
pub mod error;
pub mod export;
pub mod freeze;
pub mod job;
pub mod keys;
pub mod money;
pub mod payment;
pub mod pricing;
pub mod report;
pub mod settings;
pub mod status;
pub mod tariff;
pub mod types;
