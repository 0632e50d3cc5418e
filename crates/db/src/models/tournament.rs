//! Tournament models and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stringdesk_core::job;
use stringdesk_core::types::{DbId, Timestamp};

/// A row from the `tournaments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tournament {
    pub id: DbId,
    pub name: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub locked: bool,
    pub locked_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Tournament {
    pub fn into_domain(self) -> job::Tournament {
        job::Tournament {
            name: self.name,
            start_date: self.start_date,
            end_date: self.end_date,
            locked: self.locked,
            locked_at: self.locked_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTournament {
    pub name: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}
