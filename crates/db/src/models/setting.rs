//! Engine setting rows.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stringdesk_core::types::Timestamp;

/// A row from the `app_settings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Setting {
    pub key: String,
    pub value: String,
    pub updated_at: Timestamp,
}

/// DTO for setting one value.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertSetting {
    pub value: String,
}
