//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// `?season=2024-2025`. Defaults to the season of today's date.
#[derive(Debug, Deserialize)]
pub struct SeasonParams {
    pub season: Option<String>,
}

/// `?force=true` re-copies jobs an earlier export already copied.
#[derive(Debug, Default, Deserialize)]
pub struct ExportParams {
    #[serde(default)]
    pub force: bool,
}
