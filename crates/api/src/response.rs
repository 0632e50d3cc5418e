//! Shared response envelope types for API handlers.
//!
//! List and report responses use a `{ "data": ... }` envelope. Quotes and
//! reports that can surface configuration gaps add a `warnings` array.

use serde::Serialize;
use stringdesk_core::settings::ConfigGap;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "data": T, "warnings": [...] }` for results computed from a possibly
/// incomplete configuration.
#[derive(Debug, Serialize)]
pub struct WarnedResponse<T: Serialize> {
    pub data: T,
    pub warnings: Vec<ConfigGap>,
}
