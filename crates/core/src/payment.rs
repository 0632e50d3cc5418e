//! Payment modes recorded when a job is settled.
//!
//! The stored values are ASCII (`CB`, `Especes`, `Cheque`, `Virement`,
//! `Offert`). Operator input is free-form, so [`PaymentMode::parse`] accepts
//! accents, any case and the abbreviations used at the counter.

use serde::{Deserialize, Serialize};

use crate::keys::canonical_key;

pub const PAYMENT_CARD: &str = "CB";
pub const PAYMENT_CASH: &str = "Especes";
pub const PAYMENT_CHEQUE: &str = "Cheque";
pub const PAYMENT_TRANSFER: &str = "Virement";
pub const PAYMENT_COMPLIMENTARY: &str = "Offert";

/// All valid stored payment values.
pub const PAYMENT_STORAGE_VALUES: &[&str] = &[
    PAYMENT_CARD,
    PAYMENT_CASH,
    PAYMENT_CHEQUE,
    PAYMENT_TRANSFER,
    PAYMENT_COMPLIMENTARY,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum PaymentMode {
    #[serde(rename = "CB")]
    Card,
    #[serde(rename = "Especes")]
    Cash,
    #[serde(rename = "Cheque")]
    Cheque,
    #[serde(rename = "Virement")]
    Transfer,
    /// Recorded when the job was given away; counts as settled.
    #[serde(rename = "Offert")]
    Complimentary,
}

impl PaymentMode {
    /// Parse operator input into a canonical mode. Returns `None` for blank
    /// or unrecognized input.
    pub fn parse(input: &str) -> Option<Self> {
        let key = canonical_key(input);
        if key.is_empty() {
            return None;
        }
        match key.as_str() {
            "CB" | "CARTE" | "CARTEBANCAIRE" | "CARTEBLEUE" => Some(Self::Card),
            "ESPECES" | "ESPECE" | "ESP" | "CASH" => Some(Self::Cash),
            "CHEQUE" | "CHEQ" | "CHQ" | "CH" | "CHEQUEBANCAIRE" | "CHEK" | "CHECK" => {
                Some(Self::Cheque)
            }
            "VIREMENT" | "VIR" | "SEPA" => Some(Self::Transfer),
            "OFFERT" | "GRATUIT" => Some(Self::Complimentary),
            _ => None,
        }
    }

    /// Convert to the stored string value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Card => PAYMENT_CARD,
            Self::Cash => PAYMENT_CASH,
            Self::Cheque => PAYMENT_CHEQUE,
            Self::Transfer => PAYMENT_TRANSFER,
            Self::Complimentary => PAYMENT_COMPLIMENTARY,
        }
    }

    /// Human-readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Card => "CB",
            Self::Cash => "Espèces",
            Self::Cheque => "Chèque",
            Self::Transfer => "Virement",
            Self::Complimentary => "Offert",
        }
    }
}

impl TryFrom<String> for PaymentMode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("Unknown payment mode '{value}'"))
    }
}
