//! Money amounts in euro cents.
//!
//! All prices and commissions are integer cents. Operator-entered amounts
//! (`"12"`, `"11,66 €"`, `"5.80"`) are parsed with [`parse_money`].

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// First signed decimal number in a free-form amount, `,` or `.` separator.
static AMOUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d+(?:[.,]\d+)?").expect("valid regex"));

/// An amount of money in euro cents.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Cents(pub i64);

impl Cents {
    pub const ZERO: Self = Self(0);

    /// Build an amount from whole euros.
    pub const fn euros(euros: i64) -> Self {
        Self(euros * 100)
    }

    /// Build an amount from a floating euro value, rounded to the nearest cent.
    pub fn from_euros_f64(euros: f64) -> Self {
        Self((euros * 100.0).round() as i64)
    }

    /// The amount as floating euros (display and charts only).
    pub fn as_euros_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl Add for Cents {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Cents {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Cents {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Sum for Cents {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        write!(f, "{sign}{}.{:02} €", abs / 100, abs % 100)
    }
}

/// Parse an operator-entered amount in euros into cents.
///
/// Whitespace is ignored and the first number found is used, so `"12 €"`,
/// `"11,66"` and `"EUR 5.8"` all parse. Returns `None` when no number is
/// present.
pub fn parse_money(input: &str) -> Option<Cents> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let found = AMOUNT_RE.find(&compact)?;
    let euros: f64 = found.as_str().replace(',', ".").parse().ok()?;
    Some(Cents::from_euros_f64(euros))
}
