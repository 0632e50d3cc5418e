//! Tariff matrix: base price keyed by club reel capability × cordage class.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::money::Cents;

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// Lookup key into the tariff matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TariffKey {
    pub club_supplies_base: bool,
    pub club_supplies_specific: bool,
    pub cordage_is_base: bool,
}

impl TariffKey {
    pub const fn new(club_supplies_base: bool, club_supplies_specific: bool, cordage_is_base: bool) -> Self {
        Self {
            club_supplies_base,
            club_supplies_specific,
            cordage_is_base,
        }
    }

    /// Clubs that supply a specific reel without a base reel do not exist in
    /// the business, so those two keys are never required.
    pub const fn is_reachable(&self) -> bool {
        self.club_supplies_base || !self.club_supplies_specific
    }
}

/// Every key a complete tariff matrix must define, in display order.
pub const REACHABLE_KEYS: [TariffKey; 6] = [
    TariffKey::new(false, false, true),
    TariffKey::new(false, false, false),
    TariffKey::new(true, false, true),
    TariffKey::new(true, false, false),
    TariffKey::new(true, true, true),
    TariffKey::new(true, true, false),
];

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// One configured tariff row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TariffRow {
    #[serde(flatten)]
    pub key: TariffKey,
    pub price: Cents,
}

/// The tariff matrix. At most one price per key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TariffTable {
    prices: HashMap<TariffKey, Cents>,
}

impl TariffTable {
    /// Build a table from configured rows.
    ///
    /// Two rows for the same key are ambiguous and rejected. Missing rows are
    /// accepted here and reported by [`TariffTable::missing_keys`].
    pub fn new(rows: impl IntoIterator<Item = TariffRow>) -> Result<Self, CoreError> {
        let mut prices = HashMap::new();
        for row in rows {
            if row.price.0 < 0 {
                return Err(CoreError::Validation(format!(
                    "Tariff price must be non-negative, got {} for {:?}",
                    row.price, row.key
                )));
            }
            if prices.insert(row.key, row.price).is_some() {
                return Err(CoreError::Validation(format!(
                    "Duplicate tariff row for {:?}",
                    row.key
                )));
            }
        }
        Ok(Self { prices })
    }

    /// The shop's standard matrix: 18/20 without club reels, 12/20 with a
    /// base reel only, 12/14 with both reels.
    pub fn standard() -> Self {
        let rows = [
            (REACHABLE_KEYS[0], 1800),
            (REACHABLE_KEYS[1], 2000),
            (REACHABLE_KEYS[2], 1200),
            (REACHABLE_KEYS[3], 2000),
            (REACHABLE_KEYS[4], 1200),
            (REACHABLE_KEYS[5], 1400),
        ];
        Self {
            prices: rows.into_iter().map(|(k, c)| (k, Cents(c))).collect(),
        }
    }

    pub fn lookup(&self, key: TariffKey) -> Option<Cents> {
        self.prices.get(&key).copied()
    }

    /// Reachable keys that have no configured price.
    pub fn missing_keys(&self) -> Vec<TariffKey> {
        REACHABLE_KEYS
            .iter()
            .filter(|k| !self.prices.contains_key(*k))
            .copied()
            .collect()
    }

    /// Replace or add the price for one key.
    pub fn set(&mut self, key: TariffKey, price: Cents) {
        self.prices.insert(key, price);
    }

    /// All rows, sorted by key.
    pub fn rows(&self) -> Vec<TariffRow> {
        let mut rows: Vec<TariffRow> = self
            .prices
            .iter()
            .map(|(key, price)| TariffRow {
                key: *key,
                price: *price,
            })
            .collect();
        rows.sort_by_key(|r| r.key);
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_is_complete() {
        assert!(TariffTable::standard().missing_keys().is_empty());
    }

    #[test]
    fn standard_prices() {
        let t = TariffTable::standard();
        assert_eq!(t.lookup(TariffKey::new(false, false, true)), Some(Cents(1800)));
        assert_eq!(t.lookup(TariffKey::new(false, false, false)), Some(Cents(2000)));
        assert_eq!(t.lookup(TariffKey::new(true, true, false)), Some(Cents(1400)));
    }

    #[test]
    fn specific_only_keys_are_unreachable() {
        assert!(!TariffKey::new(false, true, true).is_reachable());
        assert!(!TariffKey::new(false, true, false).is_reachable());
        assert!(REACHABLE_KEYS.iter().all(TariffKey::is_reachable));
    }

    #[test]
    fn missing_rows_are_reported() {
        let table = TariffTable::new([TariffRow {
            key: REACHABLE_KEYS[0],
            price: Cents(1800),
        }])
        .unwrap();
        let missing = table.missing_keys();
        assert_eq!(missing.len(), 5);
        assert!(!missing.contains(&REACHABLE_KEYS[0]));
    }

    #[test]
    fn duplicate_rows_rejected() {
        let row = TariffRow {
            key: REACHABLE_KEYS[2],
            price: Cents(1200),
        };
        assert!(TariffTable::new([row, row]).is_err());
    }

    #[test]
    fn negative_price_rejected() {
        let row = TariffRow {
            key: REACHABLE_KEYS[2],
            price: Cents(-1),
        };
        assert!(TariffTable::new([row]).is_err());
    }

    #[test]
    fn rows_are_sorted_by_key() {
        let rows = TariffTable::standard().rows();
        assert_eq!(rows.len(), 6);
        assert!(rows.windows(2).all(|w| w[0].key < w[1].key));
    }
}
