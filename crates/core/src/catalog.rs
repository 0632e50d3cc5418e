//! Reference data the resolvers look up: clubs, cordages and stringers.
//!
//! Entries are indexed by [`canonical_key`] so hand-typed references on job
//! rows (`"bg 80"`) still find their catalog entry (`"BG80"`).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::keys::canonical_key;
use crate::money::Cents;

/// A partner club and the reels it keeps at the shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Club {
    pub name: String,
    pub supplies_base_reel: bool,
    pub supplies_specific_reel: bool,
}

/// A string product with its class and stringer payout rates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cordage {
    pub name: String,
    pub is_base_class: bool,
    /// Stringer payout per job at a tournament stand.
    pub tournament_gain: Option<Cents>,
    /// Stringer payout per job in the shop.
    pub magasin_gain: Option<Cents>,
}

/// A stringer. Only `paid_in_shop` stringers earn magasin commission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stringer {
    pub name: String,
    pub paid_in_shop: bool,
}

/// In-memory index of clubs, cordages and stringers.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    clubs: HashMap<String, Club>,
    cordages: HashMap<String, Cordage>,
    stringers: HashMap<String, Stringer>,
}

impl Catalog {
    pub fn new(
        clubs: impl IntoIterator<Item = Club>,
        cordages: impl IntoIterator<Item = Cordage>,
        stringers: impl IntoIterator<Item = Stringer>,
    ) -> Self {
        let mut catalog = Self::default();
        for club in clubs {
            catalog.upsert_club(club);
        }
        for cordage in cordages {
            catalog.upsert_cordage(cordage);
        }
        for stringer in stringers {
            catalog.upsert_stringer(stringer);
        }
        catalog
    }

    pub fn upsert_club(&mut self, club: Club) {
        self.clubs.insert(canonical_key(&club.name), club);
    }

    pub fn upsert_cordage(&mut self, cordage: Cordage) {
        self.cordages.insert(canonical_key(&cordage.name), cordage);
    }

    pub fn upsert_stringer(&mut self, stringer: Stringer) {
        self.stringers.insert(canonical_key(&stringer.name), stringer);
    }

    pub fn club(&self, name: &str) -> Option<&Club> {
        self.clubs.get(&canonical_key(name))
    }

    pub fn cordage(&self, name: &str) -> Option<&Cordage> {
        self.cordages.get(&canonical_key(name))
    }

    pub fn stringer(&self, name: &str) -> Option<&Stringer> {
        self.stringers.get(&canonical_key(name))
    }

    /// Whether the stringer is paid for shop work. Unknown stringers are not.
    pub fn is_shop_payee(&self, name: &str) -> bool {
        self.stringer(name).is_some_and(|s| s.paid_in_shop)
    }

    pub fn cordages(&self) -> impl Iterator<Item = &Cordage> {
        self.cordages.values()
    }
}

/// Reject a new name whose canonical key is already used by another entry.
///
/// The catalog keeps one entry per key, so `"Both Reels"` next to
/// `"BOTH-REELS"` would shadow one of them.
pub fn ensure_distinct_name<'a>(
    entity: &str,
    name: &str,
    existing: impl IntoIterator<Item = &'a str>,
) -> Result<(), CoreError> {
    let key = canonical_key(name);
    match existing.into_iter().find(|other| canonical_key(other) == key) {
        Some(other) => Err(CoreError::Conflict(format!(
            "{entity} '{}' clashes with existing '{other}'",
            name.trim()
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn sample() -> Catalog {
        Catalog::new(
            [Club {
                name: "Fabrègues".to_string(),
                supplies_base_reel: true,
                supplies_specific_reel: true,
            }],
            [Cordage {
                name: "BG 80".to_string(),
                is_base_class: false,
                tournament_gain: Some(Cents(700)),
                magasin_gain: None,
            }],
            [
                Stringer {
                    name: "Kellian".to_string(),
                    paid_in_shop: true,
                },
                Stringer {
                    name: "Guest".to_string(),
                    paid_in_shop: false,
                },
            ],
        )
    }

    #[test]
    fn lookups_ignore_case_accents_and_spacing() {
        let catalog = sample();
        assert!(catalog.club("FABREGUES").is_some());
        assert_eq!(catalog.cordage("bg80").unwrap().name, "BG 80");
    }

    #[test]
    fn shop_payee_requires_flag() {
        let catalog = sample();
        assert!(catalog.is_shop_payee("kellian"));
        assert!(!catalog.is_shop_payee("Guest"));
        assert!(!catalog.is_shop_payee("Nobody"));
    }

    #[test]
    fn upsert_replaces_existing_entry() {
        let mut catalog = sample();
        catalog.upsert_cordage(Cordage {
            name: "bg80".to_string(),
            is_base_class: true,
            tournament_gain: None,
            magasin_gain: None,
        });
        assert!(catalog.cordage("BG 80").unwrap().is_base_class);
        assert_eq!(catalog.cordages().count(), 1);
    }

    // -- distinct names --

    #[test]
    fn names_sharing_a_key_are_rejected() {
        let existing = ["BOTH-REELS", "Plain Club"];
        assert_matches!(
            ensure_distinct_name("Club", "Both Reels", existing),
            Err(CoreError::Conflict(msg)) if msg.contains("BOTH-REELS")
        );
        assert!(ensure_distinct_name("Club", "Both Reels Two", existing).is_ok());
    }
}
