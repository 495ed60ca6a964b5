//! Deck catalog loading.
//!
//! The catalog is a JSON object keyed by tier name. Each tier maps card ids
//! to `{ "color", "points", "price": [5 ints] }`. Tiers keep file order.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::domain::{Card, Color, GemSet};
use crate::error::CatalogError;

#[derive(Debug, Deserialize)]
struct CatalogCard {
    color: Color,
    points: u32,
    price: GemSet,
}

#[derive(Debug, Clone)]
pub struct Tier {
    pub name: String,
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone)]
pub struct DeckCatalog {
    tiers: Vec<Tier>,
}

impl DeckCatalog {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let raw: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;

        let mut tiers = Vec::with_capacity(raw.len());
        for (name, value) in raw {
            let entries: BTreeMap<String, CatalogCard> = serde_json::from_value(value)?;
            if entries.is_empty() {
                return Err(CatalogError::EmptyTier(name));
            }
            let cards = entries
                .into_iter()
                .map(|(id, c)| Card::new(id, c.color, c.points, c.price))
                .collect();
            tiers.push(Tier { name, cards });
        }

        if tiers.is_empty() {
            return Err(CatalogError::NoTiers);
        }
        Ok(Self { tiers })
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "level3": { "c3": {"color": "blue", "points": 4, "price": [0, 0, 7, 0, 0]} },
        "level1": {
            "c1": {"color": "red", "points": 0, "price": [1, 1, 0, 1, 0]},
            "c2": {"color": "white", "points": 1, "price": [0, 0, 0, 4, 0]}
        }
    }"#;

    #[test]
    fn test_tiers_keep_file_order() {
        let catalog = DeckCatalog::from_json(SAMPLE).unwrap();
        let names: Vec<_> = catalog.tiers().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["level3", "level1"]);
        assert_eq!(catalog.tiers()[1].cards.len(), 2);
    }

    #[test]
    fn test_card_fields_are_parsed() {
        let catalog = DeckCatalog::from_json(SAMPLE).unwrap();
        let c3 = &catalog.tiers()[0].cards[0];
        assert_eq!(c3.id, "c3");
        assert_eq!(c3.color, Color::Blue);
        assert_eq!(c3.points, 4);
        assert_eq!(c3.price, GemSet::new([0, 0, 7, 0, 0]));
    }

    #[test]
    fn test_rejects_bad_catalogs() {
        assert!(matches!(DeckCatalog::from_json("{}"), Err(CatalogError::NoTiers)));
        assert!(matches!(
            DeckCatalog::from_json(r#"{"level1": {}}"#),
            Err(CatalogError::EmptyTier(name)) if name == "level1"
        ));
        assert!(matches!(
            DeckCatalog::from_json(r#"{"l": {"x": {"color": "pink", "points": 0, "price": [0,0,0,0,0]}}}"#),
            Err(CatalogError::Parse(_))
        ));
        assert!(matches!(
            DeckCatalog::from_json(r#"{"l": {"x": {"color": "red", "points": 0, "price": [0,-1,0,0,0]}}}"#),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = DeckCatalog::load("/nonexistent/decks.json").unwrap_err();
        assert!(matches!(err, CatalogError::Read { .. }));
    }

    #[test]
    fn test_bundled_catalog_loads() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/decks.json");
        let catalog = DeckCatalog::load(path).unwrap();
        assert_eq!(catalog.tiers().len(), 3);
        assert!(catalog.tiers().iter().all(|t| t.cards.len() >= 4));
    }
}
