//! The card catalog the studio picks from.

use std::collections::HashSet;
use std::path::Path;
use std::rc::Rc;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tessera_ui::prelude::*;

/// Catalog shipped with the binary.
pub const BUNDLED: &str = include_str!("../data/cards.json");

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Card {
    pub id: u32,
    pub name: String,
    pub category: String,
    pub generation: u8,
    pub hp: u32,
}

impl CardFace for Card {
    fn label(&self) -> &str {
        &self.name
    }

    fn caption(&self) -> String {
        format!("Gen {} · HP {}", self.generation, self.hp)
    }

    fn tint(&self) -> Color {
        match self.category.as_str() {
            "Grass" => Color::from_hex(0x2E5E3A),
            "Fire" => Color::from_hex(0x6E2F24),
            "Water" => Color::from_hex(0x24466E),
            "Electric" => Color::from_hex(0x6B5B1E),
            _ => Color::from_hex(0x3A3F4B),
        }
    }
}

/// Parses a JSON array of cards. Rejects an empty catalog and duplicate ids.
pub fn parse(json: &str) -> Result<Vec<Rc<Card>>> {
    let cards: Vec<Card> = serde_json::from_str(json).context("catalog is not a JSON array of cards")?;
    if cards.is_empty() {
        bail!("catalog is empty");
    }
    let mut seen = HashSet::new();
    for card in &cards {
        if !seen.insert(card.id) {
            bail!("duplicate card id {} (`{}`)", card.id, card.name);
        }
    }
    Ok(cards.into_iter().map(Rc::new).collect())
}

/// Loads the catalog at `path`, or the bundled one.
pub fn load(path: Option<&Path>) -> Result<Vec<Rc<Card>>> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            parse(&json).with_context(|| format!("loading {}", path.display()))
        }
        None => parse(BUNDLED).context("loading bundled catalog"),
    }
}

/// Category and generation filters for the picker.
pub fn filters(cards: &[Rc<Card>]) -> Vec<CardFilter<Card>> {
    vec![
        CardFilter::by_key("Type", cards, |c: &Card| c.category.clone()),
        CardFilter::by_key("Generation", cards, |c: &Card| c.generation.to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_catalog_loads() {
        let cards = load(None).unwrap();
        assert_eq!(cards.len(), 15);
        assert_eq!(cards[0].name, "Bulbasaur");
    }

    #[test]
    fn duplicate_ids_rejected() {
        let json = r#"[
            {"id": 1, "name": "A", "category": "Fire", "generation": 1, "hp": 10},
            {"id": 1, "name": "B", "category": "Fire", "generation": 1, "hp": 10}
        ]"#;
        let err = parse(json).unwrap_err();
        assert!(err.to_string().contains("duplicate card id 1"));
    }

    #[test]
    fn empty_catalog_rejected() {
        assert!(parse("[]").is_err());
    }

    #[test]
    fn filters_cover_categories_in_catalog_order() {
        let cards = load(None).unwrap();
        let f = filters(&cards);
        assert_eq!(f[0].options()[0], "Grass");
        assert!(f[1].options().iter().all(|g| ["1", "2", "3", "4"].contains(&g.as_str())));
    }
}
