//! Card and prenda content as delivered by the content feed.
//!
//! Field names follow the feed's JSON (`forbiddenWords`, `type`), which is why
//! these types use camelCase while the game state uses snake_case.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{CardId, PrendaId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Card {
    pub id: CardId,
    pub word: String,
    pub forbidden_words: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
}

impl Card {
    pub fn new(id: impl Into<CardId>, word: impl Into<String>, forbidden_words: &[&str]) -> Self {
        Self {
            id: id.into(),
            word: word.into(),
            forbidden_words: forbidden_words.iter().map(|w| w.to_string()).collect(),
            category: None,
            difficulty: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// A forfeit the acting team or reader must perform after saying a forbidden word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Prenda {
    pub id: PrendaId,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: PrendaKind,
    pub intensity: Intensity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PrendaKind {
    Individual,
    Group,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Intensity {
    Fun,
    Hard,
}

/// Everything a content provider hands to the game: the card pool and the prenda pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ContentSet {
    pub cards: Vec<Card>,
    pub prendas: Vec<Prenda>,
}

impl ContentSet {
    pub fn new(cards: Vec<Card>, prendas: Vec<Prenda>) -> Self {
        Self { cards, prendas }
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty() && self.prendas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_reads_feed_json() {
        let json = r#"{
            "id": "c1",
            "word": "Praia",
            "forbiddenWords": ["areia", "mar", "sol", "onda", "verão"],
            "difficulty": "easy"
        }"#;

        let card: Card = serde_json::from_str(json).unwrap();
        assert_eq!(card.word, "Praia");
        assert_eq!(card.forbidden_words.len(), 5);
        assert_eq!(card.difficulty, Some(Difficulty::Easy));
        assert_eq!(card.category, None);
    }

    #[test]
    fn test_prenda_type_field() {
        let json = r#"{"id": "p1", "description": "Imite uma galinha", "type": "group", "intensity": "fun"}"#;
        let prenda: Prenda = serde_json::from_str(json).unwrap();
        assert_eq!(prenda.kind, PrendaKind::Group);
        assert_eq!(prenda.intensity, Intensity::Fun);

        let back = serde_json::to_value(&prenda).unwrap();
        assert_eq!(back["type"], "group");
    }
}
