use std::collections::HashSet;

use taboo_types::{Card, ContentSet, Prenda};
use tracing::warn;

/// Cleans provider output before it reaches the game state.
///
/// Words are trimmed, blank cards and prendas are dropped, the first entry
/// wins on duplicate ids and forbidden words are de-duplicated ignoring case.
pub fn sanitize(content: ContentSet) -> ContentSet {
    let card_count = content.cards.len();
    let prenda_count = content.prendas.len();

    let mut card_ids = HashSet::new();
    let cards: Vec<Card> = content
        .cards
        .into_iter()
        .filter_map(sanitize_card)
        .filter(|card| card_ids.insert(card.id.clone()))
        .collect();

    let mut prenda_ids = HashSet::new();
    let prendas: Vec<Prenda> = content
        .prendas
        .into_iter()
        .filter_map(sanitize_prenda)
        .filter(|prenda| prenda_ids.insert(prenda.id.clone()))
        .collect();

    let dropped = (card_count - cards.len()) + (prenda_count - prendas.len());
    if dropped > 0 {
        warn!(
            dropped_cards = card_count - cards.len(),
            dropped_prendas = prenda_count - prendas.len(),
            "Dropped malformed or duplicate content"
        );
    }

    ContentSet { cards, prendas }
}

fn sanitize_card(mut card: Card) -> Option<Card> {
    card.word = card.word.trim().to_string();
    if card.word.is_empty() || card.id.trim().is_empty() {
        return None;
    }

    let mut seen = HashSet::new();
    card.forbidden_words = card
        .forbidden_words
        .into_iter()
        .map(|word| word.trim().to_string())
        .filter(|word| !word.is_empty())
        .filter(|word| seen.insert(word.to_lowercase()))
        .collect();
    Some(card)
}

fn sanitize_prenda(mut prenda: Prenda) -> Option<Prenda> {
    prenda.description = prenda.description.trim().to_string();
    if prenda.description.is_empty() || prenda.id.trim().is_empty() {
        return None;
    }
    Some(prenda)
}

#[cfg(test)]
mod tests {
    use super::*;
    use taboo_types::{Intensity, PrendaKind};

    fn prenda(id: &str, description: &str) -> Prenda {
        Prenda {
            id: id.to_string(),
            description: description.to_string(),
            kind: PrendaKind::Group,
            intensity: Intensity::Fun,
        }
    }

    #[test]
    fn test_trims_and_drops_blank_cards() {
        let content = ContentSet::new(
            vec![
                Card::new("1", "  Guitarra ", &[" cuerdas", "música"]),
                Card::new("2", "   ", &["nada"]),
            ],
            vec![],
        );

        let clean = sanitize(content);
        assert_eq!(clean.cards.len(), 1);
        assert_eq!(clean.cards[0].word, "Guitarra");
        assert_eq!(clean.cards[0].forbidden_words, vec!["cuerdas", "música"]);
    }

    #[test]
    fn test_first_duplicate_id_wins() {
        let content = ContentSet::new(
            vec![Card::new("1", "Luna", &[]), Card::new("1", "Sol", &[])],
            vec![prenda("p1", "Baila"), prenda("p1", "Canta")],
        );

        let clean = sanitize(content);
        assert_eq!(clean.cards.len(), 1);
        assert_eq!(clean.cards[0].word, "Luna");
        assert_eq!(clean.prendas.len(), 1);
        assert_eq!(clean.prendas[0].description, "Baila");
    }

    #[test]
    fn test_forbidden_words_deduplicated_ignoring_case() {
        let content = ContentSet::new(
            vec![Card::new("1", "Perro", &["Ladrar", "ladrar", "", "Gato"])],
            vec![],
        );

        let clean = sanitize(content);
        assert_eq!(clean.cards[0].forbidden_words, vec!["Ladrar", "Gato"]);
    }

    #[test]
    fn test_blank_prenda_dropped() {
        let clean = sanitize(ContentSet::new(
            vec![],
            vec![prenda("p1", "  "), prenda("p2", "Imita un pato")],
        ));
        assert_eq!(clean.prendas.len(), 1);
        assert_eq!(clean.prendas[0].id, "p2");
    }
}
