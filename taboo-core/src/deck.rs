//! Deck manager: shuffling and used-card exclusion over the card pool.

use std::collections::BTreeSet;

use taboo_types::{Card, CardId};

use crate::random::RandomSource;

/// Returns a uniformly random permutation of `cards` (Fisher-Yates), leaving
/// the input untouched.
pub fn shuffle_deck(cards: &[Card], rng: &mut dyn RandomSource) -> Vec<Card> {
    let mut deck = cards.to_vec();
    for i in (1..deck.len()).rev() {
        let j = rng.next_below(i + 1);
        deck.swap(i, j);
    }
    deck
}

/// First card in deck order whose id has not been used. `None` means the deck
/// is exhausted.
pub fn draw_next<'a>(deck: &'a [Card], used: &BTreeSet<CardId>) -> Option<&'a Card> {
    deck.iter().find(|card| !used.contains(&card.id))
}

pub fn is_exhausted(deck: &[Card], used: &BTreeSet<CardId>) -> bool {
    draw_next(deck, used).is_none()
}

/// Clears the exclusions and reshuffles so a recycled deck does not replay the
/// previous order.
pub fn recycle(deck: &mut Vec<Card>, used: &mut BTreeSet<CardId>, rng: &mut dyn RandomSource) {
    used.clear();
    *deck = shuffle_deck(deck, rng);
}
