use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::Card;

/// One tier's draw pile. Shuffled once when built, never refilled.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub fn shuffled<R: Rng + ?Sized>(mut cards: Vec<Card>, rng: &mut R) -> Self {
        cards.shuffle(rng);
        Self { cards }
    }

    /// Build a deck that deals in reverse order of `cards` (last element first).
    pub fn stacked(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn pop(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
