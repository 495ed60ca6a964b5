use rand::Rng;

use crate::domain::Card;
use crate::error::GameError;
use crate::shared::CARDS_IN_ROW;

use super::catalog::DeckCatalog;
use super::deck::Deck;

/// One row of face-up slots per tier. A slot only refills from its own tier.
#[derive(Debug, Clone)]
pub struct CardField {
    decks: Vec<Deck>,
    open_cards: Vec<Vec<Option<Card>>>,
}

impl CardField {
    /// Rows start empty; call [`CardField::lay_out`] to deal them.
    pub fn new(decks: Vec<Deck>) -> Self {
        let open_cards = decks.iter().map(|_| vec![None; CARDS_IN_ROW]).collect();
        Self { decks, open_cards }
    }

    pub fn from_catalog<R: Rng + ?Sized>(catalog: &DeckCatalog, rng: &mut R) -> Self {
        let decks = catalog
            .tiers()
            .iter()
            .map(|tier| Deck::shuffled(tier.cards.clone(), rng))
            .collect();
        Self::new(decks)
    }

    pub fn tier_count(&self) -> usize {
        self.decks.len()
    }

    pub fn lay_out(&mut self) {
        for (deck, row) in self.decks.iter_mut().zip(self.open_cards.iter_mut()) {
            for slot in row.iter_mut().filter(|s| s.is_none()) {
                *slot = deck.pop();
            }
        }
    }

    fn check_bounds(&self, row: usize, col: usize) -> Result<(), GameError> {
        if row < self.open_cards.len() && col < CARDS_IN_ROW {
            Ok(())
        } else {
            Err(GameError::SlotOutOfRange { row, col })
        }
    }

    pub fn get_card(&self, row: usize, col: usize) -> Result<Option<&Card>, GameError> {
        self.check_bounds(row, col)?;
        Ok(self.open_cards[row][col].as_ref())
    }

    /// Take the card in a slot and refill the slot from the same tier.
    pub fn pop_card(&mut self, row: usize, col: usize) -> Result<Option<Card>, GameError> {
        self.check_bounds(row, col)?;
        let replacement = self.decks[row].pop();
        Ok(std::mem::replace(&mut self.open_cards[row][col], replacement))
    }

    /// Face-up card ids per tier, `""` for an empty slot.
    pub fn open_card_ids(&self) -> Vec<Vec<String>> {
        self.open_cards
            .iter()
            .map(|row| {
                row.iter()
                    .map(|slot| slot.as_ref().map(|c| c.id.clone()).unwrap_or_default())
                    .collect()
            })
            .collect()
    }

    pub fn decks_card_count(&self) -> Vec<usize> {
        self.decks.iter().map(Deck::len).collect()
    }
}
