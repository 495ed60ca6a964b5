use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::card_game::{CardField, DeckCatalog};
use crate::error::GameError;
use crate::models::GameSnapshot;
use crate::shared::WINNING_POINTS;

use super::bank::Bank;
use super::cards::Card;
use super::gems::Color;
use super::player::Player;

/// Where the turn machine stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    AwaitingAction(usize),
    Over { winner: usize },
}

/// One match: bank, card field and players, plus whose turn it is.
///
/// Every action works on the current player. A failed action leaves the
/// game exactly as it was. Once a winner is set nothing changes any more.
#[derive(Debug, Clone)]
pub struct Game {
    players: Vec<Player>,
    current: usize,
    bank: Bank,
    field: CardField,
    winner: Option<usize>,
}

impl Game {
    pub fn new(names: Vec<String>, catalog: &DeckCatalog) -> Result<Self, GameError> {
        Self::with_rng(names, catalog, &mut StdRng::from_entropy())
    }

    pub fn with_rng<R: Rng + ?Sized>(
        names: Vec<String>,
        catalog: &DeckCatalog,
        rng: &mut R,
    ) -> Result<Self, GameError> {
        Self::with_card_field(names, CardField::from_catalog(catalog, rng))
    }

    pub fn with_card_field(names: Vec<String>, field: CardField) -> Result<Self, GameError> {
        if names.is_empty() {
            return Err(GameError::NoPlayers);
        }
        Ok(Self {
            bank: Bank::new(names.len()),
            players: names.into_iter().map(Player::new).collect(),
            current: 0,
            field,
            winner: None,
        })
    }

    pub fn lay_out_all(&mut self) {
        self.field.lay_out();
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn current_player_index(&self) -> usize {
        self.current
    }

    pub fn current_player(&self) -> &Player {
        &self.players[self.current]
    }

    pub fn bank(&self) -> &Bank {
        &self.bank
    }

    pub fn card_field(&self) -> &CardField {
        &self.field
    }

    pub fn winner(&self) -> Option<usize> {
        self.winner
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    pub fn state(&self) -> TurnState {
        match self.winner {
            Some(winner) => TurnState::Over { winner },
            None => TurnState::AwaitingAction(self.current),
        }
    }

    fn ensure_running(&self) -> Result<(), GameError> {
        if self.is_over() {
            Err(GameError::GameOver)
        } else {
            Ok(())
        }
    }

    pub fn take_three_gems(&mut self, colors: &[Color]) -> Result<(), GameError> {
        self.ensure_running()?;
        if !self.bank.can_take_three_different(colors) {
            return Err(GameError::ThreeGemsUnavailable {
                colors: colors.to_vec(),
            });
        }
        let taken = self.bank.take_three_different(colors);
        self.players[self.current].add_gem_set(&taken);
        Ok(())
    }

    pub fn take_two_gems(&mut self, color: Color) -> Result<(), GameError> {
        self.ensure_running()?;
        if !self.bank.can_take_two_same(color) {
            return Err(GameError::TwoGemsUnavailable(color));
        }
        let taken = self.bank.take_two_same(color);
        self.players[self.current].add_gem_set(&taken);
        Ok(())
    }

    // validate everything first, then pay, refill, refund
    pub fn buy_board_card(&mut self, row: usize, col: usize) -> Result<Card, GameError> {
        self.ensure_running()?;
        let player = &mut self.players[self.current];
        let card = self
            .field
            .get_card(row, col)?
            .ok_or(GameError::EmptySlot { row, col })?;
        if !card.can_be_bought(&player.assets, &player.bonus) {
            return Err(GameError::Unaffordable {
                card_id: card.id.clone(),
            });
        }

        let payment = player.add_card(card);
        let bought = self
            .field
            .pop_card(row, col)?
            .ok_or(GameError::EmptySlot { row, col })?;
        self.bank.add_gem_set(&payment);
        Ok(bought)
    }

    /// Close the current player's turn: check for a win, then pass the turn on.
    pub fn end_turn_checks(&mut self) -> Result<TurnState, GameError> {
        self.ensure_running()?;
        if self.players[self.current].points >= WINNING_POINTS {
            self.winner = Some(self.current);
        }
        self.current = (self.current + 1) % self.players.len();
        Ok(self.state())
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::from_game(self)
    }

    pub fn encode_state(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.snapshot())
    }
}
