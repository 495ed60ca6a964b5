use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::{Game, GemSet, Player};

/// The complete state as clients see it. Field order matches the wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Empty until the game is over, then the winning seat.
    pub winner: String,
    pub current_player: String,
    pub players: BTreeMap<String, PublicPlayer>,
    pub cardfield: CardFieldView,
    pub bank: BankView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicPlayer {
    pub name: String,
    pub assets: GemSet,
    pub bonus: GemSet,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardFieldView {
    pub open_cards: Vec<Vec<String>>,
    pub decks_card_count: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankView {
    pub gems: GemSet,
}

impl From<&Player> for PublicPlayer {
    fn from(player: &Player) -> Self {
        Self {
            name: player.name.clone(),
            assets: player.assets,
            bonus: player.bonus,
            points: player.points,
        }
    }
}

impl GameSnapshot {
    pub fn from_game(game: &Game) -> Self {
        Self {
            winner: game.winner().map(|w| w.to_string()).unwrap_or_default(),
            current_player: game.current_player_index().to_string(),
            players: game
                .players()
                .iter()
                .enumerate()
                .map(|(seat, p)| (seat.to_string(), PublicPlayer::from(p)))
                .collect(),
            cardfield: CardFieldView {
                open_cards: game.card_field().open_card_ids(),
                decks_card_count: game.card_field().decks_card_count(),
            },
            bank: BankView {
                gems: *game.bank().gems(),
            },
        }
    }

    pub fn player(&self, seat: usize) -> Option<&PublicPlayer> {
        self.players.get(&seat.to_string())
    }
}
