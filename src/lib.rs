//! Authoritative server for a two-player gem-trading card game.
//!
//! - `domain`: gems, bank, cards, players and the turn machine in [`domain::Game`]
//! - `card_game`: decks, the face-up card field, and the deck catalog loader
//! - `models`: the JSON state snapshot and action/reply payloads
//! - `connection`: length-prefixed framing and per-connection tasks
//! - `game`: [`game::MatchManager`], the single task that applies actions
//! - `app`: the lobby that seats players and starts a match

pub mod app;
pub mod card_game;
pub mod config;
pub mod connection;
pub mod domain;
pub mod error;
pub mod game;
pub mod models;
pub mod shared;

pub use crate::domain::{Bank, Card, Color, Game, GemSet, Player, TurnState};
pub use crate::error::{CatalogError, GameError, ProtocolError};
