pub mod bank;
pub mod cards;
pub mod game;
pub mod gems;
pub mod player;

pub use bank::Bank;
pub use cards::Card;
pub use game::{Game, TurnState};
pub use gems::{Color, GemSet};
pub use player::Player;
