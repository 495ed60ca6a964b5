pub mod game_manager;

pub use game_manager::{Delivery, Dispatch, MatchCommand, MatchManager, MatchOutcome};
