pub mod lobby;

pub use lobby::{read_username, Lobby, Seat};
