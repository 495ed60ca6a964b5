pub mod card_field;
pub mod catalog;
pub mod deck;

pub use card_field::CardField;
pub use catalog::{DeckCatalog, Tier};
pub use deck::Deck;
