pub mod game;
pub mod protocol;

pub use game::{BankView, CardFieldView, GameSnapshot, PublicPlayer};
pub use protocol::{parse_start, ClientAction, ServerReply};
