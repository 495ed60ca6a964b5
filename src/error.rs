use std::path::PathBuf;

use thiserror::Error;

use crate::domain::Color;

/// Rule violations reported by [`crate::domain::Game`].
///
/// None of these are fatal: the server answers them with the rejection reply
/// and leaves the game untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("slot ({row}, {col}) is outside the card field")]
    SlotOutOfRange { row: usize, col: usize },
    #[error("slot ({row}, {col}) holds no card")]
    EmptySlot { row: usize, col: usize },
    #[error("card {card_id} is not affordable")]
    Unaffordable { card_id: String },
    #[error("cannot take three different gems: {colors:?}")]
    ThreeGemsUnavailable { colors: Vec<Color> },
    #[error("cannot take two {0} gems")]
    TwoGemsUnavailable(Color),
    #[error("the game is over")]
    GameOver,
    #[error("a game needs at least one player")]
    NoPlayers,
}

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("invalid length header {0:?}")]
    InvalidHeader(String),
    #[error("payload of {0} bytes does not fit the length header")]
    PayloadTooLarge(usize),
    #[error("payload is not valid UTF-8")]
    InvalidUtf8,
    #[error("malformed action {0:?}")]
    MalformedAction(String),
    #[error("unexpected reply {0:?}")]
    UnexpectedReply(String),
    #[error("username is {0} bytes long")]
    UsernameTooLong(usize),
    #[error("connection closed before a username was sent")]
    EmptyUsername,
    #[error("connection closed")]
    ConnectionClosed,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ProtocolError {
    /// Whether the connection that produced this error can keep going.
    ///
    /// Only a badly shaped action is recoverable; anything wrong with the
    /// framing itself leaves the byte stream out of sync.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ProtocolError::MalformedAction(_))
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read deck catalog {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse deck catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tier {0:?} has no cards")]
    EmptyTier(String),
    #[error("deck catalog has no tiers")]
    NoTiers,
}
