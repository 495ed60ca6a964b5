//! Rule and wire constants shared by the game core and the server.

/// Seats in a match. Turn order wraps modulo this value.
pub const PLAYER_COUNT: usize = 2;

/// Face-up slots per tier.
pub const CARDS_IN_ROW: usize = 4;

/// Points that end the game at the close of the scoring player's turn.
pub const WINNING_POINTS: u32 = 15;

/// A color must hold at least this many gems before two may be taken from it.
pub const TWO_SAME_RESERVE: u32 = 4;

/// Width of the ASCII decimal length header in front of every frame.
pub const HEADER_LENGTH: usize = 5;

/// Largest payload the header can describe.
pub const MAX_PAYLOAD_LENGTH: usize = 99_999;

/// Longest accepted username, in UTF-8 bytes.
pub const MAX_USERNAME_BYTES: usize = 15;

/// Size of the raw read used for the username handshake.
pub const HANDSHAKE_BUFFER: usize = 1024;

/// Reply sent for any rejected action.
pub const REJECTED_REPLY: &str = "False";

pub const DEFAULT_DECKS_PATH: &str = "data/decks.json";

/// How long a fresh connection has to send its username. Handshakes run
/// side by side, so a silent connection only ever holds up itself.
pub const HANDSHAKE_TIMEOUT_SECS: u64 = 10;

/// How long connection tasks get to flush their last frames after a match.
pub const SHUTDOWN_GRACE_SECS: u64 = 5;

pub const COMMAND_QUEUE: usize = 64;

/// Replies queued per seat. A seat has at most one request in flight, so a
/// full queue means the client stopped reading and the seat is dropped.
pub const OUTBOUND_QUEUE: usize = 16;
