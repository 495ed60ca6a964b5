//! Action and reply payloads carried inside frames.

use std::fmt;
use std::str::FromStr;

use crate::domain::Color;
use crate::error::ProtocolError;
use crate::shared::REJECTED_REPLY;

use super::game::GameSnapshot;

/// A client request. The first payload character is the action code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientAction {
    /// `0rc`
    BuyCard { row: usize, col: usize },
    /// `1c`
    TakeTwo(Color),
    /// `2abc`
    TakeThree([Color; 3]),
    /// `3`
    FinishTurn,
}

fn digit(c: char) -> Option<usize> {
    c.to_digit(10).map(|d| d as usize)
}

fn color(c: char) -> Option<Color> {
    digit(c).and_then(Color::from_index)
}

impl ClientAction {
    pub fn parse(payload: &str) -> Result<Self, ProtocolError> {
        let malformed = || ProtocolError::MalformedAction(payload.to_string());
        let mut chars = payload.chars();
        let code = chars.next().ok_or_else(malformed)?;
        let args: Vec<char> = chars.collect();

        let action = match (code, args.as_slice()) {
            ('0', &[r, c]) => ClientAction::BuyCard {
                row: digit(r).ok_or_else(malformed)?,
                col: digit(c).ok_or_else(malformed)?,
            },
            ('1', &[c]) => ClientAction::TakeTwo(color(c).ok_or_else(malformed)?),
            ('2', &[a, b, c]) => ClientAction::TakeThree([
                color(a).ok_or_else(malformed)?,
                color(b).ok_or_else(malformed)?,
                color(c).ok_or_else(malformed)?,
            ]),
            ('3', &[]) => ClientAction::FinishTurn,
            _ => return Err(malformed()),
        };
        Ok(action)
    }

    /// The payload a client sends for this action.
    pub fn encode(&self) -> String {
        match self {
            ClientAction::BuyCard { row, col } => format!("0{row}{col}"),
            ClientAction::TakeTwo(c) => format!("1{}", c.index()),
            ClientAction::TakeThree([a, b, c]) => {
                format!("2{}{}{}", a.index(), b.index(), c.index())
            }
            ClientAction::FinishTurn => "3".to_string(),
        }
    }

    pub fn is_finish_turn(&self) -> bool {
        matches!(self, ClientAction::FinishTurn)
    }
}

impl FromStr for ClientAction {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClientAction::parse(s)
    }
}

impl fmt::Display for ClientAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientAction::BuyCard { row, col } => write!(f, "buy card ({row}, {col})"),
            ClientAction::TakeTwo(c) => write!(f, "take two {c}"),
            ClientAction::TakeThree([a, b, c]) => write!(f, "take {a}, {b}, {c}"),
            ClientAction::FinishTurn => f.write_str("finish turn"),
        }
    }
}

/// What the server sends back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerReply {
    /// Sent once at match start: seat index followed by the state.
    Start { seat: usize, state: String },
    State(String),
    Rejected,
}

impl ServerReply {
    pub fn into_payload(self) -> String {
        match self {
            ServerReply::Start { seat, state } => format!("{seat}{state}"),
            ServerReply::State(state) => state,
            ServerReply::Rejected => REJECTED_REPLY.to_string(),
        }
    }
}

/// Split a start message into the seat and the initial snapshot.
pub fn parse_start(payload: &str) -> Result<(usize, GameSnapshot), ProtocolError> {
    let malformed = || ProtocolError::UnexpectedReply(payload.to_string());
    let seat = payload.chars().next().and_then(digit).ok_or_else(malformed)?;
    let snapshot = serde_json::from_str(&payload[1..]).map_err(|_| malformed())?;
    Ok((seat, snapshot))
}
