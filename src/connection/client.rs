use std::net::SocketAddr;

use futures::{SinkExt, StreamExt};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio_util::codec::Framed;

use crate::error::ProtocolError;
use crate::models::{parse_start, ClientAction, GameSnapshot};
use crate::shared::{MAX_USERNAME_BYTES, REJECTED_REPLY};

use super::codec::FrameCodec;

/// Minimal client side of the protocol, enough to play a match headless.
pub struct Client {
    framed: Framed<TcpStream, FrameCodec>,
}

impl Client {
    /// Connect and send the username handshake.
    pub async fn join(addr: SocketAddr, username: &str) -> Result<Self, ProtocolError> {
        if username.len() > MAX_USERNAME_BYTES {
            return Err(ProtocolError::UsernameTooLong(username.len()));
        }
        let mut stream = TcpStream::connect(addr).await?;
        stream.write_all(username.as_bytes()).await?;
        Ok(Self {
            framed: Framed::new(stream, FrameCodec),
        })
    }

    /// Block until both seats are taken; returns this client's seat and the opening state.
    pub async fn wait_for_start(&mut self) -> Result<(usize, GameSnapshot), ProtocolError> {
        let payload = self.recv().await?;
        parse_start(&payload)
    }

    pub async fn send(&mut self, action: ClientAction) -> Result<(), ProtocolError> {
        self.send_raw(action.encode()).await
    }

    /// Send any payload, well formed or not.
    pub async fn send_raw(&mut self, payload: impl Into<String>) -> Result<(), ProtocolError> {
        self.framed.send(payload.into()).await
    }

    pub async fn recv(&mut self) -> Result<String, ProtocolError> {
        self.framed.next().await.ok_or(ProtocolError::ConnectionClosed)?
    }

    /// Read one reply: `None` for a rejection, otherwise the new state.
    pub async fn recv_state(&mut self) -> Result<Option<GameSnapshot>, ProtocolError> {
        let payload = self.recv().await?;
        if payload == REJECTED_REPLY {
            return Ok(None);
        }
        serde_json::from_str(&payload)
            .map(Some)
            .map_err(|_| ProtocolError::UnexpectedReply(payload))
    }

    pub async fn act(&mut self, action: ClientAction) -> Result<Option<GameSnapshot>, ProtocolError> {
        self.send(action).await?;
        self.recv_state().await
    }
}
